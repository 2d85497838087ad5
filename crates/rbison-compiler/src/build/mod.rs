//! Engine builds: native glue, toolchain runs and the artifact cache.

mod builder;
mod cache;
mod config;
mod error;
mod glue;
mod toolchain;


pub use builder::EngineBuilder;
pub use cache::ArtifactCache;
pub use config::BuildConfig;
pub use error::{BuildError, BuildStep};
pub use glue::{HOST_HEADER, HOST_HEADER_NAME, grammar_file, render_grammar};
pub use toolchain::{CommandOutput, CommandRunner, SystemRunner};
