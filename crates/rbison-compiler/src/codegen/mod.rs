//! Host module generation.
//!
//! Turns a grammar into a Rust module with the grammar rebuilt through
//! [`GrammarSpec::builder`], the lexer script embedded verbatim, and one
//! handler stub per target ready to be filled in.

mod config;
mod emitter;
mod naming;

#[cfg(test)]
mod codegen_tests;

pub use config::Config;
pub use emitter::Emitter;

use crate::grammar::GrammarSpec;

/// Generate the host module source for a grammar and its lexer script.
pub fn generate(spec: &GrammarSpec, lexer: &str, config: Config) -> String {
    Emitter::new(spec, lexer, config).emit()
}
