//! Grammar tooling for rbison.
//!
//! - [`grammar`]: extract a [`grammar::GrammarSpec`] from bison text, or build one
//! - [`codegen`]: emit the Rust host module for a grammar
//! - [`build`]: compile a grammar and lexer script into a loadable engine

pub mod build;
pub mod codegen;
pub mod grammar;

#[cfg(test)]
mod test_utils;

pub use build::{ArtifactCache, BuildConfig, BuildError, EngineBuilder};
pub use codegen::generate;
pub use grammar::{GrammarError, GrammarSpec, extract};
