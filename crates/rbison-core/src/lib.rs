#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data model shared by the rbison compiler and runtime.
//!
//! - `node` / `value`: the parse tree built from reductions
//! - `markup`: lossless tree markup export and reconstruction
//! - `artifact`: identity of a compiled parser engine
//! - `error`: the error kinds every rbison failure maps to

pub mod artifact;
pub mod error;
pub mod markup;
pub mod node;
pub mod utils;
pub mod value;


pub use artifact::{EngineArtifact, Signature};
pub use error::ErrorKind;
pub use markup::{MarkupError, Resolver, SymbolTable, from_markup, to_markup, to_pretty_markup};
pub use node::{NodeError, RESERVED_ATTRIBUTES, TreeNode};
pub use value::Value;
