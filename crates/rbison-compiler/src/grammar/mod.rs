//! Grammar descriptions: extraction from bison text, construction, rendering.

mod error;
mod extract;
mod lexer;
mod render;
mod types;


pub use error::GrammarError;
pub use extract::extract;
pub use lexer::{Delimiter, split_unquoted};
pub use types::{Alternative, Associativity, GrammarSpec, GrammarSpecBuilder, PrecedenceRule};

pub(crate) use render::render;
