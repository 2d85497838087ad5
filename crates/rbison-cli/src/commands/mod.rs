pub mod build;
pub mod convert;
pub mod grammar_loader;
pub mod run;
