//! Run errors.

use std::path::PathBuf;
use std::time::Duration;

use rbison_core::ErrorKind;

use super::dispatch::HandlerError;

/// An engine could not be loaded or used.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("cannot load engine `{}`: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("engine `{}` does not export `{symbol}`", .path.display())]
    MissingSymbol { path: PathBuf, symbol: &'static str },

    #[error(
        "engine `{}` was built for signature {found}, expected {expected}; \
         drop any engine still loaded from this path before loading the rebuilt one",
        .path.display()
    )]
    SignatureMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Engine
    }
}

/// Something that went wrong during a run.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {message} near `{near}`")]
    Syntax {
        line: usize,
        message: String,
        near: String,
    },

    #[error("handler for `{target}` (option {option}) failed: {source}")]
    Handler {
        target: String,
        option: usize,
        #[source]
        source: HandlerError,
    },

    #[error("run exceeded its {0:?} timeout")]
    Timeout(Duration),

    #[error("cannot read input: {message}")]
    Input { message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Syntax { .. } => ErrorKind::Syntax,
            ParseError::Handler { .. } => ErrorKind::Handler,
            ParseError::Timeout(_) => ErrorKind::Timeout,
            ParseError::Input { .. } => ErrorKind::Input,
            ParseError::Engine(_) => ErrorKind::Engine,
        }
    }
}
