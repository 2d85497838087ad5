//! Error kinds.
//!
//! Each crate keeps its own error enum; `ErrorKind` is the tag callers
//! branch on when they only care about the category of a failure.

use std::fmt;

/// Category of an rbison failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Grammar text could not be split into declarations and rules.
    MalformedGrammar,
    /// An external toolchain step failed, or its outputs were missing.
    BuildFailure,
    /// The engine reported a syntax error.
    Syntax,
    /// A reduction handler failed.
    Handler,
    /// A run exceeded its configured time limit.
    Timeout,
    /// A compiled engine could not be loaded or does not match its grammar.
    Engine,
    /// The input read callback failed.
    Input,
    /// Tree markup could not be written or reconstructed.
    Markup,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MalformedGrammar => "malformed grammar",
            ErrorKind::BuildFailure => "build failure",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Handler => "handler failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Engine => "engine error",
            ErrorKind::Input => "input error",
            ErrorKind::Markup => "markup error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
