//! Engine build errors.

use std::fmt;
use std::path::PathBuf;

use rbison_core::ErrorKind;

/// A stage of the engine build pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStep {
    /// Grammar tables (bison).
    Grammar,
    /// Scanner (flex).
    Lexer,
    /// C compile and link.
    Compile,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildStep::Grammar => "grammar compiler",
            BuildStep::Lexer => "lexer compiler",
            BuildStep::Compile => "C compiler",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{step} failed ({}): {command}\n{stderr}", status_text(*.status))]
    Toolchain {
        step: BuildStep,
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("could not run {step} `{program}`: {source}")]
    Spawn {
        step: BuildStep,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} did not produce `{}`", .path.display())]
    MissingOutput { step: BuildStep, path: PathBuf },

    #[error("no command configured for the {0}")]
    EmptyCommand(BuildStep),

    #[error("{context} `{}`: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid build configuration: {0}")]
    Config(String),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BuildFailure
    }

    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BuildError::Io {
            context,
            path,
            source,
        }
    }
}

fn status_text(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
