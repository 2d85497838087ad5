//! The seam between the runtime and a parser engine.

use super::error::EngineError;
use super::session::Session;

/// How an engine run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineExit {
    /// The start target was reduced and input ended.
    Accepted,
    /// The engine gave up on a syntax error it could not recover from.
    Rejected,
    /// The run was stopped: a reduction or the session asked to abort.
    Aborted,
}

/// A parser engine.
///
/// One call to `run` parses until the engine accepts, rejects or aborts.
/// The engine pulls input through [`Session::read`], registers token text
/// with [`Session::token`], and reports every reduction to
/// [`Session::reduce`] in the order it happens.
pub trait EngineAdapter {
    fn run(&mut self, session: &mut Session<'_>, debug: bool) -> Result<EngineExit, EngineError>;
}

impl<E: EngineAdapter + ?Sized> EngineAdapter for Box<E> {
    fn run(&mut self, session: &mut Session<'_>, debug: bool) -> Result<EngineExit, EngineError> {
        (**self).run(session, debug)
    }
}
