//! Running engines.
//!
//! The engine owns the parse tables and the scanner; the [`Session`] owns
//! everything else. Values cross into the engine only as [`ValueHandle`]s.

mod adapter;
mod arena;
mod dispatch;
mod error;
mod event;
mod input;
mod native;
mod parser;
mod session;

#[cfg(test)]
mod calc_engine;
#[cfg(test)]
mod dispatch_tests;
#[cfg(test)]
mod session_tests;

pub use adapter::{EngineAdapter, EngineExit};
pub use arena::ValueHandle;
pub use dispatch::{Dispatcher, HandlerError, HandlerResult};
pub use error::{EngineError, ParseError};
pub use event::ParseEvent;
pub use input::{FnInput, Input, ReaderInput, StrInput};
pub use native::NativeEngine;
pub use parser::{Parser, RunConfig, RunOutcome, RunState};
pub use session::{Reduction, Session};
