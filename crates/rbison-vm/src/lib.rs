//! Runtime for rbison engines.
//!
//! A [`Parser`] drives an engine over an [`Input`], handing every reduction
//! to a [`Dispatcher`]. Engines are compiled bison/flex modules loaded with
//! [`NativeEngine`], or anything else implementing [`EngineAdapter`].

pub mod engine;

pub use engine::{
    Dispatcher, EngineAdapter, EngineError, EngineExit, FnInput, HandlerError, HandlerResult,
    Input, NativeEngine, ParseError, ParseEvent, Parser, ReaderInput, Reduction, RunConfig,
    RunOutcome, RunState, Session, StrInput, ValueHandle,
};
