//! Per-run state shared between the runtime and the engine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use rbison_core::Value;

use super::arena::{ValueArena, ValueHandle};
use super::dispatch::{Dispatcher, HandlerError};
use super::error::ParseError;
use super::event::ParseEvent;
use super::input::Input;

/// Outcome of [`Session::reduce`], as the engine should act on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// The reduction produced this value.
    Value(ValueHandle),
    /// The handler failed; take the error path.
    Failed,
    /// Stop the run.
    Abort,
}

/// Everything a run leaves behind once the engine returns.
#[derive(Debug)]
pub(crate) struct SessionReport {
    pub(crate) value: Value,
    pub(crate) error: Option<ParseError>,
    pub(crate) fatal: Option<ParseError>,
    pub(crate) reductions: usize,
    pub(crate) bytes_read: usize,
    pub(crate) input_exhausted: bool,
    /// Input read from the source but never handed to the engine
    pub(crate) unread: Vec<u8>,
}

/// The host side of one engine run.
pub struct Session<'a> {
    input: &'a mut dyn Input,
    dispatcher: &'a mut Dispatcher,
    arena: ValueArena,
    pending: Vec<u8>,
    interactive: bool,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    /// Most recent recoverable error
    error: Option<ParseError>,
    /// Error that stopped the run
    fatal: Option<ParseError>,
    last: Option<ValueHandle>,
    reductions: usize,
    bytes_read: usize,
    input_exhausted: bool,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        input: &'a mut dyn Input,
        dispatcher: &'a mut Dispatcher,
        interactive: bool,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            input,
            dispatcher,
            arena: ValueArena::new(),
            pending: Vec::new(),
            interactive,
            timeout,
            deadline: timeout.map(|t| Instant::now() + t),
            error: None,
            fatal: None,
            last: None,
            reductions: 0,
            bytes_read: 0,
            input_exhausted: false,
        }
    }

    /// Start with `unread`, left over from an earlier run, ahead of the input.
    pub(crate) fn resume(mut self, unread: Vec<u8>) -> Self {
        self.pending = unread;
        self
    }

    /// Whether the run has been stopped; the engine should wind down.
    pub fn is_halted(&self) -> bool {
        self.fatal.is_some()
    }

    /// Up to `max` bytes of input. Empty means end of input.
    pub fn read(&mut self, max: usize) -> Vec<u8> {
        if self.is_halted() || !self.check_deadline() || max == 0 {
            return Vec::new();
        }

        if self.pending.is_empty() && !self.input_exhausted {
            match self.input.read(max) {
                Ok(chunk) if chunk.is_empty() => self.input_exhausted = true,
                Ok(chunk) => self.pending = chunk,
                Err(e) => {
                    self.halt(ParseError::Input {
                        message: e.to_string(),
                    });
                    return Vec::new();
                }
            }
        }

        let take = self.pending.len().min(max);
        let rest = self.pending.split_off(take);
        let chunk = std::mem::replace(&mut self.pending, rest);
        self.bytes_read += chunk.len();
        log::trace!("read {} of {max} bytes", chunk.len());
        chunk
    }

    /// Register the text of a scanned token.
    pub fn token(&mut self, text: &[u8]) -> ValueHandle {
        self.arena
            .push(Value::Token(String::from_utf8_lossy(text).into_owned()))
    }

    /// Hand one reduction to the dispatcher.
    ///
    /// `values` are the handles on the engine's stack for the alternative's
    /// symbols; `None` stands for a symbol without a value.
    pub fn reduce(
        &mut self,
        target: &str,
        option: usize,
        names: Vec<String>,
        values: &[Option<ValueHandle>],
    ) -> Reduction {
        if self.is_halted() || !self.check_deadline() {
            return Reduction::Abort;
        }

        let values: Vec<Value> = values
            .iter()
            .map(|handle| match handle {
                Some(handle) => self.arena.take(*handle),
                None => Value::Empty,
            })
            .collect();
        let event = match ParseEvent::new(target, option, names, values) {
            Ok(event) => event,
            Err(e) => {
                self.record(ParseError::Handler {
                    target: target.to_string(),
                    option,
                    source: HandlerError::new(e.to_string()),
                });
                return Reduction::Failed;
            }
        };

        let dispatcher = &mut *self.dispatcher;
        let result = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(event)))
            .unwrap_or_else(|payload| Err(HandlerError::new(panic_message(payload))));
        match result {
            Ok(value) => {
                self.reductions += 1;
                let handle = self.arena.push(value);
                self.last = Some(handle);
                Reduction::Value(handle)
            }
            Err(source) => {
                log::debug!("handler for {target}:{option} failed: {source}");
                self.record(ParseError::Handler {
                    target: target.to_string(),
                    option,
                    source,
                });
                Reduction::Failed
            }
        }
    }

    /// Report a syntax error at `line`, near the text `near`.
    ///
    /// Outside interactive mode this stops the run.
    pub fn syntax_error(&mut self, line: usize, message: &str, near: &str) {
        let error = ParseError::Syntax {
            line,
            message: message.to_string(),
            near: near.to_string(),
        };
        if self.interactive {
            log::info!("{error}");
            self.record(error);
        } else {
            self.halt(error);
        }
    }

    /// Stop the run with `error`. The first fatal error wins.
    pub(crate) fn halt(&mut self, error: ParseError) {
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
    }

    fn record(&mut self, error: ParseError) {
        self.error = Some(error);
    }

    fn check_deadline(&mut self) -> bool {
        match (self.deadline, self.timeout) {
            (Some(deadline), Some(timeout)) if Instant::now() >= deadline => {
                self.halt(ParseError::Timeout(timeout));
                false
            }
            _ => true,
        }
    }

    /// Value behind `handle`, while it is still live.
    pub fn value(&self, handle: ValueHandle) -> Option<&Value> {
        self.arena.get(handle)
    }

    pub fn reductions(&self) -> usize {
        self.reductions
    }

    pub(crate) fn finish(mut self) -> SessionReport {
        // the last value may have gone to a reduction that failed
        let value = match self.last {
            Some(handle) if self.arena.get(handle).is_some() => self.arena.take(handle),
            _ => Value::Empty,
        };
        log::trace!("{} values left unconsumed", self.arena.live());
        SessionReport {
            value,
            error: self.error,
            fatal: self.fatal,
            reductions: self.reductions,
            bytes_read: self.bytes_read,
            input_exhausted: self.input_exhausted && self.pending.is_empty(),
            unread: self.pending,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("handler panicked: {detail}")
}
