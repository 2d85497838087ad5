//! Mapping reductions to user handlers.

use std::collections::HashMap;
use std::fmt;

use rbison_core::Value;

use super::event::ParseEvent;

/// A handler's verdict on one reduction.
pub type HandlerResult = Result<Value, HandlerError>;

type Handler = Box<dyn FnMut(ParseEvent) -> HandlerResult>;
type ReduceHook = Box<dyn FnMut(&str, usize, Value) -> Value>;

/// A handler refused a reduction.
///
/// The engine treats the reduction as a syntax error and recovers through
/// the grammar's `error` alternatives.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Handlers by target.
///
/// A target without a handler reduces to the event's [`rbison_core::TreeNode`].
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<String, Handler>,
    hook: Option<ReduceHook>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `target`.
    pub fn handler<F>(mut self, target: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(ParseEvent) -> HandlerResult + 'static,
    {
        self.register(target, handler);
        self
    }

    /// Register `handler` for `target`, returning whether one was replaced.
    pub fn register<F>(&mut self, target: impl Into<String>, handler: F) -> bool
    where
        F: FnMut(ParseEvent) -> HandlerResult + 'static,
    {
        self.handlers
            .insert(target.into(), Box::new(handler))
            .is_some()
    }

    /// Observe, or replace, every reduction value after its handler ran.
    ///
    /// The hook gets the target, the option and the value.
    pub fn on_reduce<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str, usize, Value) -> Value + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn has_handler(&self, target: &str) -> bool {
        self.handlers.contains_key(target)
    }

    /// Targets with a handler, sorted.
    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        targets.sort_unstable();
        targets
    }

    /// Produce the value of one reduction.
    pub fn dispatch(&mut self, event: ParseEvent) -> HandlerResult {
        let target = event.target().to_string();
        let option = event.option();
        log::debug!("reduce {target}:{option}");

        let value = match self.handlers.get_mut(&target) {
            Some(handler) => handler(event)?,
            None => Value::from(event.into_node()),
        };
        Ok(match &mut self.hook {
            Some(hook) => hook(&target, option, value),
            None => value,
        })
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.targets())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
