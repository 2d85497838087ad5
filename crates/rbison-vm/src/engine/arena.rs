//! Storage for semantic values held by the engine.
//!
//! The engine's value stack only ever sees handles. A handle is the slot
//! index plus one, so zero (a null pointer on the native side) never names
//! a value.

use std::num::NonZeroUsize;

use rbison_core::Value;

/// Opaque reference to a semantic value owned by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueHandle(NonZeroUsize);

impl ValueHandle {
    /// Handle from its raw form; zero has none.
    pub fn from_raw(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    pub fn to_raw(self) -> usize {
        self.0.get()
    }
}

/// Append-only value slots for one run.
///
/// Values are moved out when a reduction consumes them. Slots are never
/// reused, so a stale handle finds an empty slot instead of another value.
#[derive(Debug, Default)]
pub(crate) struct ValueArena {
    slots: Vec<Option<Value>>,
}

impl ValueArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, value: Value) -> ValueHandle {
        let index = self.slots.len();
        self.slots.push(Some(value));
        ValueHandle(NonZeroUsize::MIN.saturating_add(index))
    }

    /// Move the value out; a missing or consumed slot gives `Value::Empty`.
    pub(crate) fn take(&mut self, handle: ValueHandle) -> Value {
        match self
            .slots
            .get_mut(handle.to_raw() - 1)
            .and_then(Option::take)
        {
            Some(value) => value,
            None => {
                log::warn!("value handle {} is not live", handle.to_raw());
                Value::Empty
            }
        }
    }

    pub(crate) fn get(&self, handle: ValueHandle) -> Option<&Value> {
        self.slots.get(handle.to_raw() - 1)?.as_ref()
    }

    /// Number of values not yet consumed.
    pub(crate) fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
