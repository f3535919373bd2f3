//! Discrete signal lines between devices.
//!
//! Devices expose their digital inputs as `InputPin` connection points and drive
//! their digital outputs through `OutputPin`s. This module provides:
//! 1. **Input Pins:** Cloneable handles that deliver a level to the owning device.
//! 2. **Output Pins:** A single connection slot that forwards every level change.
//! 3. **Splitters:** Fan-out elements that replicate one input to a fixed number of lines.
//!
//! Propagation is synchronous: a consumer has observed the new level before `set` returns.

/// Fixed-fanout signal splitter.
pub mod splitter;

use std::fmt;
use std::sync::Arc;

pub use splitter::Splitter;

type Handler = dyn Fn(bool) + Send + Sync;

/// Connection point of a device's discrete input.
///
/// Cloning yields another handle to the same input.
#[derive(Clone)]
pub struct InputPin {
    handler: Arc<Handler>,
}

impl InputPin {
    /// Creates an input that calls `handler` with every level it receives.
    pub fn new(handler: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Delivers `level` to the device owning this input.
    pub fn set(&self, level: bool) {
        (self.handler)(level);
    }
}

impl fmt::Debug for InputPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputPin").finish_non_exhaustive()
    }
}

/// A device's discrete output, connectable to at most one input.
#[derive(Debug, Default)]
pub struct OutputPin {
    target: Option<InputPin>,
    level: Option<bool>,
}

impl OutputPin {
    /// Creates an unconnected output that has never been driven.
    pub const fn new() -> Self {
        Self {
            target: None,
            level: None,
        }
    }

    /// Connects this output to `input`, replacing any previous connection.
    pub fn connect(&mut self, input: InputPin) {
        self.target = Some(input);
    }

    /// Returns `true` if a consumer is attached.
    pub const fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    /// Drives `level` onto the line and forwards it to the connected input, if any.
    pub fn set(&mut self, level: bool) {
        self.level = Some(level);
        if let Some(target) = &self.target {
            target.set(level);
        }
    }

    /// Last level driven, or `None` if the output was never driven.
    pub const fn level(&self) -> Option<bool> {
        self.level
    }
}
