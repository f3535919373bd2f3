//! Signal splitter.
//!
//! Replicates one input level onto a fixed number of output lines, each of which
//! may drive one consumer. Consumers are notified in ascending line order, on the
//! caller's stack, before `set_input` returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use super::InputPin;
use crate::common::error::BoardError;

/// Largest number of output lines a splitter supports.
pub const MAX_SPLIT_LINES: usize = 16;

#[derive(Debug)]
struct Lines {
    levels: Vec<AtomicBool>,
    targets: Vec<OnceLock<InputPin>>,
}

impl Lines {
    fn propagate(&self, level: bool) {
        for (line, target) in self.levels.iter().zip(&self.targets) {
            line.store(level, Ordering::Relaxed);
            if let Some(input) = target.get() {
                input.set(level);
            }
        }
    }
}

/// A one-input, N-output fan-out element.
#[derive(Debug, Clone)]
pub struct Splitter {
    lines: Arc<Lines>,
}

impl Splitter {
    /// Creates a splitter with `line_count` output lines, all low and unconnected.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidLineCount`] unless `1 <= line_count <= 16`.
    pub fn new(line_count: usize) -> Result<Self, BoardError> {
        if line_count == 0 || line_count > MAX_SPLIT_LINES {
            return Err(BoardError::InvalidLineCount {
                count: line_count,
                max: MAX_SPLIT_LINES,
            });
        }
        let lines = Lines {
            levels: (0..line_count).map(|_| AtomicBool::new(false)).collect(),
            targets: (0..line_count).map(|_| OnceLock::new()).collect(),
        };
        Ok(Self {
            lines: Arc::new(lines),
        })
    }

    /// Number of output lines.
    pub fn line_count(&self) -> usize {
        self.lines.levels.len()
    }

    /// Attaches `input` as the consumer of output `line`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LineOutOfRange`] for a line past the line count and
    /// [`BoardError::LineAlreadyConnected`] if the line already has a consumer.
    pub fn connect_output(&self, line: usize, input: InputPin) -> Result<(), BoardError> {
        let slot = self
            .lines
            .targets
            .get(line)
            .ok_or_else(|| BoardError::LineOutOfRange {
                line,
                count: self.line_count(),
            })?;
        slot.set(input)
            .map_err(|_| BoardError::LineAlreadyConnected(line))
    }

    /// Returns the splitter's input as a connection point for a producer.
    pub fn input(&self) -> InputPin {
        let lines = Arc::clone(&self.lines);
        InputPin::new(move |level| lines.propagate(level))
    }

    /// Sets every output line to `level` and notifies the consumers in line order.
    pub fn set_input(&self, level: bool) {
        self.lines.propagate(level);
    }

    /// Current level of output `line`, or `None` if the line does not exist.
    pub fn output(&self, line: usize) -> Option<bool> {
        self.lines
            .levels
            .get(line)
            .map(|level| level.load(Ordering::Relaxed))
    }

    /// Returns `true` if output `line` has a consumer attached.
    pub fn is_connected(&self, line: usize) -> bool {
        self.lines
            .targets
            .get(line)
            .is_some_and(|slot| slot.get().is_some())
    }
}
