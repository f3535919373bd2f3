//! DM163 constant-current LED driver inputs.
//!
//! Models the driver's input stage: the current level of each of its 14 discrete
//! inputs and the number of rising edges seen on each. Inputs are atomics so a
//! level can be delivered from any `InputPin` handle without borrowing the device.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};

use super::peripheral::{Peripheral, PeripheralFactory};
use super::pin_map::{Dm163Input, NUM_DM163_INPUTS};
use crate::signal::InputPin;

#[derive(Debug, Default)]
struct Inputs {
    levels: AtomicU16,
    rising_edges: [AtomicU32; NUM_DM163_INPUTS],
}

impl Inputs {
    fn set(&self, index: usize, level: bool) {
        let bit = 1u16 << index;
        let prev = if level {
            self.levels.fetch_or(bit, Ordering::Relaxed)
        } else {
            self.levels.fetch_and(!bit, Ordering::Relaxed)
        };
        if level && prev & bit == 0 {
            let _ = self.rising_edges[index].fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// DM163 LED driver.
#[derive(Debug, Default)]
pub struct Dm163 {
    inputs: Arc<Inputs>,
}

impl Dm163 {
    /// Creates a driver with every input low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory for board composition.
    pub fn factory() -> PeripheralFactory {
        Box::new(|| Ok(Box::new(Self::new()) as Box<dyn Peripheral>))
    }

    /// Current level of `input`.
    pub fn level(&self, input: Dm163Input) -> bool {
        self.inputs.levels.load(Ordering::Relaxed) & (1 << input.index()) != 0
    }

    /// Levels of all inputs; bit n = input n.
    pub fn levels(&self) -> u16 {
        self.inputs.levels.load(Ordering::Relaxed)
    }

    /// Rising edges seen on `input` since creation.
    pub fn rising_edges(&self, input: Dm163Input) -> u32 {
        self.inputs.rising_edges[input.index()].load(Ordering::Relaxed)
    }
}

impl Peripheral for Dm163 {
    fn name(&self) -> &str {
        "DM163"
    }

    fn input_count(&self) -> usize {
        NUM_DM163_INPUTS
    }

    fn input_pin(&self, index: usize) -> Option<InputPin> {
        if index >= NUM_DM163_INPUTS {
            return None;
        }
        let inputs = Arc::clone(&self.inputs);
        Some(InputPin::new(move |level| inputs.set(index, level)))
    }

    fn input_level(&self, index: usize) -> Option<bool> {
        Dm163Input::ALL.get(index).map(|&input| self.level(input))
    }
}
