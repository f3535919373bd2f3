//! Downstream peripherals a board can wire to the SoC.

use std::fmt;

use crate::common::error::BoardError;
use crate::signal::InputPin;

/// A device with discrete inputs that the board drives from SoC GPIO pins.
pub trait Peripheral: fmt::Debug + Send {
    /// Short device name used in logs and errors.
    fn name(&self) -> &str;

    /// Number of discrete inputs.
    fn input_count(&self) -> usize;

    /// Connection point of input `index`, or `None` if there is no such input.
    fn input_pin(&self, index: usize) -> Option<InputPin>;

    /// Last level received on input `index`, or `None` if there is no such input.
    fn input_level(&self, index: usize) -> Option<bool>;
}

/// Builds and realizes a peripheral during board composition.
pub type PeripheralFactory = Box<dyn FnOnce() -> Result<Box<dyn Peripheral>, BoardError>>;
