//! Common utilities and types used throughout the simulator.
//!
//! This module provides building blocks shared by every device and by the board layer. It includes:
//! 1. **Constants:** The STM32L4R5 memory map and GPIO geometry.
//! 2. **Access Widths:** `AccessSize`, the width of one bus transaction.
//! 3. **Error Handling:** Guest diagnostics (`GuestError`, `GuestErrorLog`) and `BoardError`.
//! 4. **Pin Identity:** Strong types for GPIO ports and pins.

/// Memory map and GPIO geometry constants.
pub mod constants;

/// Bus access width definitions.
pub mod data;

/// Guest error diagnostics and construction error types.
pub mod error;

/// GPIO port and pin identifiers.
pub mod pin;

pub use data::AccessSize;
pub use error::{BoardError, GuestError, GuestErrorLog};
pub use pin::{GpioBlockId, GpioPin, PinIndex};
