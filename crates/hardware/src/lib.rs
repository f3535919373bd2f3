//! STM32L4R5 board simulator core.
//!
//! This crate models the STM32L4R5 SoC and the Nucleo-L4R5ZI board around it:
//! 1. **SoC:** Bus, flash and SRAM, GPIO ports, the true random number generator, and the watchdog.
//! 2. **Signals:** Discrete input/output pins and fan-out splitters between devices.
//! 3. **Board:** Composition of the SoC with an optional DM163 LED driver over a fixed pin map.
//! 4. **Diagnostics:** Guest errors are recorded per device and emitted as `tracing` events.
//!
//! # Examples
//!
//! ```
//! use stm32sim_core::{Board, Config};
//! use stm32sim_core::board::default_display_factory;
//!
//! let board = Board::compose(&Config::default(), default_display_factory()).unwrap();
//! assert!(board.soc().is_realized());
//! ```

/// Common types and constants (memory map, access widths, errors, pin identity).
pub mod common;
/// Simulator configuration (defaults and JSON loading).
pub mod config;
/// Discrete signal lines and splitters.
pub mod signal;
/// System-on-chip (builder, bus, devices, memory, traits).
pub mod soc;
/// Board composition (pin map, peripherals, wiring).
pub mod board;

/// Composed board; construct with `Board::compose`.
pub use crate::board::Board;
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The SoC; construct with `Soc::new` and `Soc::realize`.
pub use crate::soc::Soc;
