//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components that make up the simulated STM32L4R5,
//! including the system bus, on-chip memories, peripherals, the entropy source,
//! and the `Soc` type that assembles them.

/// SoC assembly and realization.
pub mod builder;

/// Memory-mapped I/O device implementations.
pub mod devices;

/// Entropy sources for random-number devices.
pub mod entropy;

/// System bus interconnect and routing.
pub mod interconnect;

/// Flash and SRAM.
pub mod memory;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use builder::Soc;
