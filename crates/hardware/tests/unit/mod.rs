//! # Unit Components
//!
//! Tests for each building block of the simulator, from the shared error
//! types up to the composed board.



/// Signal pins and splitters.
pub mod signal;

/// SoC devices, bus, memories, and realization.
///
/// This module organizes tests for the RNG, GPIO ports, the watchdog,
/// the interconnect, and the flash/SRAM regions.
pub mod soc;
