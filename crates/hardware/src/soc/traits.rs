//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by all bus-attached components. It provides:
//! 1. **Identification:** `name` and `address_range` for bus routing.
//! 2. **Access:** Byte, half, word, and doubleword read/write at device-relative offsets.
//! 3. **Lifecycle:** Optional `tick` for devices that count time (the watchdog).
//! 4. **Downcasting:** Optional casts to `GpioBlock`, `Rng`, or `Iwdg` for board wiring and inspection.
//!
//! All implementors must be `Send + Sync` so a realized SoC can be moved across threads.

use crate::soc::devices::{GpioBlock, Iwdg, Rng};

/// Trait for memory-mapped I/O devices attached to the system bus.
///
/// Devices provide a name, address range, and read/write methods. Optional methods support
/// ticking and type-specific access for the board composer.
pub trait Device: Send + Sync {
    /// Returns a short name for this device (e.g., `"RNG"`, `"GPIOA"`).
    fn name(&self) -> &str;
    /// Returns (base_address, size_in_bytes) for this device's MMIO or memory region.
    fn address_range(&self) -> (u64, u64);
    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u64) -> u8;
    /// Reads two bytes (little-endian) at the given offset.
    fn read_u16(&mut self, offset: u64) -> u16;
    /// Reads four bytes (little-endian) at the given offset.
    fn read_u32(&mut self, offset: u64) -> u32;
    /// Reads eight bytes (little-endian) at the given offset.
    fn read_u64(&mut self, offset: u64) -> u64;
    /// Writes one byte at the given offset.
    fn write_u8(&mut self, offset: u64, val: u8);
    /// Writes two bytes (little-endian) at the given offset.
    fn write_u16(&mut self, offset: u64, val: u16);
    /// Writes four bytes (little-endian) at the given offset.
    fn write_u32(&mut self, offset: u64, val: u32);
    /// Writes eight bytes (little-endian) at the given offset.
    fn write_u64(&mut self, offset: u64, val: u64);

    /// Writes a contiguous byte slice at the given offset (default: byte-by-byte).
    fn write_bytes(&mut self, offset: u64, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(offset + i as u64, *byte);
        }
    }

    /// Advances device state by one tick; returns `true` if the device requested a system reset.
    fn tick(&mut self) -> bool {
        false
    }

    /// Returns a mutable reference as `GpioBlock` if this device is a GPIO port; otherwise `None`.
    fn as_gpio_mut(&mut self) -> Option<&mut GpioBlock> {
        None
    }
    /// Returns a mutable reference as `Rng` if this device is the RNG; otherwise `None`.
    fn as_rng_mut(&mut self) -> Option<&mut Rng> {
        None
    }
    /// Returns a mutable reference as `Iwdg` if this device is the watchdog; otherwise `None`.
    fn as_iwdg_mut(&mut self) -> Option<&mut Iwdg> {
        None
    }
}
