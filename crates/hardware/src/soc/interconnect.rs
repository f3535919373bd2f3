//! System interconnect (bus) for memory and MMIO access.
//!
//! This module implements the bus that routes physical address accesses to devices. It provides:
//! 1. **Device registration:** Devices are added by address range, checked for overlap, and sorted.
//! 2. **Access routing:** Read/write by address with a last-device hint for throughput.
//! 3. **Tick:** Each device is ticked; any reset request is reported to the caller.
//! 4. **Binary loading:** Firmware images are written through the owning device.

use super::devices::{Device, GpioBlock, Iwdg, Rng};
use crate::common::error::BoardError;
use crate::common::pin::GpioBlockId;

/// System bus connecting the CPU side to memories and peripherals; routes accesses by physical address.
pub struct Bus {
    /// Registered MMIO and memory devices, sorted by base address.
    devices: Vec<Box<dyn Device + Send + Sync>>,
    last_device_idx: usize,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.devices.iter().map(|d| (d.name().to_owned(), d.address_range())))
            .finish()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates an empty bus; add devices with `add_device`.
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
            last_device_idx: 0,
        }
    }

    /// Registers a device on the bus; devices are sorted by base address for lookup.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AddressOverlap`] if the device's range intersects a registered one,
    /// and [`BoardError::InvalidRegionSize`] if the range is empty.
    pub fn add_device(&mut self, dev: Box<dyn Device + Send + Sync>) -> Result<(), BoardError> {
        let (base, size) = dev.address_range();
        if size == 0 {
            return Err(BoardError::InvalidRegionSize {
                region: "device window",
                size: 0,
            });
        }
        let end = base.saturating_add(size);
        if let Some(other) = self.devices.iter().find(|d| {
            let (start, len) = d.address_range();
            base < start.saturating_add(len) && start < end
        }) {
            return Err(BoardError::AddressOverlap {
                name: dev.name().to_owned(),
                base,
                other: other.name().to_owned(),
            });
        }
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
        self.last_device_idx = 0;
        Ok(())
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Names of the registered devices in address order.
    pub fn device_names(&self) -> Vec<&str> {
        self.devices.iter().map(|d| d.name()).collect()
    }

    /// Writes a binary blob into memory at the given physical address.
    ///
    /// If a device claims the whole range, writes via that device; otherwise falls back to byte-by-byte write.
    pub fn load_binary_at(&mut self, data: &[u8], addr: u64) {
        if let Some((dev, offset)) = self.find_device(addr) {
            let (_, size) = dev.address_range();
            if offset + (data.len() as u64) <= size {
                dev.write_bytes(offset, data);
                return;
            }
        }
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(addr + i as u64, *byte);
        }
    }

    /// Returns whether the given physical address is backed by any device.
    pub fn is_valid_address(&self, paddr: u64) -> bool {
        self.devices.iter().any(|dev| {
            let (start, size) = dev.address_range();
            paddr >= start && paddr - start < size
        })
    }

    /// Advances all devices by one tick.
    ///
    /// # Returns
    ///
    /// `true` if any device requested a system reset during this tick.
    pub fn tick(&mut self) -> bool {
        let mut reset = false;
        for dev in &mut self.devices {
            reset |= dev.tick();
        }
        reset
    }

    /// Returns the GPIO port `block`, if registered.
    pub fn find_gpio_mut(&mut self, block: GpioBlockId) -> Option<&mut GpioBlock> {
        self.devices
            .iter_mut()
            .filter_map(|dev| dev.as_gpio_mut())
            .find(|gpio| gpio.id() == block)
    }

    /// Returns the RNG, if registered.
    pub fn find_rng_mut(&mut self) -> Option<&mut Rng> {
        self.devices.iter_mut().find_map(|dev| dev.as_rng_mut())
    }

    /// Returns the independent watchdog, if registered.
    pub fn find_iwdg_mut(&mut self) -> Option<&mut Iwdg> {
        self.devices.iter_mut().find_map(|dev| dev.as_iwdg_mut())
    }

    fn find_device(&mut self, paddr: u64) -> Option<(&mut Box<dyn Device + Send + Sync>, u64)> {
        if self.last_device_idx < self.devices.len() {
            let (start, size) = self.devices[self.last_device_idx].address_range();
            if paddr >= start && paddr - start < size {
                return Some((&mut self.devices[self.last_device_idx], paddr - start));
            }
        }

        for (i, dev) in self.devices.iter_mut().enumerate() {
            let (start, size) = dev.address_range();
            if paddr >= start && paddr - start < size {
                self.last_device_idx = i;
                return Some((dev, paddr - start));
            }
        }
        None
    }

    /// Reads one byte at the given physical address; returns 0 if no device claims the address.
    pub fn read_u8(&mut self, paddr: u64) -> u8 {
        self.find_device(paddr)
            .map_or(0, |(dev, offset)| dev.read_u8(offset))
    }
    /// Reads two bytes (little-endian) at the given physical address; returns 0 if unclaimed.
    pub fn read_u16(&mut self, paddr: u64) -> u16 {
        self.find_device(paddr)
            .map_or(0, |(dev, offset)| dev.read_u16(offset))
    }
    /// Reads four bytes (little-endian) at the given physical address; returns 0 if unclaimed.
    pub fn read_u32(&mut self, paddr: u64) -> u32 {
        self.find_device(paddr)
            .map_or(0, |(dev, offset)| dev.read_u32(offset))
    }
    /// Reads eight bytes (little-endian) at the given physical address; returns 0 if unclaimed.
    pub fn read_u64(&mut self, paddr: u64) -> u64 {
        self.find_device(paddr)
            .map_or(0, |(dev, offset)| dev.read_u64(offset))
    }
    /// Writes one byte at the given physical address; no-op if no device claims it.
    pub fn write_u8(&mut self, paddr: u64, val: u8) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u8(offset, val);
        }
    }
    /// Writes two bytes (little-endian) at the given physical address; no-op if unclaimed.
    pub fn write_u16(&mut self, paddr: u64, val: u16) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u16(offset, val);
        }
    }
    /// Writes four bytes (little-endian) at the given physical address; no-op if unclaimed.
    pub fn write_u32(&mut self, paddr: u64, val: u32) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u32(offset, val);
        }
    }
    /// Writes eight bytes (little-endian) at the given physical address; no-op if unclaimed.
    pub fn write_u64(&mut self, paddr: u64, val: u64) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write_u64(offset, val);
        }
    }
}
