//! On-chip memories (flash and SRAM).
//!
//! This module implements the SoC's linear memories as bus devices. It provides:
//! 1. **Storage:** A byte array mapped at a physical base address (SRAM zeroed, flash erased).
//! 2. **Access:** Little-endian reads and writes of every width; out-of-range bytes read as 0.
//! 3. **Flash Semantics:** Flash is read-only to the guest; only `load`/`write_bytes` fill it.
//! 4. **Aliases:** A second window onto the same storage (flash at 0x0, SRAM2 after SRAM1).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::common::error::{GuestError, GuestErrorLog};
use crate::soc::devices::Device;

/// A linear memory region (flash or SRAM), or an alias window onto one.
pub struct Memory {
    name: &'static str,
    base_addr: u64,
    size: usize,
    data: Arc<Mutex<Vec<u8>>>,
    read_only: bool,
    errors: GuestErrorLog,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("name", &self.name)
            .field("base_addr", &self.base_addr)
            .field("size", &self.size)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl Memory {
    fn with_fill(
        name: &'static str,
        base_addr: u64,
        size: usize,
        fill: u8,
        read_only: bool,
    ) -> Self {
        Self {
            name,
            base_addr,
            size,
            data: Arc::new(Mutex::new(vec![fill; size])),
            read_only,
            errors: GuestErrorLog::new(),
        }
    }

    /// Creates a writable RAM region of `size` bytes at `base_addr`.
    pub fn ram(name: &'static str, base_addr: u64, size: usize) -> Self {
        Self::with_fill(name, base_addr, size, 0, false)
    }

    /// Creates a flash region of `size` bytes at `base_addr`, erased to 0xFF and read-only to the guest.
    pub fn flash(base_addr: u64, size: usize) -> Self {
        Self::with_fill("FLASH", base_addr, size, 0xFF, true)
    }

    /// Creates a window named `name` at `base_addr` onto this region's storage.
    ///
    /// Both windows see every store made through either one. The alias keeps the
    /// region's write protection and has its own guest error log.
    pub fn alias(&self, name: &'static str, base_addr: u64) -> Self {
        Self {
            name,
            base_addr,
            size: self.size,
            data: Arc::clone(&self.data),
            read_only: self.read_only,
            errors: GuestErrorLog::new(),
        }
    }

    /// Loads a byte slice at `offset`; slices that do not fit are truncated at the end of the region.
    ///
    /// Used for firmware images. Bypasses the guest write protection of flash.
    pub fn load(&mut self, data: &[u8], offset: usize) {
        let mut storage = self.storage();
        if let Some(dst) = storage.get_mut(offset..) {
            let len = data.len().min(dst.len());
            dst[..len].copy_from_slice(&data[..len]);
        }
    }

    /// Size of the region in bytes.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the region has no bytes.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Guest errors seen through this window (writes to flash).
    pub const fn guest_errors(&self) -> &GuestErrorLog {
        &self.errors
    }

    fn storage(&self) -> MutexGuard<'_, Vec<u8>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_le<const N: usize>(&self, offset: u64) -> [u8; N] {
        let mut out = [0u8; N];
        let start = offset as usize;
        let storage = self.storage();
        if let Some(src) = storage.get(start..start.saturating_add(N)) {
            out.copy_from_slice(src);
        }
        out
    }

    fn write_le(&mut self, offset: u64, bytes: &[u8]) {
        if self.read_only {
            self.errors
                .record(self.name, GuestError::ReadOnlyRegister(offset));
            return;
        }
        let start = offset as usize;
        let mut storage = self.storage();
        if let Some(dst) = storage.get_mut(start..start.saturating_add(bytes.len())) {
            dst.copy_from_slice(bytes);
        }
    }
}

impl Device for Memory {
    fn name(&self) -> &str {
        self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, self.size as u64)
    }

    fn read_u8(&mut self, offset: u64) -> u8 {
        self.storage().get(offset as usize).copied().unwrap_or(0)
    }

    fn read_u16(&mut self, offset: u64) -> u16 {
        u16::from_le_bytes(self.read_le(offset))
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        u32::from_le_bytes(self.read_le(offset))
    }

    fn read_u64(&mut self, offset: u64) -> u64 {
        u64::from_le_bytes(self.read_le(offset))
    }

    fn write_u8(&mut self, offset: u64, val: u8) {
        self.write_le(offset, &[val]);
    }

    fn write_u16(&mut self, offset: u64, val: u16) {
        self.write_le(offset, &val.to_le_bytes());
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write_le(offset, &val.to_le_bytes());
    }

    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write_le(offset, &val.to_le_bytes());
    }

    /// Loader path: fills the region regardless of guest write protection.
    fn write_bytes(&mut self, offset: u64, data: &[u8]) {
        self.load(data, offset as usize);
    }
}
