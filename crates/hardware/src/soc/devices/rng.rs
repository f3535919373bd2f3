//! True Random Number Generator (RNG).
//!
//! Models the STM32L4R5 RNG register contract: firmware enables the generator
//! through CR, polls SR for data-ready, then reads DR. Every protocol violation is
//! a guest error: logged, counted, and answered with 0.
//!
//! # Registers
//!
//! * `0x00`: CR (R/W). Bit 2 (`RNGEN`) enables the generator and drives SR bit 0.
//! * `0x04`: SR (R/W partial).
//!   * Bit 0 (`DRDY`): data ready, mirrors CR bit 2.
//!   * Bit 5 (`CEIS`), bit 6 (`SEIS`): sticky error flags, cleared by writing 0.
//! * `0x08`: DR (Read Only). A fresh random word per read while `DRDY` is set.
//!
//! Only aligned 32-bit accesses are valid.

use crate::common::data::AccessSize;
use crate::common::error::{GuestError, GuestErrorLog};
use crate::soc::devices::Device;
use crate::soc::entropy::{SharedEntropy, fill_shared};

/// Size of the register block in bytes (three 32-bit registers).
pub const RNG_REGS_SIZE: u64 = 4 * 3;

/// Control register offset.
pub const RNG_CR: u64 = 0x00;
/// Status register offset.
pub const RNG_SR: u64 = 0x04;
/// Data register offset.
pub const RNG_DR: u64 = 0x08;

/// CR: generator enable.
pub const CR_RNGEN: u32 = 1 << 2;
/// SR: data ready.
pub const SR_DRDY: u32 = 1 << 0;
/// SR: clock error current status.
pub const SR_CECS: u32 = 1 << 1;
/// SR: seed error current status.
pub const SR_SECS: u32 = 1 << 2;
/// SR: clock error interrupt status (sticky).
pub const SR_CEIS: u32 = 1 << 5;
/// SR: seed error interrupt status (sticky).
pub const SR_SEIS: u32 = 1 << 6;

const SR_SOFTWARE_READ_ONLY: u32 = SR_DRDY | SR_CECS | SR_SECS;

/// RNG device state.
pub struct Rng {
    base_addr: u64,
    control: u32,
    status: u32,
    entropy: SharedEntropy,
    errors: GuestErrorLog,
}

impl std::fmt::Debug for Rng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rng")
            .field("base_addr", &self.base_addr)
            .field("control", &self.control)
            .field("status", &self.status)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Rng {
    /// Creates a disabled RNG at `base_addr` drawing from `entropy`.
    pub const fn new(base_addr: u64, entropy: SharedEntropy) -> Self {
        Self {
            base_addr,
            control: 0,
            status: 0,
            entropy,
            errors: GuestErrorLog::new(),
        }
    }

    /// Returns `true` while the generator is enabled and DR reads yield data.
    pub const fn is_enabled(&self) -> bool {
        self.status & SR_DRDY != 0
    }

    /// Stored control register value.
    pub const fn control(&self) -> u32 {
        self.control
    }

    /// Stored status register value.
    pub const fn status(&self) -> u32 {
        self.status
    }

    /// Guest errors seen by this device.
    pub const fn guest_errors(&self) -> &GuestErrorLog {
        &self.errors
    }

    /// Latches the sticky seed (`SEIS`) and/or clock (`CEIS`) error flags, as the analog
    /// noise source would on a fault.
    pub const fn raise_fault(&mut self, seed_error: bool, clock_error: bool) {
        if seed_error {
            self.status |= SR_SEIS;
        }
        if clock_error {
            self.status |= SR_CEIS;
        }
    }

    /// Reads a register.
    ///
    /// `size` is the access width in bytes. Invalid accesses return 0 and are recorded as guest errors.
    pub fn read(&mut self, offset: u64, size: u32) -> u64 {
        if size != AccessSize::Word.bytes() {
            self.guest_error(GuestError::InvalidAccessSize { offset, size });
            return 0;
        }
        if offset >= RNG_REGS_SIZE {
            self.guest_error(GuestError::OutOfBounds(offset));
            return 0;
        }

        match offset {
            RNG_CR => u64::from(self.control),
            RNG_SR => u64::from(self.status),
            RNG_DR => {
                if self.status & SR_DRDY == 0 {
                    self.guest_error(GuestError::DataNotReady);
                    return 0;
                }
                let mut buf = [0u8; 8];
                fill_shared(&self.entropy, &mut buf);
                u64::from_le_bytes(buf) & AccessSize::Word.mask()
            }
            _ => {
                self.guest_error(GuestError::InvalidReadOffset(offset));
                0
            }
        }
    }

    /// Writes a register.
    ///
    /// `size` is the access width in bytes. Invalid accesses change nothing and are recorded as guest errors.
    pub fn write(&mut self, offset: u64, value: u64, size: u32) {
        if size != AccessSize::Word.bytes() {
            self.guest_error(GuestError::InvalidAccessSize { offset, size });
            return;
        }
        if offset >= RNG_REGS_SIZE {
            self.guest_error(GuestError::OutOfBounds(offset));
            return;
        }

        let value = value as u32;
        match offset {
            RNG_CR => {
                self.control = value;
                let was_enabled = self.is_enabled();
                if value & CR_RNGEN != 0 {
                    self.status |= SR_DRDY;
                } else {
                    self.status &= !SR_DRDY;
                }
                if was_enabled != self.is_enabled() {
                    tracing::debug!(enabled = self.is_enabled(), "RNG enable changed");
                }
            }
            RNG_SR => {
                if value & SR_SOFTWARE_READ_ONLY != 0 {
                    self.guest_error(GuestError::ReadOnlyBitsSet(offset));
                }
                if value & SR_SEIS == 0 {
                    self.status &= !SR_SEIS;
                }
                if value & SR_CEIS == 0 {
                    self.status &= !SR_CEIS;
                }
            }
            RNG_DR => self.guest_error(GuestError::ReadOnlyRegister(offset)),
            _ => self.guest_error(GuestError::InvalidWriteOffset(offset)),
        }
    }

    fn guest_error(&mut self, error: GuestError) {
        self.errors.record("RNG", error);
    }
}

impl Device for Rng {
    fn name(&self) -> &str {
        "RNG"
    }

    /// The full peripheral slot; offsets past the register block are out-of-bounds accesses.
    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, crate::common::constants::PERIPHERAL_WINDOW)
    }

    fn read_u8(&mut self, offset: u64) -> u8 {
        self.read(offset, 1) as u8
    }
    fn read_u16(&mut self, offset: u64) -> u16 {
        self.read(offset, 2) as u16
    }
    fn read_u32(&mut self, offset: u64) -> u32 {
        self.read(offset, 4) as u32
    }
    fn read_u64(&mut self, offset: u64) -> u64 {
        self.read(offset, 8)
    }

    fn write_u8(&mut self, offset: u64, val: u8) {
        self.write(offset, u64::from(val), 1);
    }
    fn write_u16(&mut self, offset: u64, val: u16) {
        self.write(offset, u64::from(val), 2);
    }
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write(offset, u64::from(val), 4);
    }
    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write(offset, val, 8);
    }

    fn as_rng_mut(&mut self) -> Option<&mut Rng> {
        Some(self)
    }
}
