//! Independent Watchdog (IWDG).
//!
//! A down-counter clocked from the low-speed oscillator through a prescaler. Once
//! started it cannot be stopped; firmware must write the reload key to KR before the
//! counter reaches zero, otherwise the watchdog requests a system reset.
//!
//! # Registers
//!
//! * `0x00`: KR (Write Only)
//!   * `0x5555`: Unlock PR, RLR, and WINR
//!   * `0xCCCC`: Start the watchdog (and reload)
//!   * `0xAAAA`: Reload the counter
//! * `0x04`: PR prescaler, bits 2:0, divider = `4 << PR`
//! * `0x08`: RLR reload value, bits 11:0
//! * `0x0C`: SR (Read Only). Always 0: register updates complete immediately.
//! * `0x10`: WINR window value, bits 11:0
//!
//! One `tick` is one period of the watchdog's input clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::data::AccessSize;
use crate::common::error::{GuestError, GuestErrorLog};
use crate::soc::devices::Device;

/// Size of the register block in bytes.
pub const IWDG_REGMAP_SIZE: u64 = 0x14;

/// Key register offset.
pub const IWDG_KR: u64 = 0x00;
/// Prescaler register offset.
pub const IWDG_PR: u64 = 0x04;
/// Reload register offset.
pub const IWDG_RLR: u64 = 0x08;
/// Status register offset.
pub const IWDG_SR: u64 = 0x0C;
/// Window register offset.
pub const IWDG_WINR: u64 = 0x10;

/// KR value that reloads the counter.
pub const KEY_RELOAD: u32 = 0xAAAA;
/// KR value that unlocks PR, RLR, and WINR.
pub const KEY_UNLOCK: u32 = 0x5555;
/// KR value that starts the watchdog.
pub const KEY_START: u32 = 0xCCCC;

const PR_MASK: u32 = 0x7;
const RLR_MASK: u32 = 0xFFF;
const WINR_MASK: u32 = 0xFFF;

/// IWDG device state.
#[derive(Debug)]
pub struct Iwdg {
    base_addr: u64,
    pr: u32,
    rlr: u32,
    winr: u32,
    locked: bool,
    running: bool,
    counter: u32,
    prescaler_ticks: u32,
    reset_signal: Arc<AtomicBool>,
    errors: GuestErrorLog,
}

impl Iwdg {
    /// Creates a stopped, locked watchdog at `base_addr` that raises `reset_signal` on expiry.
    pub const fn new(base_addr: u64, reset_signal: Arc<AtomicBool>) -> Self {
        Self {
            base_addr,
            pr: 0,
            rlr: RLR_MASK,
            winr: WINR_MASK,
            locked: true,
            running: false,
            counter: RLR_MASK,
            prescaler_ticks: 0,
            reset_signal,
            errors: GuestErrorLog::new(),
        }
    }

    /// Returns the watchdog to its reset state. A running watchdog stops.
    pub const fn reset(&mut self) {
        self.pr = 0;
        self.rlr = RLR_MASK;
        self.winr = WINR_MASK;
        self.locked = true;
        self.running = false;
        self.counter = RLR_MASK;
        self.prescaler_ticks = 0;
    }

    /// Returns `true` once firmware has started the watchdog.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Current down-counter value.
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Input clock ticks per counter decrement.
    pub const fn divider(&self) -> u32 {
        4 << self.pr
    }

    /// Guest errors seen by this device.
    pub const fn guest_errors(&self) -> &GuestErrorLog {
        &self.errors
    }

    const fn reload(&mut self) {
        self.counter = self.rlr;
        self.prescaler_ticks = 0;
    }

    /// Reads a register. Invalid accesses return 0 and are recorded as guest errors.
    pub fn read(&mut self, offset: u64, size: u32) -> u32 {
        if size != AccessSize::Word.bytes() {
            self.guest_error(GuestError::InvalidAccessSize { offset, size });
            return 0;
        }
        if offset >= IWDG_REGMAP_SIZE {
            self.guest_error(GuestError::OutOfBounds(offset));
            return 0;
        }
        match offset {
            IWDG_KR => {
                self.guest_error(GuestError::WriteOnlyRegister(offset));
                0
            }
            IWDG_PR => self.pr,
            IWDG_RLR => self.rlr,
            IWDG_SR => 0,
            IWDG_WINR => self.winr,
            _ => {
                self.guest_error(GuestError::InvalidReadOffset(offset));
                0
            }
        }
    }

    /// Writes a register. Invalid or locked writes change nothing and are recorded as guest errors.
    pub fn write(&mut self, offset: u64, value: u32, size: u32) {
        if size != AccessSize::Word.bytes() {
            self.guest_error(GuestError::InvalidAccessSize { offset, size });
            return;
        }
        if offset >= IWDG_REGMAP_SIZE {
            self.guest_error(GuestError::OutOfBounds(offset));
            return;
        }
        match offset {
            IWDG_KR => match value {
                KEY_RELOAD => {
                    self.reload();
                    self.locked = true;
                }
                KEY_UNLOCK => self.locked = false,
                KEY_START => {
                    if !self.running {
                        tracing::info!(rlr = self.rlr, pr = self.pr, "IWDG started");
                    }
                    self.running = true;
                    self.reload();
                    self.locked = true;
                }
                _ => self.guest_error(GuestError::InvalidKey(value)),
            },
            IWDG_PR => {
                if self.check_writable(offset, value, PR_MASK) {
                    self.pr = value;
                }
            }
            IWDG_RLR => {
                if self.check_writable(offset, value, RLR_MASK) {
                    self.rlr = value;
                }
            }
            IWDG_WINR => {
                if self.check_writable(offset, value, WINR_MASK) {
                    self.winr = value;
                }
            }
            IWDG_SR => self.guest_error(GuestError::ReadOnlyRegister(offset)),
            _ => self.guest_error(GuestError::InvalidWriteOffset(offset)),
        }
    }

    fn check_writable(&mut self, offset: u64, value: u32, mask: u32) -> bool {
        if self.locked {
            self.guest_error(GuestError::RegisterLocked(offset));
            return false;
        }
        if value & !mask != 0 {
            self.guest_error(GuestError::ValueOutOfRange {
                offset,
                value,
                mask,
            });
            return false;
        }
        true
    }

    fn guest_error(&mut self, error: GuestError) {
        self.errors.record("IWDG", error);
    }
}

impl Device for Iwdg {
    fn name(&self) -> &str {
        "IWDG"
    }

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
        self.read(offset, 4)
    }
    fn read_u64(&mut self, offset: u64) -> u64 {
        u64::from(self.read(offset, 8))
    }

    fn write_u8(&mut self, offset: u64, val: u8) {
        self.write(offset, u32::from(val), 1);
    }
    fn write_u16(&mut self, offset: u64, val: u16) {
        self.write(offset, u32::from(val), 2);
    }
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write(offset, val, 4);
    }
    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write(offset, val as u32, 8);
    }

    /// Advances the prescaler; decrements the counter every `4 << PR` ticks.
    ///
    /// On reaching zero the watchdog raises the reset signal and reloads.
    fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.prescaler_ticks += 1;
        if self.prescaler_ticks < self.divider() {
            return false;
        }
        self.prescaler_ticks = 0;
        if self.counter > 0 {
            self.counter -= 1;
            return false;
        }
        tracing::info!("IWDG expired, requesting system reset");
        self.reset_signal.store(true, Ordering::Relaxed);
        self.reload();
        true
    }

    fn as_iwdg_mut(&mut self) -> Option<&mut Iwdg> {
        Some(self)
    }
}
