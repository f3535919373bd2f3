//! Guest diagnostics and construction errors.
//!
//! This module defines the two failure classes of the simulator. It provides:
//! 1. **Guest Errors:** Protocol violations by firmware (bad offset, wrong width, read-only writes).
//!    They never leave the device that saw them; they are logged and counted.
//! 2. **Guest Error Log:** Per-device bookkeeping that emits the `guest_error` tracing event.
//! 3. **Board Errors:** Construction and configuration failures, propagated to the caller.

use thiserror::Error;

use super::pin::{GpioBlockId, GpioPin};

/// A firmware-visible protocol violation on a memory-mapped device.
///
/// Reads that hit one of these return 0; writes have no effect beyond what the
/// register contract states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GuestError {
    /// Access width differs from the register width.
    #[error("invalid {size}-byte access at offset {offset:#x}")]
    InvalidAccessSize {
        /// Device-relative offset.
        offset: u64,
        /// Width of the attempted access in bytes.
        size: u32,
    },
    /// Offset lies past the end of the register block.
    #[error("out-of-bounds offset {0:#06x}")]
    OutOfBounds(u64),
    /// Read from an offset that is not a register.
    #[error("read from invalid offset {0:#x}")]
    InvalidReadOffset(u64),
    /// Write to an offset that is not a register.
    #[error("write to invalid offset {0:#x}")]
    InvalidWriteOffset(u64),
    /// Data register read while no data is available.
    #[error("no valid data available in DR register")]
    DataNotReady,
    /// Write to a register that is read-only.
    #[error("write to read-only register @ {0:#x}")]
    ReadOnlyRegister(u64),
    /// Read from a register that is write-only.
    #[error("read from write-only register @ {0:#x}")]
    WriteOnlyRegister(u64),
    /// Status write with bits set that software must not set.
    #[error("guest tries to write SR with read only bits set, this might be a bug @ {0:#x}")]
    ReadOnlyBitsSet(u64),
    /// Write to a key-protected register while it is locked.
    #[error("write access to register @ {0:#x} is locked; write 0x5555 to KR first")]
    RegisterLocked(u64),
    /// Unknown key written to a key register.
    #[error("invalid key {0:#06x} written to KR")]
    InvalidKey(u32),
    /// Value does not fit in the writable field of a register.
    #[error("value {value:#x} exceeds writable mask {mask:#x} @ {offset:#x}")]
    ValueOutOfRange {
        /// Device-relative offset.
        offset: u64,
        /// Rejected value.
        value: u32,
        /// Bits software may set.
        mask: u32,
    },
}

/// Count and last occurrence of the guest errors seen by one device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuestErrorLog {
    count: u64,
    last: Option<GuestError>,
}

impl GuestErrorLog {
    /// Creates an empty log.
    pub const fn new() -> Self {
        Self {
            count: 0,
            last: None,
        }
    }

    /// Records a guest error raised by `device` and emits it as a `guest_error` warning.
    pub fn record(&mut self, device: &str, error: GuestError) {
        tracing::warn!(target: "guest_error", device, "{error}");
        self.count = self.count.saturating_add(1);
        self.last = Some(error);
    }

    /// Number of guest errors recorded so far.
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Most recent guest error, if any.
    pub const fn last(&self) -> Option<GuestError> {
        self.last
    }

    /// Forgets every recorded error.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Failure while configuring or assembling the SoC and the board around it.
///
/// Every variant aborts construction; there is no partially built system.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Two devices claim overlapping address ranges.
    #[error("{name} at {base:#x} overlaps {other}")]
    AddressOverlap {
        /// Device being registered.
        name: String,
        /// Its base address.
        base: u64,
        /// Device already occupying part of the range.
        other: String,
    },
    /// A memory region was configured with an unusable size.
    #[error("{region} has invalid size {size:#x}")]
    InvalidRegionSize {
        /// Region name.
        region: &'static str,
        /// Configured size in bytes.
        size: usize,
    },
    /// A splitter was asked for a line count it cannot provide.
    #[error("splitter line count must be between 1 and {max}, got {count}")]
    InvalidLineCount {
        /// Requested number of lines.
        count: usize,
        /// Largest supported number of lines.
        max: usize,
    },
    /// A splitter line index past the configured line count.
    #[error("splitter line {line} out of range (line count {count})")]
    LineOutOfRange {
        /// Requested line.
        line: usize,
        /// Configured line count.
        count: usize,
    },
    /// A splitter line already drives a consumer.
    #[error("splitter line {0} is already connected")]
    LineAlreadyConnected(usize),
    /// The SoC has no such GPIO port (not realized, or not part of the memory map).
    #[error("{0} is not present on the SoC")]
    MissingGpioBlock(GpioBlockId),
    /// A pin-map entry names a pin the SoC cannot provide.
    #[error("pin {0} cannot be wired")]
    UnwirablePin(GpioPin),
    /// The downstream peripheral lacks an input the pin map requires.
    #[error("peripheral {name} has no input {index}")]
    MissingPeripheralInput {
        /// Peripheral name.
        name: String,
        /// Requested input index.
        index: usize,
    },
    /// The downstream peripheral failed to realize.
    #[error("peripheral failed to realize: {0}")]
    Peripheral(String),
    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
