//! Bus Access Widths.
//!
//! This module defines the width of a single bus transaction. Peripheral models use it to:
//! 1. **Validate:** Reject accesses narrower or wider than a register (STM32 peripherals are word-only).
//! 2. **Truncate:** Place a computed value into the lanes the access actually covers.

/// Width of a memory-mapped access in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessSize {
    /// 8-bit access.
    Byte = 1,
    /// 16-bit access.
    Half = 2,
    /// 32-bit access.
    Word = 4,
    /// 64-bit access.
    Double = 8,
}

impl AccessSize {
    /// Number of bytes covered by the access.
    pub const fn bytes(self) -> u32 {
        self as u32
    }

    /// Mask selecting the bits an access of this width carries.
    pub const fn mask(self) -> u64 {
        match self {
            Self::Byte => 0xFF,
            Self::Half => 0xFFFF,
            Self::Word => 0xFFFF_FFFF,
            Self::Double => u64::MAX,
        }
    }
}
