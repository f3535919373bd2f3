//! GPIO port and pin identifiers.
//!
//! Pins are addressed as a `(GpioBlockId, PinIndex)` pair rather than a flattened
//! line number. This module provides:
//! 1. **Port Identity:** `GpioBlockId` for GPIOA..GPIOH, with its MMIO base address.
//! 2. **Pin Identity:** `PinIndex`, a checked index in `0..16`.
//! 3. **Board Pins:** `GpioPin`, the pair used by pin-mapping tables (`PA15`, `PC3`, ...).

use std::fmt;

use super::constants::{GPIO_BASE, GPIO_NUM_PINS, GPIO_STRIDE};

/// One of the GPIO ports of the SoC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GpioBlockId {
    /// GPIOA.
    A,
    /// GPIOB.
    B,
    /// GPIOC.
    C,
    /// GPIOD.
    D,
    /// GPIOE.
    E,
    /// GPIOF.
    F,
    /// GPIOG.
    G,
    /// GPIOH.
    H,
}

impl GpioBlockId {
    /// All ports in address order.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Zero-based port number (GPIOA = 0).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Port letter as used in pin names.
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
        }
    }

    /// Physical base address of this port's register window.
    pub const fn base_address(self, gpio_base: u64) -> u64 {
        gpio_base + (self as u64) * GPIO_STRIDE
    }

    /// Physical base address using the default memory map.
    pub const fn default_base(self) -> u64 {
        self.base_address(GPIO_BASE)
    }
}

impl fmt::Display for GpioBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.letter())
    }
}

/// A pin number inside one GPIO port, guaranteed to be below 16.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinIndex(u8);

impl PinIndex {
    /// Creates a pin index; `None` if `pin` is not a valid pin of a 16-pin port.
    pub const fn new(pin: u8) -> Option<Self> {
        if (pin as usize) < GPIO_NUM_PINS {
            Some(Self(pin))
        } else {
            None
        }
    }

    /// Creates a pin index from a compile-time constant.
    ///
    /// Out-of-range values fail const evaluation, so table entries are checked at build time.
    ///
    /// # Panics
    ///
    /// Panics if `pin` is 16 or more.
    pub const fn of(pin: u8) -> Self {
        assert!((pin as usize) < GPIO_NUM_PINS, "GPIO pin index out of range");
        Self(pin)
    }

    /// Returns the pin number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the pin number as a bit position / array index.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A single SoC pin: a port and a pin within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GpioPin {
    /// Port the pin belongs to.
    pub block: GpioBlockId,
    /// Pin number within the port.
    pub pin: PinIndex,
}

impl GpioPin {
    /// Creates a pin from a port and a compile-time pin number.
    pub const fn new(block: GpioBlockId, pin: u8) -> Self {
        Self {
            block,
            pin: PinIndex::of(pin),
        }
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.block.letter(), self.pin.get())
    }
}
