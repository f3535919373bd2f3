//! SoC-to-display pin assignment of the Nucleo-L4R5ZI LED matrix shield.
//!
//! Thirteen SoC GPIO pins drive the DM163 constant-current driver and the row
//! selectors of the 8x8 matrix. The DM163 `EN` input has no SoC pin.

use std::fmt;

use crate::common::pin::{GpioBlockId, GpioPin};

/// Discrete inputs of the DM163 LED driver, in input-index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dm163Input {
    /// Row 0 select.
    Row0,
    /// Row 1 select.
    Row1,
    /// Row 2 select.
    Row2,
    /// Row 3 select.
    Row3,
    /// Row 4 select.
    Row4,
    /// Row 5 select.
    Row5,
    /// Row 6 select.
    Row6,
    /// Row 7 select.
    Row7,
    /// Serial data in.
    Sin,
    /// Data clock.
    Dck,
    /// Active-low reset.
    RstB,
    /// Active-low latch.
    LatB,
    /// Bank select.
    Selbk,
    /// Output enable.
    En,
}

/// Number of DM163 inputs.
pub const NUM_DM163_INPUTS: usize = 14;

/// Number of DM163 inputs driven by the SoC.
pub const NUM_WIRED_INPUTS: usize = 13;

impl Dm163Input {
    /// Every input in index order.
    pub const ALL: [Self; NUM_DM163_INPUTS] = [
        Self::Row0,
        Self::Row1,
        Self::Row2,
        Self::Row3,
        Self::Row4,
        Self::Row5,
        Self::Row6,
        Self::Row7,
        Self::Sin,
        Self::Dck,
        Self::RstB,
        Self::LatB,
        Self::Selbk,
        Self::En,
    ];

    /// Input index on the peripheral.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Input name as printed on the shield schematic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Row0 => "ROW0",
            Self::Row1 => "ROW1",
            Self::Row2 => "ROW2",
            Self::Row3 => "ROW3",
            Self::Row4 => "ROW4",
            Self::Row5 => "ROW5",
            Self::Row6 => "ROW6",
            Self::Row7 => "ROW7",
            Self::Sin => "SIN",
            Self::Dck => "DCK",
            Self::RstB => "RST_B",
            Self::LatB => "LAT_B",
            Self::Selbk => "SELBK",
            Self::En => "EN",
        }
    }
}

impl fmt::Display for Dm163Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One wire from a SoC GPIO pin to a DM163 input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinMapping {
    /// Driving SoC pin.
    pub source: GpioPin,
    /// Receiving peripheral input.
    pub target: Dm163Input,
}

const fn wire(block: GpioBlockId, pin: u8, target: Dm163Input) -> PinMapping {
    PinMapping {
        source: GpioPin::new(block, pin),
        target,
    }
}

/// The board's fixed wiring, ordered by peripheral input index.
pub const PIN_MAP: [PinMapping; NUM_WIRED_INPUTS] = [
    wire(GpioBlockId::B, 2, Dm163Input::Row0),
    wire(GpioBlockId::A, 15, Dm163Input::Row1),
    wire(GpioBlockId::A, 2, Dm163Input::Row2),
    wire(GpioBlockId::A, 7, Dm163Input::Row3),
    wire(GpioBlockId::A, 6, Dm163Input::Row4),
    wire(GpioBlockId::A, 5, Dm163Input::Row5),
    wire(GpioBlockId::B, 0, Dm163Input::Row6),
    wire(GpioBlockId::A, 3, Dm163Input::Row7),
    wire(GpioBlockId::A, 4, Dm163Input::Sin),
    wire(GpioBlockId::B, 1, Dm163Input::Dck),
    wire(GpioBlockId::C, 3, Dm163Input::RstB),
    wire(GpioBlockId::C, 4, Dm163Input::LatB),
    wire(GpioBlockId::C, 5, Dm163Input::Selbk),
];
