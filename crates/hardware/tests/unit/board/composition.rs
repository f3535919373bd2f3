//! # Board Composition Tests
//!
//! Board assembly with and without the DM163, end-to-end signal flow from
//! firmware register writes to both splitter consumers, and failure modes.

#![cfg_attr(not(feature = "dm163"), allow(dead_code, unused_imports))]

use pretty_assertions::assert_eq;
use stm32sim_core::board::peripheral::{Peripheral, PeripheralFactory};
use stm32sim_core::board::pin_map::{Dm163Input, PIN_MAP, PinMapping};
use stm32sim_core::board::{Board, DISPLAY_LINE, LOOPBACK_LINE, default_display_factory};
use stm32sim_core::common::BoardError;
use stm32sim_core::config::Config;
use stm32sim_core::signal::InputPin;
use stm32sim_core::soc::Soc;
use stm32sim_core::soc::devices::gpio::{GPIO_BSRR, GPIO_IDR, GPIO_MODER};

use crate::common::{init_tracing, seeded_config};

fn config() -> Config {
    init_tracing();
    Config {
        soc: seeded_config(),
    }
}

/// Puts the mapped pin in output mode via MODER, as firmware would.
fn make_output(soc: &mut Soc, mapping: &PinMapping) {
    let base = mapping.source.block.default_base();
    let shift = u32::from(mapping.source.pin.get()) * 2;
    let moder = soc.read_u32(base + GPIO_MODER);
    soc.write_u32(base + GPIO_MODER, (moder & !(0b11 << shift)) | (0b01 << shift));
}

/// Drives the mapped pin through BSRR.
fn drive(soc: &mut Soc, mapping: &PinMapping, level: bool) {
    let base = mapping.source.block.default_base();
    let bit = 1u32 << mapping.source.pin.get();
    let value = if level { bit } else { bit << 16 };
    soc.write_u32(base + GPIO_BSRR, value);
}

fn idr_bit(soc: &mut Soc, mapping: &PinMapping) -> bool {
    let base = mapping.source.block.default_base();
    soc.read_u32(base + GPIO_IDR) & (1 << mapping.source.pin.get()) != 0
}

// ══════════════════════════════════════════════════════════
// 1. Composition
// ══════════════════════════════════════════════════════════

#[test]
fn test_board_without_display_has_no_splitters() {
    let board = Board::compose(&config(), None).unwrap();
    assert!(board.soc().is_realized());
    assert!(board.display().is_none());
    assert!(board.splitters().is_empty());
}

#[cfg(feature = "dm163")]
#[test]
fn test_board_with_display_wires_every_mapped_pin() {
    let board = Board::compose(&config(), default_display_factory()).unwrap();
    let display = board.display().unwrap();

    assert_eq!(display.name(), "DM163");
    assert_eq!(display.input_count(), 14);
    assert_eq!(board.splitters().len(), PIN_MAP.len());
    for splitter in board.splitters() {
        assert_eq!(splitter.line_count(), 2);
        assert!(splitter.is_connected(LOOPBACK_LINE));
        assert!(splitter.is_connected(DISPLAY_LINE));
    }
}

#[cfg(not(feature = "dm163"))]
#[test]
fn test_board_default_factory_is_absent_without_the_driver() {
    assert!(default_display_factory().is_none());
}

// ══════════════════════════════════════════════════════════
// 2. Signal flow
// ══════════════════════════════════════════════════════════

#[cfg(feature = "dm163")]
#[test]
fn test_board_driving_a_mapped_pin_reaches_display_and_loopback() {
    let mut board = Board::compose(&config(), default_display_factory()).unwrap();

    for (i, mapping) in PIN_MAP.iter().enumerate() {
        make_output(board.soc_mut(), mapping);
        drive(board.soc_mut(), mapping, true);

        let index = mapping.target.index();
        assert_eq!(board.display().unwrap().input_level(index), Some(true), "{}", mapping.target);
        assert!(idr_bit(board.soc_mut(), mapping), "{}", mapping.source);
        assert_eq!(board.splitters()[i].output(DISPLAY_LINE), Some(true));
    }

    // EN has no SoC pin.
    let en = Dm163Input::En.index();
    assert_eq!(board.display().unwrap().input_level(en), Some(false));
}

#[cfg(feature = "dm163")]
#[test]
fn test_board_releasing_a_pin_lowers_both_consumers() {
    let mut board = Board::compose(&config(), default_display_factory()).unwrap();
    let sin = PIN_MAP
        .iter()
        .find(|m| m.target == Dm163Input::Sin)
        .unwrap();

    make_output(board.soc_mut(), sin);
    drive(board.soc_mut(), sin, true);
    drive(board.soc_mut(), sin, false);

    assert_eq!(
        board.display().unwrap().input_level(Dm163Input::Sin.index()),
        Some(false)
    );
    assert!(!idr_bit(board.soc_mut(), sin));
}

#[cfg(feature = "dm163")]
#[test]
fn test_board_unmapped_pins_reach_nothing() {
    let mut board = Board::compose(&config(), default_display_factory()).unwrap();
    // PC0 is not part of the map.
    let base = stm32sim_core::common::GpioBlockId::C.default_base();
    soc_write_output(board.soc_mut(), base, 0);

    let levels: Vec<_> = (0..14)
        .map(|i| board.display().unwrap().input_level(i))
        .collect();
    assert!(levels.iter().all(|l| *l == Some(false)));
    // IDR only samples the input line; an output pin's own level is not mirrored back
    // unless a splitter loops it there, which PC0 lacks.
    assert_eq!(board.soc_mut().read_u32(base + GPIO_IDR), 0);
}

fn soc_write_output(soc: &mut Soc, base: u64, pin: u32) {
    let moder = soc.read_u32(base + GPIO_MODER);
    soc.write_u32(base + GPIO_MODER, (moder & !(0b11 << (pin * 2))) | (0b01 << (pin * 2)));
    soc.write_u32(base + GPIO_BSRR, 1 << pin);
}

// ══════════════════════════════════════════════════════════
// 3. Failures
// ══════════════════════════════════════════════════════════

#[test]
fn test_board_failing_factory_aborts_composition() {
    let factory: PeripheralFactory =
        Box::new(|| Err(BoardError::Peripheral("display not responding".to_owned())));
    let err = Board::compose(&config(), Some(factory)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "peripheral failed to realize: display not responding"
    );
}

#[test]
fn test_board_invalid_soc_layout_aborts_composition() {
    let mut config = config();
    config.soc.iwdg_base = config.soc.rng_base;
    let err = Board::compose(&config, None).unwrap_err();
    assert!(matches!(err, BoardError::AddressOverlap { .. }));
}

/// A peripheral with fewer inputs than the map needs.
#[derive(Debug)]
struct Narrow;

impl Peripheral for Narrow {
    fn name(&self) -> &str {
        "NARROW"
    }

    fn input_count(&self) -> usize {
        4
    }

    fn input_pin(&self, index: usize) -> Option<InputPin> {
        (index < 4).then(|| InputPin::new(|_| {}))
    }

    fn input_level(&self, index: usize) -> Option<bool> {
        (index < 4).then_some(false)
    }
}

#[test]
fn test_board_peripheral_missing_an_input_aborts_composition() {
    let factory: PeripheralFactory = Box::new(|| Ok(Box::new(Narrow) as Box<dyn Peripheral>));
    let err = Board::compose(&config(), Some(factory)).unwrap_err();
    match err {
        BoardError::MissingPeripheralInput { name, index } => {
            assert_eq!(name, "NARROW");
            assert_eq!(index, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}
