//! # Error Tests
//!
//! Guest error bookkeeping and the human-readable form of both error classes.

use pretty_assertions::assert_eq;
use stm32sim_core::common::{BoardError, GpioBlockId, GpioPin, GuestError, GuestErrorLog};

#[test]
fn test_error_log_counts_and_keeps_last() {
    let mut log = GuestErrorLog::new();
    assert_eq!(log.count(), 0);
    assert_eq!(log.last(), None);

    log.record("RNG", GuestError::DataNotReady);
    log.record("RNG", GuestError::OutOfBounds(0x10));

    assert_eq!(log.count(), 2);
    assert_eq!(log.last(), Some(GuestError::OutOfBounds(0x10)));

    log.clear();
    assert_eq!(log, GuestErrorLog::default());
}

#[test]
fn test_error_guest_error_messages() {
    assert_eq!(
        GuestError::DataNotReady.to_string(),
        "no valid data available in DR register"
    );
    assert_eq!(
        GuestError::OutOfBounds(0xC).to_string(),
        "out-of-bounds offset 0x000c"
    );
    assert_eq!(
        GuestError::InvalidAccessSize { offset: 4, size: 2 }.to_string(),
        "invalid 2-byte access at offset 0x4"
    );
}

#[test]
fn test_error_board_error_messages_name_pins_and_ports() {
    assert_eq!(
        BoardError::MissingGpioBlock(GpioBlockId::C).to_string(),
        "GPIOC is not present on the SoC"
    );
    assert_eq!(
        BoardError::UnwirablePin(GpioPin::new(GpioBlockId::A, 15)).to_string(),
        "pin PA15 cannot be wired"
    );
    assert_eq!(
        BoardError::InvalidLineCount { count: 0, max: 16 }.to_string(),
        "splitter line count must be between 1 and 16, got 0"
    );
}
