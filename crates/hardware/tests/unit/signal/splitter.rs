//! # Splitter Tests
//!
//! Construction limits, connection slots, and ordered fan-out.

use pretty_assertions::assert_eq;
use rstest::rstest;
use stm32sim_core::common::BoardError;
use stm32sim_core::signal::splitter::MAX_SPLIT_LINES;
use stm32sim_core::signal::{OutputPin, Splitter};

use crate::common::mocks::LevelRecorder;

#[rstest]
#[case(0)]
#[case(MAX_SPLIT_LINES + 1)]
#[case(64)]
fn test_splitter_rejects_invalid_line_counts(#[case] count: usize) {
    let err = Splitter::new(count).unwrap_err();
    assert!(matches!(err, BoardError::InvalidLineCount { count: c, max: 16 } if c == count));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(MAX_SPLIT_LINES)]
fn test_splitter_accepts_valid_line_counts(#[case] count: usize) {
    let splitter = Splitter::new(count).unwrap();
    assert_eq!(splitter.line_count(), count);
    assert!((0..count).all(|line| splitter.output(line) == Some(false)));
    assert_eq!(splitter.output(count), None);
}

#[test]
fn test_splitter_connecting_past_line_count_fails() {
    let splitter = Splitter::new(2).unwrap();
    let recorder = LevelRecorder::new();
    let err = splitter.connect_output(2, recorder.input(0)).unwrap_err();
    assert!(matches!(err, BoardError::LineOutOfRange { line: 2, count: 2 }));
}

#[test]
fn test_splitter_each_line_takes_one_consumer() {
    let splitter = Splitter::new(2).unwrap();
    let recorder = LevelRecorder::new();
    splitter.connect_output(1, recorder.input(1)).unwrap();
    assert!(splitter.is_connected(1));
    assert!(!splitter.is_connected(0));

    let err = splitter.connect_output(1, recorder.input(1)).unwrap_err();
    assert!(matches!(err, BoardError::LineAlreadyConnected(1)));
}

#[test]
fn test_splitter_fan_out_notifies_in_line_order() {
    let splitter = Splitter::new(4).unwrap();
    let recorder = LevelRecorder::new();
    for line in [3, 0, 2, 1] {
        splitter.connect_output(line, recorder.input(line)).unwrap();
    }

    splitter.set_input(true);

    assert_eq!(
        recorder.events(),
        vec![(0, true), (1, true), (2, true), (3, true)]
    );
}

#[test]
fn test_splitter_unconnected_lines_still_track_the_input() {
    let splitter = Splitter::new(3).unwrap();
    let recorder = LevelRecorder::new();
    splitter.connect_output(1, recorder.input(1)).unwrap();

    splitter.set_input(true);
    assert_eq!(splitter.output(0), Some(true));
    assert_eq!(splitter.output(2), Some(true));
    assert_eq!(recorder.last(1), Some(true));

    splitter.set_input(false);
    assert_eq!(splitter.output(0), Some(false));
    assert_eq!(recorder.last(1), Some(false));
}

#[test]
fn test_splitter_output_pin_drives_splitter_through_its_input() {
    let splitter = Splitter::new(2).unwrap();
    let recorder = LevelRecorder::new();
    splitter.connect_output(0, recorder.input(0)).unwrap();
    splitter.connect_output(1, recorder.input(1)).unwrap();

    let mut out = OutputPin::new();
    out.connect(splitter.input());
    out.set(true);

    // Both consumers saw the level before `set` returned.
    assert_eq!(recorder.events(), vec![(0, true), (1, true)]);
}

#[test]
fn test_splitter_clones_share_lines() {
    let splitter = Splitter::new(2).unwrap();
    let twin = splitter.clone();
    twin.set_input(true);
    assert_eq!(splitter.output(1), Some(true));
}
