//! # Pin Map Tests

use pretty_assertions::assert_eq;
use stm32sim_core::board::pin_map::{Dm163Input, NUM_DM163_INPUTS, NUM_WIRED_INPUTS, PIN_MAP};

#[test]
fn test_pin_map_wiring_matches_the_shield() {
    let rendered: Vec<String> = PIN_MAP
        .iter()
        .map(|m| format!("{}={}", m.target, m.source))
        .collect();
    assert_eq!(
        rendered,
        vec![
            "ROW0=PB2", "ROW1=PA15", "ROW2=PA2", "ROW3=PA7", "ROW4=PA6", "ROW5=PA5", "ROW6=PB0",
            "ROW7=PA3", "SIN=PA4", "DCK=PB1", "RST_B=PC3", "LAT_B=PC4", "SELBK=PC5",
        ]
    );
}

#[test]
fn test_pin_map_every_input_but_en_is_wired() {
    assert_eq!(PIN_MAP.len(), NUM_WIRED_INPUTS);
    assert_eq!(Dm163Input::ALL.len(), NUM_DM163_INPUTS);
    assert_eq!(Dm163Input::En.index(), 13);
    for input in Dm163Input::ALL {
        let wired = PIN_MAP.iter().any(|m| m.target == input);
        assert_eq!(wired, input != Dm163Input::En, "{input}");
    }
}
