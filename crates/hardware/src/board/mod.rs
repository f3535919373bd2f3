//! Nucleo-L4R5ZI board composition.
//!
//! This module assembles the board around the SoC. It performs:
//! 1. **SoC realization:** Builds the STM32L4R5 from configuration; failure is fatal.
//! 2. **Peripheral creation:** Runs the optional display factory; absence is not an error.
//! 3. **Wiring:** For every [`PIN_MAP`] entry, a 2-line splitter fans the SoC output pin out
//!    to the SoC's own input pin (line 0) and to the display input (line 1).
//!
//! Composition is all-or-nothing: any failure drops the partially wired parts.

/// DM163 LED driver model.
#[cfg(feature = "dm163")]
pub mod dm163;

/// Peripheral trait and factory type.
pub mod peripheral;

/// Fixed SoC-to-display wiring.
pub mod pin_map;

#[cfg(feature = "dm163")]
pub use dm163::Dm163;
pub use peripheral::{Peripheral, PeripheralFactory};
pub use pin_map::{Dm163Input, PIN_MAP, PinMapping};

use crate::common::error::BoardError;
use crate::config::Config;
use crate::signal::Splitter;
use crate::soc::Soc;

/// Output lines per splitter: SoC loopback and display input.
pub const SPLITTER_LINES: usize = 2;

/// Splitter line looped back into the SoC's GPIO input.
pub const LOOPBACK_LINE: usize = 0;

/// Splitter line driving the display input.
pub const DISPLAY_LINE: usize = 1;

/// A composed Nucleo-L4R5ZI board.
#[derive(Debug)]
pub struct Board {
    soc: Soc,
    display: Option<Box<dyn Peripheral>>,
    splitters: Vec<Splitter>,
}

impl Board {
    /// Builds the SoC and, if `display` is given, the display and its wiring.
    ///
    /// # Errors
    ///
    /// Returns the first [`BoardError`] raised while realizing the SoC, running the factory,
    /// or wiring a pin. No board is returned in that case.
    pub fn compose(config: &Config, display: Option<PeripheralFactory>) -> Result<Self, BoardError> {
        let mut soc = Soc::new(&config.soc);
        soc.realize()?;

        let Some(factory) = display else {
            tracing::info!("board composed without display");
            return Ok(Self {
                soc,
                display: None,
                splitters: Vec::new(),
            });
        };

        let peripheral = factory()?;
        let splitters = attach_display(&mut soc, peripheral.as_ref())?;
        let name = peripheral.name();
        tracing::info!(
            display = %name,
            splitters = splitters.len(),
            "board composed"
        );
        Ok(Self {
            soc,
            display: Some(peripheral),
            splitters,
        })
    }

    /// The SoC.
    pub const fn soc(&self) -> &Soc {
        &self.soc
    }

    /// The SoC, mutably (bus accesses, ticking, loading firmware).
    pub const fn soc_mut(&mut self) -> &mut Soc {
        &mut self.soc
    }

    /// The display, if one was attached.
    pub fn display(&self) -> Option<&dyn Peripheral> {
        self.display.as_deref()
    }

    /// Splitters in [`PIN_MAP`] order; empty without a display.
    pub fn splitters(&self) -> &[Splitter] {
        &self.splitters
    }
}

fn attach_display(soc: &mut Soc, display: &dyn Peripheral) -> Result<Vec<Splitter>, BoardError> {
    let mut splitters = Vec::with_capacity(PIN_MAP.len());
    for mapping in &PIN_MAP {
        let index = mapping.target.index();
        let display_input =
            display
                .input_pin(index)
                .ok_or_else(|| BoardError::MissingPeripheralInput {
                    name: display.name().to_owned(),
                    index,
                })?;

        let splitter = Splitter::new(SPLITTER_LINES)?;
        splitter.connect_output(LOOPBACK_LINE, soc.gpio_input_pin(mapping.source)?)?;
        splitter.connect_output(DISPLAY_LINE, display_input)?;

        let output = soc.gpio_output_pin(mapping.source)?;
        if output.is_connected() {
            return Err(BoardError::UnwirablePin(mapping.source));
        }
        output.connect(splitter.input());
        tracing::debug!(pin = %mapping.source, input = %mapping.target, "wired");
        splitters.push(splitter);
    }
    Ok(splitters)
}

/// Factory for the display fitted to the board, if compiled in.
pub fn default_display_factory() -> Option<PeripheralFactory> {
    #[cfg(feature = "dm163")]
    {
        Some(Dm163::factory())
    }
    #[cfg(not(feature = "dm163"))]
    {
        None
    }
}
