//! Configuration system for the STM32L4R5 simulator.
//!
//! This module defines the configuration structures used to parameterize the SoC. It provides:
//! 1. **Defaults:** The Nucleo-L4R5ZI memory map and SoC variant.
//! 2. **Structures:** `Config` with a nested `SocConfig`.
//! 3. **Enums:** `SocVariant`, which selects the flash size.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::constants;
use crate::common::error::BoardError;

/// Default configuration constants for the simulator.
///
/// These values describe the STM32L4R5ZI as fitted on the Nucleo-144 board
/// and apply whenever a JSON configuration leaves a field out.
mod defaults {
    use crate::common::constants;

    /// Base address of the flash array.
    pub const FLASH_BASE: u64 = constants::FLASH_BASE;

    /// Base address of SRAM1.
    pub const SRAM1_BASE: u64 = constants::SRAM1_BASE;

    /// Base address of SRAM2.
    pub const SRAM2_BASE: u64 = constants::SRAM2_BASE;

    /// Base address of SRAM3.
    pub const SRAM3_BASE: u64 = constants::SRAM3_BASE;

    /// Base address of GPIOA.
    pub const GPIO_BASE: u64 = constants::GPIO_BASE;

    /// Base address of the RNG.
    pub const RNG_BASE: u64 = constants::RNG_BASE;

    /// Base address of the IWDG.
    pub const IWDG_BASE: u64 = constants::IWDG_BASE;
}

/// STM32L4R5 part variant, which fixes the flash size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SocVariant {
    /// STM32L4R5xI: 2 MiB flash (the part on the Nucleo-L4R5ZI).
    #[default]
    #[serde(alias = "XI", alias = "xi")]
    Xi,
    /// STM32L4R5xG: 1 MiB flash.
    #[serde(alias = "XG", alias = "xg")]
    Xg,
}

impl SocVariant {
    /// Flash size of this variant in bytes.
    pub const fn flash_size(self) -> usize {
        match self {
            Self::Xi => constants::FLASH_SIZE_XI,
            Self::Xg => constants::FLASH_SIZE_XG,
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use stm32sim_core::config::{Config, SocVariant};
///
/// let json = r#"{ "soc": { "variant": "Xg", "entropy_seed": 7 } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.soc.variant, SocVariant::Xg);
/// assert_eq!(config.soc.entropy_seed, Some(7));
/// assert_eq!(config.soc.rng_base, 0x5006_0800);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// SoC memory map and device parameters.
    #[serde(default)]
    pub soc: SocConfig,
}

impl Config {
    /// Parses a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] if the text is not valid configuration JSON.
    pub fn from_json(text: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// SoC memory map and device configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SocConfig {
    /// Part variant (selects the flash size).
    #[serde(default)]
    pub variant: SocVariant,

    /// Flash base address.
    #[serde(default = "SocConfig::default_flash_base")]
    pub flash_base: u64,

    /// SRAM1 base address.
    #[serde(default = "SocConfig::default_sram1_base")]
    pub sram1_base: u64,

    /// SRAM2 base address.
    #[serde(default = "SocConfig::default_sram2_base")]
    pub sram2_base: u64,

    /// SRAM3 base address.
    #[serde(default = "SocConfig::default_sram3_base")]
    pub sram3_base: u64,

    /// GPIOA base address; the other ports follow every 0x400 bytes.
    #[serde(default = "SocConfig::default_gpio_base")]
    pub gpio_base: u64,

    /// RNG base address.
    #[serde(default = "SocConfig::default_rng_base")]
    pub rng_base: u64,

    /// IWDG base address.
    #[serde(default = "SocConfig::default_iwdg_base")]
    pub iwdg_base: u64,

    /// Seed for the entropy source. `None` seeds from the host clock.
    #[serde(default)]
    pub entropy_seed: Option<u64>,
}

impl SocConfig {
    fn default_flash_base() -> u64 {
        defaults::FLASH_BASE
    }

    fn default_sram1_base() -> u64 {
        defaults::SRAM1_BASE
    }

    fn default_sram2_base() -> u64 {
        defaults::SRAM2_BASE
    }

    fn default_sram3_base() -> u64 {
        defaults::SRAM3_BASE
    }

    fn default_gpio_base() -> u64 {
        defaults::GPIO_BASE
    }

    fn default_rng_base() -> u64 {
        defaults::RNG_BASE
    }

    fn default_iwdg_base() -> u64 {
        defaults::IWDG_BASE
    }

    /// Flash size implied by the variant.
    pub const fn flash_size(&self) -> usize {
        self.variant.flash_size()
    }
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            variant: SocVariant::default(),
            flash_base: defaults::FLASH_BASE,
            sram1_base: defaults::SRAM1_BASE,
            sram2_base: defaults::SRAM2_BASE,
            sram3_base: defaults::SRAM3_BASE,
            gpio_base: defaults::GPIO_BASE,
            rng_base: defaults::RNG_BASE,
            iwdg_base: defaults::IWDG_BASE,
            entropy_seed: None,
        }
    }
}
