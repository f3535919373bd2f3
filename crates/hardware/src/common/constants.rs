//! Global System Constants.
//!
//! This module defines the fixed STM32L4R5 memory map used across the simulator. It includes:
//! 1. **Memory Regions:** Flash and SRAM base addresses and sizes.
//! 2. **Peripheral Windows:** Base addresses and window sizes of the modelled peripherals.
//! 3. **GPIO Geometry:** Number of GPIO ports and pins per port.

/// Base address of the main flash array; firmware images are placed here.
pub const FLASH_BASE: u64 = 0x0800_0000;

/// Boot alias of flash; the vector table is fetched from here after reset.
pub const FLASH_ALIAS_BASE: u64 = 0x0000_0000;

/// Flash size of the STM32L4R5xI (2 MiB).
pub const FLASH_SIZE_XI: usize = 2 * 1024 * 1024;

/// Flash size of the STM32L4R5xG (1 MiB).
pub const FLASH_SIZE_XG: usize = 1024 * 1024;

/// Base address of SRAM1.
pub const SRAM1_BASE: u64 = 0x2000_0000;

/// Size of SRAM1 (192 KiB).
pub const SRAM1_SIZE: usize = 192 * 1024;

/// Base address of SRAM2 (its main mapping, not the alias after SRAM1).
pub const SRAM2_BASE: u64 = 0x1000_0000;

/// Size of SRAM2 (64 KiB).
pub const SRAM2_SIZE: usize = 64 * 1024;

/// Base address of SRAM3.
pub const SRAM3_BASE: u64 = 0x2004_0000;

/// Size of SRAM3 (384 KiB).
pub const SRAM3_SIZE: usize = 384 * 1024;

/// Base address of GPIOA; the other ports follow at [`GPIO_STRIDE`].
pub const GPIO_BASE: u64 = 0x4800_0000;

/// Distance between two consecutive GPIO port windows.
pub const GPIO_STRIDE: u64 = 0x400;

/// Number of GPIO ports wired on the SoC (GPIOA..GPIOH).
pub const NUM_GPIOS: usize = 8;

/// Number of pins per GPIO port.
pub const GPIO_NUM_PINS: usize = 16;

/// Base address of the independent watchdog.
pub const IWDG_BASE: u64 = 0x4000_3000;

/// Base address of the random number generator.
pub const RNG_BASE: u64 = 0x5006_0800;

/// Size of one APB/AHB peripheral window.
pub const PERIPHERAL_WINDOW: u64 = 0x400;
