//! Memory-Mapped IO Devices.
//!
//! This module contains the STM32L4R5 peripherals modelled by the simulator:
//! the GPIO ports, the true random number generator (RNG), and the
//! independent watchdog (IWDG).

/// General-purpose I/O port.
pub mod gpio;

/// Independent watchdog.
pub mod iwdg;

/// True random number generator.
pub mod rng;

pub use gpio::GpioBlock;
pub use iwdg::Iwdg;
pub use rng::Rng;

pub use crate::soc::traits::Device;
