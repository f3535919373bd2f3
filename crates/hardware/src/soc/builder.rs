//! System-on-Chip construction and top-level `Soc` type.
//!
//! This module builds the STM32L4R5 from configuration. It performs:
//! 1. **Region validation:** Every memory and peripheral window must fit the 32-bit address space.
//! 2. **Device registration:** Instantiates flash, SRAM1/2/3, GPIOA..GPIOH, RNG, and IWDG on the bus,
//!    plus the flash boot alias at 0x0 and the SRAM2 alias directly after SRAM1.
//! 3. **Pin access:** Hands out GPIO input and output connection points for board wiring.
//! 4. **Binary loading:** Firmware images are copied into flash via `load_binary_at`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::constants::{
    FLASH_ALIAS_BASE, GPIO_STRIDE, NUM_GPIOS, PERIPHERAL_WINDOW, SRAM1_SIZE, SRAM2_SIZE, SRAM3_SIZE,
};
use crate::common::error::BoardError;
use crate::common::pin::{GpioBlockId, GpioPin};
use crate::config::SocConfig;
use crate::signal::{InputPin, OutputPin};
use crate::soc::devices::{GpioBlock, Iwdg, Rng};
use crate::soc::entropy::{SharedEntropy, SplitMix64, shared};
use crate::soc::interconnect::Bus;
use crate::soc::memory::Memory;

const ADDRESS_SPACE_END: u64 = 1 << 32;

/// The STM32L4R5 system-on-chip: bus, memories, peripherals, and the reset request line.
///
/// Created unrealized; [`Soc::realize`] populates the bus.
pub struct Soc {
    config: SocConfig,
    bus: Bus,
    entropy: SharedEntropy,
    reset_request: Arc<AtomicBool>,
    realized: bool,
}

impl std::fmt::Debug for Soc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Soc")
            .field("config", &self.config)
            .field("bus", &self.bus)
            .field("reset_request", &self.reset_requested())
            .field("realized", &self.realized)
            .finish_non_exhaustive()
    }
}

impl Soc {
    /// Creates an unrealized SoC with the default entropy source.
    ///
    /// The source is SplitMix64 seeded from `config.entropy_seed`, or from the host clock when unset.
    pub fn new(config: &SocConfig) -> Self {
        Self::with_entropy(config, shared(SplitMix64::seeded(config.entropy_seed)))
    }

    /// Creates an unrealized SoC whose RNG draws from `entropy`.
    pub fn with_entropy(config: &SocConfig, entropy: SharedEntropy) -> Self {
        Self {
            config: config.clone(),
            bus: Bus::new(),
            entropy,
            reset_request: Arc::new(AtomicBool::new(false)),
            realized: false,
        }
    }

    /// Instantiates every device and registers it on the bus.
    ///
    /// Realizing twice is a no-op. On failure the SoC stays unrealized with an empty bus.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidRegionSize`] if a region runs past the 32-bit address space
    /// and [`BoardError::AddressOverlap`] if two regions intersect.
    pub fn realize(&mut self) -> Result<(), BoardError> {
        if self.realized {
            return Ok(());
        }
        let cfg = &self.config;
        let flash_size = cfg.flash_size();
        let sram2_alias_base = cfg.sram1_base.saturating_add(SRAM1_SIZE as u64);

        check_region("FLASH", cfg.flash_base, flash_size)?;
        check_region("FLASH_ALIAS", FLASH_ALIAS_BASE, flash_size)?;
        check_region("SRAM1", cfg.sram1_base, SRAM1_SIZE)?;
        check_region("SRAM2", cfg.sram2_base, SRAM2_SIZE)?;
        check_region("SRAM2_ALIAS", sram2_alias_base, SRAM2_SIZE)?;
        check_region("SRAM3", cfg.sram3_base, SRAM3_SIZE)?;
        check_region("GPIO", cfg.gpio_base, NUM_GPIOS * GPIO_STRIDE as usize)?;
        check_region("RNG", cfg.rng_base, PERIPHERAL_WINDOW as usize)?;
        check_region("IWDG", cfg.iwdg_base, PERIPHERAL_WINDOW as usize)?;

        let flash = Memory::flash(cfg.flash_base, flash_size);
        let flash_alias = flash.alias("FLASH_ALIAS", FLASH_ALIAS_BASE);
        let sram2 = Memory::ram("SRAM2", cfg.sram2_base, SRAM2_SIZE);
        let sram2_alias = sram2.alias("SRAM2_ALIAS", sram2_alias_base);

        let mut bus = Bus::new();
        bus.add_device(Box::new(flash))?;
        bus.add_device(Box::new(flash_alias))?;
        bus.add_device(Box::new(Memory::ram("SRAM1", cfg.sram1_base, SRAM1_SIZE)))?;
        bus.add_device(Box::new(sram2))?;
        bus.add_device(Box::new(sram2_alias))?;
        bus.add_device(Box::new(Memory::ram("SRAM3", cfg.sram3_base, SRAM3_SIZE)))?;
        for id in GpioBlockId::ALL {
            bus.add_device(Box::new(GpioBlock::new(
                id,
                id.base_address(cfg.gpio_base),
            )))?;
        }
        bus.add_device(Box::new(Rng::new(
            cfg.rng_base,
            Arc::clone(&self.entropy),
        )))?;
        bus.add_device(Box::new(Iwdg::new(
            cfg.iwdg_base,
            Arc::clone(&self.reset_request),
        )))?;

        tracing::info!(
            variant = ?cfg.variant,
            flash_size,
            devices = bus.device_count(),
            "SoC realized"
        );
        self.bus = bus;
        self.realized = true;
        Ok(())
    }

    /// Returns `true` once [`Soc::realize`] has succeeded.
    pub const fn is_realized(&self) -> bool {
        self.realized
    }

    /// Configuration the SoC was created from.
    pub const fn config(&self) -> &SocConfig {
        &self.config
    }

    /// The system bus.
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Output line of a GPIO pin; connect a consumer to observe the level firmware drives.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingGpioBlock`] if the port is not on the bus (e.g. before realize).
    pub fn gpio_output_pin(&mut self, pin: GpioPin) -> Result<&mut OutputPin, BoardError> {
        Ok(self.gpio_mut(pin.block)?.output_pin(pin.pin))
    }

    /// Input line of a GPIO pin; levels delivered here appear in the port's IDR.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingGpioBlock`] if the port is not on the bus (e.g. before realize).
    pub fn gpio_input_pin(&mut self, pin: GpioPin) -> Result<InputPin, BoardError> {
        Ok(self.gpio_mut(pin.block)?.input_pin(pin.pin))
    }

    /// GPIO port `block`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingGpioBlock`] if the port is not on the bus.
    pub fn gpio_mut(&mut self, block: GpioBlockId) -> Result<&mut GpioBlock, BoardError> {
        self.bus
            .find_gpio_mut(block)
            .ok_or(BoardError::MissingGpioBlock(block))
    }

    /// The RNG, once realized.
    pub fn rng_mut(&mut self) -> Option<&mut Rng> {
        self.bus.find_rng_mut()
    }

    /// The independent watchdog, once realized.
    pub fn iwdg_mut(&mut self) -> Option<&mut Iwdg> {
        self.bus.find_iwdg_mut()
    }

    /// Loads a binary into memory at the given physical address.
    ///
    /// Flash accepts images through this path even though guest stores to it are rejected.
    pub fn load_binary_at(&mut self, data: &[u8], addr: u64) {
        self.bus.load_binary_at(data, addr);
    }

    /// Advances all devices by one tick.
    ///
    /// # Returns
    ///
    /// `true` if a device requested a system reset during this tick.
    pub fn tick(&mut self) -> bool {
        self.bus.tick()
    }

    /// Returns `true` while a system reset request is pending.
    pub fn reset_requested(&self) -> bool {
        self.reset_request.load(Ordering::Relaxed)
    }

    /// Acknowledges a pending reset request.
    pub fn clear_reset_request(&self) {
        self.reset_request.store(false, Ordering::Relaxed);
    }

    /// Reads one byte at a physical address; unclaimed addresses read 0.
    pub fn read_u8(&mut self, addr: u64) -> u8 {
        self.bus.read_u8(addr)
    }
    /// Reads a little-endian halfword at a physical address.
    pub fn read_u16(&mut self, addr: u64) -> u16 {
        self.bus.read_u16(addr)
    }
    /// Reads a little-endian word at a physical address.
    pub fn read_u32(&mut self, addr: u64) -> u32 {
        self.bus.read_u32(addr)
    }
    /// Reads a little-endian doubleword at a physical address.
    pub fn read_u64(&mut self, addr: u64) -> u64 {
        self.bus.read_u64(addr)
    }
    /// Writes one byte at a physical address; unclaimed addresses ignore the write.
    pub fn write_u8(&mut self, addr: u64, val: u8) {
        self.bus.write_u8(addr, val);
    }
    /// Writes a little-endian halfword at a physical address.
    pub fn write_u16(&mut self, addr: u64, val: u16) {
        self.bus.write_u16(addr, val);
    }
    /// Writes a little-endian word at a physical address.
    pub fn write_u32(&mut self, addr: u64, val: u32) {
        self.bus.write_u32(addr, val);
    }
    /// Writes a little-endian doubleword at a physical address.
    pub fn write_u64(&mut self, addr: u64, val: u64) {
        self.bus.write_u64(addr, val);
    }
}

fn check_region(region: &'static str, base: u64, size: usize) -> Result<(), BoardError> {
    match base.checked_add(size as u64) {
        Some(end) if size > 0 && end <= ADDRESS_SPACE_END => Ok(()),
        _ => Err(BoardError::InvalidRegionSize { region, size }),
    }
}
