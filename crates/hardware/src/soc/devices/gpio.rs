//! General-Purpose I/O port (GPIOx).
//!
//! One 16-pin port of the STM32L4 GPIO peripheral. Each pin has an output line,
//! driven from ODR while the pin is in output mode, and an input line whose level
//! shows up in IDR. The SoC exposes both as connection points so a board can wire
//! them to external devices or loop an output back into its own input.
//!
//! # Registers
//!
//! * `0x00`: MODER (2 bits per pin; `01` = general-purpose output)
//! * `0x04`: OTYPER, `0x08`: OSPEEDR, `0x0C`: PUPDR (stored only)
//! * `0x10`: IDR (Read Only) levels received on the input lines
//! * `0x14`: ODR output data
//! * `0x18`: BSRR (Write Only) bits 15:0 set, bits 31:16 reset; set wins
//! * `0x1C`: LCKR, `0x20`: AFRL, `0x24`: AFRH, `0x2C`: ASCR (stored only)
//! * `0x28`: BRR (Write Only) bits 15:0 reset

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::common::constants::{GPIO_NUM_PINS, GPIO_STRIDE};
use crate::common::data::AccessSize;
use crate::common::error::{GuestError, GuestErrorLog};
use crate::common::pin::{GpioBlockId, PinIndex};
use crate::signal::{InputPin, OutputPin};
use crate::soc::devices::Device;

/// Mode register offset.
pub const GPIO_MODER: u64 = 0x00;
/// Output type register offset.
pub const GPIO_OTYPER: u64 = 0x04;
/// Output speed register offset.
pub const GPIO_OSPEEDR: u64 = 0x08;
/// Pull-up/pull-down register offset.
pub const GPIO_PUPDR: u64 = 0x0C;
/// Input data register offset.
pub const GPIO_IDR: u64 = 0x10;
/// Output data register offset.
pub const GPIO_ODR: u64 = 0x14;
/// Bit set/reset register offset.
pub const GPIO_BSRR: u64 = 0x18;
/// Configuration lock register offset.
pub const GPIO_LCKR: u64 = 0x1C;
/// Alternate function low register offset.
pub const GPIO_AFRL: u64 = 0x20;
/// Alternate function high register offset.
pub const GPIO_AFRH: u64 = 0x24;
/// Bit reset register offset.
pub const GPIO_BRR: u64 = 0x28;
/// Analog switch control register offset.
pub const GPIO_ASCR: u64 = 0x2C;

/// MODER field value for general-purpose output mode.
pub const MODE_OUTPUT: u32 = 0b01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResetValues {
    moder: u32,
    ospeedr: u32,
    pupdr: u32,
}

const fn reset_values(id: GpioBlockId) -> ResetValues {
    match id {
        GpioBlockId::A => ResetValues {
            moder: 0xABFF_FFFF,
            ospeedr: 0x0C00_0000,
            pupdr: 0x6400_0000,
        },
        GpioBlockId::B => ResetValues {
            moder: 0xFFFF_FEBF,
            ospeedr: 0x0000_0000,
            pupdr: 0x0000_0100,
        },
        _ => ResetValues {
            moder: 0xFFFF_FFFF,
            ospeedr: 0x0000_0000,
            pupdr: 0x0000_0000,
        },
    }
}

/// GPIO port state.
#[derive(Debug)]
pub struct GpioBlock {
    id: GpioBlockId,
    base_addr: u64,
    moder: u32,
    otyper: u32,
    ospeedr: u32,
    pupdr: u32,
    odr: u32,
    lckr: u32,
    afrl: u32,
    afrh: u32,
    ascr: u32,
    /// Levels received on the input lines; bit n = pin n.
    inputs: Arc<AtomicU32>,
    outputs: Vec<OutputPin>,
    errors: GuestErrorLog,
}

impl GpioBlock {
    /// Creates port `id` with its reset register values, mapped at `base_addr`.
    pub fn new(id: GpioBlockId, base_addr: u64) -> Self {
        let reset = reset_values(id);
        Self {
            id,
            base_addr,
            moder: reset.moder,
            otyper: 0,
            ospeedr: reset.ospeedr,
            pupdr: reset.pupdr,
            odr: 0,
            lckr: 0,
            afrl: 0,
            afrh: 0,
            ascr: 0,
            inputs: Arc::new(AtomicU32::new(0)),
            outputs: (0..GPIO_NUM_PINS).map(|_| OutputPin::new()).collect(),
            errors: GuestErrorLog::new(),
        }
    }

    /// Port identity.
    pub const fn id(&self) -> GpioBlockId {
        self.id
    }

    /// Output line of `pin`, for connecting a consumer.
    pub fn output_pin(&mut self, pin: PinIndex) -> &mut OutputPin {
        &mut self.outputs[pin.as_usize()]
    }

    /// Input line of `pin`; levels delivered here appear in IDR.
    pub fn input_pin(&self, pin: PinIndex) -> InputPin {
        let inputs = Arc::clone(&self.inputs);
        let bit = 1u32 << pin.get();
        InputPin::new(move |level| {
            if level {
                let _ = inputs.fetch_or(bit, Ordering::Relaxed);
            } else {
                let _ = inputs.fetch_and(!bit, Ordering::Relaxed);
            }
        })
    }

    /// Current IDR value.
    pub fn idr(&self) -> u32 {
        self.inputs.load(Ordering::Relaxed) & 0xFFFF
    }

    /// Current ODR value.
    pub const fn odr(&self) -> u32 {
        self.odr
    }

    /// Current MODER value.
    pub const fn moder(&self) -> u32 {
        self.moder
    }

    /// Guest errors seen by this port.
    pub const fn guest_errors(&self) -> &GuestErrorLog {
        &self.errors
    }

    const fn is_output(&self, pin: usize) -> bool {
        (self.moder >> (pin * 2)) & 0b11 == MODE_OUTPUT
    }

    /// Applies new MODER/ODR values and drives every output-mode pin whose line level changed,
    /// in ascending pin order.
    fn update(&mut self, moder: u32, odr: u32) {
        let old_moder = self.moder;
        let old_odr = self.odr;
        self.moder = moder;
        self.odr = odr & 0xFFFF;

        for pin in 0..GPIO_NUM_PINS {
            if !self.is_output(pin) {
                continue;
            }
            let was_output = (old_moder >> (pin * 2)) & 0b11 == MODE_OUTPUT;
            let level = self.odr & (1 << pin) != 0;
            let old_level = old_odr & (1 << pin) != 0;
            let line = &mut self.outputs[pin];
            if !was_output || level != old_level || line.level().is_none() {
                tracing::trace!(port = %self.id, pin, level, "GPIO output");
                line.set(level);
            }
        }
    }

    fn read_register(&mut self, offset: u64) -> u32 {
        match offset {
            GPIO_MODER => self.moder,
            GPIO_OTYPER => self.otyper,
            GPIO_OSPEEDR => self.ospeedr,
            GPIO_PUPDR => self.pupdr,
            GPIO_IDR => self.idr(),
            GPIO_ODR => self.odr,
            GPIO_LCKR => self.lckr,
            GPIO_AFRL => self.afrl,
            GPIO_AFRH => self.afrh,
            GPIO_ASCR => self.ascr,
            GPIO_BSRR | GPIO_BRR => {
                self.guest_error(GuestError::WriteOnlyRegister(offset));
                0
            }
            _ => {
                self.guest_error(GuestError::InvalidReadOffset(offset));
                0
            }
        }
    }

    fn write_register(&mut self, offset: u64, value: u32) {
        match offset {
            GPIO_MODER => self.update(value, self.odr),
            GPIO_OTYPER => self.otyper = value & 0xFFFF,
            GPIO_OSPEEDR => self.ospeedr = value,
            GPIO_PUPDR => self.pupdr = value,
            GPIO_ODR => self.update(self.moder, value),
            GPIO_BSRR => {
                let set = value & 0xFFFF;
                let reset = value >> 16;
                self.update(self.moder, (self.odr & !reset) | set);
            }
            GPIO_BRR => self.update(self.moder, self.odr & !(value & 0xFFFF)),
            GPIO_LCKR => self.lckr = value & 0x1_FFFF,
            GPIO_AFRL => self.afrl = value,
            GPIO_AFRH => self.afrh = value,
            GPIO_ASCR => self.ascr = value & 0xFFFF,
            GPIO_IDR => self.guest_error(GuestError::ReadOnlyRegister(offset)),
            _ => self.guest_error(GuestError::InvalidWriteOffset(offset)),
        }
    }

    fn invalid_width(&mut self, offset: u64, size: AccessSize) {
        self.guest_error(GuestError::InvalidAccessSize {
            offset,
            size: size.bytes(),
        });
    }

    fn guest_error(&mut self, error: GuestError) {
        self.errors.record(port_name(self.id), error);
    }
}

const fn port_name(id: GpioBlockId) -> &'static str {
    match id {
        GpioBlockId::A => "GPIOA",
        GpioBlockId::B => "GPIOB",
        GpioBlockId::C => "GPIOC",
        GpioBlockId::D => "GPIOD",
        GpioBlockId::E => "GPIOE",
        GpioBlockId::F => "GPIOF",
        GpioBlockId::G => "GPIOG",
        GpioBlockId::H => "GPIOH",
    }
}

impl Device for GpioBlock {
    fn name(&self) -> &str {
        port_name(self.id)
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, GPIO_STRIDE)
    }

    fn read_u8(&mut self, offset: u64) -> u8 {
        self.invalid_width(offset, AccessSize::Byte);
        0
    }
    fn read_u16(&mut self, offset: u64) -> u16 {
        self.invalid_width(offset, AccessSize::Half);
        0
    }
    fn read_u32(&mut self, offset: u64) -> u32 {
        self.read_register(offset)
    }
    fn read_u64(&mut self, offset: u64) -> u64 {
        self.invalid_width(offset, AccessSize::Double);
        0
    }

    fn write_u8(&mut self, offset: u64, _val: u8) {
        self.invalid_width(offset, AccessSize::Byte);
    }
    fn write_u16(&mut self, offset: u64, _val: u16) {
        self.invalid_width(offset, AccessSize::Half);
    }
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write_register(offset, val);
    }
    fn write_u64(&mut self, offset: u64, _val: u64) {
        self.invalid_width(offset, AccessSize::Double);
    }

    fn as_gpio_mut(&mut self) -> Option<&mut GpioBlock> {
        Some(self)
    }
}
