//! Port and pin wrappers over the GPIO register interface
//!
//! A port is eight pins behind one register triple. [`GpioPort`] offers
//! the masked whole-port operations, [`GpioPin`] wraps a single bit and
//! implements the `pinion-hal` pin traits. Both work on any
//! [`PortRegisters`] implementation, so one wrapper serves every port
//! letter of every chip; the per-port-letter branching lives in the
//! back end's register descriptor table, not here.

use pinion_hal::gpio::{Direction, InputPin, Level, OutputPin, PortRegisters, Pull};

/// Whole-port access (all eight pins at once)
///
/// Every operation takes a `mask`: only pins whose mask bit is 1 are
/// affected, the rest keep their state. Pass `0xFF` to address the full
/// port.
pub struct GpioPort<R> {
    regs: R,
}

impl<R: PortRegisters> GpioPort<R> {
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Program masked pins as outputs (1-bits in `modes`) or inputs
    /// (0-bits).
    pub fn set_modes(&self, modes: u8, mask: u8) {
        self.regs
            .modify_ddr(|v| (v | (modes & mask)) & !(mask & !modes));
    }

    /// Activate (1-bits in `pulls`) or deactivate the internal pull-up
    /// resistors of masked pins. The pins should already be inputs.
    pub fn set_pulls(&self, pulls: u8, mask: u8) {
        self.write(pulls, mask);
    }

    /// Drive masked output pins to the given levels (1-bit = high).
    pub fn write(&self, levels: u8, mask: u8) {
        self.regs
            .modify_out(|v| (v | (levels & mask)) & !(mask & !levels));
    }

    /// Read the input levels of masked pins; masked-out bits read 0.
    pub fn read(&self, mask: u8) -> u8 {
        self.regs.read_in() & mask
    }

    /// Toggle the driven levels of masked output pins.
    pub fn toggle(&self, mask: u8) {
        self.regs.modify_out(|v| v ^ mask);
    }
}

/// A single GPIO pin
///
/// Pin numbers are taken modulo 8 (a port has eight pins); the silent
/// truncation matches the rest of the library's defensive policy.
pub struct GpioPin<R> {
    regs: R,
    mask: u8,
}

impl<R: PortRegisters> GpioPin<R> {
    /// Wrap pin `n` of a port and program its direction.
    pub fn new(regs: R, n: u8, direction: Direction) -> Self {
        let pin = Self {
            regs,
            mask: 1 << (n & 0x07),
        };
        pin.set_direction(direction);
        pin
    }

    /// Program the pin as input or output.
    pub fn set_direction(&self, direction: Direction) {
        match direction {
            Direction::Output => self.regs.modify_ddr(|v| v | self.mask),
            Direction::Input => self.regs.modify_ddr(|v| v & !self.mask),
        }
    }

    /// Activate or deactivate the internal pull-up resistor. The pin
    /// should be an input.
    pub fn set_pull(&self, pull: Pull) {
        match pull {
            Pull::Up => self.regs.modify_out(|v| v | self.mask),
            Pull::None => self.regs.modify_out(|v| v & !self.mask),
        }
    }

    /// Drive the pin to `level`. The pin should be an output.
    pub fn write(&self, level: Level) {
        match level {
            Level::High => self.regs.modify_out(|v| v | self.mask),
            Level::Low => self.regs.modify_out(|v| v & !self.mask),
        }
    }

    /// Read the voltage level fed into the pin.
    pub fn read(&self) -> Level {
        Level::from(self.regs.read_in() & self.mask != 0)
    }

    /// Toggle the driven level. The pin should be an output.
    pub fn toggle_level(&self) {
        self.regs.modify_out(|v| v ^ self.mask);
    }
}

impl<R: PortRegisters> OutputPin for GpioPin<R> {
    fn set_high(&mut self) {
        self.write(Level::High);
    }

    fn set_low(&mut self) {
        self.write(Level::Low);
    }

    fn toggle(&mut self) {
        self.toggle_level();
    }

    fn is_set_high(&self) -> bool {
        self.regs.read_out() & self.mask != 0
    }
}

impl<R: PortRegisters> InputPin for GpioPin<R> {
    fn is_high(&self) -> bool {
        self.read() == Level::High
    }
}
