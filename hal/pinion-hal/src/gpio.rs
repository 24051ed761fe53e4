//! GPIO register interface and pin abstractions
//!
//! AVR GPIO ports are groups of eight pins controlled by three
//! registers: a data-direction register (DDRx), an output/pull-up
//! register (PORTx) and an input-level register (PINx). The
//! [`PortRegisters`] trait captures exactly that register triple so the
//! port and pin wrappers in the core crate stay chip-agnostic.

/// Register access for one GPIO port (eight pins)
///
/// Implementations perform the actual hardware register manipulation.
/// All methods take `&self`: the registers are shared hardware state
/// and the read-modify-write sequences are *not* atomic with respect to
/// interrupt delivery. Callers needing atomicity must bracket calls
/// with a global-interrupt-disable section.
pub trait PortRegisters {
    /// Read-modify-write the data-direction register (DDRx).
    ///
    /// A 1-bit makes the corresponding pin an output, a 0-bit an input.
    fn modify_ddr(&self, f: impl FnOnce(u8) -> u8);

    /// Read-modify-write the output register (PORTx).
    ///
    /// For output pins this sets the driven level; for input pins a
    /// 1-bit activates the internal pull-up resistor.
    fn modify_out(&self, f: impl FnOnce(u8) -> u8);

    /// Read back the output register (PORTx).
    fn read_out(&self) -> u8;

    /// Read the input-level register (PINx).
    fn read_in(&self) -> u8;
}

// Shared references forward to the underlying block, so a register
// block can be borrowed by a port wrapper and several pin wrappers at
// the same time.
impl<T: PortRegisters> PortRegisters for &T {
    fn modify_ddr(&self, f: impl FnOnce(u8) -> u8) {
        T::modify_ddr(self, f)
    }

    fn modify_out(&self, f: impl FnOnce(u8) -> u8) {
        T::modify_out(self, f)
    }

    fn read_out(&self) -> u8 {
        T::read_out(self)
    }

    fn read_in(&self) -> u8 {
        T::read_in(self)
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// High-impedance input (reset state of every AVR pin)
    #[default]
    Input,
    /// Push-pull output
    Output,
}

/// Internal pull-up resistor state for input pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input; an open pin reads an undefined level
    #[default]
    None,
    /// Internal pull-up active (AVR has no internal pull-downs)
    Up,
}

/// Digital voltage level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the driven level
    fn toggle(&mut self);

    /// Drive the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently driven low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin that can be used for both input and output
///
/// AVR pins can always be reconfigured between the two directions at
/// runtime, so the concrete pin wrapper implements both traits.
pub trait IoPin: OutputPin + InputPin {}

// Blanket implementation for types that implement both traits
impl<T: OutputPin + InputPin> IoPin for T {}
