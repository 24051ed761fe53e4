//! External-interrupt register interface
//!
//! AVR external interrupts (the INTx pins) are controlled by three
//! register groups: per-line 2-bit sense-control fields packed four to
//! a register, a line-indexed interrupt-mask register and a
//! line-indexed write-1-to-clear flag register. Chips with more than
//! four lines split the sense-control fields across a second register;
//! [`SenseBank`] names the two halves without tying the core to
//! concrete register names.

/// Voltage-transition kinds that qualify as a triggering event
///
/// The discriminants are the hardware's 2-bit sense-control encoding
/// (the ISCn1/ISCn0 bits) and are written to the registers verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Sense {
    /// A low level produces ongoing interrupt events for as long as it
    /// is held. Mostly used with external chips that share one
    /// interrupt pin between several internal sources.
    #[default]
    LowLevel = 0x00,
    /// Both rising and falling edges trigger
    AnyEdge = 0x01,
    /// Only high-to-low transitions trigger
    FallingEdge = 0x02,
    /// Only low-to-high transitions trigger
    RisingEdge = 0x03,
}

impl Sense {
    /// Decode a sense mode from its 2-bit register encoding.
    ///
    /// Stray high bits are truncated rather than rejected, so any byte
    /// maps to a valid mode (`0xFF` decodes the same as `0x03`).
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Sense::LowLevel,
            0x01 => Sense::AnyEdge,
            0x02 => Sense::FallingEdge,
            _ => Sense::RisingEdge,
        }
    }

    /// The 2-bit register encoding of this mode.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Which sense-control register holds a line's 2-bit field
///
/// Lines 0-3 live in the primary bank; on chips with more than four
/// lines, lines 4-7 live in the secondary bank at the same bit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SenseBank {
    Primary,
    Secondary,
}

/// Register access for the external-interrupt peripheral
///
/// Implementations perform the actual hardware register manipulation.
/// As with [`crate::gpio::PortRegisters`], the read-modify-write
/// methods are not atomic with respect to interrupt delivery.
pub trait ExtIntRegisters {
    /// Read-modify-write one of the sense-control registers.
    ///
    /// A back end for a chip without a secondary bank treats
    /// [`SenseBank::Secondary`] as a no-op; the dispatch table never
    /// addresses it on such chips because its line count is <= 4.
    fn modify_sense(&self, bank: SenseBank, f: impl FnOnce(u8) -> u8);

    /// Read-modify-write the interrupt-mask register.
    ///
    /// Bit `n` enables delivery for line `n`.
    fn modify_mask(&self, f: impl FnOnce(u8) -> u8);

    /// Write to the pending-flag register.
    ///
    /// The register is write-1-to-clear: each 1-bit in `bits` discards
    /// the latched event for that line, 0-bits leave lines untouched.
    fn write_flags(&self, bits: u8);
}

// Shared references forward to the underlying block, so a register
// block can be borrowed by several wrappers at once.
impl<T: ExtIntRegisters> ExtIntRegisters for &T {
    fn modify_sense(&self, bank: SenseBank, f: impl FnOnce(u8) -> u8) {
        T::modify_sense(self, bank, f)
    }

    fn modify_mask(&self, f: impl FnOnce(u8) -> u8) {
        T::modify_mask(self, f)
    }

    fn write_flags(&self, bits: u8) {
        T::write_flags(self, bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sense_roundtrip() {
        for sense in [
            Sense::LowLevel,
            Sense::AnyEdge,
            Sense::FallingEdge,
            Sense::RisingEdge,
        ] {
            assert_eq!(Sense::from_bits(sense.bits()), sense);
        }
    }

    #[test]
    fn test_sense_truncates_high_bits() {
        assert_eq!(Sense::from_bits(0xFF), Sense::RisingEdge);
        assert_eq!(Sense::from_bits(0xFC), Sense::LowLevel);
        assert_eq!(Sense::from_bits(0x06), Sense::FallingEdge);
    }
}
