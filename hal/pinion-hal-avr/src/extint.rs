//! MMIO implementation of the external-interrupt register interface
//!
//! The dispatch table itself lives in `pinion-core`; this module
//! supplies its register back end, the chip's line count and the
//! canonical [`EXT_INTS`] table the vector trampolines are bound to.

use core::ptr;

use pinion_core::extint::ExtIntTable;
use pinion_hal::extint::{ExtIntRegisters, SenseBank};

use crate::device;
use crate::gpio::{self, PortId};

/// Number of external-interrupt lines on the selected chip.
#[cfg(feature = "atmega2560")]
pub const EXT_INT_COUNT: usize = 8;
/// Number of external-interrupt lines on the selected chip.
#[cfg(not(feature = "atmega2560"))]
pub const EXT_INT_COUNT: usize = 2;

/// Which port pin each interrupt line occupies.
///
/// The pin must be programmed as an input (usually with the pull-up
/// active) before the line is usable; neither the hardware nor the
/// dispatch table enforces this.
#[cfg(feature = "atmega2560")]
pub const EXT_INT_PINS: [(PortId, u8); EXT_INT_COUNT] = [
    (PortId::D, 0),
    (PortId::D, 1),
    (PortId::D, 2),
    (PortId::D, 3),
    (PortId::E, 4),
    (PortId::E, 5),
    (PortId::E, 6),
    (PortId::E, 7),
];
/// Which port pin each interrupt line occupies.
///
/// The pin must be programmed as an input (usually with the pull-up
/// active) before the line is usable; neither the hardware nor the
/// dispatch table enforces this.
#[cfg(not(feature = "atmega2560"))]
pub const EXT_INT_PINS: [(PortId, u8); EXT_INT_COUNT] = [(PortId::D, 2), (PortId::D, 3)];

/// Zero-sized handle to the EICRx/EIMSK/EIFR registers
#[derive(Debug, Clone, Copy)]
pub struct ExtIntRegs;

impl ExtIntRegisters for ExtIntRegs {
    fn modify_sense(&self, bank: SenseBank, f: impl FnOnce(u8) -> u8) {
        match bank {
            SenseBank::Primary => unsafe { gpio::rmw(device::EICRA, f) },
            #[cfg(feature = "atmega2560")]
            SenseBank::Secondary => unsafe { gpio::rmw(device::EICRB, f) },
            // no secondary bank on this chip; the table never addresses
            // it because the line count is 2
            #[cfg(not(feature = "atmega2560"))]
            SenseBank::Secondary => {
                let _ = f;
            }
        }
    }

    fn modify_mask(&self, f: impl FnOnce(u8) -> u8) {
        unsafe { gpio::rmw(device::EIMSK, f) }
    }

    fn write_flags(&self, bits: u8) {
        // plain write: the register is write-1-to-clear, so a
        // read-modify-write here would also discard events on other
        // lines whose flags happen to be set
        unsafe { ptr::write_volatile(device::EIFR as *mut u8, bits) }
    }
}

/// The dispatch table type for the selected chip.
pub type ExtIntLines = ExtIntTable<ExtIntRegs, EXT_INT_COUNT>;

/// The external-interrupt dispatch table.
///
/// One table per chip, shared between the main program and the vector
/// trampolines. Bind the trampolines with
/// [`extint_vectors!`](crate::extint_vectors).
pub static EXT_INTS: ExtIntLines = ExtIntTable::new(ExtIntRegs);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_matches_pin_map() {
        assert_eq!(EXT_INT_PINS.len(), EXT_INT_COUNT);
        assert_eq!(EXT_INTS.line_count(), EXT_INT_COUNT);
    }

    #[test]
    fn test_pins_are_within_their_port() {
        for (_, pin) in EXT_INT_PINS {
            assert!(pin < 8);
        }
    }
}
