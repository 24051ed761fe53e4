//! MMIO implementation of the GPIO register interface
//!
//! Each AVR port is a triple of consecutive registers (PINx, DDRx,
//! PORTx). [`PortId`] enumerates the ports the selected chip actually
//! has and [`PortId::regs`] looks the triple up in a descriptor table,
//! so there is no branch-per-port-letter anywhere downstream.

use core::ptr;

use pinion_hal::gpio::PortRegisters;

use crate::device;

/// The GPIO ports of the selected chip
///
/// Port I does not exist on any AVR (easily confused with the digit 1),
/// which is why the ATmega2560 set jumps from H to J.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortId {
    #[cfg(feature = "atmega2560")]
    A,
    B,
    C,
    D,
    #[cfg(feature = "atmega2560")]
    E,
    #[cfg(feature = "atmega2560")]
    F,
    #[cfg(feature = "atmega2560")]
    G,
    #[cfg(feature = "atmega2560")]
    H,
    #[cfg(feature = "atmega2560")]
    J,
    #[cfg(feature = "atmega2560")]
    K,
    #[cfg(feature = "atmega2560")]
    L,
}

impl PortId {
    /// The register triple controlling this port.
    pub const fn regs(self) -> PortRegs {
        match self {
            #[cfg(feature = "atmega2560")]
            PortId::A => PortRegs::at(device::PIN_A),
            PortId::B => PortRegs::at(device::PIN_B),
            PortId::C => PortRegs::at(device::PIN_C),
            PortId::D => PortRegs::at(device::PIN_D),
            #[cfg(feature = "atmega2560")]
            PortId::E => PortRegs::at(device::PIN_E),
            #[cfg(feature = "atmega2560")]
            PortId::F => PortRegs::at(device::PIN_F),
            #[cfg(feature = "atmega2560")]
            PortId::G => PortRegs::at(device::PIN_G),
            #[cfg(feature = "atmega2560")]
            PortId::H => PortRegs::at(device::PIN_H),
            #[cfg(feature = "atmega2560")]
            PortId::J => PortRegs::at(device::PIN_J),
            #[cfg(feature = "atmega2560")]
            PortId::K => PortRegs::at(device::PIN_K),
            #[cfg(feature = "atmega2560")]
            PortId::L => PortRegs::at(device::PIN_L),
        }
    }
}

/// Register descriptor for one port: the data-space addresses of its
/// PINx, DDRx and PORTx registers
///
/// Copyable and `Sync`; cloning a descriptor aliases the same hardware
/// registers, which is the nature of MMIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRegs {
    pin: usize,
    ddr: usize,
    out: usize,
}

impl PortRegs {
    /// Descriptor for the triple starting at PINx address `base`.
    const fn at(base: usize) -> Self {
        Self {
            pin: base,
            ddr: base + 1,
            out: base + 2,
        }
    }
}

impl PortRegisters for PortRegs {
    fn modify_ddr(&self, f: impl FnOnce(u8) -> u8) {
        unsafe { rmw(self.ddr, f) }
    }

    fn modify_out(&self, f: impl FnOnce(u8) -> u8) {
        unsafe { rmw(self.out, f) }
    }

    fn read_out(&self) -> u8 {
        unsafe { ptr::read_volatile(self.out as *const u8) }
    }

    fn read_in(&self) -> u8 {
        unsafe { ptr::read_volatile(self.pin as *const u8) }
    }
}

/// Volatile read-modify-write of one register byte.
///
/// Not atomic: an interrupt can fire between the read and the write.
/// Callers needing atomicity bracket the call with
/// [`crate::interrupt::free`].
pub(crate) unsafe fn rmw(addr: usize, f: impl FnOnce(u8) -> u8) {
    let reg = addr as *mut u8;
    ptr::write_volatile(reg, f(ptr::read_volatile(reg)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "atmega2560"))]
    const ALL_PORTS: [PortId; 3] = [PortId::B, PortId::C, PortId::D];
    #[cfg(feature = "atmega2560")]
    const ALL_PORTS: [PortId; 11] = [
        PortId::A,
        PortId::B,
        PortId::C,
        PortId::D,
        PortId::E,
        PortId::F,
        PortId::G,
        PortId::H,
        PortId::J,
        PortId::K,
        PortId::L,
    ];

    #[test]
    fn test_descriptor_layout() {
        for port in ALL_PORTS {
            let regs = port.regs();
            assert_eq!(regs.ddr, regs.pin + 1);
            assert_eq!(regs.out, regs.pin + 2);
        }
    }

    #[test]
    fn test_descriptors_do_not_overlap() {
        for a in ALL_PORTS {
            for b in ALL_PORTS {
                if a != b {
                    let (ra, rb) = (a.regs(), b.regs());
                    assert!(
                        ra.out < rb.pin || rb.out < ra.pin,
                        "{:?} and {:?} overlap",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_port_b_matches_datasheet() {
        let regs = PortId::B.regs();
        assert_eq!(regs.pin, 0x23);
        assert_eq!(regs.ddr, 0x24);
        assert_eq!(regs.out, 0x25);
    }
}
