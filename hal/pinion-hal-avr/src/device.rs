//! Data-space addresses of the special-function registers
//!
//! Addresses are the data-space view (I/O address + 0x20 for registers
//! in the lower I/O space), taken from the ATmega328P and ATmega2560
//! datasheets. The extended-I/O ports H-L of the ATmega2560 sit above
//! 0xFF and are only reachable via data-space access, which is all this
//! crate uses.

/// Status register (carries the global interrupt-enable bit, I)
pub const SREG: usize = 0x5F;

/// External-interrupt sense control A (lines 0-3)
pub const EICRA: usize = 0x69;

/// External-interrupt sense control B (lines 4-7, ATmega2560 only)
#[cfg(feature = "atmega2560")]
pub const EICRB: usize = 0x6A;

/// External-interrupt mask register
pub const EIMSK: usize = 0x3D;

/// External-interrupt flag register (write-1-to-clear)
pub const EIFR: usize = 0x3C;

// GPIO ports are register triples at consecutive addresses:
// PINx, DDRx, PORTx. Only the PINx base is listed here.

#[cfg(feature = "atmega2560")]
pub const PIN_A: usize = 0x20;
pub const PIN_B: usize = 0x23;
pub const PIN_C: usize = 0x26;
pub const PIN_D: usize = 0x29;
#[cfg(feature = "atmega2560")]
pub const PIN_E: usize = 0x2C;
#[cfg(feature = "atmega2560")]
pub const PIN_F: usize = 0x2F;
#[cfg(feature = "atmega2560")]
pub const PIN_G: usize = 0x32;
#[cfg(feature = "atmega2560")]
pub const PIN_H: usize = 0x100;
#[cfg(feature = "atmega2560")]
pub const PIN_J: usize = 0x103;
#[cfg(feature = "atmega2560")]
pub const PIN_K: usize = 0x106;
#[cfg(feature = "atmega2560")]
pub const PIN_L: usize = 0x109;
