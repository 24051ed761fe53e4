//! AVR back end for the Pinion I/O library
//!
//! Implements the `pinion-hal` register traits with volatile MMIO
//! against the AVR special-function registers, and binds the hardware
//! interrupt vectors to the dispatch table in `pinion-core`.
//!
//! Two register maps are supported: the ATmega328P (default; two
//! external-interrupt lines, ports B/C/D) and the ATmega2560 (enable
//! the `atmega2560` cargo feature; eight lines, ports A-L).
//!
//! Everything except the interrupt trampolines and the `interrupt`
//! module compiles on any target, so downstream crates can run their
//! logic tests on the host.
//!
//! # Example
//!
//! ```no_run
//! use pinion_hal::extint::Sense;
//! use pinion_hal::gpio::{Direction, Pull};
//! use pinion_hal_avr::{extint_vectors, interrupt, ExtInt, ExtIntConfig, GpioPin, PortId, EXT_INTS};
//!
//! // line 0 -> __vector_1, line 1 -> __vector_2
//! extint_vectors!(EXT_INTS, 0, 1);
//!
//! fn on_button() {
//!     // interrupt context: keep it short, the stack is shared
//! }
//!
//! fn main() {
//!     // the INT0 pin must be an input before the line is usable
//!     let button = GpioPin::new(PortId::D.regs(), 2, Direction::Input);
//!     button.set_pull(Pull::Up);
//!
//!     let _int0 = ExtInt::new(
//!         &EXT_INTS,
//!         0,
//!         ExtIntConfig {
//!             sense: Sense::FallingEdge,
//!             callback: Some(on_button),
//!             ..Default::default()
//!         },
//!     );
//!
//!     interrupt::enable();
//!     loop {}
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod device;
pub mod extint;
pub mod gpio;
pub mod interrupt;
mod vectors;

pub use extint::{ExtIntRegs, ExtIntLines, EXT_INTS, EXT_INT_COUNT, EXT_INT_PINS};
pub use gpio::{PortId, PortRegs};

// Re-export the wrapper types so firmware crates only need this one
// dependency.
pub use pinion_core::extint::{ExtInt, ExtIntConfig, ExtIntTable};
pub use pinion_core::gpio::{GpioPin, GpioPort};
