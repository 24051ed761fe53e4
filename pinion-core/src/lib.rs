//! Chip-agnostic core logic for the Pinion AVR I/O library
//!
//! This crate contains everything that does not touch a concrete
//! hardware register:
//!
//! - The external-interrupt dispatch table and its line-bound
//!   convenience handle
//! - Port and pin wrappers over the GPIO register interface
//!
//! All hardware access goes through the `pinion-hal` register traits,
//! so the whole crate runs against mock register blocks in host tests.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod extint;
pub mod gpio;

pub use extint::{ExtInt, ExtIntConfig, ExtIntTable};
pub use gpio::{GpioPin, GpioPort};
