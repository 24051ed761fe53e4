//! Pinion Hardware Abstraction Layer
//!
//! This crate defines the register-interface traits and vocabulary types
//! shared by the chip-agnostic core logic and the chip-specific back
//! ends. The core manipulates peripherals only through these traits,
//! which keeps it testable on the host against mock register blocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application code                       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinion-core (tables, pin wrappers)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinion-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinion-hal-avr (MMIO register blocks)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PortRegisters`] - DDRx/PORTx/PINx access for one port
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`extint::ExtIntRegisters`] - External-interrupt control registers

#![no_std]
#![deny(unsafe_code)]

pub mod extint;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use extint::{ExtIntRegisters, Sense, SenseBank};
pub use gpio::{InputPin, OutputPin, PortRegisters};
