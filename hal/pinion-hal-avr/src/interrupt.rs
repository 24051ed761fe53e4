//! Global interrupt gate
//!
//! The AVR has one process-wide on/off switch for interrupt delivery:
//! the I bit in SREG. Nothing is dispatched, whatever the per-line mask
//! says, until [`enable`] has been called.
//!
//! Off-target (host) builds compile all of this to no-ops so downstream
//! logic tests keep building; the real instructions only exist on AVR.

use crate::device;

/// Globally allow interrupt delivery (`sei`).
///
/// Only lines whose mask bit is set will actually deliver.
#[inline(always)]
pub fn enable() {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::arch::asm!("sei", options(nomem, nostack))
    };
}

/// Globally block interrupt delivery (`cli`).
///
/// Qualifying events still latch their pending flags and deliver once
/// interrupts are allowed again.
#[inline(always)]
pub fn disable() {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::arch::asm!("cli", options(nomem, nostack))
    };
}

/// Run `f` with interrupt delivery blocked, restoring the previous
/// state afterwards.
///
/// This is the bracket for register read-modify-write sequences that
/// must be atomic with respect to interrupt delivery. The I bit is
/// restored to whatever it was on entry, so nested `free` sections
/// behave.
#[inline]
pub fn free<T>(f: impl FnOnce() -> T) -> T {
    let sreg = read_sreg();
    disable();
    let result = f();
    write_sreg(sreg);
    result
}

#[inline(always)]
pub(crate) fn read_sreg() -> u8 {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::ptr::read_volatile(device::SREG as *const u8)
    }
    #[cfg(not(target_arch = "avr"))]
    {
        let _ = device::SREG;
        0
    }
}

#[inline(always)]
pub(crate) fn write_sreg(sreg: u8) {
    #[cfg(target_arch = "avr")]
    unsafe {
        core::ptr::write_volatile(device::SREG as *mut u8, sreg)
    }
    #[cfg(not(target_arch = "avr"))]
    let _ = sreg;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_passes_result_through() {
        assert_eq!(free(|| 42), 42);
        let mut hit = false;
        free(|| hit = true);
        assert!(hit);
    }
}

/// `critical-section` provider for AVR targets: single core, so a
/// critical section is just SREG save + `cli`.
#[cfg(all(target_arch = "avr", feature = "critical-section-impl"))]
mod cs_impl {
    struct SingleCore;
    critical_section::set_impl!(SingleCore);

    unsafe impl critical_section::Impl for SingleCore {
        unsafe fn acquire() -> critical_section::RawRestoreState {
            let sreg = super::read_sreg();
            super::disable();
            sreg
        }

        unsafe fn release(sreg: critical_section::RawRestoreState) {
            super::write_sreg(sreg);
        }
    }
}
