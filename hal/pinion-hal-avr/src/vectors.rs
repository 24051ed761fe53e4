//! Interrupt vector trampolines
//!
//! The hardware jumps through one vector per line; each trampoline just
//! forwards to [`ExtIntTable::dispatch`] for its line, which invokes
//! the registered callback if there is one. Line `n` uses `__vector_{n+1}`
//! (vector 0 is reset), the gcc-compatible symbol naming the AVR
//! linker scripts expect.
//!
//! [`ExtIntTable::dispatch`]: pinion_core::extint::ExtIntTable::dispatch

/// Bind interrupt vectors to a dispatch table.
///
/// Takes the path to a `static` dispatch table and the line numbers to
/// bind; emits one ISR per line. Bind only lines that exist on the
/// selected chip - the symbols for higher vectors belong to other
/// peripherals there.
///
/// ```no_run
/// use pinion_hal_avr::{extint_vectors, EXT_INTS};
///
/// extint_vectors!(EXT_INTS, 0, 1);
/// ```
///
/// The trampolines are only emitted when compiling for AVR, so crates
/// using this macro still build for the host.
#[macro_export]
macro_rules! extint_vectors {
    ($table:path, $($line:tt),+ $(,)?) => {
        $( $crate::extint_vector!($table, $line); )+
    };
}

/// Bind a single interrupt vector; see [`extint_vectors!`].
#[macro_export]
macro_rules! extint_vector {
    ($table:path, 0) => {
        $crate::__extint_isr!($table, 0, __vector_1);
    };
    ($table:path, 1) => {
        $crate::__extint_isr!($table, 1, __vector_2);
    };
    ($table:path, 2) => {
        $crate::__extint_isr!($table, 2, __vector_3);
    };
    ($table:path, 3) => {
        $crate::__extint_isr!($table, 3, __vector_4);
    };
    ($table:path, 4) => {
        $crate::__extint_isr!($table, 4, __vector_5);
    };
    ($table:path, 5) => {
        $crate::__extint_isr!($table, 5, __vector_6);
    };
    ($table:path, 6) => {
        $crate::__extint_isr!($table, 6, __vector_7);
    };
    ($table:path, 7) => {
        $crate::__extint_isr!($table, 7, __vector_8);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __extint_isr {
    ($table:path, $line:expr, $vector:ident) => {
        #[cfg(target_arch = "avr")]
        #[allow(unsafe_code)]
        #[no_mangle]
        pub unsafe extern "avr-interrupt" fn $vector() {
            $table.dispatch($line);
        }
    };
}
