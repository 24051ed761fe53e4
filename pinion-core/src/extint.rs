//! External-interrupt dispatch table
//!
//! The table maps each hardware interrupt line to an optional
//! application callback and bundles the configuration operations for
//! sense mode, enablement and pending-flag clearing. It is the shared
//! state between the main program (which writes configuration and
//! registrations) and the interrupt context (which only ever reads, via
//! [`ExtIntTable::dispatch`]).
//!
//! The table is designed to live in a `static` so the chip crate's
//! interrupt trampolines can reach it:
//!
//! ```no_run
//! use pinion_core::extint::ExtIntTable;
//! # use pinion_hal::extint::{ExtIntRegisters, SenseBank};
//! # struct Regs;
//! # impl ExtIntRegisters for Regs {
//! #     fn modify_sense(&self, _: SenseBank, _: impl FnOnce(u8) -> u8) {}
//! #     fn modify_mask(&self, _: impl FnOnce(u8) -> u8) {}
//! #     fn write_flags(&self, _: u8) {}
//! # }
//!
//! static EXT_INTS: ExtIntTable<Regs, 2> = ExtIntTable::new(Regs);
//!
//! fn on_button() {
//!     // runs in interrupt context
//! }
//!
//! fn main() {
//!     EXT_INTS.attach(0, on_button);
//!     EXT_INTS.enable(0);
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;
use pinion_hal::extint::{ExtIntRegisters, Sense, SenseBank};

/// A registered interrupt callback: no arguments, no return value.
///
/// Plain function pointers only. The table stores a reference to the
/// function, not ownership of any resources; anything the callback
/// touches that the main program also touches must be treated as
/// concurrently-mutated shared state by the application.
pub type Callback = fn();

/// Line number stored in an [`ExtInt`] handle constructed with an
/// out-of-range index. Larger than any supported line count, so every
/// operation on such a handle falls through the range check.
const INVALID_LINE: u8 = 0xFF;

/// Locate the sense-control field for a line: which register bank it
/// lives in and the bit offset of its 2-bit field.
const fn sense_field(line: u8) -> (SenseBank, u8) {
    if line < 4 {
        (SenseBank::Primary, 2 * line)
    } else {
        (SenseBank::Secondary, 2 * (line - 4))
    }
}

/// External-interrupt dispatch table
///
/// One callback slot per hardware line, all empty at construction.
/// `N` is the chip's line count (1 to 8; the mask and flag registers
/// are a single byte wide).
///
/// Every operation silently ignores line numbers `>= N`. There is no
/// error channel in this domain: an out-of-range index never corrupts
/// state and never dispatches, it just does nothing.
///
/// The slots are guarded by critical sections so registrations from the
/// main program cannot be torn by a concurrently delivered interrupt.
/// The register read-modify-write sequences are *not* guarded (matching
/// the hardware's own manipulation cost); callers that need a
/// configuration sequence to be atomic against delivery must disable
/// interrupts globally around it.
pub struct ExtIntTable<R, const N: usize> {
    regs: R,
    slots: [Mutex<Cell<Option<Callback>>>; N],
}

impl<R: ExtIntRegisters, const N: usize> ExtIntTable<R, N> {
    /// Create a table with all callback slots empty.
    pub const fn new(regs: R) -> Self {
        assert!(N <= 8, "the mask and flag registers hold at most 8 lines");
        Self {
            regs,
            slots: [const { Mutex::new(Cell::new(None)) }; N],
        }
    }

    /// Number of lines this table serves.
    pub const fn line_count(&self) -> usize {
        N
    }

    /// Select which voltage transitions on the line's pin qualify as
    /// triggering events.
    pub fn set_sense(&self, line: u8, sense: Sense) {
        if line as usize >= N {
            return;
        }
        let (bank, offset) = sense_field(line);
        self.regs
            .modify_sense(bank, |v| (v & !(0x03 << offset)) | (sense.bits() << offset));
    }

    /// Register `callback` for `line`, silently replacing any previous
    /// registration.
    ///
    /// The callback is invoked from interrupt context with no
    /// guarantees about timing relative to the main program beyond
    /// "sometime after a qualifying transition, while enabled".
    pub fn attach(&self, line: u8, callback: Callback) {
        if line as usize >= N {
            return;
        }
        critical_section::with(|cs| self.slots[line as usize].borrow(cs).set(Some(callback)));
    }

    /// Clear the callback slot for `line`.
    ///
    /// The interrupt itself keeps firing while enabled; its trampoline
    /// just finds the slot empty and returns.
    pub fn detach(&self, line: u8) {
        if line as usize >= N {
            return;
        }
        critical_section::with(|cs| self.slots[line as usize].borrow(cs).set(None));
    }

    /// Enable delivery for `line`.
    ///
    /// An event latched while the line was disabled fires immediately
    /// on enabling unless [`Self::clear_pending`] was called first.
    pub fn enable(&self, line: u8) {
        if line as usize >= N {
            return;
        }
        self.regs.modify_mask(|v| v | (1 << line));
    }

    /// Disable delivery for `line`.
    ///
    /// Qualifying events still set the pending flag while disabled;
    /// multiple events coalesce into the single flag bit.
    pub fn disable(&self, line: u8) {
        if line as usize >= N {
            return;
        }
        self.regs.modify_mask(|v| v & !(1 << line));
    }

    /// Discard a latched-but-undelivered event for `line`.
    ///
    /// The flag register is write-1-to-clear; only the addressed line
    /// is affected.
    pub fn clear_pending(&self, line: u8) {
        if line as usize >= N {
            return;
        }
        self.regs.write_flags(1 << line);
    }

    /// Invoke the callback registered for `line`, if any.
    ///
    /// This is the interrupt trampolines' entry point and the sole
    /// place the table is read in interrupt context; application code
    /// never calls it directly. The slot is copied out inside a
    /// critical section and the callback invoked outside it.
    pub fn dispatch(&self, line: u8) {
        if line as usize >= N {
            return;
        }
        let callback = critical_section::with(|cs| self.slots[line as usize].borrow(cs).get());
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Initial configuration for a line, consumed by [`ExtInt::new`]
#[derive(Debug, Clone, Copy)]
pub struct ExtIntConfig {
    /// Qualifying voltage transitions
    pub sense: Sense,
    /// Callback to attach, or `None` to leave the slot empty
    pub callback: Option<Callback>,
    /// Whether delivery is enabled right away
    pub enabled: bool,
}

impl Default for ExtIntConfig {
    fn default() -> Self {
        Self {
            sense: Sense::LowLevel,
            callback: None,
            enabled: true,
        }
    }
}

/// Convenience handle bound to one interrupt line
///
/// Bundles a line's full setup into one call and re-exposes the table
/// operations without the line argument.
///
/// Constructing a handle with an out-of-range line yields a
/// permanently-inert sentinel: no register is touched at construction
/// and every subsequent method call silently does nothing. This mirrors
/// the silent-defensive policy of the per-line table operations instead
/// of failing construction.
pub struct ExtInt<'a, R, const N: usize> {
    table: &'a ExtIntTable<R, N>,
    line: u8,
}

impl<'a, R: ExtIntRegisters, const N: usize> ExtInt<'a, R, N> {
    /// Set up `line` in one step: sense mode, callback slot, pending
    /// flag and enablement.
    ///
    /// The pending flag is always cleared, discarding any event latched
    /// between power-on and construction; callers that want to act on
    /// such an event should query the hardware before constructing the
    /// handle.
    pub fn new(table: &'a ExtIntTable<R, N>, line: u8, config: ExtIntConfig) -> Self {
        if line as usize >= N {
            return Self {
                table,
                line: INVALID_LINE,
            };
        }

        let ext = Self { table, line };
        ext.set_sense(config.sense);
        match config.callback {
            Some(callback) => ext.attach(callback),
            None => ext.detach(),
        }
        ext.clear_pending();
        if config.enabled {
            ext.enable();
        } else {
            ext.disable();
        }
        ext
    }

    /// Whether this handle is bound to a real line.
    ///
    /// `false` only for handles constructed with an out-of-range line.
    pub fn is_valid(&self) -> bool {
        (self.line as usize) < N
    }

    /// The bound line number, if the handle is valid.
    pub fn line(&self) -> Option<u8> {
        if self.is_valid() {
            Some(self.line)
        } else {
            None
        }
    }

    /// See [`ExtIntTable::set_sense`].
    pub fn set_sense(&self, sense: Sense) {
        self.table.set_sense(self.line, sense);
    }

    /// See [`ExtIntTable::attach`].
    pub fn attach(&self, callback: Callback) {
        self.table.attach(self.line, callback);
    }

    /// See [`ExtIntTable::detach`].
    pub fn detach(&self) {
        self.table.detach(self.line);
    }

    /// See [`ExtIntTable::enable`].
    pub fn enable(&self) {
        self.table.enable(self.line);
    }

    /// See [`ExtIntTable::disable`].
    pub fn disable(&self) {
        self.table.disable(self.line);
    }

    /// See [`ExtIntTable::clear_pending`].
    pub fn clear_pending(&self) {
        self.table.clear_pending(self.line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::sync::atomic::{AtomicUsize, Ordering};

    /// Mock register block mimicking the ATmega2560 layout: two sense
    /// banks, one mask byte, one write-1-to-clear flag byte.
    #[derive(Default)]
    struct MockRegs {
        sense_lo: Cell<u8>,
        sense_hi: Cell<u8>,
        mask: Cell<u8>,
        flags: Cell<u8>,
    }

    impl MockRegs {
        /// Latch an event the way the peripheral would: the flag bit
        /// sets regardless of whether delivery is enabled, and repeated
        /// events coalesce into the single bit.
        fn latch(&self, line: u8) {
            self.flags.set(self.flags.get() | (1 << line));
        }

        /// Snapshot of every register byte, for no-op assertions.
        fn snapshot(&self) -> [u8; 4] {
            [
                self.sense_lo.get(),
                self.sense_hi.get(),
                self.mask.get(),
                self.flags.get(),
            ]
        }
    }

    impl ExtIntRegisters for MockRegs {
        fn modify_sense(&self, bank: SenseBank, f: impl FnOnce(u8) -> u8) {
            let reg = match bank {
                SenseBank::Primary => &self.sense_lo,
                SenseBank::Secondary => &self.sense_hi,
            };
            reg.set(f(reg.get()));
        }

        fn modify_mask(&self, f: impl FnOnce(u8) -> u8) {
            self.mask.set(f(self.mask.get()));
        }

        fn write_flags(&self, bits: u8) {
            // write-1-to-clear
            self.flags.set(self.flags.get() & !bits);
        }
    }

    /// Deliver a latched event the way the hardware would: only if the
    /// line is enabled and pending, acknowledge the flag and run the
    /// trampoline. Returns whether delivery happened.
    fn deliver<const N: usize>(regs: &MockRegs, table: &ExtIntTable<&MockRegs, N>, line: u8) -> bool {
        let bit = 1 << line;
        if regs.mask.get() & bit == 0 || regs.flags.get() & bit == 0 {
            return false;
        }
        regs.flags.set(regs.flags.get() & !bit);
        table.dispatch(line);
        true
    }

    #[test]
    fn test_attach_then_dispatch_invokes_once() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn callback() {
            FIRED.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

        for line in 0..8 {
            table.attach(line, callback);
            let before = FIRED.load(Ordering::Relaxed);
            table.dispatch(line);
            assert_eq!(FIRED.load(Ordering::Relaxed), before + 1);
        }
    }

    #[test]
    fn test_detach_then_dispatch_is_silent() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn callback() {
            FIRED.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);

        table.attach(1, callback);
        table.detach(1);
        table.dispatch(1);
        assert_eq!(FIRED.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_empty_slot_dispatch_is_silent() {
        let regs = MockRegs::default();
        let table: ExtIntTable<_, 4> = ExtIntTable::new(&regs);
        // no registration at all; must not panic or touch registers
        table.dispatch(0);
        table.dispatch(3);
        assert_eq!(regs.snapshot(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_attach_replaces_previous_callback() {
        static FIRST: AtomicUsize = AtomicUsize::new(0);
        static SECOND: AtomicUsize = AtomicUsize::new(0);
        fn first() {
            FIRST.fetch_add(1, Ordering::Relaxed);
        }
        fn second() {
            SECOND.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);

        table.attach(0, first);
        table.attach(0, second);
        table.dispatch(0);
        assert_eq!(FIRST.load(Ordering::Relaxed), 0);
        assert_eq!(SECOND.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_sense_field_placement() {
        let regs = MockRegs::default();
        let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

        table.set_sense(0, Sense::RisingEdge);
        assert_eq!(regs.sense_lo.get(), 0b0000_0011);
        table.set_sense(3, Sense::FallingEdge);
        assert_eq!(regs.sense_lo.get(), 0b1000_0011);

        // lines 4.. land in the secondary bank at offset 2*(line-4)
        table.set_sense(5, Sense::AnyEdge);
        assert_eq!(regs.sense_hi.get(), 0b0000_0100);
        assert_eq!(regs.sense_lo.get(), 0b1000_0011, "primary bank untouched");
    }

    #[test]
    fn test_set_sense_overwrites_old_mode() {
        let regs = MockRegs::default();
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);

        table.set_sense(1, Sense::RisingEdge);
        table.set_sense(1, Sense::LowLevel);
        assert_eq!(regs.sense_lo.get(), 0);
    }

    #[test]
    fn test_enable_disable_mask_bits() {
        let regs = MockRegs::default();
        let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

        table.enable(2);
        table.enable(7);
        assert_eq!(regs.mask.get(), 0b1000_0100);

        table.disable(2);
        assert_eq!(regs.mask.get(), 0b1000_0000);

        // idempotence
        table.disable(2);
        assert_eq!(regs.mask.get(), 0b1000_0000);
        table.enable(7);
        assert_eq!(regs.mask.get(), 0b1000_0000);
    }

    #[test]
    fn test_clear_pending_only_addressed_line() {
        let regs = MockRegs::default();
        let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

        regs.latch(1);
        regs.latch(6);
        table.clear_pending(1);
        assert_eq!(regs.flags.get(), 1 << 6);

        // clearing an already-clear flag changes nothing
        table.clear_pending(1);
        assert_eq!(regs.flags.get(), 1 << 6);
    }

    #[test]
    fn test_out_of_range_lines_are_no_ops() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn callback() {
            FIRED.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);
        regs.latch(0);
        let before = regs.snapshot();

        for line in [2, 3, 7, 0xFE, 0xFF] {
            table.set_sense(line, Sense::RisingEdge);
            table.attach(line, callback);
            table.detach(line);
            table.enable(line);
            table.disable(line);
            table.clear_pending(line);
            table.dispatch(line);
        }
        assert_eq!(regs.snapshot(), before);
        assert_eq!(FIRED.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_falling_edge_button_scenario() {
        // Line 2 counts button presses (falling edges), end to end.
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        fn increment() {
            COUNTER.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

        table.set_sense(2, Sense::FallingEdge);
        table.attach(2, increment);
        table.enable(2);
        table.clear_pending(2);

        // one falling transition -> exactly one increment
        regs.latch(2);
        assert!(deliver(&regs, &table, 2));
        assert_eq!(COUNTER.load(Ordering::Relaxed), 1);

        // disabled: the transition latches but never delivers
        table.disable(2);
        regs.latch(2);
        assert!(!deliver(&regs, &table, 2));
        assert_eq!(COUNTER.load(Ordering::Relaxed), 1);

        // re-enabling without clearing fires for the stale event
        table.enable(2);
        assert!(deliver(&regs, &table, 2));
        assert_eq!(COUNTER.load(Ordering::Relaxed), 2);

        // clearing first discards the stale event instead
        table.disable(2);
        regs.latch(2);
        table.clear_pending(2);
        table.enable(2);
        assert!(!deliver(&regs, &table, 2));
        assert_eq!(COUNTER.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_coalesced_events_deliver_once() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn callback() {
            FIRED.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);
        table.attach(0, callback);

        // three transitions while disabled coalesce into one flag bit
        regs.latch(0);
        regs.latch(0);
        regs.latch(0);
        table.enable(0);
        assert!(deliver(&regs, &table, 0));
        assert!(!deliver(&regs, &table, 0));
        assert_eq!(FIRED.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_handle_full_setup() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn callback() {
            FIRED.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

        // an event latched before construction is discarded
        regs.latch(2);

        let int2 = ExtInt::new(
            &table,
            2,
            ExtIntConfig {
                sense: Sense::FallingEdge,
                callback: Some(callback),
                ..Default::default()
            },
        );
        assert!(int2.is_valid());
        assert_eq!(int2.line(), Some(2));
        assert_eq!(regs.sense_lo.get(), 0b10 << 4);
        assert_eq!(regs.mask.get(), 1 << 2);
        assert_eq!(regs.flags.get(), 0, "pre-construction event discarded");

        regs.latch(2);
        assert!(deliver(&regs, &table, 2));
        assert_eq!(FIRED.load(Ordering::Relaxed), 1);

        int2.detach();
        regs.latch(2);
        assert!(deliver(&regs, &table, 2), "interrupt still delivers");
        assert_eq!(FIRED.load(Ordering::Relaxed), 1, "but nobody is called");
    }

    #[test]
    fn test_handle_defaults() {
        let regs = MockRegs::default();
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);

        let int0 = ExtInt::new(&table, 0, ExtIntConfig::default());
        assert!(int0.is_valid());
        // defaults: low-level sense, no callback, enabled
        assert_eq!(regs.sense_lo.get(), 0);
        assert_eq!(regs.mask.get(), 1);
        table.dispatch(0); // empty slot, nothing happens
    }

    #[test]
    fn test_handle_disabled_at_construction() {
        let regs = MockRegs::default();
        regs.mask.set(0b01);
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);

        let int0 = ExtInt::new(
            &table,
            0,
            ExtIntConfig {
                enabled: false,
                ..Default::default()
            },
        );
        assert_eq!(regs.mask.get(), 0, "construction disables the line");
        int0.enable();
        assert_eq!(regs.mask.get(), 1);
    }

    #[test]
    fn test_invalid_handle_is_inert() {
        static FIRED: AtomicUsize = AtomicUsize::new(0);
        fn callback() {
            FIRED.fetch_add(1, Ordering::Relaxed);
        }

        let regs = MockRegs::default();
        regs.latch(0);
        let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);
        let before = regs.snapshot();

        let bogus = ExtInt::new(
            &table,
            2,
            ExtIntConfig {
                sense: Sense::RisingEdge,
                callback: Some(callback),
                enabled: true,
            },
        );
        assert!(!bogus.is_valid());
        assert_eq!(bogus.line(), None);
        assert_eq!(regs.snapshot(), before, "construction touched nothing");

        bogus.set_sense(Sense::AnyEdge);
        bogus.attach(callback);
        bogus.enable();
        bogus.clear_pending();
        bogus.detach();
        bogus.disable();
        assert_eq!(regs.snapshot(), before, "methods touch nothing");
        assert_eq!(FIRED.load(Ordering::Relaxed), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn out_of_range_line_never_changes_state(line in 2u8.., bits: u8) {
                static FIRED: AtomicUsize = AtomicUsize::new(0);
                fn callback() {
                    FIRED.fetch_add(1, Ordering::Relaxed);
                }

                let regs = MockRegs::default();
                let table: ExtIntTable<_, 2> = ExtIntTable::new(&regs);
                regs.latch(1);
                let before = regs.snapshot();

                table.set_sense(line, Sense::from_bits(bits));
                table.attach(line, callback);
                table.enable(line);
                table.clear_pending(line);
                table.dispatch(line);
                table.disable(line);
                table.detach(line);

                prop_assert_eq!(regs.snapshot(), before);
                prop_assert_eq!(FIRED.load(Ordering::Relaxed), 0);
            }

            #[test]
            fn sense_write_only_touches_own_field(line in 0u8..8, bits: u8) {
                let regs = MockRegs::default();
                regs.sense_lo.set(0xFF);
                regs.sense_hi.set(0xFF);
                let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

                table.set_sense(line, Sense::from_bits(bits));

                // truncation: only the low two bits of `bits` land in
                // the register, at the line's field
                let (expect_lo, expect_hi) = if line < 4 {
                    let field = 2 * line;
                    (0xFF & !(0x03 << field) | ((bits & 0x03) << field), 0xFF)
                } else {
                    let field = 2 * (line - 4);
                    (0xFF, 0xFF & !(0x03 << field) | ((bits & 0x03) << field))
                };
                prop_assert_eq!(regs.sense_lo.get(), expect_lo);
                prop_assert_eq!(regs.sense_hi.get(), expect_hi);
            }

            #[test]
            fn disable_and_clear_are_idempotent(line in 0u8..8, flags: u8, mask: u8) {
                let regs = MockRegs::default();
                regs.flags.set(flags);
                regs.mask.set(mask);
                let table: ExtIntTable<_, 8> = ExtIntTable::new(&regs);

                table.disable(line);
                let once = regs.snapshot();
                table.disable(line);
                prop_assert_eq!(regs.snapshot(), once);

                table.clear_pending(line);
                let once = regs.snapshot();
                table.clear_pending(line);
                prop_assert_eq!(regs.snapshot(), once);
            }
        }
    }
}
