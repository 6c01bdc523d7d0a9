//! Interrupt status bits and dispatch bookkeeping.

use crate::registers::FIFO_DEPTH;

/// Bits of `STATUS` / `EN_INT` that carry recognized interrupt sources.
pub const INTERRUPT_MASK: u32 = 0xF0_0F00;

/// Interrupt sources reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interrupt {
    /// ECG FIFO reached its threshold.
    Eint,
    /// ECG FIFO overflowed.
    Eovf,
    /// Fast recovery engaged.
    Fstint,
    /// DC lead-off detected.
    Dcloffint,
    /// Ultra-low-power lead-on detected.
    Lonint,
    /// R-to-R interval ready.
    Rrint,
    /// Sample synchronization pulse.
    Samp,
    /// PLL lost lock.
    Pllint,
}

impl Interrupt {
    /// All sources in the order they are dispatched.
    pub const ALL: [Self; 8] = [
        Self::Eint,
        Self::Eovf,
        Self::Fstint,
        Self::Dcloffint,
        Self::Lonint,
        Self::Rrint,
        Self::Samp,
        Self::Pllint,
    ];

    /// Bit mask of the source within `STATUS`.
    pub const fn bit(self) -> u32 {
        match self {
            Self::Eint => 1 << 23,
            Self::Eovf => 1 << 22,
            Self::Fstint => 1 << 21,
            Self::Dcloffint => 1 << 20,
            Self::Lonint => 1 << 11,
            Self::Rrint => 1 << 10,
            Self::Samp => 1 << 9,
            Self::Pllint => 1 << 8,
        }
    }
}

/// Set of asserted and enabled interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptFlags(u32);

impl InterruptFlags {
    /// Empty set.
    pub const NONE: Self = Self(0);

    /// Builds a set from raw bits; bits outside [`INTERRUPT_MASK`] are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & INTERRUPT_MASK)
    }

    /// Combines raw `STATUS` and `EN_INT` values: a source counts only when it
    /// is both active and enabled.
    pub const fn from_registers(status: u32, enable: u32) -> Self {
        Self::from_bits(status & enable)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, interrupt: Interrupt) -> bool {
        self.0 & interrupt.bit() != 0
    }

    /// Returns a copy with `interrupt` added.
    pub const fn with(self, interrupt: Interrupt) -> Self {
        Self(self.0 | interrupt.bit())
    }

    /// Asserted sources in dispatch order.
    pub fn iter(self) -> impl Iterator<Item = Interrupt> {
        Interrupt::ALL
            .into_iter()
            .filter(move |interrupt| self.contains(*interrupt))
    }
}

impl From<Interrupt> for InterruptFlags {
    fn from(interrupt: Interrupt) -> Self {
        Self(interrupt.bit())
    }
}

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchReport {
    /// Every source that was asserted and enabled, handled or not.
    pub flags: InterruptFlags,
    /// Number of samples written to the drain buffer (0 or [`FIFO_DEPTH`]).
    pub drained: usize,
    /// Whether the FIFO was reset in response to an overflow.
    pub fifo_reset: bool,
}

impl DispatchReport {
    pub(crate) const fn new(flags: InterruptFlags) -> Self {
        Self {
            flags,
            drained: 0,
            fifo_reset: false,
        }
    }

    pub(crate) fn record_drain(&mut self) {
        self.drained = FIFO_DEPTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_active_yields_empty_set() {
        let flags = InterruptFlags::from_registers(0x00_0000, 0xFF_FFFF);
        assert!(flags.is_empty());
        assert_eq!(flags.iter().count(), 0);
    }

    #[test]
    fn only_enabled_sources_survive() {
        let flags = InterruptFlags::from_registers(0xFF_FFFF, 0x80_0000);
        assert_eq!(flags.bits(), 0x80_0000);
        assert!(flags.contains(Interrupt::Eint));
        assert!(!flags.contains(Interrupt::Eovf));
    }

    #[test]
    fn lead_off_comparator_bits_are_masked() {
        let flags = InterruptFlags::from_registers(0xFF_FFFF, 0xFF_FFFF);
        assert_eq!(flags.bits(), INTERRUPT_MASK);
        assert_eq!(flags.iter().count(), 8);
    }

    #[test]
    fn iteration_follows_dispatch_order() {
        let flags = InterruptFlags::from(Interrupt::Pllint)
            .with(Interrupt::Eovf)
            .with(Interrupt::Rrint)
            .with(Interrupt::Eint);
        let mut order = flags.iter();
        assert_eq!(order.next(), Some(Interrupt::Eint));
        assert_eq!(order.next(), Some(Interrupt::Eovf));
        assert_eq!(order.next(), Some(Interrupt::Rrint));
        assert_eq!(order.next(), Some(Interrupt::Pllint));
        assert_eq!(order.next(), None);
    }

    #[test]
    fn bit_positions_cover_the_mask() {
        let union = Interrupt::ALL.iter().fold(0, |acc, i| acc | i.bit());
        assert_eq!(union, INTERRUPT_MASK);
    }
}
