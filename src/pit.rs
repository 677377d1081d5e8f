//! 8253 programmable interval timer interface
//!
//! Counter 0 has no clock of its own: it is clocked by the flip-flop the
//! board drives from the calibration timer, and its OUT pin feeds counter 1's
//! GATE through an inverter. Counters 1 and 2 run from the fixed PIT clock;
//! counter 2's OUT is the sound CPU's maskable interrupt.
//!
//! The counting logic itself is supplied by the implementor. The board only
//! drives pins and drains pin changes through [`IntervalTimer::take_outputs`].

/// Counter 0 (flip-flop clocked)
pub const COUNTER_0: usize = 0;
/// Counter 1 (gated by inverted counter 0 OUT)
pub const COUNTER_1: usize = 1;
/// Counter 2 (OUT drives the CPU IRQ)
pub const COUNTER_2: usize = 2;

/// OUT pin changes since the last drain, one slot per counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PitOutputs {
    /// New OUT levels; `None` when a counter's OUT did not change
    pub out: [Option<bool>; 3],
}

impl PitOutputs {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.out.iter().all(Option::is_none)
    }
}

/// Three-counter interval timer
pub trait IntervalTimer {
    /// Read a counter or control register (offset 0-3)
    fn read(&mut self, offset: u8) -> u8;

    /// Write a counter or control register (offset 0-3)
    fn write(&mut self, offset: u8, data: u8);

    /// Drive a counter's GATE input
    fn write_gate(&mut self, counter: usize, state: bool);

    /// Drive a counter's CLK input
    fn write_clk(&mut self, counter: usize, state: bool);

    /// Run the fixed-clock counters (1 and 2) for `ticks` PIT clocks
    fn advance(&mut self, ticks: u64);

    /// OUT changes since the last call
    fn take_outputs(&mut self) -> PitOutputs;

    /// Power-on reset
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pit_outputs_empty() {
        let mut outputs = PitOutputs::default();
        assert!(outputs.is_empty());
        outputs.out[COUNTER_2] = Some(true);
        assert!(!outputs.is_empty());
        assert_eq!(outputs.out, [None, None, Some(true)]);
    }
}
