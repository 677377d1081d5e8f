//! Counter Control Register
//!
//! Port 08 (write) drives the audio enable, the gate of PIT counter 0, the
//! flip-flop feeding counter 0's clock and the NMI enable. Port 08 (read)
//! reports the flip-flop and counter 0's OUT pin.
//!
//! | Bit | Meaning |
//! |-----|---------|
//! | 0   | Audio enable |
//! | 1   | GATE of counter 0 (active high) |
//! | 2   | PRESET of the counter 0 flip-flop (active low) |
//! | 3   | D input of the counter 0 flip-flop |
//! | 4   | CLEAR of the counter 0 flip-flop (active low) |
//! | 5   | NMI enable (1 = enabled, 0 = disabled/clear) |

use bitflags::bitflags;

bitflags! {
    /// Counter control register (port 08 write)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CounterControl: u8 {
        /// Audio output enable
        const AUDIO_ENABLE = 0x01;
        /// Gate of counter 0, also arms the calibration timer
        const COUNTER0_GATE = 0x02;
        /// Flip-flop preset (active low)
        const FF_PRESET_N = 0x04;
        /// Flip-flop D input
        const FF_DATA = 0x08;
        /// Flip-flop clear (active low)
        const FF_CLEAR_N = 0x10;
        /// NMI enable
        const NMI_ENABLE = 0x20;
    }
}

/// Level forced onto the flip-flop by its asynchronous inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipFlopForce {
    /// CLEAR asserted: output low
    Clear,
    /// PRESET asserted: output high
    Preset,
    /// Neither asserted: output follows the clock
    Released,
}

impl CounterControl {
    /// Wrap a raw register byte. Bits 6-7 are kept so the register reads back as written.
    pub fn from_register(value: u8) -> Self {
        CounterControl::from_bits_retain(value)
    }

    /// Bits that differ between two register values
    pub fn changed(self, next: Self) -> Self {
        self.symmetric_difference(next)
    }

    /// Whether audio output is enabled
    pub fn audio_enabled(self) -> bool {
        self.contains(CounterControl::AUDIO_ENABLE)
    }

    /// Whether counter 0's gate is high
    pub fn gate(self) -> bool {
        self.contains(CounterControl::COUNTER0_GATE)
    }

    /// Flip-flop D input
    pub fn ff_data(self) -> bool {
        self.contains(CounterControl::FF_DATA)
    }

    /// Whether the NMI is enabled
    pub fn nmi_enabled(self) -> bool {
        self.contains(CounterControl::NMI_ENABLE)
    }

    /// CLEAR wins over PRESET; both are active low.
    pub fn flip_flop_force(self) -> FlipFlopForce {
        if !self.contains(CounterControl::FF_CLEAR_N) {
            FlipFlopForce::Clear
        } else if !self.contains(CounterControl::FF_PRESET_N) {
            FlipFlopForce::Preset
        } else {
            FlipFlopForce::Released
        }
    }
}

bitflags! {
    /// Counter state (port 08 read)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CounterState: u8 {
        /// Inverse of the flip-flop feeding counter 0
        const FF_INVERTED = 0x01;
        /// OUT pin of counter 0
        const COUNTER0_OUT = 0x02;
    }
}

impl CounterState {
    /// Assemble the read value from the flip-flop and counter 0 OUT levels
    pub fn new(flip_flop: bool, counter0_out: bool) -> Self {
        let mut state = CounterState::empty();
        state.set(CounterState::FF_INVERTED, !flip_flop);
        state.set(CounterState::COUNTER0_OUT, counter0_out);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_bits() {
        let old = CounterControl::from_register(0b0010_0011);
        let new = CounterControl::from_register(0b0000_0010);
        let diff = old.changed(new);
        assert_eq!(diff.bits(), 0b0010_0001);
        assert!(diff.contains(CounterControl::NMI_ENABLE));
        assert!(!diff.contains(CounterControl::COUNTER0_GATE));
    }

    #[test]
    fn test_flip_flop_force_priority() {
        assert_eq!(
            CounterControl::from_register(0x00).flip_flop_force(),
            FlipFlopForce::Clear
        );
        // CLEAR low overrides PRESET low
        assert_eq!(
            CounterControl::from_register(0x04).flip_flop_force(),
            FlipFlopForce::Clear
        );
        assert_eq!(
            CounterControl::from_register(0x10).flip_flop_force(),
            FlipFlopForce::Preset
        );
        assert_eq!(
            CounterControl::from_register(0x14).flip_flop_force(),
            FlipFlopForce::Released
        );
    }

    #[test]
    fn test_upper_bits_retained() {
        assert_eq!(CounterControl::from_register(0xC0).bits(), 0xC0);
    }

    #[test]
    fn test_counter_state_bits() {
        assert_eq!(CounterState::new(false, false).bits(), 0x01);
        assert_eq!(CounterState::new(true, false).bits(), 0x00);
        assert_eq!(CounterState::new(true, true).bits(), 0x02);
        assert_eq!(CounterState::new(false, true).bits(), 0x03);
    }
}
