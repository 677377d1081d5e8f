//! MM5837 noise source
//!
//! 17-bit linear feedback shift register shared by all six voices as their
//! modulation input.

/// Register contents after power-on
pub const NOISE_SEED: u32 = 0x1FFFF;

/// Pseudo-random bitstream generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseSource {
    state: u32,
}

impl NoiseSource {
    /// Create a seeded noise source
    pub fn new() -> Self {
        Self { state: NOISE_SEED }
    }

    /// Rebuild a noise source from a saved register value
    pub fn from_state(state: u32) -> Self {
        Self {
            state: state & NOISE_SEED,
        }
    }

    /// Raw shift register
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Current output bit
    pub fn bit(&self) -> bool {
        self.state & 1 != 0
    }

    /// Current output level (1.0 or 0.0)
    pub fn level(&self) -> f32 {
        if self.bit() {
            1.0
        } else {
            0.0
        }
    }

    /// Shift one bit; returns the bit that was on the output before the shift.
    pub fn clock(&mut self) -> bool {
        let out = self.bit();
        let feedback = (self.state ^ (self.state >> 3)) & 1;
        self.state = (self.state >> 1) | (feedback << 16);
        out
    }

    /// Shift `count` bits
    pub fn advance(&mut self, count: u64) {
        for _ in 0..count {
            self.clock();
        }
    }

    /// Back to the power-on seed
    pub fn reset(&mut self) {
        self.state = NOISE_SEED;
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_bits_from_seed() {
        let mut noise = NoiseSource::new();
        // All ones: feedback is 1^1 = 0 for the first shift
        assert!(noise.clock());
        assert_eq!(noise.state(), 0x0FFFF);
        assert_eq!(noise.level(), 1.0);
    }

    #[test]
    fn test_stays_within_17_bits() {
        let mut noise = NoiseSource::new();
        for _ in 0..10_000 {
            noise.clock();
            assert!(noise.state() <= NOISE_SEED);
            assert_ne!(noise.state(), 0, "LFSR must never lock up at zero");
        }
    }

    #[test]
    fn test_produces_both_levels() {
        let mut noise = NoiseSource::new();
        let ones = (0..4096).filter(|_| noise.clock()).count();
        assert!(ones > 1000 && ones < 3000, "ones = {ones}");
    }

    #[test]
    fn test_from_state_masks_and_reset() {
        let mut noise = NoiseSource::from_state(0xFFFF_FFFF);
        assert_eq!(noise.state(), NOISE_SEED);
        noise.advance(5);
        noise.reset();
        assert_eq!(noise, NoiseSource::new());
    }
}
