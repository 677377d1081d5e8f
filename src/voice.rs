//! CEM3394 voice interface
//!
//! The six voice chips are analog synthesizers driven by control voltages.
//! The board only converts the shared DAC latch to a voltage and routes it to
//! one of eight parameters; the analog model lives behind
//! [`VoiceGenerator`].

use std::fmt;

use crate::constants::{DAC_MAX, DAC_OFFSET_VOLTS, DAC_SPAN_VOLTS, DAC_STEPS};

/// Voice chip parameter addressed by the register-select latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceParameter {
    /// VCO frequency
    VcoFrequency,
    /// Final output gain
    FinalGain,
    /// Filter resonance
    FilterResonance,
    /// Filter cutoff frequency
    FilterFrequency,
    /// Mixer balance
    MixerBalance,
    /// Modulation depth
    ModulationAmount,
    /// Pulse width
    PulseWidth,
    /// Waveform selection
    WaveSelect,
}

/// Register-select index (0-7) to voice parameter
pub const REGISTER_MAP: [VoiceParameter; 8] = [
    VoiceParameter::VcoFrequency,
    VoiceParameter::FinalGain,
    VoiceParameter::FilterResonance,
    VoiceParameter::FilterFrequency,
    VoiceParameter::MixerBalance,
    VoiceParameter::ModulationAmount,
    VoiceParameter::PulseWidth,
    VoiceParameter::WaveSelect,
];

impl VoiceParameter {
    /// Parameter selected by a register-select value (low 3 bits)
    pub fn from_register(register: u8) -> Self {
        REGISTER_MAP[(register & 0x07) as usize]
    }

    /// Diagnostic name
    pub fn name(self) -> &'static str {
        match self {
            VoiceParameter::VcoFrequency => "VCO_FREQUENCY",
            VoiceParameter::FinalGain => "FINAL_GAIN",
            VoiceParameter::FilterResonance => "FILTER_RESONANCE",
            VoiceParameter::FilterFrequency => "FILTER_FREQUENCY",
            VoiceParameter::MixerBalance => "MIXER_BALANCE",
            VoiceParameter::ModulationAmount => "MODULATION_AMOUNT",
            VoiceParameter::PulseWidth => "PULSE_WIDTH",
            VoiceParameter::WaveSelect => "WAVE_SELECT",
        }
    }
}

impl fmt::Display for VoiceParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a 12-bit DAC latch value to its output voltage (-4 V .. +4 V).
#[inline]
pub fn dac_to_voltage(value: u16) -> f64 {
    f64::from(value & DAC_MAX) * (DAC_SPAN_VOLTS / DAC_STEPS) + DAC_OFFSET_VOLTS
}

/// One analog voice chip
pub trait VoiceGenerator {
    /// Apply a control voltage to a parameter
    fn set_voltage(&mut self, parameter: VoiceParameter, voltage: f64);

    /// Current value of a parameter in the chip's own units (Hz for frequencies)
    fn parameter(&self, parameter: VoiceParameter) -> f64;

    /// Output gain applied after the voice (1.0 audio on, 0.0 muted)
    fn set_output_gain(&mut self, gain: f64);

    /// Frequencies of the VCO and filter at 0 V
    fn set_zero_frequencies(&mut self, vco_hz: f64, filter_hz: f64);

    /// Produce the next output sample, given the noise input level
    fn next_sample(&mut self, noise: f32) -> f32;
}
