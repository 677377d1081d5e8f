//! Counter 0 calibration clock
//!
//! On the real board counter 0 is clocked by analog feedback from the voice
//! chips while the firmware calibrates them. Here a periodic timer stands in
//! for that feedback, running at the frequency of whichever voice is being
//! calibrated.

use crate::constants::{
    CALIBRATION_GAIN_THRESHOLD, CALIBRATION_MAX_FREQ_HZ, CALIBRATION_RESONANCE_THRESHOLD,
};
use crate::voice::{VoiceGenerator, VoiceParameter};

/// Frequency the calibration clock should run at, if any voice is being calibrated.
///
/// A voice is being calibrated while its final gain reads below
/// [`CALIBRATION_GAIN_THRESHOLD`]. High resonance means the filter is being
/// measured, otherwise the VCO. The fastest such voice wins. Non-finite
/// readings are ignored and the result is capped at [`CALIBRATION_MAX_FREQ_HZ`].
pub fn calibration_frequency<V: VoiceGenerator>(voices: &[V]) -> Option<f64> {
    let mut max_freq = 0.0;

    for voice in voices {
        if voice.parameter(VoiceParameter::FinalGain) >= CALIBRATION_GAIN_THRESHOLD {
            continue;
        }

        let freq = if voice.parameter(VoiceParameter::FilterResonance)
            > CALIBRATION_RESONANCE_THRESHOLD
        {
            voice.parameter(VoiceParameter::FilterFrequency)
        } else {
            voice.parameter(VoiceParameter::VcoFrequency)
        };

        if freq.is_finite() && freq > max_freq {
            max_freq = freq.min(CALIBRATION_MAX_FREQ_HZ);
        }
    }

    (max_freq > 0.0).then_some(max_freq)
}

/// Periodic timer with cancel-and-restart semantics.
///
/// Times are absolute board seconds. The first tick lands one period after
/// `start`, then every period after that.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationTimer {
    frequency: f64,
    next_fire: Option<f64>,
}

impl CalibrationTimer {
    /// A disarmed timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm at `frequency` Hz from time `now`, discarding any previous schedule.
    ///
    /// Stays disarmed when the period is too short to move past `now`.
    pub fn start(&mut self, now: f64, frequency: f64) {
        self.frequency = frequency;
        let next = now + 1.0 / frequency;
        self.next_fire = (next > now).then_some(next);
    }

    /// Arm with an explicit time for the next tick (snapshot restore)
    pub fn resume(&mut self, frequency: f64, next_fire: f64) {
        self.frequency = frequency;
        self.next_fire = Some(next_fire);
    }

    /// Disarm
    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    /// Whether the timer is armed
    pub fn is_active(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Tick frequency of the current (or last) schedule
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Absolute time of the next tick
    pub fn next_fire(&self) -> Option<f64> {
        self.next_fire
    }

    /// Consume the tick due at or before `now`; returns whether one was due.
    pub fn fire_due(&mut self, now: f64) -> bool {
        match self.next_fire {
            Some(at) if at <= now => {
                // a schedule that cannot advance is dropped after this tick
                let next = at + 1.0 / self.frequency;
                self.next_fire = (next > at).then_some(next);
                true
            }
            _ => false,
        }
    }
}
