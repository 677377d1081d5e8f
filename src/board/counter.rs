//! Counter 0 chain
//!
//! Counter 0 of the PIT is clocked through a D flip-flop whose clock comes
//! from the voice chips during calibration. The flip-flop output is inverted
//! onto counter 0's CLK, and counter 0's OUT is inverted onto counter 1's
//! GATE.

use log::trace;

use super::SoundBoard;
use crate::calibration::calibration_frequency;
use crate::control::{CounterControl, CounterState, FlipFlopForce};
use crate::pit::{IntervalTimer, COUNTER_0, COUNTER_1};
use crate::signals::LineState;
use crate::uart::SerialUart;
use crate::voice::VoiceGenerator;

impl<P, U, V> SoundBoard<P, U, V>
where
    P: IntervalTimer,
    U: SerialUart,
    V: VoiceGenerator,
{
    /// Counter control write (port 08).
    ///
    /// Side effects follow from the bits that changed, except the counter 0
    /// gate and the flip-flop clear/preset, which are applied on every write.
    pub fn set_control(&mut self, data: u8) {
        let new = CounterControl::from_register(data);
        let diff = self.counter_control.changed(new);
        self.counter_control = new;

        // D0 enables/disables audio
        if diff.contains(CounterControl::AUDIO_ENABLE) {
            let gain = if new.audio_enabled() { 1.0 } else { 0.0 };
            for voice in &mut self.voices {
                voice.set_output_gain(gain);
            }
        }

        // D1 gates counter 0; gating on starts the calibration clock
        if diff.contains(CounterControl::COUNTER0_GATE) {
            if new.gate() && !self.calibration.is_active() {
                self.recompute_calibration_frequency();
            } else if !new.gate() && self.calibration.is_active() {
                self.calibration.cancel();
                trace!("calibration clock stopped");
            }
        }

        self.pit.write_gate(COUNTER_0, new.gate());
        self.sync_pit_outputs();

        // D2/D4 preset/clear the flip-flop
        match new.flip_flop_force() {
            FlipFlopForce::Clear => self.set_flip_flop(false),
            FlipFlopForce::Preset => self.set_flip_flop(true),
            FlipFlopForce::Released => {}
        }

        // D5 falling clears the NMI
        if diff.contains(CounterControl::NMI_ENABLE) && !new.nmi_enabled() {
            self.interrupts.set_nmi(LineState::Clear);
        }
    }

    /// Current counter control register
    pub fn control(&self) -> CounterControl {
        self.counter_control
    }

    /// Calibration clock tick: latch D3 through the flip-flop.
    pub fn flip_flop_clock_tick(&mut self) {
        self.set_flip_flop(self.counter_control.ff_data());
    }

    /// Drive the flip-flop output.
    ///
    /// The output reaches counter 0's CLK inverted, so high-to-low is a
    /// rising clock. The CLK pin is rewritten on every call.
    pub fn set_flip_flop(&mut self, state: bool) {
        self.pit.write_clk(COUNTER_0, !state);
        self.counter0_ff = state;
        self.sync_pit_outputs();
    }

    /// Flip-flop output level
    pub fn flip_flop(&self) -> bool {
        self.counter0_ff
    }

    /// Counter 0 OUT changed; it reaches counter 1's GATE through an inverter.
    pub fn on_counter0_out_changed(&mut self, state: bool) {
        self.pit.write_gate(COUNTER_1, !state);
        self.counter0_out = state;
        self.sync_pit_outputs();
    }

    /// Last counter 0 OUT level
    pub fn counter0_out(&self) -> bool {
        self.counter0_out
    }

    /// Counter state read (port 08): D0 = !flip-flop, D1 = counter 0 OUT.
    pub fn read_state(&self) -> u8 {
        CounterState::new(self.counter0_ff, self.counter0_out).bits()
    }

    /// Re-pick the calibration clock from the voices and restart it.
    ///
    /// Any running schedule is dropped first; the clock stays stopped when no
    /// voice is being calibrated.
    pub fn recompute_calibration_frequency(&mut self) {
        self.calibration.cancel();

        match calibration_frequency(&self.voices) {
            Some(freq) => {
                self.calibration.start(self.now, freq);
                trace!("calibration clock at {freq:.3} Hz");
            }
            None => trace!("no voice under calibration"),
        }
    }

    /// Whether the calibration clock is running
    pub fn calibration_active(&self) -> bool {
        self.calibration.is_active()
    }

    /// Frequency of the calibration clock while it runs
    pub fn calibration_frequency(&self) -> Option<f64> {
        self.calibration
            .is_active()
            .then(|| self.calibration.frequency())
    }
}
