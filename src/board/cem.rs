//! CEM3394 parameter protocol
//!
//! A single 12-bit DAC is shared by all six voices. Firmware latches a value
//! and a parameter index, then raises a voice's chip enable; the rising edge
//! applies the DAC voltage to that voice's selected parameter.

use log::debug;

use super::SoundBoard;
use crate::constants::ALL_VOICES_MASK;
use crate::pit::IntervalTimer;
use crate::uart::SerialUart;
use crate::voice::{dac_to_voltage, VoiceGenerator, VoiceParameter};

impl<P, U, V> SoundBoard<P, U, V>
where
    P: IntervalTimer,
    U: SerialUart,
    V: VoiceGenerator,
{
    /// Chip enable write (port 0E). Only 0 -> 1 transitions apply the DAC.
    pub fn write_chip_select(&mut self, data: u8) {
        let data = data & ALL_VOICES_MASK;
        let voltage = dac_to_voltage(self.dac_value);
        let parameter = VoiceParameter::from_register(self.dac_register);
        let rising = (data ^ self.chip_select) & data;

        self.chip_select = data;

        for (index, voice) in self.voices.iter_mut().enumerate() {
            if rising & (1 << index) == 0 {
                continue;
            }

            let previous = voice.parameter(parameter);
            voice.set_voltage(parameter, voltage);

            if self.config.log_voice_writes && voice.parameter(parameter) != previous {
                debug!("CEM#{index}:{parameter}={voltage:.6}");
            }
        }

        // the reference voice for the calibration clock may have changed;
        // while counter 0 is gated a voice entering calibration starts the clock
        if self.calibration.is_active() || self.counter_control.gate() {
            self.recompute_calibration_frequency();
        }
    }

    /// DAC latch write (ports 0A/0B). Odd offsets load the low six bits from
    /// data bits 7-2, even offsets the high six bits from data bits 5-0.
    ///
    /// Unless every voice is enabled, the enabled voices are re-selected so
    /// they pick up the new value without a fresh enable edge.
    pub fn write_dac_half(&mut self, offset: u8, data: u8) {
        if offset & 1 != 0 {
            self.dac_value = (self.dac_value & 0xFC0) | (u16::from(data >> 2) & 0x03F);
        } else {
            self.dac_value = (self.dac_value & 0x03F) | ((u16::from(data) << 6) & 0xFC0);
        }

        if self.chip_select & ALL_VOICES_MASK != ALL_VOICES_MASK {
            let enabled = self.chip_select;
            self.write_chip_select(0x00);
            self.write_chip_select(enabled);
        }
    }

    /// Register select write (port 0C)
    pub fn write_register_select(&mut self, data: u8) {
        self.dac_register = data & 0x07;
    }

    /// Latched DAC value (0-4095)
    pub fn dac_value(&self) -> u16 {
        self.dac_value
    }

    /// Latched register index (0-7)
    pub fn register_select(&self) -> u8 {
        self.dac_register
    }

    /// Chip enable mask
    pub fn chip_select(&self) -> u8 {
        self.chip_select
    }
}
