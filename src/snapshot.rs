//! Save states
//!
//! A [`BoardSnapshot`] holds everything the board logic itself owns. The
//! PIT, UART and voice chips save their own state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::signals::LineState;
use crate::Result;

/// Serializable board state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Counter control register
    pub counter_control: u8,
    /// Counter 0 flip-flop output
    pub counter0_ff: bool,
    /// Counter 0 OUT level
    pub counter0_out: bool,
    /// Whether the calibration clock was running
    pub calibration_active: bool,
    /// Calibration clock frequency (Hz)
    pub calibration_frequency: f64,
    /// Board time of the next calibration tick
    pub calibration_next_fire: f64,
    /// DAC latch (12 bits)
    pub dac_value: u16,
    /// CEM register select (3 bits)
    pub dac_register: u8,
    /// CEM chip enable mask (6 bits)
    pub chip_select: u8,
    /// Latched UART interrupt request
    pub uart_irq: bool,
    /// NMI level
    pub nmi: LineState,
    /// IRQ level
    pub irq: LineState,
    /// Serial clock level
    pub uart_clock_state: bool,
    /// Board time of the next serial clock edge
    pub uart_clock_next_edge: f64,
    /// Noise shift register
    pub noise_state: u32,
    /// Option + program RAM
    pub ram: Vec<u8>,
    /// Board time (seconds)
    pub time: f64,
}

impl BoardSnapshot {
    /// Encode as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to a file as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
