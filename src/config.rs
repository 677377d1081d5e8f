//! Board Configuration
//!
//! Clock rates and voice settings for a board instance. The defaults match
//! the production board (8 MHz crystal).

use serde::{Deserialize, Serialize};

use crate::constants::{
    CPU_CLOCK_HZ, FILTER_ZERO_FREQ, NOISE_CLOCK_HZ, PIT_CLOCK_HZ, UART_CLOCK_HZ, VCO_ZERO_FREQ,
    VOICE_ROUTE_GAIN,
};
use crate::{BoardError, Result};

/// Board configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Z80 clock in Hz
    pub cpu_clock_hz: u32,
    /// Clock of PIT channels 1 and 2 in Hz
    pub pit_clock_hz: u32,
    /// UART serial clock in Hz
    pub uart_clock_hz: u32,
    /// Noise source bit rate in Hz
    pub noise_clock_hz: u32,
    /// VCO frequency of a voice at 0 V
    pub vco_zero_freq: f64,
    /// Filter frequency of a voice at 0 V
    pub filter_zero_freq: f64,
    /// Mix gain of each voice
    pub voice_route_gain: f32,
    /// Log every voice parameter change at debug level
    pub log_voice_writes: bool,
}

impl BoardConfig {
    /// Configuration with voice-write logging switched on
    pub fn with_voice_logging(mut self, enabled: bool) -> Self {
        self.log_voice_writes = enabled;
        self
    }

    /// Check that every clock is running and the voice settings are usable.
    pub fn validate(&self) -> Result<()> {
        let clocks = [
            ("cpu_clock_hz", self.cpu_clock_hz),
            ("pit_clock_hz", self.pit_clock_hz),
            ("uart_clock_hz", self.uart_clock_hz),
            ("noise_clock_hz", self.noise_clock_hz),
        ];
        for (name, hz) in clocks {
            if hz == 0 {
                return Err(BoardError::ConfigError(format!("{name} must be non-zero")));
            }
        }

        for (name, freq) in [
            ("vco_zero_freq", self.vco_zero_freq),
            ("filter_zero_freq", self.filter_zero_freq),
        ] {
            if !freq.is_finite() || freq <= 0.0 {
                return Err(BoardError::ConfigError(format!(
                    "{name} must be a positive frequency, got {freq}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.voice_route_gain) {
            return Err(BoardError::ConfigError(format!(
                "voice_route_gain must lie in 0.0..=1.0, got {}",
                self.voice_route_gain
            )));
        }

        Ok(())
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cpu_clock_hz: CPU_CLOCK_HZ,
            pit_clock_hz: PIT_CLOCK_HZ,
            uart_clock_hz: UART_CLOCK_HZ,
            noise_clock_hz: NOISE_CLOCK_HZ,
            vco_zero_freq: VCO_ZERO_FREQ,
            filter_zero_freq: FILTER_ZERO_FREQ,
            voice_route_gain: VOICE_ROUTE_GAIN,
            log_voice_writes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.uart_clock_hz, 500_000);
        assert!(!config.log_voice_writes);
    }

    #[test]
    fn test_zero_clock_rejected() {
        let config = BoardConfig {
            uart_clock_hz: 0,
            ..BoardConfig::default()
        };
        match config.validate() {
            Err(BoardError::ConfigError(msg)) => assert!(msg.contains("uart_clock_hz")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_route_gain_rejected() {
        let config = BoardConfig {
            voice_route_gain: 1.5,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = BoardConfig::from_json(r#"{ "log_voice_writes": true }"#).unwrap();
        assert!(config.log_voice_writes);
        assert_eq!(config.cpu_clock_hz, CPU_CLOCK_HZ);

        let text = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        assert!(BoardConfig::from_json(r#"{ "vco_zero_freq": -1.0 }"#).is_err());
        assert!(BoardConfig::from_json("not json").is_err());
    }
}
