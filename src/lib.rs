//! Bally/Sente 6VB Audio Board Emulation
//!
//! A Z80-driven serial sound board built around an 8253 PIT, a 6850 UART
//! link to the game board and six CEM3394 analog voices fed from one shared
//! DAC. This crate reproduces the board's digital control logic; the CPU,
//! PIT, UART and voice chips plug in through traits.
//!
//! # Features
//! - Counter 0 chain: control register, clock flip-flop, calibration clock
//! - CEM3394 protocol: DAC latch, register select, edge-triggered chip enables
//! - Serial link: UART clocking and clock-gated NMI derivation
//! - Z80 memory and I/O decode
//! - Save states (JSON) and mono sample rendering
//!
//! # Quick start
//! ```ignore
//! use sente6vb::{BoardConfig, CpuBus, SoundBoard};
//!
//! let mut board = SoundBoard::new(BoardConfig::default(), &program, pit, uart, voices)?;
//! board.write_port(0x0C, 0x03); // select filter frequency
//! board.write_port(0x0A, 0x20); // DAC high half
//! board.write_port(0x0B, 0x00); // DAC low half
//! board.write_port(0x0E, 0x01); // enable voice 0
//! board.advance(0.001);
//! let sample = board.mix_sample();
//! ```

#![warn(missing_docs)]

pub mod board;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod control;
pub mod machine;
pub mod noise;
pub mod pit;
pub mod signals;
pub mod snapshot;
pub mod uart;
pub mod voice;

/// Error types for board construction and save states
#[derive(thiserror::Error, Debug)]
pub enum BoardError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Program image does not fit the ROM window
    #[error("Program image is {size} bytes, ROM holds {capacity}")]
    ProgramTooLarge {
        /// Image size
        size: usize,
        /// ROM window size
        capacity: usize,
    },

    /// Save state does not fit this board
    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    /// JSON encode/decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

// Public API exports
pub use board::{CpuBus, SoundBoard};
pub use calibration::CalibrationTimer;
pub use config::BoardConfig;
pub use control::{CounterControl, CounterState};
pub use machine::{Sente6vb, SoundCpu};
pub use noise::NoiseSource;
pub use pit::{IntervalTimer, PitOutputs};
pub use signals::{InterruptLines, LineState, OutputLine};
pub use snapshot::BoardSnapshot;
pub use uart::{SerialUart, SquareClock, UartOutputs};
pub use voice::{dac_to_voltage, VoiceGenerator, VoiceParameter};
