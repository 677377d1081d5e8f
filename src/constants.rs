//! Board Constants
//!
//! Clocks, address windows and thresholds shared by the board components.

/// Board master crystal (8 MHz)
pub const MASTER_CLOCK_HZ: u32 = 8_000_000;

/// Z80 clock (crystal / 2)
pub const CPU_CLOCK_HZ: u32 = MASTER_CLOCK_HZ / 2;

/// Clock feeding PIT channels 1 and 2 (crystal / 4)
pub const PIT_CLOCK_HZ: u32 = MASTER_CLOCK_HZ / 4;

/// Serial clock driving the UART TXC/RXC inputs (crystal / 16)
pub const UART_CLOCK_HZ: u32 = MASTER_CLOCK_HZ / 16;

/// Bit rate of the noise source feeding the voices
pub const NOISE_CLOCK_HZ: u32 = 100_000;

/// Number of CEM3394 voice chips on the board
pub const VOICE_COUNT: usize = 6;

/// Chip-enable mask with every voice selected
pub const ALL_VOICES_MASK: u8 = 0x3F;

/// VCO frequency of a voice at zero control voltage
pub const VCO_ZERO_FREQ: f64 = 431.894;

/// Filter cutoff of a voice at zero control voltage
pub const FILTER_ZERO_FREQ: f64 = 1300.0;

/// Mix level of each voice into the mono output
pub const VOICE_ROUTE_GAIN: f32 = 0.90;

/// Full-scale count of the 12-bit DAC
pub const DAC_STEPS: f64 = 4096.0;

/// DAC output span in volts (-4 V .. +4 V)
pub const DAC_SPAN_VOLTS: f64 = 8.0;

/// DAC output offset in volts
pub const DAC_OFFSET_VOLTS: f64 = -4.0;

/// Largest value the 12-bit DAC latch can hold
pub const DAC_MAX: u16 = 0x0FFF;

/// A voice whose final gain parameter reads below this is being calibrated.
///
/// The value sits far above any real gain reading; it is kept literally.
pub const CALIBRATION_GAIN_THRESHOLD: f64 = 10.0;

/// Above this resonance the firmware is calibrating the filter, not the VCO
pub const CALIBRATION_RESONANCE_THRESHOLD: f64 = 0.9;

/// Ceiling for the calibration clock; counter 0 cannot follow anything faster
/// than the PIT's own input clock
pub const CALIBRATION_MAX_FREQ_HZ: f64 = PIT_CLOCK_HZ as f64;

/// Program ROM window (0000-1FFF)
pub const ROM_SIZE: usize = 0x2000;

/// Option RAM + program RAM window (2000-5FFF)
pub const RAM_START: u16 = 0x2000;
/// Size of the RAM window
pub const RAM_SIZE: usize = 0x4000;

/// UART write window (6000-7FFF, register selected by A0)
pub const UART_WRITE_START: u16 = 0x6000;
/// Last address of the UART write window
pub const UART_WRITE_END: u16 = 0x7FFF;

/// UART read window (E000-FFFF, register selected by A0)
pub const UART_READ_START: u16 = 0xE000;

/// Value returned by unmapped reads
pub const OPEN_BUS: u8 = 0xFF;

// I/O ports (low 8 bits of the port address)
/// PIT registers (00-03)
pub const PORT_PIT_END: u8 = 0x03;
/// Counter state read / control write
pub const PORT_COUNTER: u8 = 0x08;
/// DAC latch, high half (0A) and low half (0B)
pub const PORT_DAC: u8 = 0x0A;
/// CEM register select
pub const PORT_REGISTER_SELECT: u8 = 0x0C;
/// CEM chip enable
pub const PORT_CHIP_SELECT: u8 = 0x0E;
/// Last port of the counter-state read mirror
pub const PORT_COUNTER_END: u8 = 0x0F;
