//! 6VB sound board
//!
//! Owns the collaborator chips (PIT, UART, six voices), the program ROM/RAM
//! and the board's own control logic:
//!
//! - [`counter`]: counter control register, counter 0 flip-flop, calibration timer
//! - [`cem`]: DAC latch, register select and chip-enable protocol
//! - [`serial`]: UART clock, NMI derivation and the serial lines
//! - [`bus`]: Z80 memory and I/O decode
//!
//! Every operation runs to completion, including chained pin changes, before
//! it returns.

pub mod bus;
mod cem;
mod counter;
mod serial;

pub use bus::CpuBus;

use log::debug;

use crate::calibration::CalibrationTimer;
use crate::config::BoardConfig;
use crate::constants::{
    ALL_VOICES_MASK, CALIBRATION_MAX_FREQ_HZ, DAC_MAX, RAM_SIZE, ROM_SIZE, VOICE_COUNT,
};
use crate::control::CounterControl;
use crate::noise::{NoiseSource, NOISE_SEED};
use crate::pit::{IntervalTimer, COUNTER_0, COUNTER_2};
use crate::signals::{InterruptLines, LineState, OutputLine};
use crate::snapshot::BoardSnapshot;
use crate::uart::{SerialUart, SquareClock};
use crate::voice::VoiceGenerator;
use crate::{BoardError, Result};

/// Next scheduled board event
#[derive(Debug, Clone, Copy, PartialEq)]
enum BoardEvent {
    CalibrationTick(f64),
    UartEdge(f64),
}

/// The sound board minus its CPU
pub struct SoundBoard<P, U, V> {
    config: BoardConfig,
    pit: P,
    uart: U,
    voices: [V; VOICE_COUNT],
    rom: Vec<u8>,
    ram: Vec<u8>,

    // Counter 0 chain
    counter_control: CounterControl,
    counter0_ff: bool,
    counter0_out: bool,
    calibration: CalibrationTimer,

    // CEM3394 I/O
    dac_value: u16,
    dac_register: u8,
    chip_select: u8,

    // Serial link
    uart_irq: bool,
    interrupts: InterruptLines,
    send_line: OutputLine,
    clock_out_line: OutputLine,

    // Board time (seconds) and the clocks derived from it
    now: f64,
    pit_ticks: u64,
    uart_clock: SquareClock,
    noise: NoiseSource,
    noise_ticks: u64,
}

impl<P, U, V> SoundBoard<P, U, V>
where
    P: IntervalTimer,
    U: SerialUart,
    V: VoiceGenerator,
{
    /// Build a board around its chips and program image.
    ///
    /// The image is placed at 0000; an image shorter than the ROM window is
    /// padded with 0xFF.
    pub fn new(
        config: BoardConfig,
        program: &[u8],
        pit: P,
        uart: U,
        mut voices: [V; VOICE_COUNT],
    ) -> Result<Self> {
        config.validate()?;
        if program.len() > ROM_SIZE {
            return Err(BoardError::ProgramTooLarge {
                size: program.len(),
                capacity: ROM_SIZE,
            });
        }

        let mut rom = vec![0xFF; ROM_SIZE];
        rom[..program.len()].copy_from_slice(program);
        debug!("loaded {} byte sound program", program.len());

        for voice in &mut voices {
            voice.set_zero_frequencies(config.vco_zero_freq, config.filter_zero_freq);
        }

        let mut board = Self {
            config,
            pit,
            uart,
            voices,
            rom,
            ram: vec![0; RAM_SIZE],
            counter_control: CounterControl::empty(),
            counter0_ff: false,
            counter0_out: false,
            calibration: CalibrationTimer::new(),
            dac_value: 0,
            dac_register: 0,
            chip_select: ALL_VOICES_MASK,
            uart_irq: false,
            interrupts: InterruptLines::default(),
            send_line: OutputLine::new("send"),
            clock_out_line: OutputLine::new("clock_out"),
            now: 0.0,
            pit_ticks: 0,
            uart_clock: SquareClock::new(config.uart_clock_hz, 0.0),
            noise: NoiseSource::new(),
            noise_ticks: 0,
        };
        board.reset();
        Ok(board)
    }

    /// Reset the board to its power-on state.
    pub fn reset(&mut self) {
        self.pit.reset();
        self.uart.reset();
        self.uart.write_cts(false);
        self.uart.write_dcd(false);
        self.uart_irq = false;
        self.sync_uart_outputs();

        self.ram.fill(0);

        // manual counter 0 clock
        self.counter_control = CounterControl::empty();
        self.counter0_ff = false;
        self.counter0_out = false;
        self.calibration.cancel();
        self.interrupts.reset();

        // CEM3394 I/O
        self.dac_value = 0;
        self.dac_register = 0;
        self.chip_select = ALL_VOICES_MASK;

        self.now = 0.0;
        self.pit_ticks = 0;
        self.uart_clock.restart(0.0);
        self.noise.reset();
        self.noise_ticks = 0;
    }

    /// Board configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Board time in seconds since reset
    pub fn time(&self) -> f64 {
        self.now
    }

    /// PIT collaborator
    pub fn pit(&self) -> &P {
        &self.pit
    }

    /// PIT collaborator (mutable)
    pub fn pit_mut(&mut self) -> &mut P {
        &mut self.pit
    }

    /// UART collaborator
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// UART collaborator (mutable)
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Voice chips
    pub fn voices(&self) -> &[V; VOICE_COUNT] {
        &self.voices
    }

    /// Voice chips (mutable)
    pub fn voices_mut(&mut self) -> &mut [V; VOICE_COUNT] {
        &mut self.voices
    }

    /// Interrupt levels presented to the CPU
    pub fn interrupts(&self) -> InterruptLines {
        self.interrupts
    }

    /// NMI level
    pub fn nmi(&self) -> LineState {
        self.interrupts.nmi()
    }

    /// IRQ level
    pub fn irq(&self) -> LineState {
        self.interrupts.irq()
    }

    /// Interrupt levels changed since the last call
    pub fn take_interrupt_changes(&mut self) -> Option<(LineState, LineState)> {
        self.interrupts.take_changes()
    }

    /// Run board time forward, firing calibration ticks, UART clock edges and
    /// PIT clocks in time order.
    pub fn advance(&mut self, seconds: f64) {
        let target = self.now + seconds.max(0.0);

        while let Some(event) = self.next_event(target) {
            match event {
                BoardEvent::CalibrationTick(at) => {
                    self.run_pit_until(at);
                    self.now = at;
                    if self.calibration.fire_due(at) {
                        self.flip_flop_clock_tick();
                    }
                }
                BoardEvent::UartEdge(at) => {
                    self.run_pit_until(at);
                    self.now = at;
                    let state = self.uart_clock.toggle();
                    self.drive_uart_clock(state);
                }
            }
        }

        self.run_pit_until(target);
        self.now = target;
        self.catch_up_noise();
    }

    fn next_event(&self, limit: f64) -> Option<BoardEvent> {
        let calibration = self.calibration.next_fire().filter(|&at| at <= limit);
        let edge = Some(self.uart_clock.next_edge()).filter(|&at| at <= limit);

        match (calibration, edge) {
            (Some(cal), Some(edge)) if cal <= edge => Some(BoardEvent::CalibrationTick(cal)),
            (_, Some(edge)) => Some(BoardEvent::UartEdge(edge)),
            (Some(cal), None) => Some(BoardEvent::CalibrationTick(cal)),
            (None, None) => None,
        }
    }

    fn run_pit_until(&mut self, at: f64) {
        let due = (at * f64::from(self.config.pit_clock_hz)).floor() as u64;
        if due > self.pit_ticks {
            self.pit.advance(due - self.pit_ticks);
            self.pit_ticks = due;
            self.sync_pit_outputs();
        }
    }

    /// Dispatch PIT OUT changes until the chip has nothing more to report.
    fn sync_pit_outputs(&mut self) {
        loop {
            let outputs = self.pit.take_outputs();
            if outputs.is_empty() {
                break;
            }
            if let Some(state) = outputs.out[COUNTER_0] {
                self.on_counter0_out_changed(state);
            }
            if let Some(state) = outputs.out[COUNTER_2] {
                self.interrupts.set_irq(LineState::from_bool(state));
            }
        }
    }

    fn catch_up_noise(&mut self) {
        let due = (self.now * f64::from(self.config.noise_clock_hz)).floor() as u64;
        if due > self.noise_ticks {
            self.noise.advance(due - self.noise_ticks);
            self.noise_ticks = due;
        }
    }

    /// Noise source output at the current board time
    pub fn noise_level(&self) -> f32 {
        self.noise.level()
    }

    /// Mix one output sample from all six voices at the current board time.
    pub fn mix_sample(&mut self) -> f32 {
        let noise = self.noise_level();
        let gain = self.config.voice_route_gain;
        self.voices
            .iter_mut()
            .map(|voice| voice.next_sample(noise) * gain)
            .sum()
    }

    /// Capture the board's own state.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            counter_control: self.counter_control.bits(),
            counter0_ff: self.counter0_ff,
            counter0_out: self.counter0_out,
            calibration_active: self.calibration.is_active(),
            calibration_frequency: self.calibration.frequency(),
            calibration_next_fire: self.calibration.next_fire().unwrap_or(self.now),
            dac_value: self.dac_value,
            dac_register: self.dac_register,
            chip_select: self.chip_select,
            uart_irq: self.uart_irq,
            nmi: self.interrupts.nmi(),
            irq: self.interrupts.irq(),
            uart_clock_state: self.uart_clock.state(),
            uart_clock_next_edge: self.uart_clock.next_edge(),
            noise_state: self.noise.state(),
            ram: self.ram.clone(),
            time: self.now,
        }
    }

    /// Put the board back into a captured state.
    ///
    /// No pins are driven; collaborators keep whatever state they have.
    pub fn restore(&mut self, snapshot: &BoardSnapshot) -> Result<()> {
        if snapshot.ram.len() != RAM_SIZE {
            return Err(BoardError::SnapshotError(format!(
                "RAM image is {} bytes, expected {RAM_SIZE}",
                snapshot.ram.len()
            )));
        }
        if !snapshot.time.is_finite() || snapshot.time < 0.0 {
            return Err(BoardError::SnapshotError(format!(
                "invalid board time {}",
                snapshot.time
            )));
        }
        if snapshot.calibration_active
            && !(snapshot.calibration_frequency.is_finite()
                && snapshot.calibration_frequency > 0.0
                && snapshot.calibration_frequency <= CALIBRATION_MAX_FREQ_HZ
                && snapshot.calibration_next_fire >= snapshot.time)
        {
            return Err(BoardError::SnapshotError(format!(
                "armed calibration timer at {} Hz due at {}",
                snapshot.calibration_frequency, snapshot.calibration_next_fire
            )));
        }
        if !(snapshot.uart_clock_next_edge.is_finite()
            && snapshot.uart_clock_next_edge >= snapshot.time)
        {
            return Err(BoardError::SnapshotError(format!(
                "serial clock edge due at {} before board time",
                snapshot.uart_clock_next_edge
            )));
        }

        // an all-zero shift register never leaves zero
        if snapshot.noise_state & NOISE_SEED == 0 {
            return Err(BoardError::SnapshotError(format!(
                "noise register {:#x} is stuck at zero",
                snapshot.noise_state
            )));
        }

        self.now = snapshot.time;
        self.pit_ticks = (self.now * f64::from(self.config.pit_clock_hz)).floor() as u64;
        self.noise_ticks = (self.now * f64::from(self.config.noise_clock_hz)).floor() as u64;

        self.counter_control = CounterControl::from_register(snapshot.counter_control);
        self.counter0_ff = snapshot.counter0_ff;
        self.counter0_out = snapshot.counter0_out;
        if snapshot.calibration_active {
            self.calibration
                .resume(snapshot.calibration_frequency, snapshot.calibration_next_fire);
        } else {
            self.calibration.cancel();
        }

        self.dac_value = snapshot.dac_value & DAC_MAX;
        self.dac_register = snapshot.dac_register & 0x07;
        self.chip_select = snapshot.chip_select & ALL_VOICES_MASK;

        self.uart_irq = snapshot.uart_irq;
        self.interrupts.set_nmi(snapshot.nmi);
        self.interrupts.set_irq(snapshot.irq);
        self.uart_clock
            .resume(snapshot.uart_clock_state, snapshot.uart_clock_next_edge);

        self.noise = NoiseSource::from_state(snapshot.noise_state);
        self.ram.copy_from_slice(&snapshot.ram);

        debug!("restored board state at t={:.6}s", self.now);
        Ok(())
    }
}
