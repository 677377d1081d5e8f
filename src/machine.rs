//! Complete 6VB board: Z80 plus [`SoundBoard`].
//!
//! The CPU is kept apart from the board so the board can be lent to the CPU
//! as its bus while it executes.

use crate::board::{CpuBus, SoundBoard};
use crate::config::BoardConfig;
use crate::constants::VOICE_COUNT;
use crate::pit::IntervalTimer;
use crate::signals::LineState;
use crate::uart::SerialUart;
use crate::voice::VoiceGenerator;
use crate::Result;

/// Sound CPU interpreter
pub trait SoundCpu {
    /// Power-on reset
    fn reset(&mut self);

    /// Execute one instruction (or interrupt entry) and return the cycles used.
    fn step<B: CpuBus>(&mut self, bus: &mut B) -> usize;

    /// Drive the non-maskable interrupt input
    fn set_nmi_line(&mut self, state: LineState);

    /// Drive the maskable interrupt input
    fn set_irq_line(&mut self, state: LineState);
}

/// The sound board with its CPU
pub struct Sente6vb<C, P, U, V> {
    cpu: C,
    board: SoundBoard<P, U, V>,
    /// CPU cycles still owed to the current run (negative = ran ahead)
    cycle_budget: f64,
}

impl<C, P, U, V> Sente6vb<C, P, U, V>
where
    C: SoundCpu,
    P: IntervalTimer,
    U: SerialUart,
    V: VoiceGenerator,
{
    /// Assemble a board and reset it.
    pub fn new(
        config: BoardConfig,
        program: &[u8],
        cpu: C,
        pit: P,
        uart: U,
        voices: [V; VOICE_COUNT],
    ) -> Result<Self> {
        let board = SoundBoard::new(config, program, pit, uart, voices)?;
        let mut machine = Self {
            cpu,
            board,
            cycle_budget: 0.0,
        };
        machine.reset();
        Ok(machine)
    }

    /// Reset CPU and board
    pub fn reset(&mut self) {
        self.board.reset();
        self.cpu.reset();
        self.cycle_budget = 0.0;
        self.forward_interrupts();
    }

    /// The board
    pub fn board(&self) -> &SoundBoard<P, U, V> {
        &self.board
    }

    /// The board (mutable)
    pub fn board_mut(&mut self) -> &mut SoundBoard<P, U, V> {
        &mut self.board
    }

    /// The CPU
    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    /// Serial data from the main board
    pub fn receive_serial(&mut self, state: bool) {
        self.board.on_external_serial_in(state);
        self.forward_interrupts();
    }

    /// Run for `seconds`, one instruction at a time, keeping board time in
    /// step with CPU cycles.
    pub fn run_for(&mut self, seconds: f64) {
        let cpu_hz = f64::from(self.board.config().cpu_clock_hz);
        self.cycle_budget += seconds.max(0.0) * cpu_hz;

        while self.cycle_budget > 0.0 {
            self.forward_interrupts();
            let cycles = self.cpu.step(&mut self.board).max(1) as f64;
            self.cycle_budget -= cycles;
            self.board.advance(cycles / cpu_hz);
        }

        self.forward_interrupts();
    }

    /// Fill `buffer` with mono samples at `sample_rate`.
    pub fn generate_samples_into(&mut self, buffer: &mut [f32], sample_rate: u32) {
        let period = 1.0 / f64::from(sample_rate.max(1));
        for sample in buffer.iter_mut() {
            self.run_for(period);
            *sample = self.board.mix_sample();
        }
    }

    /// Render `count` mono samples at `sample_rate`.
    pub fn generate_samples(&mut self, count: usize, sample_rate: u32) -> Vec<f32> {
        let mut buffer = vec![0.0; count];
        self.generate_samples_into(&mut buffer, sample_rate);
        buffer
    }

    fn forward_interrupts(&mut self) {
        if let Some((nmi, irq)) = self.board.take_interrupt_changes() {
            self.cpu.set_nmi_line(nmi);
            self.cpu.set_irq_line(irq);
        }
    }
}
