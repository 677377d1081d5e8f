//! Recording stand-ins for the board's chips.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use sente6vb::{
    BoardConfig, CpuBus, IntervalTimer, LineState, PitOutputs, SerialUart, SoundBoard, SoundCpu,
    UartOutputs, VoiceGenerator, VoiceParameter,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitCall {
    Read(u8),
    Write(u8, u8),
    Gate(usize, bool),
    Clk(usize, bool),
}

/// PIT that records pin writes. Optionally toggles counter 0 OUT on rising
/// CLK edges while gated, and raises counter 2 OUT after a number of ticks.
#[derive(Debug, Default)]
pub struct FakePit {
    pub calls: Vec<PitCall>,
    pub pending: PitOutputs,
    pub count_counter0: bool,
    pub irq_after_ticks: Option<u64>,
    pub ticks: u64,
    pub resets: usize,
    clk0: bool,
    gate0: bool,
    out0: bool,
}

impl FakePit {
    pub fn clk_writes(&self, counter: usize) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PitCall::Clk(c, state) if *c == counter => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn gate_writes(&self, counter: usize) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PitCall::Gate(c, state) if *c == counter => Some(*state),
                _ => None,
            })
            .collect()
    }
}

impl IntervalTimer for FakePit {
    fn read(&mut self, offset: u8) -> u8 {
        self.calls.push(PitCall::Read(offset));
        0x40 | offset
    }

    fn write(&mut self, offset: u8, data: u8) {
        self.calls.push(PitCall::Write(offset, data));
    }

    fn write_gate(&mut self, counter: usize, state: bool) {
        self.calls.push(PitCall::Gate(counter, state));
        if counter == 0 {
            self.gate0 = state;
        }
    }

    fn write_clk(&mut self, counter: usize, state: bool) {
        self.calls.push(PitCall::Clk(counter, state));
        if counter == 0 {
            let rising = state && !self.clk0;
            self.clk0 = state;
            if rising && self.gate0 && self.count_counter0 {
                self.out0 = !self.out0;
                self.pending.out[0] = Some(self.out0);
            }
        }
    }

    fn advance(&mut self, ticks: u64) {
        self.ticks += ticks;
        if let Some(limit) = self.irq_after_ticks {
            if self.ticks >= limit {
                self.irq_after_ticks = None;
                self.pending.out[2] = Some(true);
            }
        }
    }

    fn take_outputs(&mut self) -> PitOutputs {
        std::mem::take(&mut self.pending)
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.clk0 = false;
        self.gate0 = false;
        self.out0 = false;
    }
}

/// UART that counts clock edges and can raise its IRQ on the next TXC edge.
#[derive(Debug, Default)]
pub struct FakeUart {
    pub pending: UartOutputs,
    pub txc_edges: usize,
    pub rxc_edges: usize,
    pub rxd: Vec<bool>,
    pub writes: Vec<(u8, u8)>,
    pub reads: Vec<u8>,
    pub cts: Option<bool>,
    pub dcd: Option<bool>,
    pub resets: usize,
    pub irq_on_txc: Option<bool>,
    pub loopback: bool,
}

impl SerialUart for FakeUart {
    fn read(&mut self, offset: u8) -> u8 {
        self.reads.push(offset);
        0x80 | offset
    }

    fn write(&mut self, offset: u8, data: u8) {
        self.writes.push((offset, data));
    }

    fn write_rxd(&mut self, state: bool) {
        self.rxd.push(state);
        if self.loopback {
            self.pending.txd = Some(state);
        }
    }

    fn write_txc(&mut self, _state: bool) {
        self.txc_edges += 1;
        if let Some(irq) = self.irq_on_txc.take() {
            self.pending.irq = Some(irq);
        }
    }

    fn write_rxc(&mut self, _state: bool) {
        self.rxc_edges += 1;
    }

    fn write_cts(&mut self, state: bool) {
        self.cts = Some(state);
    }

    fn write_dcd(&mut self, state: bool) {
        self.dcd = Some(state);
    }

    fn take_outputs(&mut self) -> UartOutputs {
        std::mem::take(&mut self.pending)
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// Voice whose parameters read back the last voltage written, unless preset.
#[derive(Debug)]
pub struct FakeVoice {
    pub params: HashMap<VoiceParameter, f64>,
    pub writes: Vec<(VoiceParameter, f64)>,
    pub output_gain: f64,
    pub zero_freqs: Option<(f64, f64)>,
    pub samples: usize,
    pub last_noise: Option<f32>,
    pub level: f32,
}

impl Default for FakeVoice {
    fn default() -> Self {
        let mut params = HashMap::new();
        params.insert(VoiceParameter::FinalGain, 20.0);
        Self {
            params,
            writes: Vec::new(),
            output_gain: 0.0,
            zero_freqs: None,
            samples: 0,
            last_noise: None,
            level: 0.5,
        }
    }
}

impl FakeVoice {
    pub fn preset(&mut self, parameter: VoiceParameter, value: f64) {
        self.params.insert(parameter, value);
    }
}

impl VoiceGenerator for FakeVoice {
    fn set_voltage(&mut self, parameter: VoiceParameter, voltage: f64) {
        self.writes.push((parameter, voltage));
        self.params.insert(parameter, voltage);
    }

    fn parameter(&self, parameter: VoiceParameter) -> f64 {
        self.params.get(&parameter).copied().unwrap_or(0.0)
    }

    fn set_output_gain(&mut self, gain: f64) {
        self.output_gain = gain;
    }

    fn set_zero_frequencies(&mut self, vco_hz: f64, filter_hz: f64) {
        self.zero_freqs = Some((vco_hz, filter_hz));
    }

    fn next_sample(&mut self, noise: f32) -> f32 {
        self.samples += 1;
        self.last_noise = Some(noise);
        self.level * self.output_gain as f32
    }
}

pub type TestBoard = SoundBoard<FakePit, FakeUart, FakeVoice>;

pub fn voices() -> [FakeVoice; 6] {
    std::array::from_fn(|_| FakeVoice::default())
}

/// Board with default config and recording chips, call logs cleared.
pub fn board() -> TestBoard {
    board_with(BoardConfig::default())
}

pub fn board_with(config: BoardConfig) -> TestBoard {
    let program = [0x00u8; 16];
    let mut board = SoundBoard::new(
        config,
        &program,
        FakePit::default(),
        FakeUart::default(),
        voices(),
    )
    .expect("board");
    board.pit_mut().calls.clear();
    board
}

/// Voltage writes per voice
pub fn voice_writes(board: &TestBoard) -> Vec<Vec<(VoiceParameter, f64)>> {
    board.voices().iter().map(|v| v.writes.clone()).collect()
}

pub fn clear_voice_writes(board: &mut TestBoard) {
    for voice in board.voices_mut() {
        voice.writes.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CpuOp {
    Out(u16, u8),
    In(u16),
    Store(u16, u8),
    Load(u16),
    Idle(usize),
}

/// CPU that plays a fixed list of bus operations, then idles.
#[derive(Debug, Default)]
pub struct ScriptCpu {
    pub script: VecDeque<CpuOp>,
    pub reads: Vec<u8>,
    pub nmi: Vec<LineState>,
    pub irq: Vec<LineState>,
    pub resets: usize,
    pub cycles: u64,
}

impl ScriptCpu {
    pub fn new(ops: &[CpuOp]) -> Self {
        Self {
            script: ops.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl SoundCpu for ScriptCpu {
    fn reset(&mut self) {
        self.resets += 1;
    }

    fn step<B: CpuBus>(&mut self, bus: &mut B) -> usize {
        let cycles = match self.script.pop_front() {
            Some(CpuOp::Out(port, value)) => {
                bus.write_port(port, value);
                11
            }
            Some(CpuOp::In(port)) => {
                self.reads.push(bus.read_port(port));
                11
            }
            Some(CpuOp::Store(addr, value)) => {
                bus.write_memory(addr, value);
                13
            }
            Some(CpuOp::Load(addr)) => {
                self.reads.push(bus.read_memory(addr));
                13
            }
            Some(CpuOp::Idle(cycles)) => cycles,
            None => 4,
        };
        self.cycles += cycles as u64;
        cycles
    }

    fn set_nmi_line(&mut self, state: LineState) {
        self.nmi.push(state);
    }

    fn set_irq_line(&mut self, state: LineState) {
        self.irq.push(state);
    }
}
