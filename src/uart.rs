//! 6850 ACIA interface and serial clock
//!
//! The UART links the sound board to the game board. Its bit-level framing
//! is the implementor's business; the board feeds it clock edges and the
//! receive line, and collects TXD and IRQ pin changes.

/// Pin changes since the last drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UartOutputs {
    /// New transmit-data level
    pub txd: Option<bool>,
    /// New interrupt-request level (true = requesting)
    pub irq: Option<bool>,
}

impl UartOutputs {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.txd.is_none() && self.irq.is_none()
    }
}

/// Asynchronous serial interface
pub trait SerialUart {
    /// Read status (offset 0) or receive data (offset 1)
    fn read(&mut self, offset: u8) -> u8;

    /// Write control (offset 0) or transmit data (offset 1)
    fn write(&mut self, offset: u8, data: u8);

    /// Receive-data input
    fn write_rxd(&mut self, state: bool);

    /// Transmit clock input
    fn write_txc(&mut self, state: bool);

    /// Receive clock input
    fn write_rxc(&mut self, state: bool);

    /// Clear-to-send input
    fn write_cts(&mut self, state: bool);

    /// Data-carrier-detect input
    fn write_dcd(&mut self, state: bool);

    /// TXD/IRQ changes since the last call
    fn take_outputs(&mut self) -> UartOutputs;

    /// Power-on reset
    fn reset(&mut self);
}

/// Free-running square wave, one edge every half period.
///
/// Starts low; the first edge (rising) lands half a period after start.
#[derive(Debug, Clone, Copy)]
pub struct SquareClock {
    half_period: f64,
    next_edge: f64,
    state: bool,
}

impl SquareClock {
    /// Clock of `frequency_hz` starting at time `now`
    pub fn new(frequency_hz: u32, now: f64) -> Self {
        let half_period = 0.5 / f64::from(frequency_hz.max(1));
        Self {
            half_period,
            next_edge: now + half_period,
            state: false,
        }
    }

    /// Time of the next edge
    pub fn next_edge(&self) -> f64 {
        self.next_edge
    }

    /// Current level
    pub fn state(&self) -> bool {
        self.state
    }

    /// Take the pending edge and return the new level
    pub fn toggle(&mut self) -> bool {
        self.state = !self.state;
        self.next_edge += self.half_period;
        self.state
    }

    /// Restart low at time `now`
    pub fn restart(&mut self, now: f64) {
        self.state = false;
        self.next_edge = now + self.half_period;
    }

    /// Continue from a saved level and edge time
    pub fn resume(&mut self, state: bool, next_edge: f64) {
        self.state = state;
        self.next_edge = next_edge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_clock_edges() {
        let mut clock = SquareClock::new(500_000, 0.0);
        assert!(!clock.state());
        assert_relative_eq!(clock.next_edge(), 1e-6);

        assert!(clock.toggle());
        assert_relative_eq!(clock.next_edge(), 2e-6);
        assert!(!clock.toggle());
        assert_relative_eq!(clock.next_edge(), 3e-6);
    }

    #[test]
    fn test_square_clock_restart() {
        let mut clock = SquareClock::new(1_000, 0.0);
        clock.toggle();
        clock.restart(1.0);
        assert!(!clock.state());
        assert_relative_eq!(clock.next_edge(), 1.0005);
    }

    #[test]
    fn test_uart_outputs_empty() {
        assert!(UartOutputs::default().is_empty());
        let outputs = UartOutputs {
            irq: Some(true),
            ..UartOutputs::default()
        };
        assert!(!outputs.is_empty());
    }
}
