//! Serial link to the main board
//!
//! The UART's IRQ output does not reach the CPU directly: it is sampled onto
//! the NMI line on rising edges of the serial clock while NMI is enabled.

use super::SoundBoard;
use crate::pit::IntervalTimer;
use crate::signals::LineState;
use crate::uart::SerialUart;
use crate::voice::VoiceGenerator;

impl<P, U, V> SoundBoard<P, U, V>
where
    P: IntervalTimer,
    U: SerialUart,
    V: VoiceGenerator,
{
    /// Serial clock edge as seen by the board logic.
    ///
    /// On a rising edge with NMI enabled the NMI line follows the UART IRQ.
    /// The inverted clock is always sent out on the clock monitor line.
    pub fn on_uart_clock_edge(&mut self, state: bool) {
        if state && self.counter_control.nmi_enabled() {
            self.interrupts.set_nmi(LineState::from_bool(self.uart_irq));
        }

        self.clock_out_line.set(!state);
    }

    /// Full serial clock edge: board logic first, then the UART's TXC and RXC.
    pub fn drive_uart_clock(&mut self, state: bool) {
        self.on_uart_clock_edge(state);
        self.uart.write_txc(state);
        self.uart.write_rxc(state);
        self.sync_uart_outputs();
    }

    /// Serial data from the main board, straight to the UART's RXD.
    pub fn on_external_serial_in(&mut self, state: bool) {
        self.uart.write_rxd(state);
        self.sync_uart_outputs();
    }

    /// Register a handler for the transmitted data line
    pub fn connect_send<F>(&mut self, handler: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.send_line.connect(handler);
    }

    /// Register a handler for the inverted serial clock
    pub fn connect_clock_out<F>(&mut self, handler: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.clock_out_line.connect(handler);
    }

    /// Last level on the transmitted data line
    pub fn send_state(&self) -> bool {
        self.send_line.state()
    }

    /// Latched UART interrupt request
    pub fn uart_irq(&self) -> bool {
        self.uart_irq
    }

    /// Route UART pin changes: TXD out to the main board, IRQ into the latch.
    pub(super) fn sync_uart_outputs(&mut self) {
        loop {
            let outputs = self.uart.take_outputs();
            if outputs.is_empty() {
                break;
            }
            if let Some(state) = outputs.txd {
                self.send_line.set(state);
            }
            if let Some(state) = outputs.irq {
                self.uart_irq = state;
            }
        }
    }
}
