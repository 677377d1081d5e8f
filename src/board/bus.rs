//! Z80 address decode
//!
//! ```text
//! Memory                         I/O (A7-A0)
//! 0000-1FFF  R    program ROM    00-03  R/W  8253 PIT
//! 2000-3FFF  R/W  option RAM     08-0F  R    counter state
//! 4000-5FFF  R/W  program RAM    08-09    W  counter control
//! 6000-7FFF    W  UART (A0)      0A-0B    W  DAC latch (high/low)
//! E000-FFFF  R    UART (A0)      0C-0D    W  CEM register select
//!                                0E-0F    W  CEM chip enable
//! ```

use super::SoundBoard;
use crate::constants::{
    OPEN_BUS, PORT_CHIP_SELECT, PORT_COUNTER, PORT_COUNTER_END, PORT_DAC, PORT_PIT_END,
    PORT_REGISTER_SELECT, RAM_SIZE, RAM_START, ROM_SIZE, UART_READ_START, UART_WRITE_END,
    UART_WRITE_START,
};
use crate::pit::IntervalTimer;
use crate::uart::SerialUart;
use crate::voice::VoiceGenerator;

/// Memory and I/O access used by the sound CPU
pub trait CpuBus {
    /// Read a byte from program space
    fn read_memory(&mut self, addr: u16) -> u8;

    /// Write a byte to program space
    fn write_memory(&mut self, addr: u16, value: u8);

    /// Read an I/O port
    fn read_port(&mut self, port: u16) -> u8;

    /// Write an I/O port
    fn write_port(&mut self, port: u16, value: u8);
}

const RAM_END: u16 = RAM_START + (RAM_SIZE as u16 - 1);
const ROM_END: u16 = ROM_SIZE as u16 - 1;

impl<P, U, V> CpuBus for SoundBoard<P, U, V>
where
    P: IntervalTimer,
    U: SerialUart,
    V: VoiceGenerator,
{
    fn read_memory(&mut self, addr: u16) -> u8 {
        match addr {
            0..=ROM_END => self.rom[addr as usize],
            RAM_START..=RAM_END => self.ram[(addr - RAM_START) as usize],
            UART_READ_START..=u16::MAX => {
                let value = self.uart.read((addr & 1) as u8);
                self.sync_uart_outputs();
                value
            }
            _ => OPEN_BUS,
        }
    }

    fn write_memory(&mut self, addr: u16, value: u8) {
        match addr {
            RAM_START..=RAM_END => self.ram[(addr - RAM_START) as usize] = value,
            UART_WRITE_START..=UART_WRITE_END => {
                self.uart.write((addr & 1) as u8, value);
                self.sync_uart_outputs();
            }
            _ => {}
        }
    }

    fn read_port(&mut self, port: u16) -> u8 {
        let port = (port & 0xFF) as u8;
        match port {
            0..=PORT_PIT_END => {
                let value = self.pit.read(port);
                self.sync_pit_outputs();
                value
            }
            PORT_COUNTER..=PORT_COUNTER_END => self.read_state(),
            _ => OPEN_BUS,
        }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        let port = (port & 0xFF) as u8;
        match port & !1 {
            0x00 | 0x02 => {
                self.pit.write(port, value);
                self.sync_pit_outputs();
            }
            PORT_COUNTER => self.set_control(value),
            PORT_DAC => self.write_dac_half(port & 1, value),
            PORT_REGISTER_SELECT => self.write_register_select(value),
            PORT_CHIP_SELECT => self.write_chip_select(value),
            _ => {}
        }
    }
}
