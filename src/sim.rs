//! In-process panel simulator.
//!
//! [`SimPanel`] stands in for a real monochrome panel on the message bus: it
//! decodes the cursor and power commands, keeps its own page RAM, and offers
//! per-pixel readback. The demo binary renders this RAM through SDL; the
//! backend tests use it to check what actually went over the wire.
//!
//! [`RecordingTransport`] is a dumber sink that just keeps the raw bytes,
//! for asserting on exact command sequences.

use crate::transport::{Message, Transport, TransportError, FLAG_READ};
use std::time::Duration;

const CMD_PREFIX: u8 = 0x00;
const DATA_PREFIX: u8 = 0x40;

/// Simulated page-organized monochrome panel.
pub struct SimPanel {
    width: u16,
    height: u16,
    columns: usize,
    pages: usize,
    ram: Vec<u8>,
    page: usize,
    col: usize,
    powered: bool,
    /// Set after a command byte that takes an argument (charge pump).
    pending_arg: bool,
    data_writes: u32,
    fail_with: Option<TransportError>,
}

impl SimPanel {
    pub fn new(width: u16, height: u16) -> Self {
        let columns = usize::from(width);
        let pages = usize::from(height).div_ceil(8);
        Self {
            width,
            height,
            columns,
            pages,
            ram: vec![0; columns * pages],
            page: 0,
            col: 0,
            powered: false,
            pending_arg: false,
            data_writes: 0,
            fail_with: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Number of data-payload transfers received so far.
    pub fn data_writes(&self) -> u32 {
        self.data_writes
    }

    /// Fail the next transfer with the given status, then recover.
    pub fn fail_next(&mut self, err: TransportError) {
        self.fail_with = Some(err);
    }

    /// Read one pixel out of the panel's own RAM.
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = usize::from(y) / 8 * self.columns + usize::from(x);
        self.ram[idx] & (1 << (y % 8)) != 0
    }

    fn handle_command(&mut self, cmd: u8) {
        if self.pending_arg {
            // charge pump argument, no visible effect here
            self.pending_arg = false;
            return;
        }
        match cmd {
            0x8D => self.pending_arg = true,
            0xAF => self.powered = true,
            0xAE => self.powered = false,
            0xB0..=0xB7 => self.page = usize::from(cmd & 0x0F),
            0x10..=0x1F => self.col = (self.col & 0x0F) | (usize::from(cmd & 0x0F) << 4),
            0x00..=0x0F => self.col = (self.col & !0x0F) | usize::from(cmd & 0x0F),
            _ => {}
        }
    }

    fn handle_data(&mut self, byte: u8) {
        if self.page < self.pages && self.col < self.columns {
            self.ram[self.page * self.columns + self.col] = byte;
        }
        self.col += 1;
    }
}

impl Transport for SimPanel {
    fn transfer(&mut self, msgs: &[Message<'_>], _timeout: Duration) -> Result<(), TransportError> {
        if let Some(err) = self.fail_with.take() {
            return Err(err);
        }
        // the panel has nothing to read back
        if msgs.iter().any(|m| m.flags & FLAG_READ != 0) {
            return Err(TransportError::InvalidArgument);
        }
        let Some((prefix, payload)) = msgs.split_first() else {
            return Err(TransportError::InvalidArgument);
        };
        match prefix.buf.first() {
            Some(&CMD_PREFIX) => {
                for msg in payload {
                    for &b in msg.buf {
                        self.handle_command(b);
                    }
                }
            }
            Some(&DATA_PREFIX) => {
                self.data_writes += 1;
                for msg in payload {
                    for &b in msg.buf {
                        self.handle_data(b);
                    }
                }
            }
            _ => return Err(TransportError::InvalidArgument),
        }
        Ok(())
    }

    fn is_device_ready(
        &mut self,
        _addr: u8,
        _trials: u32,
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    fn recover_bus(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Transport that records every byte it is handed, prefix included.
#[derive(Default)]
pub struct RecordingTransport {
    transfers: Vec<Vec<u8>>,
    fail_with: Option<TransportError>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All transfers so far, each flattened into one byte vector.
    pub fn transfers(&self) -> &[Vec<u8>] {
        &self.transfers
    }

    pub fn fail_next(&mut self, err: TransportError) {
        self.fail_with = Some(err);
    }
}

impl Transport for RecordingTransport {
    fn transfer(&mut self, msgs: &[Message<'_>], _timeout: Duration) -> Result<(), TransportError> {
        if let Some(err) = self.fail_with.take() {
            return Err(err);
        }
        if msgs.iter().any(|m| m.flags & FLAG_READ != 0) {
            return Err(TransportError::InvalidArgument);
        }
        let mut flat = Vec::new();
        for msg in msgs {
            flat.extend_from_slice(msg.buf);
        }
        self.transfers.push(flat);
        Ok(())
    }

    fn is_device_ready(
        &mut self,
        _addr: u8,
        _trials: u32,
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    fn recover_bus(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(panel: &mut SimPanel, byte: u8) {
        let prefix = [CMD_PREFIX];
        let payload = [byte];
        let msgs = [Message::write(0x3C, &prefix), Message::write(0x3C, &payload)];
        panel.transfer(&msgs, Duration::from_millis(10)).unwrap();
    }

    #[test]
    fn test_cursor_and_data_land_in_ram() {
        let mut panel = SimPanel::new(128, 64);
        cmd(&mut panel, 0xB2); // page 2
        cmd(&mut panel, 0x11); // column high nibble 1
        cmd(&mut panel, 0x05); // column low nibble 5
        let prefix = [DATA_PREFIX];
        let data = [0b0000_0001];
        let msgs = [Message::write(0x3C, &prefix), Message::write(0x3C, &data)];
        panel.transfer(&msgs, Duration::from_millis(10)).unwrap();
        // column 0x15 = 21, page 2 bit 0 = row 16
        assert!(panel.pixel(21, 16));
        assert!(!panel.pixel(21, 17));
    }

    #[test]
    fn test_power_sequence() {
        let mut panel = SimPanel::new(128, 64);
        assert!(!panel.powered());
        cmd(&mut panel, 0x8D);
        cmd(&mut panel, 0x14); // argument, must not be read as a column command
        cmd(&mut panel, 0xAF);
        assert!(panel.powered());
        assert_eq!(panel.col, 0);
        cmd(&mut panel, 0xAE);
        assert!(!panel.powered());
    }

    #[test]
    fn test_read_transfers_are_rejected() {
        let buf = [0u8];
        let msg = Message {
            addr: 0x3C,
            flags: FLAG_READ,
            buf: &buf,
        };
        let mut panel = SimPanel::new(128, 64);
        assert_eq!(
            panel.transfer(&[msg], Duration::from_millis(10)),
            Err(TransportError::InvalidArgument)
        );
        let mut rec = RecordingTransport::new();
        assert_eq!(
            rec.transfer(&[msg], Duration::from_millis(10)),
            Err(TransportError::InvalidArgument)
        );
        assert!(rec.transfers().is_empty());
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let mut panel = SimPanel::new(128, 64);
        panel.fail_next(TransportError::Busy);
        let prefix = [CMD_PREFIX];
        let payload = [0xAF];
        let msgs = [Message::write(0x3C, &prefix), Message::write(0x3C, &payload)];
        assert_eq!(
            panel.transfer(&msgs, Duration::from_millis(10)),
            Err(TransportError::Busy)
        );
        assert!(panel.transfer(&msgs, Duration::from_millis(10)).is_ok());
    }
}
