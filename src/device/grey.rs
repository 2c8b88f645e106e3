//! Nibble-packed 4bpp greyscale framebuffer backend.
//!
//! The store is row-major: each byte holds two horizontally adjacent pixels,
//! even x in the high nibble. `set_pixel` writes the current global intensity
//! (0 to 15, set through the `"color"` property) rather than a fixed value.
//! Flushes program a column/row window and stream the covered bytes row by
//! row, letting the panel wrap inside the window.

use crate::device::{PanelBackend, PropertyValue};
use crate::transport::{Message, Transport, TransportError};
use std::time::Duration;

const CMD_PREFIX: u8 = 0x00;
const DATA_PREFIX: u8 = 0x40;

const CMD_COLUMN_RANGE: u8 = 0x15;
const CMD_ROW_RANGE: u8 = 0x75;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_DISPLAY_OFF: u8 = 0xAE;

const MAX_INTENSITY: u16 = 0x0F;

/// Greyscale backend over a nibble-packed row store.
pub struct GreyBackend<T> {
    transport: T,
    addr: u8,
    timeout: Duration,
    width: u16,
    height: u16,
    /// Byte columns per row; two pixels per byte, rounded up.
    columns: usize,
    store: Vec<u8>,
    intensity: u8,
}

impl<T: Transport> GreyBackend<T> {
    pub fn new(transport: T, width: u16, height: u16, addr: u8, timeout: Duration) -> Self {
        let columns = usize::from(width).div_ceil(2);
        Self {
            transport,
            addr,
            timeout,
            width,
            height,
            columns,
            store: vec![0; columns * usize::from(height)],
            intensity: MAX_INTENSITY as u8,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn buffer(&self) -> &[u8] {
        &self.store
    }

    /// Read one pixel's intensity back out of the packed store.
    pub fn pixel(&self, x: u16, y: u16) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let byte = self.store[usize::from(y) * self.columns + usize::from(x) / 2];
        if x % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        }
    }

    fn put_pixel(&mut self, x: u16, y: u16, value: u8) {
        let idx = usize::from(y) * self.columns + usize::from(x) / 2;
        if x % 2 == 0 {
            self.store[idx] = (self.store[idx] & 0x0F) | (value << 4);
        } else {
            self.store[idx] = (self.store[idx] & 0xF0) | (value & 0x0F);
        }
    }

    fn send_cmd(&mut self, cmd: u8) -> Result<(), TransportError> {
        let prefix = [CMD_PREFIX];
        let payload = [cmd];
        let msgs = [
            Message::write(self.addr, &prefix),
            Message::write(self.addr, &payload),
        ];
        self.transport.transfer(&msgs, self.timeout)
    }

    fn send_data(&mut self, start: usize, len: usize) -> Result<(), TransportError> {
        let prefix = [DATA_PREFIX];
        let msgs = [
            Message::write(self.addr, &prefix),
            Message::write(self.addr, &self.store[start..start + len]),
        ];
        self.transport.transfer(&msgs, self.timeout)
    }

    fn set_window(
        &mut self,
        col_start: u8,
        col_end: u8,
        row_start: u8,
        row_end: u8,
    ) -> Result<(), TransportError> {
        self.send_cmd(CMD_COLUMN_RANGE)?;
        self.send_cmd(col_start)?;
        self.send_cmd(col_end)?;
        self.send_cmd(CMD_ROW_RANGE)?;
        self.send_cmd(row_start)?;
        self.send_cmd(row_end)
    }

    fn clamp_area(&self, x: u16, y: u16, width: u16, height: u16) -> Option<(u16, u16)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let w = width.min(self.width - x);
        let h = height.min(self.height - y);
        if w == 0 || h == 0 {
            return None;
        }
        Some((w, h))
    }
}

impl<T: Transport> PanelBackend for GreyBackend<T> {
    fn set_pixel(&mut self, x: u16, y: u16) {
        if x < self.width && y < self.height {
            let value = self.intensity;
            self.put_pixel(x, y, value);
        }
    }

    fn set_area(&mut self, x: u16, y: u16, width: u16, height: u16, source: &[u8]) {
        let Some((w, h)) = self.clamp_area(x, y, width, height) else {
            return;
        };
        // 1bpp source expands through the current intensity; zero bits
        // force the pixel dark rather than leaving it untouched.
        let stride = usize::from(width);
        for i in 0..usize::from(w) {
            for j in 0..usize::from(h) {
                let Some(&src) = source.get(j / 8 * stride + i) else {
                    return;
                };
                let bit = (src >> (j % 8)) & 0x01;
                let value = if bit == 0 { 0 } else { self.intensity };
                self.put_pixel(x + i as u16, y + j as u16, value);
            }
        }
    }

    fn update(&mut self) -> Result<(), TransportError> {
        self.update_area(0, 0, self.width, self.height)
    }

    fn clear(&mut self) {
        self.store.fill(0);
    }

    fn revert(&mut self) {
        for byte in &mut self.store {
            *byte = !*byte;
        }
    }

    fn update_area(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), TransportError> {
        let Some((w, h)) = self.clamp_area(x, y, width, height) else {
            return Ok(());
        };
        let col_start = usize::from(x) / 2;
        let col_end = usize::from(x + w - 1) / 2;
        self.set_window(col_start as u8, col_end as u8, y as u8, (y + h - 1) as u8)?;
        for row in y..y + h {
            let start = usize::from(row) * self.columns + col_start;
            self.send_data(start, col_end - col_start + 1)?;
        }
        Ok(())
    }

    fn clear_area(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let Some((w, h)) = self.clamp_area(x, y, width, height) else {
            return;
        };
        for row in y..y + h {
            for col in x..x + w {
                self.put_pixel(col, row, 0);
            }
        }
    }

    fn revert_area(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let Some((w, h)) = self.clamp_area(x, y, width, height) else {
            return;
        };
        for row in y..y + h {
            let base = usize::from(row) * self.columns;
            for col in x..x + w {
                let mask = if col % 2 == 0 { 0xF0 } else { 0x0F };
                self.store[base + usize::from(col) / 2] ^= mask;
            }
        }
    }

    fn open(&mut self) -> Result<(), TransportError> {
        self.send_cmd(CMD_DISPLAY_ON)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.send_cmd(CMD_DISPLAY_OFF)
    }

    fn query(&self, property: &str) -> Option<PropertyValue> {
        match property {
            "rgb" => Some(PropertyValue::Bool(false)),
            "width" => Some(PropertyValue::Uint(self.width)),
            "height" => Some(PropertyValue::Uint(self.height)),
            "color" => Some(PropertyValue::Uint(u16::from(self.intensity))),
            _ => None,
        }
    }

    fn set_property(&mut self, property: &str, value: PropertyValue) -> bool {
        match (property, value.as_uint()) {
            ("color", Some(v)) => {
                // only the low four bits are meaningful
                self.intensity = (v & MAX_INTENSITY) as u8;
                true
            }
            _ => false,
        }
    }
}
