//! Page-packed monochrome framebuffer backend.
//!
//! The store is `pages x columns` bytes; bit `i` of a page byte is the pixel
//! at row `page * 8 + i` of that column. Flushing walks the covered pages in
//! row-major order, placing the transport's write cursor at the start of
//! each page range and streaming the covered columns.

use crate::device::{PanelBackend, PropertyValue};
use crate::transport::{Message, Transport, TransportError};
use std::time::Duration;

// Control prefixes for command vs. data payloads.
const CMD_PREFIX: u8 = 0x00;
const DATA_PREFIX: u8 = 0x40;

// Cursor addressing: page select plus split column address.
const CMD_PAGE_BASE: u8 = 0xB0;
const CMD_COL_HIGH: u8 = 0x10;
const CMD_COL_LOW: u8 = 0x00;

const CMD_CHARGE_PUMP: u8 = 0x8D;
const CHARGE_PUMP_ON: u8 = 0x14;
const CHARGE_PUMP_OFF: u8 = 0x10;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_DISPLAY_OFF: u8 = 0xAE;

/// Monochrome backend over a page-organized bit store.
pub struct MonoBackend<T> {
    transport: T,
    addr: u8,
    timeout: Duration,
    width: u16,
    height: u16,
    /// Store geometry; may be padded past the logical height when the
    /// height is not a page multiple.
    columns: usize,
    pages: usize,
    store: Vec<u8>,
}

impl<T: Transport> MonoBackend<T> {
    /// Allocate a store covering `width x height` logical pixels.
    pub fn new(transport: T, width: u16, height: u16, addr: u8, timeout: Duration) -> Self {
        let columns = usize::from(width);
        let pages = usize::from(height).div_ceil(8);
        Self {
            transport,
            addr,
            timeout,
            width,
            height,
            columns,
            pages,
            store: vec![0; columns * pages],
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Raw page-packed store, for readback and tests.
    pub fn buffer(&self) -> &[u8] {
        &self.store
    }

    /// Read one pixel back out of the packed store.
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = usize::from(y) / 8 * self.columns + usize::from(x);
        self.store[idx] & (1 << (y % 8)) != 0
    }

    /// Count of lit pixels inside the logical area.
    pub fn lit_pixels(&self) -> u32 {
        let mut count = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y) {
                    count += 1;
                }
            }
        }
        count
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

    fn set_cursor(&mut self, page: usize, col: u16) -> Result<(), TransportError> {
        self.send_cmd(CMD_PAGE_BASE | page as u8)?;
        self.send_cmd(CMD_COL_HIGH | ((col >> 4) & 0x0F) as u8)?;
        self.send_cmd(CMD_COL_LOW | (col & 0x0F) as u8)
    }

    /// Clamp an area against the logical panel size. Returns `None` when the
    /// origin is already outside; otherwise the truncated width/height.
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

impl<T: Transport> PanelBackend for MonoBackend<T> {
    fn set_pixel(&mut self, x: u16, y: u16) {
        if x < self.width && y < self.height {
            let idx = usize::from(y) / 8 * self.columns + usize::from(x);
            self.store[idx] |= 1 << (y % 8);
        }
    }

    fn set_area(&mut self, x: u16, y: u16, width: u16, height: u16, source: &[u8]) {
        if self.clamp_area(x, y, width, height).is_none() {
            return;
        }
        // The incoming bits replace whatever the area held.
        self.clear_area(x, y, width, height);

        let bands = usize::from(height - 1) / 8 + 1;
        let stride = usize::from(width);
        let bit_off = y % 8;

        for band in 0..bands {
            let page = usize::from(y) / 8 + band;
            if page >= self.pages {
                return;
            }
            for i in 0..stride {
                let col = usize::from(x) + i;
                if col >= self.columns {
                    break;
                }
                let Some(&src) = source.get(band * stride + i) else {
                    return;
                };
                self.store[page * self.columns + col] |= src << bit_off;
                // Carry the bits that spilled past the page boundary.
                if bit_off != 0 && page + 1 < self.pages {
                    self.store[(page + 1) * self.columns + col] |= src >> (8 - bit_off);
                }
            }
        }
    }

    fn update(&mut self) -> Result<(), TransportError> {
        for page in 0..self.pages {
            self.set_cursor(page, 0)?;
            self.send_data(page * self.columns, usize::from(self.width))?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.store.fill(0);
    }

    fn revert(&mut self) {
        for byte in &mut self.store {
            *byte ^= 0xFF;
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
        let first_page = usize::from(y) / 8;
        let last_page = usize::from(y + h - 1) / 8;
        for page in first_page..=last_page {
            self.set_cursor(page, x)?;
            self.send_data(page * self.columns + usize::from(x), usize::from(w))?;
        }
        Ok(())
    }

    fn clear_area(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let Some((w, h)) = self.clamp_area(x, y, width, height) else {
            return;
        };
        for row in y..y + h {
            let page = usize::from(row) / 8;
            let mask = !(1u8 << (row % 8));
            for col in x..x + w {
                self.store[page * self.columns + usize::from(col)] &= mask;
            }
        }
    }

    fn revert_area(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let Some((w, h)) = self.clamp_area(x, y, width, height) else {
            return;
        };
        for row in y..y + h {
            let page = usize::from(row) / 8;
            let mask = 1u8 << (row % 8);
            for col in x..x + w {
                self.store[page * self.columns + usize::from(col)] ^= mask;
            }
        }
    }

    fn open(&mut self) -> Result<(), TransportError> {
        self.send_cmd(CMD_CHARGE_PUMP)?;
        self.send_cmd(CHARGE_PUMP_ON)?;
        self.send_cmd(CMD_DISPLAY_ON)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.send_cmd(CMD_CHARGE_PUMP)?;
        self.send_cmd(CHARGE_PUMP_OFF)?;
        self.send_cmd(CMD_DISPLAY_OFF)
    }

    fn query(&self, property: &str) -> Option<PropertyValue> {
        match property {
            "rgb" => Some(PropertyValue::Bool(false)),
            "width" => Some(PropertyValue::Uint(self.width)),
            "height" => Some(PropertyValue::Uint(self.height)),
            _ => None,
        }
    }

    fn set_property(&mut self, _property: &str, _value: PropertyValue) -> bool {
        false
    }
}
