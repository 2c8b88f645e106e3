//! Device capability interface.
//!
//! A [`PanelBackend`] is the operation table a concrete packed-framebuffer
//! store implements; a [`Device`] binds one backend to an immediate-draw
//! flag. Rasterizers and widgets only ever talk to `Device`, never to a
//! store directly.
//!
//! Framebuffer mutations are infallible by contract: bad coordinates clamp
//! or no-op silently. Only the transport-facing operations (`open`, `close`,
//! `update`, `update_area`) can fail, and a failure simply means the store
//! stayed dirty.

mod grey;
mod mono;

pub use grey::GreyBackend;
pub use mono::MonoBackend;

use crate::geometry::Size;
use crate::transport::TransportError;

/// Result of a property query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Uint(u16),
}

impl PropertyValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(b),
            PropertyValue::Uint(_) => None,
        }
    }

    pub fn as_uint(self) -> Option<u16> {
        match self {
            PropertyValue::Uint(v) => Some(v),
            PropertyValue::Bool(_) => None,
        }
    }
}

/// Operation table every packed-framebuffer backend implements.
///
/// Area arguments are `(x, y, width, height)` in logical pixels. Every
/// implementation must bounds-check against the logical panel size (the
/// store may be padded) and silently truncate partially covered areas.
pub trait PanelBackend {
    /// Set one pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u16, y: u16);

    /// Blit a vertically bit-packed 1bpp source into the store at (x, y).
    /// `source` holds `width` bytes per 8-row band, LSB = topmost row.
    fn set_area(&mut self, x: u16, y: u16, width: u16, height: u16, source: &[u8]);

    /// Push the whole store to the transport.
    fn update(&mut self) -> Result<(), TransportError>;
    /// Zero the whole store.
    fn clear(&mut self);
    /// Logically invert the whole store.
    fn revert(&mut self);

    /// Push the covered pages/columns of the given area to the transport.
    fn update_area(&mut self, x: u16, y: u16, width: u16, height: u16)
        -> Result<(), TransportError>;
    fn clear_area(&mut self, x: u16, y: u16, width: u16, height: u16);
    fn revert_area(&mut self, x: u16, y: u16, width: u16, height: u16);

    fn open(&mut self) -> Result<(), TransportError>;
    fn close(&mut self) -> Result<(), TransportError>;

    /// Query a named property (`"width"`, `"height"`, `"rgb"`, `"color"`).
    /// Unknown names return `None`, never panic.
    fn query(&self, property: &str) -> Option<PropertyValue>;

    /// Set a named property. Returns false for unknown or read-only names.
    fn set_property(&mut self, property: &str, value: PropertyValue) -> bool;
}

/// A backend bound to a draw-mode flag.
///
/// With `immediate_draw` on, each rasterizer flushes its own bounding box
/// right after drawing; with it off the store accumulates dirty pixels until
/// the caller runs a batch [`Device::update`].
pub struct Device<B> {
    backend: B,
    immediate_draw: bool,
}

impl<B: PanelBackend> Device<B> {
    /// Bind a backend. Starts in deferred (batched) draw mode.
    pub fn bind(backend: B) -> Self {
        Self {
            backend,
            immediate_draw: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn immediate_draw(&self) -> bool {
        self.immediate_draw
    }

    pub fn set_immediate_draw(&mut self, immediate: bool) {
        self.immediate_draw = immediate;
    }

    pub fn open(&mut self) -> Result<(), TransportError> {
        self.backend.open()
    }

    pub fn close(&mut self) -> Result<(), TransportError> {
        self.backend.close()
    }

    pub fn set_pixel(&mut self, x: u16, y: u16) {
        self.backend.set_pixel(x, y);
    }

    pub fn set_area(&mut self, x: u16, y: u16, width: u16, height: u16, source: &[u8]) {
        self.backend.set_area(x, y, width, height, source);
    }

    pub fn update(&mut self) -> Result<(), TransportError> {
        self.backend.update()
    }

    pub fn clear(&mut self) {
        self.backend.clear();
    }

    pub fn revert(&mut self) {
        self.backend.revert();
    }

    pub fn update_area(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), TransportError> {
        self.backend.update_area(x, y, width, height)
    }

    pub fn clear_area(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.backend.clear_area(x, y, width, height);
    }

    pub fn revert_area(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.backend.revert_area(x, y, width, height);
    }

    pub fn query(&self, property: &str) -> Option<PropertyValue> {
        self.backend.query(property)
    }

    pub fn set_property(&mut self, property: &str, value: PropertyValue) -> bool {
        self.backend.set_property(property, value)
    }

    /// Logical panel size, resolved through the property protocol.
    pub fn screen_size(&self) -> Size {
        let w = self
            .query("width")
            .and_then(PropertyValue::as_uint)
            .unwrap_or(0);
        let h = self
            .query("height")
            .and_then(PropertyValue::as_uint)
            .unwrap_or(0);
        Size::new(u32::from(w), u32::from(h))
    }

    /// Clear the store and push the blank frame in one call.
    pub fn clear_immediate(&mut self) -> Result<(), TransportError> {
        self.backend.clear();
        self.backend.update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPanel;
    use std::time::Duration;

    fn device() -> Device<MonoBackend<SimPanel>> {
        let sim = SimPanel::new(128, 64);
        Device::bind(MonoBackend::new(sim, 128, 64, 0x3C, Duration::from_millis(10)))
    }

    #[test]
    fn test_screen_size_via_property_protocol() {
        let dev = device();
        assert_eq!(dev.screen_size(), Size::new(128, 64));
    }

    #[test]
    fn test_unknown_property_fails_quietly() {
        let mut dev = device();
        assert!(dev.query("contrast").is_none());
        assert!(!dev.set_property("contrast", PropertyValue::Uint(7)));
    }

    #[test]
    fn test_immediate_draw_flag_roundtrip() {
        let mut dev = device();
        assert!(!dev.immediate_draw());
        dev.set_immediate_draw(true);
        assert!(dev.immediate_draw());
    }

    #[test]
    fn test_rgb_query() {
        let dev = device();
        assert_eq!(dev.query("rgb"), Some(PropertyValue::Bool(false)));
        assert_eq!(dev.query("rgb").and_then(PropertyValue::as_uint), None);
    }
}
