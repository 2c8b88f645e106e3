//! Primitive rasterizers.
//!
//! Every rasterizer follows the same shape: compute the primitive's bounding
//! box, clear that box in the store, walk the algorithm emitting `set_pixel`
//! calls, then flush exactly that box when the device is in immediate-draw
//! mode. In deferred mode the store just accumulates and the caller batches
//! a frame [`Device::update`](crate::device::Device::update).
//!
//! Drawing itself never fails. The only error a rasterizer can return is a
//! transport failure from its own immediate-mode flush.

mod arc;
mod circle;
mod ellipse;
mod line;
mod rect;
mod triangle;

pub use arc::{draw_arc, draw_filled_arc, Arc};
pub use circle::{draw_circle, draw_filled_circle, Circle};
pub use ellipse::{draw_ellipse, draw_filled_ellipse, Ellipse};
pub use line::{draw_line, Line};
pub use rect::{draw_rect, fill_rect};
pub use triangle::{draw_filled_triangle, draw_triangle, Triangle};

use crate::device::{Device, PanelBackend};
use crate::geometry::clamp_coord;
use crate::transport::TransportError;

/// Inclusive bounding box in the signed intermediate domain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BBox {
    pub lx: i32,
    pub ty: i32,
    pub rx: i32,
    pub by: i32,
}

impl BBox {
    pub(crate) fn new(lx: i32, ty: i32, rx: i32, by: i32) -> Self {
        // corners never invert
        Self {
            lx,
            ty,
            rx: rx.max(lx),
            by: by.max(ty),
        }
    }

    fn to_area(self) -> (u16, u16, u16, u16) {
        (
            clamp_coord(self.lx),
            clamp_coord(self.ty),
            clamp_coord(self.rx - self.lx + 1),
            clamp_coord(self.by - self.ty + 1),
        )
    }
}

/// Zero the store under the box before the algorithm redraws it.
pub(crate) fn clear_bbox<B: PanelBackend>(dev: &mut Device<B>, bbox: BBox) {
    let (x, y, w, h) = bbox.to_area();
    dev.clear_area(x, y, w, h);
}

/// Flush the box when the device asked for immediate draws.
pub(crate) fn flush_bbox<B: PanelBackend>(
    dev: &mut Device<B>,
    bbox: BBox,
) -> Result<(), TransportError> {
    if !dev.immediate_draw() {
        return Ok(());
    }
    let (x, y, w, h) = bbox.to_area();
    dev.update_area(x, y, w, h)
}

/// Plot a point given in the signed intermediate domain. Anything outside
/// the coordinate range is dropped rather than clamped onto the edge.
pub(crate) fn plot<B: PanelBackend>(dev: &mut Device<B>, x: i32, y: i32) {
    if (0..=i32::from(u16::MAX)).contains(&x) && (0..=i32::from(u16::MAX)).contains(&y) {
        dev.set_pixel(x as u16, y as u16);
    }
}
