//! Two-region midpoint ellipse rasterizer.

use crate::device::{Device, PanelBackend};
use crate::geometry::Point;
use crate::raster::{clear_bbox, flush_bbox, plot, BBox};
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ellipse {
    pub center: Point,
    pub x_radius: u16,
    pub y_radius: u16,
}

impl Ellipse {
    pub const fn new(center: Point, x_radius: u16, y_radius: u16) -> Self {
        Self {
            center,
            x_radius,
            y_radius,
        }
    }

    fn bbox(&self) -> BBox {
        let cx = i32::from(self.center.x);
        let cy = i32::from(self.center.y);
        let rx = i32::from(self.x_radius);
        let ry = i32::from(self.y_radius);
        BBox::new(cx - rx, cy - ry, cx + rx, cy + ry)
    }

    fn offset_plot<B: PanelBackend>(&self, dev: &mut Device<B>, ox: i32, oy: i32) {
        plot(
            dev,
            i32::from(self.center.x) + ox,
            i32::from(self.center.y) + oy,
        );
    }

    /// Emit the four quadrant-symmetric points.
    fn quad<B: PanelBackend>(&self, dev: &mut Device<B>, x: i32, y: i32) {
        self.offset_plot(dev, x, y);
        self.offset_plot(dev, -x, -y);
        self.offset_plot(dev, -x, y);
        self.offset_plot(dev, x, -y);
    }
}

/// Walk both midpoint regions, handing each step to `step`. Region 1 covers
/// slope magnitude below 1 (x advances every step); region 2 takes over at
/// the tangent point and advances y instead. Decision variables accumulate
/// in floating point, seeded at `b^2 + a^2 * (-b + 0.5)`.
fn walk<B: PanelBackend, F>(dev: &mut Device<B>, ellipse: &Ellipse, mut step: F)
where
    F: FnMut(&mut Device<B>, i32, i32),
{
    let a2 = f64::from(ellipse.x_radius) * f64::from(ellipse.x_radius);
    let b2 = f64::from(ellipse.y_radius) * f64::from(ellipse.y_radius);

    let mut x = 0i32;
    let mut y = i32::from(ellipse.y_radius);

    step(dev, x, y);

    let mut d1 = b2 + a2 * (-f64::from(ellipse.y_radius) + 0.5);
    while b2 * f64::from(x + 1) < a2 * (f64::from(y) - 0.5) {
        if d1 <= 0.0 {
            d1 += b2 * f64::from(2 * x + 3);
        } else {
            d1 += b2 * f64::from(2 * x + 3) + a2 * f64::from(-2 * y + 2);
            y -= 1;
        }
        x += 1;
        step(dev, x, y);
    }

    let fx = f64::from(x) + 0.5;
    let fy = f64::from(y) - 1.0;
    let mut d2 = b2 * fx * fx + a2 * fy * fy - a2 * b2;
    while y > 0 {
        if d2 <= 0.0 {
            d2 += b2 * f64::from(2 * x + 2) + a2 * f64::from(-2 * y + 3);
            x += 1;
        } else {
            d2 += a2 * f64::from(-2 * y + 3);
        }
        y -= 1;
        step(dev, x, y);
    }
}

pub fn draw_ellipse<B: PanelBackend>(
    dev: &mut Device<B>,
    ellipse: &Ellipse,
) -> Result<(), TransportError> {
    let b = ellipse.bbox();
    clear_bbox(dev, b);
    walk(dev, ellipse, |dev, x, y| ellipse.quad(dev, x, y));
    flush_bbox(dev, b)
}

pub fn draw_filled_ellipse<B: PanelBackend>(
    dev: &mut Device<B>,
    ellipse: &Ellipse,
) -> Result<(), TransportError> {
    let b = ellipse.bbox();
    clear_bbox(dev, b);
    walk(dev, ellipse, |dev, x, y| {
        for j in -y..=y {
            ellipse.offset_plot(dev, x, j);
            ellipse.offset_plot(dev, -x, j);
        }
        ellipse.quad(dev, x, y);
    });
    flush_bbox(dev, b)
}
