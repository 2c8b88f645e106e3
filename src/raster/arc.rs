//! Arc rasterizer.
//!
//! Angles are degrees, reduced into [0, 360), counter-clockwise from the
//! +x axis (screen y points down, so counter-clockwise means decreasing
//! screen y above the center). A start angle greater than the end angle
//! sweeps through 0.
//!
//! Points come from a fixed absolute angle grid whose resolution depends
//! only on the radius. Because the grid never shifts with the requested
//! range, splitting a sweep into sub-arcs reproduces the exact same pixel
//! set as drawing it in one call.

use crate::device::{Device, PanelBackend};
use crate::geometry::{clamp_coord, Point};
use crate::raster::{clear_bbox, draw_line, flush_bbox, plot, BBox, Line};
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub center: Point,
    pub radius: u16,
    /// Degrees, reduced into [0, 360) at draw time.
    pub start_degree: u16,
    pub end_degree: u16,
}

impl Arc {
    pub const fn new(center: Point, radius: u16, start_degree: u16, end_degree: u16) -> Self {
        Self {
            center,
            radius,
            start_degree,
            end_degree,
        }
    }

    fn bbox(&self) -> BBox {
        let cx = i32::from(self.center.x);
        let cy = i32::from(self.center.y);
        let r = i32::from(self.radius);
        BBox::new(cx - r, cy - r, cx + r, cy + r)
    }

    fn reduced(&self) -> (u16, u16) {
        (self.start_degree % 360, self.end_degree % 360)
    }
}

/// Grid positions per full turn. Spacing at the rim works out to well
/// under one pixel, so sampled outlines have no holes.
fn grid_len(radius: u16) -> u32 {
    (u32::from(radius) * 8).max(16)
}

/// Whether `angle` lies inside the swept range. Equal endpoints mean a
/// full circle; start > end wraps through 0.
fn in_sweep(angle: f64, start: u16, end: u16) -> bool {
    let s = f64::from(start);
    let e = f64::from(end);
    if start == end {
        true
    } else if start < end {
        s <= angle && angle <= e
    } else {
        angle >= s || angle <= e
    }
}

fn point_at(center: Point, radius: f64, degrees: f64) -> (i32, i32) {
    let rad = degrees.to_radians();
    let x = f64::from(center.x) + radius * rad.cos();
    let y = f64::from(center.y) - radius * rad.sin();
    (x.round() as i32, y.round() as i32)
}

/// Draw the arc outline by sampling the angle grid over the sweep.
pub fn draw_arc<B: PanelBackend>(dev: &mut Device<B>, arc: &Arc) -> Result<(), TransportError> {
    let b = arc.bbox();
    clear_bbox(dev, b);

    let (start, end) = arc.reduced();
    let n = grid_len(arc.radius);
    let r = f64::from(arc.radius);
    for k in 0..n {
        let angle = 360.0 * f64::from(k) / f64::from(n);
        if in_sweep(angle, start, end) {
            let (x, y) = point_at(arc.center, r, angle);
            plot(dev, x, y);
        }
    }

    flush_bbox(dev, b)
}

/// Fill the sector: the two bounding radii plus a radial scan of the wedge.
pub fn draw_filled_arc<B: PanelBackend>(
    dev: &mut Device<B>,
    arc: &Arc,
) -> Result<(), TransportError> {
    let b = arc.bbox();
    clear_bbox(dev, b);

    let (start, end) = arc.reduced();
    let r = f64::from(arc.radius);

    for &edge in &[start, end] {
        let (x, y) = point_at(arc.center, r, f64::from(edge));
        let tip = Point::new(clamp_coord(x), clamp_coord(y));
        draw_line(dev, &Line::new(arc.center, tip))?;
    }

    let n = grid_len(arc.radius);
    for k in 0..n {
        let angle = 360.0 * f64::from(k) / f64::from(n);
        if !in_sweep(angle, start, end) {
            continue;
        }
        for rr in 0..=u32::from(arc.radius) {
            let (x, y) = point_at(arc.center, f64::from(rr), angle);
            plot(dev, x, y);
        }
    }

    flush_bbox(dev, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::test_support::{device_128x64, lit_set};

    #[test]
    fn test_quarter_arc_stays_in_its_quadrant() {
        let mut dev = device_128x64();
        // 0..90 degrees: up and to the right of center
        draw_arc(&mut dev, &Arc::new(Point::new(60, 32), 14, 0, 90)).unwrap();
        let lit = lit_set(&dev);
        assert!(!lit.is_empty());
        for (x, y) in lit {
            assert!(x >= 60 && y <= 32, "({x},{y}) outside quadrant");
        }
    }

    #[test]
    fn test_arc_points_sit_on_the_radius() {
        let mut dev = device_128x64();
        draw_arc(&mut dev, &Arc::new(Point::new(60, 32), 20, 45, 200)).unwrap();
        for (x, y) in lit_set(&dev) {
            let dx = f64::from(i32::from(x) - 60);
            let dy = f64::from(i32::from(y) - 32);
            let r = (dx * dx + dy * dy).sqrt().round() as i32;
            assert!((19..=21).contains(&r), "({x},{y}) at distance {r}");
        }
    }

    #[test]
    fn test_wrapped_arc_equals_concatenated_sub_arcs() {
        let center = Point::new(64, 32);
        let mut whole = device_128x64();
        draw_arc(&mut whole, &Arc::new(center, 18, 330, 30)).unwrap();

        let mut parts = device_128x64();
        draw_arc(&mut parts, &Arc::new(center, 18, 330, 0)).unwrap();
        // second sub-arc must not clear the first one's pixels
        let first: Vec<(u16, u16)> = lit_set(&parts);
        draw_arc(&mut parts, &Arc::new(center, 18, 0, 30)).unwrap();
        for (x, y) in first {
            parts.backend_mut().set_pixel(x, y);
        }

        assert_eq!(lit_set(&whole), lit_set(&parts));
    }

    #[test]
    fn test_equal_angles_draw_full_circle() {
        let mut dev = device_128x64();
        draw_arc(&mut dev, &Arc::new(Point::new(64, 32), 10, 90, 90)).unwrap();
        assert!(dev.backend().pixel(74, 32));
        assert!(dev.backend().pixel(54, 32));
        assert!(dev.backend().pixel(64, 22));
        assert!(dev.backend().pixel(64, 42));
    }

    #[test]
    fn test_sector_fill_includes_center_and_radii() {
        let mut dev = device_128x64();
        draw_filled_arc(&mut dev, &Arc::new(Point::new(64, 32), 12, 0, 90)).unwrap();
        assert!(dev.backend().pixel(64, 32));
        // bounding radius along +x
        assert!(dev.backend().pixel(70, 32));
        assert!(dev.backend().pixel(76, 32));
        // interior of the wedge
        assert!(dev.backend().pixel(69, 27));
        // opposite quadrant untouched
        assert!(!dev.backend().pixel(58, 38));
    }

    #[test]
    fn test_angles_above_360_are_reduced() {
        let center = Point::new(64, 32);
        let mut a = device_128x64();
        draw_arc(&mut a, &Arc::new(center, 10, 370, 450)).unwrap();
        let mut b = device_128x64();
        draw_arc(&mut b, &Arc::new(center, 10, 10, 90)).unwrap();
        assert_eq!(lit_set(&a), lit_set(&b));
    }
}
