//! Triangle rasterizer.

use crate::device::{Device, PanelBackend};
use crate::geometry::Point;
use crate::raster::{clear_bbox, draw_line, flush_bbox, BBox, Line};
use crate::transport::TransportError;

/// Three unordered vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Triangle {
    pub const fn new(p1: Point, p2: Point, p3: Point) -> Self {
        Self { p1, p2, p3 }
    }

    fn bbox(&self) -> BBox {
        BBox::new(
            i32::from(self.p1.x.min(self.p2.x).min(self.p3.x)),
            i32::from(self.p1.y.min(self.p2.y).min(self.p3.y)),
            i32::from(self.p1.x.max(self.p2.x).max(self.p3.x)),
            i32::from(self.p1.y.max(self.p2.y).max(self.p3.y)),
        )
    }
}

/// Outline: three line draws between the vertex pairs.
pub fn draw_triangle<B: PanelBackend>(
    dev: &mut Device<B>,
    triangle: &Triangle,
) -> Result<(), TransportError> {
    let b = triangle.bbox();
    clear_bbox(dev, b);

    draw_line(dev, &Line::new(triangle.p1, triangle.p2))?;
    draw_line(dev, &Line::new(triangle.p2, triangle.p3))?;
    draw_line(dev, &Line::new(triangle.p1, triangle.p3))?;

    flush_bbox(dev, b)
}

/// Even-odd ray cast against the three edges. The edge interpolation runs
/// in i64: the span/height product overflows i32 for far-apart vertices.
fn contains(xs: &[i32; 3], ys: &[i32; 3], x: i32, y: i32) -> bool {
    let mut inside = false;
    let mut j = 2;
    for i in 0..3 {
        if (ys[i] > y) != (ys[j] > y) {
            let edge_x = i64::from(xs[j] - xs[i]) * i64::from(y - ys[i])
                / i64::from(ys[j] - ys[i])
                + i64::from(xs[i]);
            if i64::from(x) < edge_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Fill: bounding-box scan with an even-odd point-in-polygon test per
/// candidate pixel. Cost follows the bounding box, not the triangle area.
pub fn draw_filled_triangle<B: PanelBackend>(
    dev: &mut Device<B>,
    triangle: &Triangle,
) -> Result<(), TransportError> {
    let b = triangle.bbox();
    clear_bbox(dev, b);

    let xs = [
        i32::from(triangle.p1.x),
        i32::from(triangle.p2.x),
        i32::from(triangle.p3.x),
    ];
    let ys = [
        i32::from(triangle.p1.y),
        i32::from(triangle.p2.y),
        i32::from(triangle.p3.y),
    ];

    for x in b.lx..b.rx {
        for y in b.ty..b.by {
            if contains(&xs, &ys, x, y) {
                dev.set_pixel(x as u16, y as u16);
            }
        }
    }

    flush_bbox(dev, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::test_support::{device_128x64, lit_set};

    fn tri(a: (u16, u16), b: (u16, u16), c: (u16, u16)) -> Triangle {
        Triangle::new(
            Point::new(a.0, a.1),
            Point::new(b.0, b.1),
            Point::new(c.0, c.1),
        )
    }

    #[test]
    fn test_outline_passes_through_all_vertices() {
        let mut dev = device_128x64();
        draw_triangle(&mut dev, &tri((10, 10), (40, 15), (20, 40))).unwrap();
        assert!(dev.backend().pixel(10, 10));
        assert!(dev.backend().pixel(40, 15));
        assert!(dev.backend().pixel(20, 40));
    }

    #[test]
    fn test_fill_contains_centroid() {
        let mut dev = device_128x64();
        draw_filled_triangle(&mut dev, &tri((10, 10), (40, 12), (24, 40))).unwrap();
        assert!(dev.backend().pixel(24, 20));
        // bounding box corner outside the triangle stays dark
        assert!(!dev.backend().pixel(10, 40));
    }

    #[test]
    fn test_fill_stays_inside_bbox() {
        let mut dev = device_128x64();
        draw_filled_triangle(&mut dev, &tri((20, 5), (50, 25), (25, 45))).unwrap();
        for (x, y) in lit_set(&dev) {
            assert!((20..=50).contains(&x));
            assert!((5..=45).contains(&y));
        }
    }

    #[test]
    fn test_degenerate_collinear_triangle_fills_nothing() {
        let mut dev = device_128x64();
        draw_filled_triangle(&mut dev, &tri((5, 5), (15, 15), (25, 25))).unwrap();
        // zero-area polygon: the even-odd test never flips twice
        for (x, y) in lit_set(&dev) {
            let d = i32::from(x) - i32::from(y);
            assert!(d.abs() <= 1, "({x},{y}) far from the degenerate edge");
        }
    }

    #[test]
    fn test_inside_test_survives_extreme_coordinates() {
        // sliver spanning the full coordinate range: the edge span/height
        // product is far beyond i32
        let xs = [0, 65535, 0];
        let ys = [0, 40000, 40000];
        assert!(contains(&xs, &ys, 1, 20000));
        assert!(!contains(&xs, &ys, 40000, 20000));
        assert!(!contains(&xs, &ys, 1, 40001));
    }

    #[test]
    fn test_vertex_order_does_not_change_fill() {
        let mut a = device_128x64();
        draw_filled_triangle(&mut a, &tri((10, 10), (40, 12), (24, 40))).unwrap();
        let mut b = device_128x64();
        draw_filled_triangle(&mut b, &tri((24, 40), (10, 10), (40, 12))).unwrap();
        assert_eq!(lit_set(&a), lit_set(&b));
    }
}
