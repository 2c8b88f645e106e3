//! Midpoint circle rasterizer.

use crate::device::{Device, PanelBackend};
use crate::geometry::Point;
use crate::raster::{clear_bbox, flush_bbox, plot, BBox};
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub center: Point,
    pub radius: u16,
}

impl Circle {
    pub const fn new(center: Point, radius: u16) -> Self {
        Self { center, radius }
    }

    fn bbox(&self) -> BBox {
        let cx = i32::from(self.center.x);
        let cy = i32::from(self.center.y);
        let r = i32::from(self.radius);
        BBox::new(cx - r, cy - r, cx + r, cy + r)
    }

    fn offset_plot<B: PanelBackend>(&self, dev: &mut Device<B>, ox: i32, oy: i32) {
        plot(
            dev,
            i32::from(self.center.x) + ox,
            i32::from(self.center.y) + oy,
        );
    }
}

/// Draw the circle outline.
///
/// Single integer decision variable walked through one octant; every step
/// emits all eight symmetric points. A zero radius degenerates to the
/// center pixel.
pub fn draw_circle<B: PanelBackend>(
    dev: &mut Device<B>,
    circle: &Circle,
) -> Result<(), TransportError> {
    let b = circle.bbox();
    clear_bbox(dev, b);

    let mut d = 1 - i32::from(circle.radius);
    let mut x = 0i32;
    let mut y = i32::from(circle.radius);

    circle.offset_plot(dev, x, y);
    circle.offset_plot(dev, -x, -y);
    circle.offset_plot(dev, y, x);
    circle.offset_plot(dev, -y, -x);

    while x < y {
        x += 1;
        if d < 0 {
            d += 2 * x + 1;
        } else {
            y -= 1;
            d += 2 * (x - y) + 1;
        }
        circle.offset_plot(dev, x, y);
        circle.offset_plot(dev, y, x);
        circle.offset_plot(dev, -x, -y);
        circle.offset_plot(dev, -y, -x);
        circle.offset_plot(dev, x, -y);
        circle.offset_plot(dev, y, -x);
        circle.offset_plot(dev, -x, y);
        circle.offset_plot(dev, -y, x);
    }

    flush_bbox(dev, b)
}

/// Draw a filled circle: the outline walk plus the vertical diameter seed
/// span and a pair of spans per octant step.
pub fn draw_filled_circle<B: PanelBackend>(
    dev: &mut Device<B>,
    circle: &Circle,
) -> Result<(), TransportError> {
    let b = circle.bbox();
    clear_bbox(dev, b);

    let mut d = 1 - i32::from(circle.radius);
    let mut x = 0i32;
    let mut y = i32::from(circle.radius);

    circle.offset_plot(dev, x, y);
    circle.offset_plot(dev, -x, -y);
    circle.offset_plot(dev, y, x);
    circle.offset_plot(dev, -y, -x);

    for i in -y..y {
        circle.offset_plot(dev, 0, i);
    }

    while x < y {
        x += 1;
        if d < 0 {
            d += 2 * x + 1;
        } else {
            y -= 1;
            d += 2 * (x - y) + 1;
        }
        circle.offset_plot(dev, x, y);
        circle.offset_plot(dev, y, x);
        circle.offset_plot(dev, -x, -y);
        circle.offset_plot(dev, -y, -x);
        circle.offset_plot(dev, x, -y);
        circle.offset_plot(dev, y, -x);
        circle.offset_plot(dev, -x, y);
        circle.offset_plot(dev, -y, x);
        for i in -y..y {
            circle.offset_plot(dev, x, i);
            circle.offset_plot(dev, -x, i);
        }
        for i in -x..x {
            circle.offset_plot(dev, y, i);
            circle.offset_plot(dev, -y, i);
        }
    }

    flush_bbox(dev, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::test_support::{device_128x64, lit_set};

    #[test]
    fn test_zero_radius_is_one_pixel() {
        let mut dev = device_128x64();
        draw_circle(&mut dev, &Circle::new(Point::new(20, 20), 0)).unwrap();
        assert_eq!(lit_set(&dev), vec![(20, 20)]);
    }

    #[test]
    fn test_outline_points_sit_on_the_radius() {
        let mut dev = device_128x64();
        let c = Circle::new(Point::new(60, 30), 15);
        draw_circle(&mut dev, &c).unwrap();
        for (x, y) in lit_set(&dev) {
            let dx = f64::from(i32::from(x) - 60);
            let dy = f64::from(i32::from(y) - 30);
            let r = (dx * dx + dy * dy).sqrt().round() as i32;
            assert!((14..=16).contains(&r), "({x},{y}) at distance {r}");
        }
    }

    #[test]
    fn test_outline_touches_all_four_extremes() {
        let mut dev = device_128x64();
        draw_circle(&mut dev, &Circle::new(Point::new(60, 30), 12)).unwrap();
        assert!(dev.backend().pixel(60, 18));
        assert!(dev.backend().pixel(60, 42));
        assert!(dev.backend().pixel(48, 30));
        assert!(dev.backend().pixel(72, 30));
    }

    #[test]
    fn test_fill_covers_interior() {
        let mut dev = device_128x64();
        let c = Circle::new(Point::new(40, 32), 10);
        draw_filled_circle(&mut dev, &c).unwrap();
        // center and a few interior points
        assert!(dev.backend().pixel(40, 32));
        assert!(dev.backend().pixel(45, 35));
        assert!(dev.backend().pixel(35, 28));
        // well outside the radius
        assert!(!dev.backend().pixel(40, 45));
        // fill is strictly larger than the outline
        let outline_count = {
            let mut o = device_128x64();
            draw_circle(&mut o, &c).unwrap();
            o.backend().lit_pixels()
        };
        assert!(dev.backend().lit_pixels() > 2 * outline_count);
    }

    #[test]
    fn test_offscreen_quadrants_are_dropped() {
        let mut dev = device_128x64();
        // center near the origin, most of the circle is off-panel
        draw_circle(&mut dev, &Circle::new(Point::new(2, 2), 10)).unwrap();
        for (x, y) in lit_set(&dev) {
            assert!(x < 128 && y < 64);
        }
        assert!(dev.backend().lit_pixels() > 0);
    }
}
