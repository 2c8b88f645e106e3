//! Rectangle rasterizer.
//!
//! Rectangles draw corner-inclusive: a rect from (0,0) to (9,9) covers a
//! 10x10 pixel block.

use crate::device::{Device, PanelBackend};
use crate::geometry::Rect;
use crate::raster::{clear_bbox, flush_bbox, BBox};
use crate::transport::TransportError;

fn bbox(rect: &Rect) -> BBox {
    let n = rect.normalized();
    BBox::new(
        i32::from(n.tl.x),
        i32::from(n.tl.y),
        i32::from(n.br.x),
        i32::from(n.br.y),
    )
}

/// Draw the outline. Each edge is walked once; rects collapsed to a single
/// row, column or pixel do not double-draw.
pub fn draw_rect<B: PanelBackend>(dev: &mut Device<B>, rect: &Rect) -> Result<(), TransportError> {
    let b = bbox(rect);
    clear_bbox(dev, b);

    let (lx, ty, rx, by) = (b.lx as u16, b.ty as u16, b.rx as u16, b.by as u16);
    if lx == rx && ty == by {
        dev.set_pixel(lx, ty);
    } else {
        for x in lx..=rx {
            dev.set_pixel(x, ty);
            if by != ty {
                dev.set_pixel(x, by);
            }
        }
        if by - ty >= 2 {
            for y in ty + 1..by {
                dev.set_pixel(lx, y);
                if rx != lx {
                    dev.set_pixel(rx, y);
                }
            }
        }
    }

    flush_bbox(dev, b)
}

/// Fill the whole corner-inclusive interior.
pub fn fill_rect<B: PanelBackend>(dev: &mut Device<B>, rect: &Rect) -> Result<(), TransportError> {
    let b = bbox(rect);
    clear_bbox(dev, b);

    for y in b.ty as u16..=b.by as u16 {
        for x in b.lx as u16..=b.rx as u16 {
            dev.set_pixel(x, y);
        }
    }

    flush_bbox(dev, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::raster::test_support::device_128x64;

    fn rect(x1: u16, y1: u16, x2: u16, y2: u16) -> Rect {
        Rect::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_outline_pixel_count() {
        let mut dev = device_128x64();
        draw_rect(&mut dev, &rect(0, 0, 9, 9)).unwrap();
        // 10x10 perimeter: 4 edges minus shared corners
        assert_eq!(dev.backend().lit_pixels(), 36);
    }

    #[test]
    fn test_outline_then_fill_scenario() {
        let mut dev = device_128x64();
        draw_rect(&mut dev, &rect(0, 0, 9, 9)).unwrap();
        fill_rect(&mut dev, &rect(3, 3, 6, 6)).unwrap();
        assert_eq!(dev.backend().lit_pixels(), 36 + 16);
    }

    #[test]
    fn test_outline_interior_stays_dark() {
        let mut dev = device_128x64();
        draw_rect(&mut dev, &rect(2, 2, 12, 12)).unwrap();
        assert!(!dev.backend().pixel(5, 5));
        assert!(dev.backend().pixel(2, 5));
        assert!(dev.backend().pixel(12, 5));
    }

    #[test]
    fn test_degenerate_single_row() {
        let mut dev = device_128x64();
        draw_rect(&mut dev, &rect(3, 5, 9, 5)).unwrap();
        assert_eq!(dev.backend().lit_pixels(), 7);
    }

    #[test]
    fn test_degenerate_single_pixel() {
        let mut dev = device_128x64();
        draw_rect(&mut dev, &rect(4, 4, 4, 4)).unwrap();
        assert_eq!(dev.backend().lit_pixels(), 1);
        assert!(dev.backend().pixel(4, 4));
    }

    #[test]
    fn test_unnormalized_corners_draw_the_same() {
        let mut a = device_128x64();
        draw_rect(&mut a, &rect(2, 3, 10, 12)).unwrap();
        let mut b = device_128x64();
        draw_rect(&mut b, &rect(10, 12, 2, 3)).unwrap();
        assert_eq!(a.backend().buffer(), b.backend().buffer());
    }

    #[test]
    fn test_fill_clears_stale_bits_inside_box() {
        let mut dev = device_128x64();
        fill_rect(&mut dev, &rect(0, 0, 20, 20)).unwrap();
        fill_rect(&mut dev, &rect(5, 5, 8, 8)).unwrap();
        // second fill cleared its box first, so only its own pixels plus
        // the untouched remainder of the first fill remain
        assert!(dev.backend().pixel(0, 0));
        assert!(dev.backend().pixel(6, 6));
        assert_eq!(dev.backend().lit_pixels(), 21 * 21);
    }
}
