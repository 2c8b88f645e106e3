//! Line rasterizer.

use crate::device::{Device, PanelBackend};
use crate::geometry::Point;
use crate::raster::{flush_bbox, plot, BBox};
use crate::transport::TransportError;

/// A segment between two endpoints. The field names denote logical order,
/// not spatial position; either endpoint may be anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub p_left: Point,
    pub p_right: Point,
}

impl Line {
    pub const fn new(p_left: Point, p_right: Point) -> Self {
        Self { p_left, p_right }
    }

    fn bbox(&self) -> BBox {
        BBox::new(
            i32::from(self.p_left.x.min(self.p_right.x)),
            i32::from(self.p_left.y.min(self.p_right.y)),
            i32::from(self.p_left.x.max(self.p_right.x)),
            i32::from(self.p_left.y.max(self.p_right.y)),
        )
    }
}

/// Draw a line, endpoints inclusive.
///
/// Pure horizontal and vertical segments run as direct row/column fills;
/// everything else goes through Bresenham with octant folding.
pub fn draw_line<B: PanelBackend>(
    dev: &mut Device<B>,
    line: &Line,
) -> Result<(), TransportError> {
    if line.p_left.x == line.p_right.x {
        vertical(dev, line);
    } else if line.p_left.y == line.p_right.y {
        horizontal(dev, line);
    } else {
        bresenham(dev, line);
    }
    flush_bbox(dev, line.bbox())
}

fn vertical<B: PanelBackend>(dev: &mut Device<B>, line: &Line) {
    let x = line.p_left.x;
    let y0 = line.p_left.y.min(line.p_right.y);
    let y1 = line.p_left.y.max(line.p_right.y);
    for y in y0..=y1 {
        dev.set_pixel(x, y);
    }
}

fn horizontal<B: PanelBackend>(dev: &mut Device<B>, line: &Line) {
    let y = line.p_left.y;
    let x0 = line.p_left.x.min(line.p_right.x);
    let x1 = line.p_left.x.max(line.p_right.x);
    for x in x0..=x1 {
        dev.set_pixel(x, y);
    }
}

/// Integer Bresenham. The endpoints are folded into the first octant
/// (dx >= dy >= 0, increasing x) before the decision loop runs, and the
/// same transform is inverted when each point is emitted. The folding is
/// correctness logic: without it 7 of the 8 slope octants draw wrong.
fn bresenham<B: PanelBackend>(dev: &mut Device<B>, line: &Line) {
    let (mut x0, mut y0) = (i32::from(line.p_left.x), i32::from(line.p_left.y));
    let (mut x1, mut y1) = (i32::from(line.p_right.x), i32::from(line.p_right.y));

    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }
    let mut y_inverted = false;
    if y0 > y1 {
        y0 = -y0;
        y1 = -y1;
        y_inverted = true;
    }
    let mut xy_swapped = false;
    if y1 - y0 > x1 - x0 {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
        xy_swapped = true;
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    let incr_e = 2 * dy;
    let incr_ne = 2 * (dy - dx);
    let mut d = 2 * dy - dx;
    let (mut x, mut y) = (x0, y0);

    emit(dev, x, y, y_inverted, xy_swapped);
    while x < x1 {
        x += 1;
        if d < 0 {
            d += incr_e;
        } else {
            y += 1;
            d += incr_ne;
        }
        emit(dev, x, y, y_inverted, xy_swapped);
    }
}

fn emit<B: PanelBackend>(dev: &mut Device<B>, x: i32, y: i32, y_inverted: bool, xy_swapped: bool) {
    let (px, py) = match (y_inverted, xy_swapped) {
        (true, true) => (y, -x),
        (true, false) => (x, -y),
        (false, true) => (y, x),
        (false, false) => (x, y),
    };
    plot(dev, px, py);
}
