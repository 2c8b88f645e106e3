//! Geometry kernel: coordinate, size and rectangle value types.
//!
//! Everything here is a pure value computation with no device access.
//! Positions are unsigned 16-bit; every calculation that could leave that
//! range goes through a signed 32-bit intermediate and comes back through
//! [`clamp_coord`]. Differences are signed and never clamped.

/// Saturating cast from the signed intermediate back to a coordinate.
#[inline]
pub fn clamp_coord(v: i32) -> u16 {
    if v < 0 {
        0
    } else if v > i32::from(u16::MAX) {
        u16::MAX
    } else {
        v as u16
    }
}

/// A pixel position on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

/// Signed difference between two points. Not clamped: it is a delta,
/// not a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Component-wise add, saturating at the coordinate maximum.
    #[inline]
    pub fn saturating_add(self, other: Point) -> Point {
        let x = u32::from(self.x) + u32::from(other.x);
        let y = u32::from(self.y) + u32::from(other.y);
        Point {
            x: x.min(u32::from(u16::MAX)) as u16,
            y: y.min(u32::from(u16::MAX)) as u16,
        }
    }

    /// Component-wise subtraction in a signed intermediate.
    #[inline]
    pub fn sub(self, other: Point) -> Delta {
        Delta {
            dx: i32::from(self.x) - i32::from(other.x),
            dy: i32::from(self.y) - i32::from(other.y),
        }
    }
}

/// Width/height pair derived from rectangles or describing bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// Cohen-Sutherland outcodes
const CS_LEFT: u8 = 1 << 0;
const CS_RIGHT: u8 = 1 << 1;
const CS_BOTTOM: u8 = 1 << 2;
const CS_TOP: u8 = 1 << 3;

/// An axis-aligned rectangle stored as two corners.
///
/// Rectangles are plain values: accessors normalize on demand and never
/// mutate in place. After [`Rect::normalized`], `tl.x <= br.x` and
/// `tl.y <= br.y` hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub tl: Point,
    pub br: Point,
}

impl Rect {
    pub const fn new(tl: Point, br: Point) -> Self {
        Self { tl, br }
    }

    /// Build from x/y/w/h in the signed intermediate domain.
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect {
            tl: Point::new(clamp_coord(x), clamp_coord(y)),
            br: Point::new(clamp_coord(x + w), clamp_coord(y + h)),
        }
        .normalized()
    }

    /// Decompose into (x, y, w, h).
    pub fn to_xywh(&self) -> (i32, i32, i32, i32) {
        let n = self.normalized();
        (
            i32::from(n.tl.x),
            i32::from(n.tl.y),
            i32::from(n.br.x) - i32::from(n.tl.x),
            i32::from(n.br.y) - i32::from(n.tl.y),
        )
    }

    /// Reorder corners so the top-left really is top-left.
    pub fn normalized(&self) -> Rect {
        let (x1, x2) = if self.tl.x <= self.br.x {
            (self.tl.x, self.br.x)
        } else {
            (self.br.x, self.tl.x)
        };
        let (y1, y2) = if self.tl.y <= self.br.y {
            (self.tl.y, self.br.y)
        } else {
            (self.br.y, self.tl.y)
        };
        Rect {
            tl: Point::new(x1, y1),
            br: Point::new(x2, y2),
        }
    }

    pub fn width(&self) -> u32 {
        let n = self.normalized();
        u32::from(n.br.x) - u32::from(n.tl.x)
    }

    pub fn height(&self) -> u32 {
        let n = self.normalized();
        u32::from(n.br.y) - u32::from(n.tl.y)
    }

    /// A rectangle is empty when either derived dimension collapses to zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn area(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        self.width() * self.height()
    }

    pub fn size(&self) -> Size {
        if self.is_empty() {
            return Size::default();
        }
        Size::new(self.width(), self.height())
    }

    /// Edge-inclusive containment test.
    pub fn contains_point(&self, p: Point) -> bool {
        let n = self.normalized();
        p.x >= n.tl.x && p.x <= n.br.x && p.y >= n.tl.y && p.y <= n.br.y
    }

    /// Touching edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        if a.br.x < b.tl.x || b.br.x < a.tl.x {
            return false;
        }
        if a.br.y < b.tl.y || b.br.y < a.tl.y {
            return false;
        }
        true
    }

    /// Component-wise max of top-lefts and min of bottom-rights. A disjoint
    /// pair yields an empty rect clamped to a valid position, never an
    /// inverted one.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();

        let lx = a.tl.x.max(b.tl.x);
        let ty = a.tl.y.max(b.tl.y);
        let rx = a.br.x.min(b.br.x).max(lx);
        let by = a.br.y.min(b.br.y).max(ty);

        Rect {
            tl: Point::new(lx, ty),
            br: Point::new(rx, by),
        }
    }

    /// Smallest rect covering both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();
        Rect {
            tl: Point::new(a.tl.x.min(b.tl.x), a.tl.y.min(b.tl.y)),
            br: Point::new(a.br.x.max(b.br.x), a.br.y.max(b.br.y)),
        }
    }

    /// Translate by a signed delta, saturating at the coordinate range.
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        let n = self.normalized();
        Rect {
            tl: Point::new(
                clamp_coord(i32::from(n.tl.x) + dx),
                clamp_coord(i32::from(n.tl.y) + dy),
            ),
            br: Point::new(
                clamp_coord(i32::from(n.br.x) + dx),
                clamp_coord(i32::from(n.br.y) + dy),
            ),
        }
    }

    /// Shrink (positive deltas) or grow (negative) by per-edge amounts.
    /// Opposite edges are clamped so they never cross.
    pub fn inset(&self, left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        let n = self.normalized();
        let lx = i32::from(n.tl.x) + left;
        let ty = i32::from(n.tl.y) + top;
        let rx = (i32::from(n.br.x) - right).max(lx);
        let by = (i32::from(n.br.y) - bottom).max(ty);
        Rect {
            tl: Point::new(clamp_coord(lx), clamp_coord(ty)),
            br: Point::new(clamp_coord(rx), clamp_coord(by)),
        }
    }

    /// Grow just enough to cover `p`.
    pub fn expand_to_include(&self, p: Point) -> Rect {
        let n = self.normalized();
        Rect {
            tl: Point::new(n.tl.x.min(p.x), n.tl.y.min(p.y)),
            br: Point::new(n.br.x.max(p.x), n.br.y.max(p.y)),
        }
    }

    /// Clip to `[0, screen_w] x [0, screen_h]` without inverting.
    pub fn clamp_to_screen(&self, screen_w: u16, screen_h: u16) -> Rect {
        let n = self.normalized();
        let rx = n.br.x.min(screen_w).max(n.tl.x);
        let by = n.br.y.min(screen_h).max(n.tl.y);
        Rect {
            tl: n.tl,
            br: Point::new(rx, by),
        }
    }

    /// The point inside the rect nearest to `p` (`p` itself when inside).
    pub fn closest_point(&self, p: Point) -> Point {
        let n = self.normalized();
        Point {
            x: p.x.clamp(n.tl.x, n.br.x),
            y: p.y.clamp(n.tl.y, n.br.y),
        }
    }

    /// Euclidean pixel distance from `p` to the rect; 0 when inside.
    pub fn distance_to_point(&self, p: Point) -> u32 {
        let cp = self.closest_point(p);
        let dx = f64::from(i32::from(cp.x) - i32::from(p.x));
        let dy = f64::from(i32::from(cp.y) - i32::from(p.y));
        (dx * dx + dy * dy).sqrt() as u32
    }

    fn outcode(&self, x: i32, y: i32) -> u8 {
        let n = self.normalized();
        let mut code = 0;
        if x < i32::from(n.tl.x) {
            code |= CS_LEFT;
        } else if x > i32::from(n.br.x) {
            code |= CS_RIGHT;
        }
        if y < i32::from(n.tl.y) {
            code |= CS_TOP;
        } else if y > i32::from(n.br.y) {
            code |= CS_BOTTOM;
        }
        code
    }

    /// Cohen-Sutherland segment clipping against this rect.
    ///
    /// Returns the clipped endpoints, or `None` when the segment lies fully
    /// outside. Endpoints already inside come back unchanged. Each loop
    /// iteration moves one endpoint onto a violated edge, strictly clearing
    /// at least one outcode bit, so the loop terminates.
    pub fn clip_line(&self, p0: Point, p1: Point) -> Option<(Point, Point)> {
        let n = self.normalized();
        let (mut x0, mut y0) = (i32::from(p0.x), i32::from(p0.y));
        let (mut x1, mut y1) = (i32::from(p1.x), i32::from(p1.y));
        let mut code0 = n.outcode(x0, y0);
        let mut code1 = n.outcode(x1, y1);

        loop {
            if code0 | code1 == 0 {
                return Some((
                    Point::new(clamp_coord(x0), clamp_coord(y0)),
                    Point::new(clamp_coord(x1), clamp_coord(y1)),
                ));
            }
            if code0 & code1 != 0 {
                return None;
            }

            let out = if code0 != 0 { code0 } else { code1 };
            let (nx, ny);
            if out & CS_TOP != 0 {
                ny = i32::from(n.tl.y);
                nx = x0 + lerp_edge(x1 - x0, ny - y0, y1 - y0);
            } else if out & CS_BOTTOM != 0 {
                ny = i32::from(n.br.y);
                nx = x0 + lerp_edge(x1 - x0, ny - y0, y1 - y0);
            } else if out & CS_RIGHT != 0 {
                nx = i32::from(n.br.x);
                ny = y0 + lerp_edge(y1 - y0, nx - x0, x1 - x0);
            } else {
                nx = i32::from(n.tl.x);
                ny = y0 + lerp_edge(y1 - y0, nx - x0, x1 - x0);
            }

            if out == code0 {
                x0 = nx;
                y0 = ny;
                code0 = n.outcode(x0, y0);
            } else {
                x1 = nx;
                y1 = ny;
                code1 = n.outcode(x1, y1);
            }
        }
    }
}

/// Linear interpolation step for edge intersection, widened to f64 so
/// the products cannot overflow the 32-bit coordinate intermediates.
#[inline]
fn lerp_edge(span: i32, num: i32, den: i32) -> i32 {
    (f64::from(span) * f64::from(num) / f64::from(den)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: u16, y1: u16, x2: u16, y2: u16) -> Rect {
        Rect::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_saturating_add() {
        let p = Point::new(65000, 0).saturating_add(Point::new(1000, 0));
        assert_eq!(p, Point::new(65535, 0));
    }

    #[test]
    fn test_clamp_coord_extremes() {
        assert_eq!(clamp_coord(-50), 0);
        assert_eq!(clamp_coord(100_000), 65535);
        assert_eq!(clamp_coord(1234), 1234);
    }

    #[test]
    fn test_sub_is_signed() {
        let d = Point::new(3, 10).sub(Point::new(30, 2));
        assert_eq!(d, Delta { dx: -27, dy: 8 });
    }

    #[test]
    fn test_normalize_idempotent() {
        let r = rect(40, 50, 10, 20);
        let once = r.normalized();
        assert_eq!(once, once.normalized());
        assert_eq!(once.tl, Point::new(10, 20));
        assert_eq!(once.br, Point::new(40, 50));
    }

    #[test]
    fn test_width_independent_of_corner_order() {
        let a = rect(10, 20, 40, 50);
        let b = rect(40, 50, 10, 20);
        assert_eq!(a.width(), b.width());
        assert_eq!(a.height(), b.height());
        assert_eq!(a.width(), 30);
    }

    #[test]
    fn test_empty_rect() {
        assert!(rect(5, 5, 5, 9).is_empty());
        assert!(!rect(5, 5, 6, 9).is_empty());
        assert_eq!(rect(5, 5, 5, 9).area(), 0);
    }

    #[test]
    fn test_intersection_disjoint_is_empty_not_inverted() {
        let a = rect(0, 0, 10, 10);
        let b = rect(20, 20, 30, 30);
        let i = a.intersection(&b);
        assert!(i.is_empty());
        assert!(i.tl.x <= i.br.x && i.tl.y <= i.br.y);
    }

    #[test]
    fn test_intersection_overlap() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 20, 20);
        assert_eq!(a.intersection(&b), rect(5, 5, 10, 10));
    }

    #[test]
    fn test_union() {
        let a = rect(0, 5, 10, 10);
        let b = rect(5, 0, 20, 8);
        assert_eq!(a.union(&b), rect(0, 0, 20, 10));
    }

    #[test]
    fn test_inset_never_crosses() {
        let r = rect(10, 10, 20, 20);
        let shrunk = r.inset(8, 8, 8, 8);
        assert!(shrunk.tl.x <= shrunk.br.x);
        assert!(shrunk.is_empty());
        let grown = r.inset(-2, -2, -2, -2);
        assert_eq!(grown, rect(8, 8, 22, 22));
    }

    #[test]
    fn test_closest_point_and_distance() {
        let r = rect(10, 10, 20, 20);
        assert_eq!(r.closest_point(Point::new(15, 15)), Point::new(15, 15));
        assert_eq!(r.distance_to_point(Point::new(15, 15)), 0);
        assert_eq!(r.closest_point(Point::new(0, 15)), Point::new(10, 15));
        assert_eq!(r.distance_to_point(Point::new(10, 30)), 10);
        // diagonal: closest corner is (20, 20)
        assert_eq!(r.distance_to_point(Point::new(23, 24)), 5);
    }

    #[test]
    fn test_clip_line_fully_inside() {
        let r = rect(0, 0, 100, 100);
        let (a, b) = r.clip_line(Point::new(10, 10), Point::new(90, 50)).unwrap();
        assert_eq!(a, Point::new(10, 10));
        assert_eq!(b, Point::new(90, 50));
    }

    #[test]
    fn test_clip_line_fully_outside() {
        let r = rect(10, 10, 20, 20);
        assert!(r.clip_line(Point::new(0, 0), Point::new(5, 9)).is_none());
        // both to the right
        assert!(r.clip_line(Point::new(30, 0), Point::new(40, 50)).is_none());
    }

    #[test]
    fn test_clip_line_single_edge_crossing() {
        let r = rect(10, 10, 20, 20);
        // horizontal segment entering through the left edge
        let (a, b) = r.clip_line(Point::new(0, 15), Point::new(15, 15)).unwrap();
        assert_eq!(a, Point::new(10, 15));
        assert_eq!(b, Point::new(15, 15));
    }

    #[test]
    fn test_clip_line_crossing_whole_rect() {
        let r = rect(10, 10, 20, 20);
        let (a, b) = r.clip_line(Point::new(0, 15), Point::new(40, 15)).unwrap();
        assert_eq!(a, Point::new(10, 15));
        assert_eq!(b, Point::new(20, 15));
    }

    #[test]
    fn test_from_xywh_clamps_negative_origin() {
        let r = Rect::from_xywh(-5, -5, 10, 10);
        assert_eq!(r.tl, Point::new(0, 0));
        assert_eq!(r.br, Point::new(5, 5));
    }

    #[test]
    fn test_clamp_to_screen() {
        let r = rect(50, 50, 300, 90);
        let c = r.clamp_to_screen(128, 64);
        assert_eq!(c, rect(50, 50, 128, 64));
    }
}
