pub use kurbo::{Affine, Point, Vec2};

/// Stable identity of a node inside a [`crate::Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Integer-aligned rectangle `[x, x + width) x [y, y + height)`.
///
/// A rect with `width <= 0` or `height <= 0` is empty. [`Rect::INFINITE`] stands for the whole
/// plane and absorbs every union.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// The unbounded plane, used as the bounding box of generators.
    pub const INFINITE: Rect = Rect {
        x: i32::MIN / 2,
        y: i32::MIN / 2,
        width: i32::MAX,
        height: i32::MAX,
    };

    /// Create a rect from origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Return `true` for the distinguished infinite plane.
    pub fn is_infinite(self) -> bool {
        self == Self::INFINITE
    }

    /// Return `true` when the rect covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of covered pixels (0 for empty rects).
    pub fn area(self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (self.width as u64) * (self.height as u64)
    }

    fn x1(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    fn y1(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    fn from_edges(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        let x = sat_i32(x0);
        let y = sat_i32(y0);
        Self {
            x,
            y,
            width: sat_i32(x1 - i64::from(x)),
            height: sat_i32(y1 - i64::from(y)),
        }
    }

    /// Smallest rect enclosing both operands.
    ///
    /// Empty operands are ignored; an infinite operand makes the result infinite.
    pub fn union(self, other: Rect) -> Rect {
        if self.is_infinite() || other.is_infinite() {
            return Self::INFINITE;
        }
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self::from_edges(
            i64::from(self.x).min(i64::from(other.x)),
            i64::from(self.y).min(i64::from(other.y)),
            self.x1().max(other.x1()),
            self.y1().max(other.y1()),
        )
    }

    /// Overlap of both rects, or `None` when they do not overlap.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        if self.is_infinite() {
            return (!other.is_empty()).then_some(other);
        }
        if other.is_infinite() {
            return (!self.is_empty()).then_some(self);
        }
        let x0 = i64::from(self.x).max(i64::from(other.x));
        let y0 = i64::from(self.y).max(i64::from(other.y));
        let x1 = self.x1().min(other.x1());
        let y1 = self.y1().min(other.y1());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self::from_edges(x0, y0, x1, y1))
    }

    /// Return `true` when pixel `(x, y)` lies inside the rect. The infinite plane contains every
    /// pixel.
    pub fn contains_point(self, x: i32, y: i32) -> bool {
        if self.is_infinite() {
            return true;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        x >= i64::from(self.x) && x < self.x1() && y >= i64::from(self.y) && y < self.y1()
    }

    /// Return `true` when `other` lies entirely inside the rect. Empty rects are contained
    /// everywhere; the infinite plane contains everything and is contained only in itself.
    pub fn contains(self, other: Rect) -> bool {
        if other.is_empty() || self.is_infinite() {
            return true;
        }
        if other.is_infinite() {
            return false;
        }
        i64::from(other.x) >= i64::from(self.x)
            && i64::from(other.y) >= i64::from(self.y)
            && other.x1() <= self.x1()
            && other.y1() <= self.y1()
    }

    /// Grow the rect by per-side margins. The infinite plane stays infinite.
    pub fn expand(self, left: i32, right: i32, top: i32, bottom: i32) -> Rect {
        if self.is_infinite() {
            return self;
        }
        Self::from_edges(
            i64::from(self.x) - i64::from(left),
            i64::from(self.y) - i64::from(top),
            self.x1() + i64::from(right),
            self.y1() + i64::from(bottom),
        )
    }

    /// Smallest rect inside `bounds` that holds every pixel a clamp-to-edge read of `self`
    /// can land on.
    ///
    /// On an axis where `self` overlaps `bounds` this is the overlap; otherwise it is the single
    /// edge row/column of `bounds` nearest to `self`. Returns `None` when either rect is empty.
    pub fn clamp_into(self, bounds: Rect) -> Option<Rect> {
        if self.is_empty() || bounds.is_empty() {
            return None;
        }
        if bounds.is_infinite() {
            return Some(self);
        }
        let (x0, x1) = clamp_span(
            i64::from(self.x),
            self.x1(),
            i64::from(bounds.x),
            bounds.x1(),
        );
        let (y0, y1) = clamp_span(
            i64::from(self.y),
            self.y1(),
            i64::from(bounds.y),
            bounds.y1(),
        );
        Some(Self::from_edges(x0, y0, x1, y1))
    }

    /// Split a finite rect into row-major tiles of at most `tile_size` x `tile_size`.
    pub fn tiles(self, tile_size: u32) -> Vec<Rect> {
        if self.is_empty() || self.is_infinite() {
            return Vec::new();
        }
        let step = i64::from(tile_size.max(1));
        let mut out = Vec::new();
        let mut y = i64::from(self.y);
        while y < self.y1() {
            let y1 = (y + step).min(self.y1());
            let mut x = i64::from(self.x);
            while x < self.x1() {
                let x1 = (x + step).min(self.x1());
                out.push(Self::from_edges(x, y, x1, y1));
                x = x1;
            }
            y = y1;
        }
        out
    }
}

fn clamp_span(lo: i64, hi: i64, blo: i64, bhi: i64) -> (i64, i64) {
    let a = lo.max(blo);
    let b = hi.min(bhi);
    if a < b {
        (a, b)
    } else if hi <= blo {
        (blo, blo + 1)
    } else {
        (bhi - 1, bhi)
    }
}

fn sat_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
