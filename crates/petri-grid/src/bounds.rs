//! Monotone scan rectangle for neighbour-counting passes.

use std::ops::RangeInclusive;

/// The rectangle every neighbour-counting pass must visit.
///
/// Grown by [`include`](Self::include) to cover each written coordinate plus
/// one cell of margin on every side. It never shrinks: clearing a cell does
/// not pull the rectangle back in. An empty rectangle has `min > max` on both
/// axes, so [`xs`](Self::xs) and [`ys`](Self::ys) yield nothing.
///
/// Storage never consults the bounds; they only limit the rule scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl Bounds {
    /// The empty rectangle.
    pub const EMPTY: Bounds = Bounds {
        min_x: i32::MAX,
        max_x: i32::MIN,
        min_y: i32::MAX,
        max_y: i32::MIN,
    };

    /// Grow the rectangle to cover `(x, y)` and its Moore neighbourhood.
    ///
    /// Margin arithmetic saturates at the `i32` limits.
    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x.saturating_sub(1));
        self.max_x = self.max_x.max(x.saturating_add(1));
        self.min_y = self.min_y.min(y.saturating_sub(1));
        self.max_y = self.max_y.max(y.saturating_add(1));
    }

    /// Grow the rectangle to cover `other` as well.
    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Whether nothing has ever been included.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Whether `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Smallest column in the rectangle.
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Largest column in the rectangle.
    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Smallest row in the rectangle.
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Largest row in the rectangle.
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Columns to visit, ascending.
    pub fn xs(&self) -> RangeInclusive<i32> {
        self.min_x..=self.max_x
    }

    /// Rows to visit, ascending.
    pub fn ys(&self) -> RangeInclusive<i32> {
        self.min_y..=self.max_y
    }

    /// Number of coordinates inside the rectangle.
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let w = (self.max_x as i64 - self.min_x as i64 + 1) as u64;
        let h = (self.max_y as i64 - self.min_y as i64 + 1) as u64;
        w.saturating_mul(h)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}
