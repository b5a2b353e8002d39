//! Math utilities and types
//!
//! Element geometry lives on an integer pixel grid: positions are offsets in
//! pixels from the screen origin (top-left, y pointing down).

pub use nalgebra::Vector2;

/// 2D integer vector, used both for points and sizes
pub type Vec2 = Vector2<i32>;

/// Axis-aligned rectangle in absolute pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height in pixels
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Left edge (X)
    pub fn left(&self) -> i32 {
        self.origin.x
    }

    /// Right edge (X)
    pub fn right(&self) -> i32 {
        self.origin.x + self.size.x
    }

    /// Top edge (Y)
    pub fn top(&self) -> i32 {
        self.origin.y
    }

    /// Bottom edge (Y)
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.y
    }

    /// Check if a point lies inside the rectangle
    ///
    /// Edges are inclusive on all four sides, so a point on the right or
    /// bottom border still counts as inside.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.left() <= point.x && point.x <= self.right() &&
        self.top() <= point.y && point.y <= self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.left() <= other.left() && other.right() <= self.right() &&
        self.top() <= other.top() && other.bottom() <= self.bottom()
    }
}
