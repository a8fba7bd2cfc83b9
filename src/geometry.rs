//! Geometry values and the read-only geometry contract shared by components.
//!
//! All coordinates are `f64`. Rectangles use the half-open convention for
//! point containment: a point on the right or bottom edge is outside.

/// A point in a component's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle from its origin and size.
    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The smallest rectangle spanning two corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open point containment. Empty rectangles contain nothing.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        !self.is_empty() && x >= self.x && y >= self.y && x < self.max_x() && y < self.max_y()
    }

    /// True when `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.x < self.max_x()
            && other.max_x() > self.x
            && other.y < self.max_y()
            && other.max_y() > self.y
    }

    /// Overlapping area of two rectangles, zero-sized when they don't overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        Rect::new(x, y, (max_x - x).max(0.0), (max_y - y).max(0.0))
    }

    /// Smallest rectangle covering both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(x, y, max_x - x, max_y - y)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Line {
        Line::new(self.start.translate(dx, dy), self.end.translate(dx, dy))
    }

    /// Shortest distance from a point to this segment.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        distance_to_segment_sq((x, y), (self.start.x, self.start.y), (self.end.x, self.end.y))
            .sqrt()
    }
}

fn distance_to_segment_sq(point: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f64::EPSILON {
        // Degenerate segment (a == b)
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = (a.0 + t * ab.0, a.1 + t * ab.1);

    let dx = point.0 - closest.0;
    let dy = point.1 - closest.1;
    dx * dx + dy * dy
}

/// The outline a component paints and hit-tests, in component-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Line(Line),
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(rect) => *rect,
            Shape::Line(line) => line.bounds(),
        }
    }
}

/// Read-only geometry of a scene graph node.
///
/// Bounds are expressed in the coordinate space of the node's parent.
pub trait Geometry {
    fn bounds(&self) -> Rect;

    /// Bounds grown by the node's border width; used for clipping and repaint.
    fn preferred_bounds(&self) -> Rect;

    /// Local outline used by painters and borders, or `None` when there is
    /// nothing to draw.
    fn component_shape(&self) -> Option<Shape>;

    /// Hit test in the parent's coordinate space.
    fn contains(&self, x: f64, y: f64) -> bool;

    fn x(&self) -> f64 {
        self.bounds().x
    }

    fn y(&self) -> f64 {
        self.bounds().y
    }

    fn width(&self) -> f64 {
        self.bounds().width
    }

    fn height(&self) -> f64 {
        self.bounds().height
    }

    fn location(&self) -> Point {
        self.bounds().location()
    }

    fn size(&self) -> Size {
        self.bounds().size()
    }

    fn center(&self) -> Point {
        self.bounds().center()
    }
}
