//! The draw surface capability consumed by painters and borders.
//!
//! The scene never rasterizes anything itself. Hosts implement [`DrawSurface`]
//! over their canvas; [`RecordingSurface`] records device-space operations
//! so they can be replayed later (e.g. into Slint `Path` elements) or
//! inspected in tests.

use crate::geometry::{Line, Point, Rect, Shape};
use slint::Brush;

/// Stroke parameters for outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub dashed: bool,
}

impl Stroke {
    pub const fn solid(width: f64) -> Self {
        Self {
            width,
            dashed: false,
        }
    }

    pub const fn dashed(width: f64) -> Self {
        Self {
            width,
            dashed: true,
        }
    }
}

/// A 2D drawing target with a clip rectangle and an affine origin/scale.
///
/// Clip rectangles are expressed in the surface's current user space, i.e.
/// after the translations and scales applied so far.
pub trait DrawSurface {
    fn clip(&self) -> Rect;
    fn set_clip(&mut self, clip: Rect);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn fill(&mut self, shape: &Shape, paint: &Brush);
    fn stroke(&mut self, shape: &Shape, paint: &Brush, stroke: &Stroke);
}

/// A draw operation captured in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { shape: Shape, paint: Brush },
    Stroke { shape: Shape, paint: Brush, stroke: Stroke },
}

impl DrawOp {
    pub fn shape(&self) -> &Shape {
        match self {
            DrawOp::Fill { shape, .. } | DrawOp::Stroke { shape, .. } => shape,
        }
    }
}

/// A [`DrawSurface`] that records what would have been drawn.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
    device_clip: Rect,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// A surface whose clip initially covers `device_clip`.
    pub fn new(device_clip: Rect) -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            device_clip,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Current user-space origin in device coordinates.
    pub fn origin(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    fn to_device_point(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_x + self.offset_x, p.y * self.scale_y + self.offset_y)
    }

    fn to_device_rect(&self, r: &Rect) -> Rect {
        let origin = self.to_device_point(r.location());
        Rect::new(origin.x, origin.y, r.width * self.scale_x, r.height * self.scale_y)
    }

    fn to_device(&self, shape: &Shape) -> Shape {
        match shape {
            Shape::Rect(rect) => Shape::Rect(self.to_device_rect(rect)),
            Shape::Line(line) => Shape::Line(Line::new(
                self.to_device_point(line.start),
                self.to_device_point(line.end),
            )),
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn clip(&self) -> Rect {
        let c = &self.device_clip;
        Rect::new(
            (c.x - self.offset_x) / self.scale_x,
            (c.y - self.offset_y) / self.scale_y,
            c.width / self.scale_x,
            c.height / self.scale_y,
        )
    }

    fn set_clip(&mut self, clip: Rect) {
        self.device_clip = self.to_device_rect(&clip);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx * self.scale_x;
        self.offset_y += dy * self.scale_y;
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.scale_x *= sx;
        self.scale_y *= sy;
    }

    fn fill(&mut self, shape: &Shape, paint: &Brush) {
        let shape = self.to_device(shape);
        if shape.bounds().intersects(&self.device_clip) {
            self.ops.push(DrawOp::Fill {
                shape,
                paint: paint.clone(),
            });
        }
    }

    fn stroke(&mut self, shape: &Shape, paint: &Brush, stroke: &Stroke) {
        let shape = self.to_device(shape);
        self.ops.push(DrawOp::Stroke {
            shape,
            paint: paint.clone(),
            stroke: *stroke,
        });
    }
}
