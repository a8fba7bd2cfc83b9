//! Painter and border strategies.
//!
//! Strategies are stateless or immutable and shared through `Rc`, so one
//! instance can serve any number of components.

use crate::component::Component;
use crate::error::{Result, SceneError};
use crate::geometry::Geometry;
use crate::surface::{DrawSurface, Stroke};
use slint::{Brush, Color};

/// Paints a component's body in its local coordinate space.
pub trait ComponentPainter {
    fn paint_component(&self, component: &Component, surface: &mut dyn DrawSurface);
}

/// Draws a component's outline and reports how far it extends past the bounds.
pub trait ComponentBorder {
    fn border_width(&self) -> f64;
    fn paint_border(&self, component: &Component, surface: &mut dyn DrawSurface);
}

/// Fills the component shape with its background when the component is opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComponentPainter;

impl ComponentPainter for DefaultComponentPainter {
    fn paint_component(&self, component: &Component, surface: &mut dyn DrawSurface) {
        if !component.is_opaque() {
            return;
        }
        let (Some(background), Some(shape)) = (component.background(), component.component_shape())
        else {
            return;
        };
        surface.fill(&shape, background);
    }
}

/// Strokes a connection's line with its background, falling back to black.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionPainter;

impl ComponentPainter for ConnectionPainter {
    fn paint_component(&self, component: &Component, surface: &mut dyn DrawSurface) {
        let Some(connection) = component.connection() else {
            return;
        };
        let Some(shape) = component.component_shape() else {
            return;
        };
        if connection.width() <= 0.0 {
            return;
        }
        let paint = component
            .background()
            .cloned()
            .unwrap_or_else(|| Brush::SolidColor(Color::from_rgb_u8(0, 0, 0)));
        surface.stroke(&shape, &paint, &Stroke::solid(connection.width()));
    }
}

/// A solid or dashed line drawn along the component shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBorder {
    paint: Brush,
    width: f64,
    dashed: bool,
}

impl Default for LineBorder {
    /// One pixel of solid black.
    fn default() -> Self {
        Self {
            paint: Brush::SolidColor(Color::from_rgb_u8(0, 0, 0)),
            width: 1.0,
            dashed: false,
        }
    }
}

impl LineBorder {
    pub fn new(paint: Brush, width: f64) -> Result<Self> {
        if width < 0.0 || width.is_nan() {
            log::warn!("rejecting border width {width}");
            return Err(SceneError::NegativeValue {
                what: "border width",
                value: width,
            });
        }
        Ok(Self {
            paint,
            width,
            dashed: false,
        })
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn paint(&self) -> &Brush {
        &self.paint
    }

    pub fn is_dashed(&self) -> bool {
        self.dashed
    }
}

impl ComponentBorder for LineBorder {
    fn border_width(&self) -> f64 {
        self.width
    }

    fn paint_border(&self, component: &Component, surface: &mut dyn DrawSurface) {
        if self.width == 0.0 {
            return;
        }
        let Some(shape) = component.component_shape() else {
            return;
        };
        let stroke = Stroke {
            width: self.width,
            dashed: self.dashed,
        };
        surface.stroke(&shape, &self.paint, &stroke);
    }
}
