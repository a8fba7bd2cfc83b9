//! Overview (minimap) of a whole panel.
//!
//! An [`Overview`] shows the panel's full preferred area shrunk to its own
//! size, with a rectangle marking the panel's visible region. Pressing or
//! dragging inside the overview re-centres the panel's visible rect on the
//! corresponding panel location.
//!
//! The overview does not own a window. Hosts give it a size, forward their
//! pointer events to it and paint it onto a [`DrawSurface`] of that size.

use crate::geometry::{Point, Rect, Shape, Size};
use crate::panel::PanelId;
use crate::property::{names, PropertyChangeSupport, PropertySource, PropertyValue};
use crate::scene::Scene;
use crate::surface::{DrawSurface, Stroke};
use slint::{Brush, Color};

/// A scaled-down view of one panel.
pub struct Overview {
    panel: Option<PanelId>,
    size: Size,
    show_visible_region: bool,
    visible_region_paint: Brush,
    visible_region_stroke: Stroke,
    pressed: bool,
    properties: PropertyChangeSupport,
}

impl Overview {
    /// An overview of `panel` drawn at `size`.
    pub fn new(panel: Option<PanelId>, size: Size) -> Self {
        Self {
            panel,
            size,
            show_visible_region: true,
            visible_region_paint: Brush::SolidColor(Color::from_rgb_u8(255, 0, 0)),
            visible_region_stroke: Stroke::solid(1.0),
            pressed: false,
            properties: PropertyChangeSupport::new(),
        }
    }

    pub fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub fn set_panel(&mut self, panel: Option<PanelId>) {
        if self.panel == panel {
            return;
        }
        let was_attached = self.panel.is_some();
        self.panel = panel;
        self.pressed = false;
        let value = |attached: bool| {
            if attached {
                PropertyValue::Opaque
            } else {
                PropertyValue::None
            }
        };
        self.fire(names::COMPONENT_PANEL, value(was_attached), value(panel.is_some()));
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        let old = std::mem::replace(&mut self.size, size);
        self.fire(names::SIZE, old, size);
    }

    pub fn is_show_visible_region(&self) -> bool {
        self.show_visible_region
    }

    pub fn set_show_visible_region(&mut self, show: bool) {
        let old = std::mem::replace(&mut self.show_visible_region, show);
        self.fire(names::SHOW_VISIBLE_REGION, old, show);
    }

    pub fn visible_region_paint(&self) -> &Brush {
        &self.visible_region_paint
    }

    pub fn set_visible_region_paint(&mut self, paint: Brush) {
        let old = std::mem::replace(&mut self.visible_region_paint, paint.clone());
        self.fire(names::VISIBLE_REGION_PAINT, Some(old), Some(paint));
    }

    pub fn visible_region_stroke(&self) -> Stroke {
        self.visible_region_stroke
    }

    pub fn set_visible_region_stroke(&mut self, stroke: Stroke) {
        self.visible_region_stroke = stroke;
    }

    pub fn properties(&self) -> &PropertyChangeSupport {
        &self.properties
    }

    /// Whether a press started in the overview and has not been released.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn fire(&self, name: &'static str, old: impl Into<PropertyValue>, new: impl Into<PropertyValue>) {
        self.properties.fire(PropertySource::Overview, name, old, new);
    }

    // === Mapping ===

    /// Horizontal and vertical factors from the panel's preferred size to
    /// the overview size. `None` without a panel or while the panel has an
    /// empty preferred area.
    pub fn overview_scale(&self, scene: &Scene) -> Option<(f64, f64)> {
        let preferred = scene.panel(self.panel?).preferred_size();
        if preferred.width <= 0.0 || preferred.height <= 0.0 {
            return None;
        }
        Some((self.size.width / preferred.width, self.size.height / preferred.height))
    }

    /// The panel's visible rect in overview coordinates.
    pub fn visible_region_in_overview(&self, scene: &Scene) -> Option<Rect> {
        let (sx, sy) = self.content_scale(scene)?;
        let visible = scene.panel(self.panel?).visible_rect();
        Some(Rect::new(
            visible.x * sx,
            visible.y * sy,
            visible.width * sx,
            visible.height * sy,
        ))
    }

    /// Map an overview point to panel coordinates.
    pub fn to_panel_point(&self, scene: &Scene, point: Point) -> Option<Point> {
        let (sx, sy) = self.content_scale(scene)?;
        Some(Point::new(point.x / sx, point.y / sy))
    }

    /// Overview units per panel unit, folding in the panel's own scale.
    fn content_scale(&self, scene: &Scene) -> Option<(f64, f64)> {
        let (sx, sy) = self.overview_scale(scene)?;
        let scale = scene.panel(self.panel?).scale();
        Some((sx * scale, sy * scale))
    }

    // === Input ===

    /// Start a viewport drag at `point` (overview coordinates) and centre
    /// the visible rect on it. Returns false if the overview has no panel
    /// content to map onto.
    pub fn overview_pressed(&mut self, scene: &mut Scene, point: Point) -> bool {
        if !self.center_visible_rect(scene, point) {
            return false;
        }
        self.pressed = true;
        true
    }

    /// Follow the pointer while pressed, keeping the visible rect centred
    /// on it.
    pub fn overview_dragged(&mut self, scene: &mut Scene, point: Point) -> bool {
        if !self.pressed {
            return false;
        }
        self.center_visible_rect(scene, point)
    }

    pub fn overview_released(&mut self) {
        self.pressed = false;
    }

    /// Centre the panel's visible rect on the panel location under `point`,
    /// clamped so it stays within the panel's preferred area.
    fn center_visible_rect(&self, scene: &mut Scene, point: Point) -> bool {
        let (Some(panel), Some(target)) = (self.panel, self.to_panel_point(scene, point)) else {
            return false;
        };
        let p = scene.panel(panel);
        let visible = p.visible_rect();
        let preferred = p.preferred_size();
        let content = Size::new(preferred.width / p.scale(), preferred.height / p.scale());

        let max_x = (content.width - visible.width).max(0.0);
        let max_y = (content.height - visible.height).max(0.0);
        let x = (target.x - visible.width / 2.0).clamp(0.0, max_x);
        let y = (target.y - visible.height / 2.0).clamp(0.0, max_y);
        log::trace!("overview moves panel {panel:?} viewport to ({x}, {y})");
        scene.set_visible_rect(panel, Rect::new(x, y, visible.width, visible.height));
        true
    }

    // === Painting ===

    /// Paint the panel's roots scaled into the overview, then the visible
    /// region marker. The surface's user space is the overview's own.
    ///
    /// The marker is left out while the whole panel is visible.
    pub fn paint_overview(&self, scene: &mut Scene, surface: &mut dyn DrawSurface) {
        let Some(panel) = self.panel else {
            return;
        };
        let p = scene.panel(panel);
        if p.is_opaque() {
            if let Some(background) = p.background() {
                let area = Rect::new(0.0, 0.0, self.size.width, self.size.height);
                surface.fill(&Shape::Rect(area), background);
            }
        }
        let Some((sx, sy)) = self.content_scale(scene) else {
            return;
        };

        surface.scale(sx, sy);
        let roots = scene.panel(panel).roots().to_vec();
        for root in roots {
            scene.paint(root, surface);
        }
        surface.scale(1.0 / sx, 1.0 / sy);

        if !self.show_visible_region {
            return;
        }
        let Some(region) = self.visible_region_in_overview(scene) else {
            return;
        };
        let whole = Rect::new(0.0, 0.0, self.size.width, self.size.height);
        if region.contains_rect(&whole) {
            return;
        }
        surface.stroke(
            &Shape::Rect(region),
            &self.visible_region_paint,
            &self.visible_region_stroke,
        );
    }
}
