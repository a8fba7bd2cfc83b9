//! Painting the component tree onto a [`DrawSurface`].

use crate::component::ComponentId;
use crate::geometry::{Geometry, Rect, Shape};
use crate::grid::grid_lines;
use crate::painter::{ComponentPainter, DefaultComponentPainter};
use crate::panel::PanelId;
use crate::scene::Scene;
use crate::surface::{DrawSurface, Stroke};

impl Scene {
    /// Paint `id` and its descendants. The surface's user space must be the
    /// component's parent space; it is restored before returning.
    ///
    /// Invisible components and handles hidden by their owner are skipped.
    /// An invalid component is validated first.
    pub fn paint(&mut self, id: ComponentId, surface: &mut dyn DrawSurface) {
        if !self.component(id).is_visible() || self.is_hidden_handle(id) {
            return;
        }
        if !self.component(id).is_valid() {
            self.validate(id);
        }

        let node = self.component(id);
        let clip = surface.clip();
        let preferred = node.preferred_bounds();
        if !preferred.intersects(&clip) {
            return;
        }
        let origin = node.bounds().location();
        let painter = node.painter().cloned();
        let border = node.border().cloned();

        surface.translate(origin.x, origin.y);
        let node = self.component(id);
        match painter {
            Some(painter) => painter.paint_component(node, surface),
            None => DefaultComponentPainter.paint_component(node, surface),
        }
        if let Some(border) = border {
            border.paint_border(node, surface);
        }

        let children = node.children().to_vec();
        if !children.is_empty() {
            // Clip in local space to the part of the preferred bounds still visible
            let local = clip
                .intersection(&preferred)
                .translate(-origin.x, -origin.y);
            surface.set_clip(local);
            for child in children {
                self.paint(child, surface);
            }
            surface.set_clip(clip.translate(-origin.x, -origin.y));
        }
        surface.translate(-origin.x, -origin.y);
    }

    /// Paint a whole panel onto a surface in device space: background, grid
    /// lines, then every root in order.
    pub fn paint_panel(&mut self, panel: PanelId, surface: &mut dyn DrawSurface) {
        let p = self.panel(panel);
        let scale = p.scale();
        if p.is_opaque() {
            if let Some(background) = p.background() {
                let device = surface.clip();
                surface.fill(&Shape::Rect(device), background);
            }
        }

        surface.scale(scale, scale);
        let area = surface.clip();
        let p = self.panel(panel);
        let lines = grid_lines(
            area,
            p.is_horizontal_grid_enabled().then(|| p.horizontal_grid_spacing()),
            p.is_vertical_grid_enabled().then(|| p.vertical_grid_spacing()),
        );
        if !lines.is_empty() {
            let paint = p.grid_paint().clone();
            let stroke = Stroke::solid(1.0 / scale);
            for line in lines {
                surface.stroke(&Shape::Line(line), &paint, &stroke);
            }
        }

        let roots = p.roots().to_vec();
        for root in roots {
            self.paint(root, surface);
        }
        surface.scale(1.0 / scale, 1.0 / scale);
        log::trace!("painted panel {panel:?} over {area:?}");
    }

    /// Paint only the part of `panel` covering `region` (device space).
    pub fn paint_panel_region(&mut self, panel: PanelId, region: Rect, surface: &mut dyn DrawSurface) {
        let clip = surface.clip();
        surface.set_clip(clip.intersection(&region));
        self.paint_panel(panel, surface);
        surface.set_clip(clip);
    }
}
