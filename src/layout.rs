//! Container layout strategies.
//!
//! A strategy computes a container's geometry from its children during
//! validation. Strategies hold no per-container state, so one `Rc` can be
//! shared by every container that uses it.

use crate::component::ComponentId;
use crate::geometry::{Geometry, Rect, Size};
use crate::scene::Scene;

/// Pluggable layout algorithm invoked by [`Scene::layout_container`].
pub trait ContainerLayout {
    /// Lay out `container` and report whether its bounds changed.
    fn layout_container(&self, scene: &mut Scene, container: ComponentId) -> bool;
}

/// Sizes a container to the bounding box of its children's preferred bounds.
///
/// A container without children collapses to `(0, 0, 0, 0)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitToChildrenLayout;

impl ContainerLayout for FitToChildrenLayout {
    fn layout_container(&self, scene: &mut Scene, container: ComponentId) -> bool {
        let old = scene.component(container).bounds();
        let children = scene.component(container).children().to_vec();

        let mut extent: Option<Rect> = None;
        for child in children {
            scene.validate(child);
            let preferred = scene.component(child).preferred_bounds();
            extent = Some(match extent {
                Some(acc) => acc.union(&preferred),
                None => preferred,
            });
        }

        let new = extent.unwrap_or_default();
        scene.set_bounds(container, new);
        scene.component(container).bounds() != old
    }
}

/// Grows a root to cover both its children and the panel's visible area.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootFillLayout;

impl ContainerLayout for RootFillLayout {
    fn layout_container(&self, scene: &mut Scene, container: ComponentId) -> bool {
        let old = scene.component(container).size();
        let children = scene.component(container).children().to_vec();
        for child in children {
            scene.validate(child);
        }

        let mut size = scene.children_extent(container);
        if let Some(panel) = scene.component_panel(container) {
            let visible = scene.panel(panel).visible_rect();
            size = Size::new(size.width.max(visible.width), size.height.max(visible.height));
        }

        scene.set_size(container, size.width, size.height);
        scene.component(container).size() != old
    }
}
