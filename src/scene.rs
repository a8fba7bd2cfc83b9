//! The scene arena that owns every component and panel.

use crate::component::{Component, ComponentId, ComponentKind};
use crate::config::SceneConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::handle::Coordinate;
use crate::layout::RootFillLayout;
use crate::panel::{ComponentPanel, PanelId};
use std::rc::Rc;

/// Owner of a component graph and the panels displaying it.
///
/// Components live for the lifetime of the scene; detaching one from its
/// container or connection only clears the structural links. All operations
/// that can affect more than one node are methods on `Scene`.
///
/// # Panics
///
/// Methods taking a [`ComponentId`] or [`PanelId`] panic if the id was not
/// produced by this scene.
pub struct Scene {
    pub(crate) components: Vec<Component>,
    pub(crate) panels: Vec<ComponentPanel>,
    config: SceneConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            components: Vec::new(),
            panels: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id.0]
    }

    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|c| c.id())
    }

    pub fn panel(&self, id: PanelId) -> &ComponentPanel {
        &self.panels[id.0]
    }

    pub fn panel_mut(&mut self, id: PanelId) -> &mut ComponentPanel {
        &mut self.panels[id.0]
    }

    /// Create a component of the given kind with empty bounds and no parent.
    ///
    /// Draggable kinds get their drag shadow, roots the root-fill layout and
    /// handles their default look (see [`Scene::create_handle`]).
    pub fn create(&mut self, kind: ComponentKind) -> ComponentId {
        if kind == ComponentKind::Handle {
            return self.create_handle(Coordinate::Center);
        }
        let id = self.push(kind);
        match kind {
            ComponentKind::Root => {
                if let Some(host) = self.node_mut(id).children.as_mut() {
                    host.layout = Some(Rc::new(RootFillLayout));
                }
            }
            ComponentKind::Draggable | ComponentKind::Adjustable => {
                let shadow = self.create_drag_shadow();
                if let Some(drag) = self.node_mut(id).drag.as_mut() {
                    drag.shadow = Some(shadow);
                }
            }
            ComponentKind::Connection => {
                self.node_mut(id).painter = Some(Rc::new(crate::painter::ConnectionPainter));
            }
            _ => {}
        }
        id
    }

    pub(crate) fn push(&mut self, kind: ComponentKind) -> ComponentId {
        let id = ComponentId(self.components.len());
        self.components
            .push(Component::new(id, kind, self.config.connection_width));
        id
    }

    /// A component with fixed bounds.
    pub fn create_component(&mut self, bounds: Rect) -> ComponentId {
        let id = self.create(ComponentKind::Plain);
        self.node_mut(id).bounds = bounds;
        id
    }

    pub fn create_resizable(&mut self, bounds: Rect) -> ComponentId {
        self.create_with_bounds(ComponentKind::Resizable, bounds)
    }

    pub fn create_connected(&mut self, bounds: Rect) -> ComponentId {
        self.create_with_bounds(ComponentKind::Connected, bounds)
    }

    pub fn create_container(&mut self) -> ComponentId {
        self.create(ComponentKind::Container)
    }

    pub fn create_root(&mut self) -> ComponentId {
        self.create(ComponentKind::Root)
    }

    pub fn create_draggable(&mut self, bounds: Rect) -> ComponentId {
        self.create_with_bounds(ComponentKind::Draggable, bounds)
    }

    pub fn create_adjustable(&mut self, bounds: Rect) -> ComponentId {
        self.create_with_bounds(ComponentKind::Adjustable, bounds)
    }

    /// A connection between two connected components. Either endpoint may be
    /// left unset and assigned later.
    pub fn create_connection(
        &mut self,
        source: Option<ComponentId>,
        destination: Option<ComponentId>,
    ) -> Result<ComponentId> {
        let id = self.create(ComponentKind::Connection);
        self.set_source_component(id, source)?;
        self.set_destination_component(id, destination)?;
        Ok(id)
    }

    fn create_with_bounds(&mut self, kind: ComponentKind, bounds: Rect) -> ComponentId {
        let id = self.create(kind);
        self.node_mut(id).bounds = bounds;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut scene = Scene::new();
        let a = scene.create_resizable(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = scene.create_container();
        assert_eq!(a.index() + 1, b.index());
        assert_eq!(scene.component(b).kind(), ComponentKind::Container);
    }

    #[test]
    fn test_root_is_transparent_with_root_fill_layout() {
        let mut scene = Scene::new();
        let root = scene.create_root();
        assert!(!scene.component(root).is_opaque());
        assert!(scene.component(root).container_layout().is_some());
    }

    #[test]
    fn test_draggable_gets_shadow() {
        let mut scene = Scene::new();
        let id = scene.create_draggable(Rect::new(10.0, 10.0, 50.0, 30.0));
        let shadow = scene.component(id).drag_shadow().unwrap();
        assert!(scene.component(shadow).border().is_some());
        assert_eq!(scene.component(shadow).parent(), None);
        assert_eq!(scene.component(id).bounds(), Rect::new(10.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn test_create_connection_links_endpoints() {
        let mut scene = Scene::new();
        let a = scene.create_connected(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = scene.create_connected(Rect::new(50.0, 0.0, 10.0, 10.0));
        let c = scene.create_connection(Some(a), Some(b)).unwrap();
        assert_eq!(scene.component(a).outbound_connections(), &[c]);
        assert_eq!(scene.component(b).inbound_connections(), &[c]);
    }

    #[test]
    fn test_create_connection_rejects_plain_endpoint() {
        let mut scene = Scene::new();
        let plain = scene.create_component(Rect::default());
        let err = scene.create_connection(Some(plain), None).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
