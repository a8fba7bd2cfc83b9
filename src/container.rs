//! Containers: ordered children, parent links, hit testing and layout passes.

use crate::component::{ComponentId, ComponentKind};
use crate::error::{Result, SceneError};
use crate::event::{ContainerEvent, ContainerEventKind};
use crate::geometry::{Geometry, Rect};
use crate::layout::ContainerLayout;
use crate::listeners::{ContainerListener, ListenerList};
use crate::property::{names, PropertyValue};
use crate::scene::Scene;
use std::rc::Rc;

/// Child list and layout configuration of a container.
pub(crate) struct ChildHost {
    pub(crate) children: Vec<ComponentId>,
    pub(crate) layout: Option<Rc<dyn ContainerLayout>>,
    pub(crate) layout_enabled: bool,
    pub(crate) listeners: ListenerList<dyn ContainerListener>,
    pub(crate) notification_enabled: bool,
}

impl ChildHost {
    pub(crate) fn for_kind(_kind: ComponentKind) -> Self {
        Self {
            children: Vec::new(),
            layout: None,
            layout_enabled: true,
            listeners: ListenerList::new(),
            notification_enabled: true,
        }
    }
}

impl Scene {
    fn child_host(&self, container: ComponentId) -> Result<&ChildHost> {
        self.component(container)
            .children
            .as_ref()
            .ok_or(SceneError::NotAContainer(container))
    }

    /// Number of children; zero for non-containers.
    pub fn component_count(&self, container: ComponentId) -> usize {
        self.component(container).children().len()
    }

    pub fn component_at(&self, container: ComponentId, index: usize) -> Option<ComponentId> {
        self.component(container).children().get(index).copied()
    }

    pub fn index_of_component(&self, container: ComponentId, child: ComponentId) -> Option<usize> {
        self.component(container).children().iter().position(|c| *c == child)
    }

    pub fn contains_component(&self, container: ComponentId, child: ComponentId) -> bool {
        self.index_of_component(container, child).is_some()
    }

    /// True when `ancestor` appears on `id`'s parent chain.
    pub fn is_ancestor_of(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = self.component(id).parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.component(parent).parent;
        }
        false
    }

    /// The topmost ancestor of `id` (or `id` itself when it has no parent).
    pub fn root_of(&self, id: ComponentId) -> ComponentId {
        let mut current = id;
        while let Some(parent) = self.component(current).parent {
            current = parent;
        }
        current
    }

    /// Append `child` on top of the container's children.
    pub fn add_component(&mut self, container: ComponentId, child: ComponentId) -> Result<()> {
        let index = self.component_count(container);
        self.insert_component(container, index, child)
    }

    /// Insert `child` at `index` (clamped) in the container's z-order.
    ///
    /// Adding a child that is already present is a no-op. The child is
    /// detached from any previous parent first, and loses its own panel
    /// attachment since descendants resolve the panel through their root.
    pub fn insert_component(
        &mut self,
        container: ComponentId,
        index: usize,
        child: ComponentId,
    ) -> Result<()> {
        if self.child_host(container)?.children.contains(&child) {
            return Ok(());
        }
        if child == container || self.is_ancestor_of(child, container) {
            log::warn!("rejecting {child:?} as child of {container:?}: parent cycle");
            return Err(SceneError::ParentCycle { child, container });
        }
        if self.component(child).kind() == ComponentKind::Root {
            log::warn!("rejecting root {child:?} as child of {container:?}");
            return Err(SceneError::RootReparent(child));
        }
        if self.component(child).is_handle() && !self.component(container).is_adjustable() {
            log::warn!("rejecting handle {child:?}: {container:?} is not adjustable");
            return Err(SceneError::NotAdjustable {
                handle: child,
                container,
            });
        }

        if let Some(previous) = self.component(child).parent {
            self.remove_component(previous, child);
        }
        if let Some(panel) = self.component(child).panel {
            self.remove_root_component(panel, child);
            self.node_mut(child).panel = None;
        }

        if let Some(host) = self.node_mut(container).children.as_mut() {
            let index = index.min(host.children.len());
            host.children.insert(index, child);
        }
        self.node_mut(child).parent = Some(container);
        self.fire_property(child, names::PARENT_COMPONENT, None::<ComponentId>, Some(container));
        self.fire_container_event(container, ContainerEventKind::ComponentsAdded, child);

        if self.component(child).is_handle() {
            self.register_handle(container, child);
        }

        self.revalidate(container);
        self.repaint(container);
        Ok(())
    }

    /// Detach `child` from the container. Returns false if it wasn't a child.
    pub fn remove_component(&mut self, container: ComponentId, child: ComponentId) -> bool {
        match self.index_of_component(container, child) {
            Some(index) => self.remove_component_at(container, index).is_some(),
            None => false,
        }
    }

    /// Detach the child at `index`, returning it.
    pub fn remove_component_at(&mut self, container: ComponentId, index: usize) -> Option<ComponentId> {
        let host = self.node_mut(container).children.as_mut()?;
        if index >= host.children.len() {
            return None;
        }
        let child = host.children.remove(index);

        // The removed child repaints where it used to be
        let region = self.component(child).preferred_bounds();
        self.repaint_region(container, region.translate(
            self.component(container).x(),
            self.component(container).y(),
        ));

        self.node_mut(child).parent = None;
        self.fire_property(child, names::PARENT_COMPONENT, Some(container), None::<ComponentId>);
        self.fire_container_event(container, ContainerEventKind::ComponentsRemoved, child);

        if self.component(child).is_handle() {
            self.deregister_handle(container, child);
        }

        self.revalidate(container);
        self.repaint(container);
        Some(child)
    }

    /// Re-parent `child`. `Some(parent)` adds it to that container, `None`
    /// detaches it from its current one. Roots cannot be given a parent.
    pub fn set_parent_component(&mut self, child: ComponentId, parent: Option<ComponentId>) -> Result<()> {
        if self.component(child).kind() == ComponentKind::Root {
            return match parent {
                Some(_) => {
                    log::warn!("root {child:?} cannot be given a parent");
                    Err(SceneError::RootReparent(child))
                }
                None => Ok(()),
            };
        }
        match parent {
            Some(parent) => self.add_component(parent, child),
            None => {
                if let Some(previous) = self.component(child).parent {
                    self.remove_component(previous, child);
                }
                Ok(())
            }
        }
    }

    /// Install a layout strategy; invalidates the container.
    pub fn set_container_layout(
        &mut self,
        container: ComponentId,
        layout: Option<Rc<dyn ContainerLayout>>,
    ) -> Result<()> {
        self.child_host(container)?;
        if let Some(host) = self.node_mut(container).children.as_mut() {
            host.layout = layout;
        }
        self.fire_property(
            container,
            names::CONTAINER_LAYOUT,
            PropertyValue::Opaque,
            PropertyValue::Opaque,
        );
        self.invalidate(container);
        Ok(())
    }

    pub fn set_layout_enabled(&mut self, container: ComponentId, enabled: bool) -> Result<()> {
        self.child_host(container)?;
        let Some(host) = self.node_mut(container).children.as_mut() else {
            return Ok(());
        };
        if host.layout_enabled == enabled {
            return Ok(());
        }
        host.layout_enabled = enabled;
        self.fire_property(container, names::LAYOUT_ENABLED, !enabled, enabled);
        Ok(())
    }

    pub fn container_listeners_mut(
        &mut self,
        container: ComponentId,
    ) -> Option<&mut ListenerList<dyn ContainerListener>> {
        self.node_mut(container)
            .children
            .as_mut()
            .map(|host| &mut host.listeners)
    }

    fn fire_container_event(&self, container: ComponentId, kind: ContainerEventKind, child: ComponentId) {
        let Ok(host) = self.child_host(container) else {
            return;
        };
        if !host.notification_enabled {
            return;
        }
        let listeners = host.listeners.snapshot();
        let evt = ContainerEvent {
            container,
            kind,
            components: vec![child],
        };
        for listener in listeners {
            match kind {
                ContainerEventKind::ComponentsAdded => listener.components_added(&evt),
                ContainerEventKind::ComponentsRemoved => listener.components_removed(&evt),
            }
        }
    }

    // === Hit testing ===

    /// Children containing the point (container-local coordinates), in list order.
    pub fn components_at_location(&self, container: ComponentId, x: f64, y: f64) -> Vec<ComponentId> {
        self.component(container)
            .children()
            .iter()
            .copied()
            .filter(|child| self.contains(*child, x, y))
            .collect()
    }

    /// The first child containing the point, descending into nested
    /// containers. A container child is returned itself when none of its own
    /// children match.
    pub fn component_at_location_recursively(
        &self,
        container: ComponentId,
        x: f64,
        y: f64,
    ) -> Option<ComponentId> {
        let child = self
            .component(container)
            .children()
            .iter()
            .copied()
            .find(|child| self.contains(*child, x, y))?;

        let node = self.component(child);
        if node.is_container() {
            let origin = node.location();
            return Some(
                self.component_at_location_recursively(child, x - origin.x, y - origin.y)
                    .unwrap_or(child),
            );
        }
        Some(child)
    }

    /// Children whose bounds lie entirely within `area`. Empty for a zero-area `area`.
    pub fn components_in_bounds(&self, container: ComponentId, area: Rect) -> Vec<ComponentId> {
        if area.is_empty() {
            return Vec::new();
        }
        self.component(container)
            .children()
            .iter()
            .copied()
            .filter(|child| area.contains_rect(&self.component(*child).bounds()))
            .collect()
    }

    // === Layout ===

    /// Run the container's layout pass.
    ///
    /// Child containers are laid out first. When the strategy reports a
    /// geometry change the parent is laid out too, so changes propagate up
    /// until a pass changes nothing. A root tells its panel to revalidate.
    pub fn layout_container(&mut self, container: ComponentId) {
        let Some(host) = self.component(container).children.as_ref() else {
            return;
        };
        if !host.layout_enabled || self.component(container).valid {
            return;
        }
        let children = host.children.clone();
        let layout = host.layout.clone();

        for child in children {
            if self.component(child).is_container() {
                self.layout_container(child);
            }
        }

        let changed = layout.map_or(false, |layout| layout.layout_container(self, container));
        if changed {
            log::debug!("layout of {container:?} changed its bounds");
            if let Some(parent) = self.component(container).parent {
                self.layout_container(parent);
            }
        }

        if self.is_root_component(container) {
            if let Some(panel) = self.component(container).panel {
                self.revalidate_panel(panel);
            }
        }

        if self.component(container).is_adjustable() {
            self.update_handle_positions(container);
        }
    }

    /// Whether the component is a root, i.e. has no parent. Roots only
    /// route events to their children and are the only components a panel
    /// can hold.
    pub fn is_root_component(&self, id: ComponentId) -> bool {
        self.component(id).parent.is_none()
    }
}
