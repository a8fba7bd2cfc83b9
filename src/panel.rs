//! Component panels: the host-facing surface that owns root components,
//! grid settings, the shared interaction state and the repaint queue.

use crate::component::ComponentId;
use crate::cursor::Cursor;
use crate::error::{Result, SceneError};
use crate::event::{RootEvent, RootEventKind};
use crate::geometry::{Geometry, Rect, Size};
use crate::grid::GridSnap;
use crate::listeners::{ListenerList, RootListener};
use crate::property::{names, PropertyChangeSupport, PropertySource, PropertyValue};
use crate::scene::Scene;
use crate::tool::ComponentPanelTool;
use crate::tooltip::ToolTipManager;
use slint::{Brush, Color};
use std::rc::Rc;

/// Handle to a panel inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub(crate) usize);

impl PanelId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The root layers every panel is created with, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootLayer {
    Background,
    Component,
    Connection,
    Annotation,
    /// Hosts drag shadows while a gesture is in progress.
    Drag,
}

impl RootLayer {
    pub const ALL: [RootLayer; 5] = [
        RootLayer::Background,
        RootLayer::Component,
        RootLayer::Connection,
        RootLayer::Annotation,
        RootLayer::Drag,
    ];

    fn index(self) -> usize {
        match self {
            RootLayer::Background => 0,
            RootLayer::Component => 1,
            RootLayer::Connection => 2,
            RootLayer::Annotation => 3,
            RootLayer::Drag => 4,
        }
    }
}

/// Interaction roles of which a panel has at most one holder each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelRole {
    Focused,
    MouseOver,
    MousePressed,
}

impl PanelRole {
    fn property_name(self) -> &'static str {
        match self {
            PanelRole::Focused => names::FOCUSED_COMPONENT,
            PanelRole::MouseOver => names::MOUSE_OVER_COMPONENT,
            PanelRole::MousePressed => names::MOUSE_PRESSED_COMPONENT,
        }
    }
}

/// Which component currently holds each [`PanelRole`].
#[derive(Default)]
pub struct ComponentPanelState {
    focused: Option<ComponentId>,
    mouse_over: Option<ComponentId>,
    mouse_pressed: Option<ComponentId>,
    properties: PropertyChangeSupport,
}

impl ComponentPanelState {
    pub fn holder(&self, role: PanelRole) -> Option<ComponentId> {
        match role {
            PanelRole::Focused => self.focused,
            PanelRole::MouseOver => self.mouse_over,
            PanelRole::MousePressed => self.mouse_pressed,
        }
    }

    pub fn focused_component(&self) -> Option<ComponentId> {
        self.focused
    }

    pub fn mouse_over_component(&self) -> Option<ComponentId> {
        self.mouse_over
    }

    pub fn mouse_pressed_component(&self) -> Option<ComponentId> {
        self.mouse_pressed
    }

    pub fn properties(&self) -> &PropertyChangeSupport {
        &self.properties
    }

    pub(crate) fn set_holder(&mut self, panel: PanelId, role: PanelRole, holder: Option<ComponentId>) {
        let slot = match role {
            PanelRole::Focused => &mut self.focused,
            PanelRole::MouseOver => &mut self.mouse_over,
            PanelRole::MousePressed => &mut self.mouse_pressed,
        };
        let old = *slot;
        if old == holder {
            return;
        }
        *slot = holder;
        self.properties
            .fire(PropertySource::PanelState(panel), role.property_name(), old, holder);
    }
}

/// A host surface displaying a stack of root components.
pub struct ComponentPanel {
    id: PanelId,
    layers: [ComponentId; 5],
    pub(crate) roots: Vec<ComponentId>,
    snap_to_grid: bool,
    horizontal_grid_enabled: bool,
    vertical_grid_enabled: bool,
    horizontal_grid_spacing: f64,
    vertical_grid_spacing: f64,
    grid_paint: Brush,
    pub(crate) scale: f64,
    pub(crate) visible_rect: Rect,
    pub(crate) preferred_size: Size,
    background: Option<Brush>,
    opaque: bool,
    cursor: Cursor,
    pub(crate) state: ComponentPanelState,
    pub(crate) tooltips: ToolTipManager,
    pub(crate) active_tool: Option<Rc<dyn ComponentPanelTool>>,
    pub(crate) root_listeners: ListenerList<dyn RootListener>,
    pub(crate) root_notification_enabled: bool,
    properties: PropertyChangeSupport,
    dirty: Vec<Rect>,
    repaint_handler: Option<Box<dyn Fn(Rect)>>,
}

impl ComponentPanel {
    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn layer(&self, layer: RootLayer) -> ComponentId {
        self.layers[layer.index()]
    }

    /// All roots in paint order (the five layers first, then any added roots).
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    pub fn contains_root(&self, root: ComponentId) -> bool {
        self.roots.contains(&root)
    }

    pub fn properties(&self) -> &PropertyChangeSupport {
        &self.properties
    }

    pub fn state(&self) -> &ComponentPanelState {
        &self.state
    }

    pub fn tooltip_manager(&self) -> &ToolTipManager {
        &self.tooltips
    }

    pub fn tooltip_manager_mut(&mut self) -> &mut ToolTipManager {
        &mut self.tooltips
    }

    pub fn active_tool(&self) -> Option<&Rc<dyn ComponentPanelTool>> {
        self.active_tool.as_ref()
    }

    pub fn root_listeners_mut(&mut self) -> &mut ListenerList<dyn RootListener> {
        &mut self.root_listeners
    }

    fn fire(&self, name: &'static str, old: impl Into<PropertyValue>, new: impl Into<PropertyValue>) {
        self.properties.fire(PropertySource::Panel(self.id), name, old, new);
    }

    pub fn is_root_notification_enabled(&self) -> bool {
        self.root_notification_enabled
    }

    pub fn set_root_notification_enabled(&mut self, enabled: bool) {
        if self.root_notification_enabled == enabled {
            return;
        }
        self.root_notification_enabled = enabled;
        self.fire(names::ROOT_NOTIFICATION_ENABLED, !enabled, enabled);
    }

    // === Grid ===

    pub fn is_snap_to_grid_enabled(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid_enabled(&mut self, enabled: bool) {
        if self.snap_to_grid == enabled {
            return;
        }
        self.snap_to_grid = enabled;
        self.fire(names::SNAP_TO_GRID_ENABLED, !enabled, enabled);
    }

    pub fn is_horizontal_grid_enabled(&self) -> bool {
        self.horizontal_grid_enabled
    }

    pub fn set_horizontal_grid_enabled(&mut self, enabled: bool) {
        if self.horizontal_grid_enabled == enabled {
            return;
        }
        self.horizontal_grid_enabled = enabled;
        self.fire(names::HORIZONTAL_GRID_ENABLED, !enabled, enabled);
        self.repaint_all();
    }

    pub fn is_vertical_grid_enabled(&self) -> bool {
        self.vertical_grid_enabled
    }

    pub fn set_vertical_grid_enabled(&mut self, enabled: bool) {
        if self.vertical_grid_enabled == enabled {
            return;
        }
        self.vertical_grid_enabled = enabled;
        self.fire(names::VERTICAL_GRID_ENABLED, !enabled, enabled);
        self.repaint_all();
    }

    pub fn horizontal_grid_spacing(&self) -> f64 {
        self.horizontal_grid_spacing
    }

    pub fn set_horizontal_grid_spacing(&mut self, spacing: f64) -> Result<()> {
        let old = self.horizontal_grid_spacing;
        check_spacing(spacing)?;
        if old == spacing {
            return Ok(());
        }
        self.horizontal_grid_spacing = spacing;
        self.fire(names::HORIZONTAL_GRID_SPACING, old, spacing);
        self.repaint_all();
        Ok(())
    }

    pub fn vertical_grid_spacing(&self) -> f64 {
        self.vertical_grid_spacing
    }

    pub fn set_vertical_grid_spacing(&mut self, spacing: f64) -> Result<()> {
        let old = self.vertical_grid_spacing;
        check_spacing(spacing)?;
        if old == spacing {
            return Ok(());
        }
        self.vertical_grid_spacing = spacing;
        self.fire(names::VERTICAL_GRID_SPACING, old, spacing);
        self.repaint_all();
        Ok(())
    }

    pub fn grid_paint(&self) -> &Brush {
        &self.grid_paint
    }

    pub fn set_grid_paint(&mut self, paint: Brush) {
        if self.grid_paint == paint {
            return;
        }
        let old = std::mem::replace(&mut self.grid_paint, paint.clone());
        self.fire(names::GRID_PAINT, Some(old), Some(paint));
        self.repaint_all();
    }

    /// Spacings to snap gestures against, or `None` while snapping is off.
    pub fn grid_snap(&self) -> Option<GridSnap> {
        self.snap_to_grid
            .then(|| GridSnap::new(self.horizontal_grid_spacing, self.vertical_grid_spacing))
    }

    // === Appearance ===

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn visible_rect(&self) -> Rect {
        self.visible_rect
    }

    /// Size the host should give its scrollable area, in device units.
    pub fn preferred_size(&self) -> Size {
        self.preferred_size
    }

    pub fn background(&self) -> Option<&Brush> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, paint: Option<Brush>) {
        if self.background == paint {
            return;
        }
        let old = std::mem::replace(&mut self.background, paint.clone());
        self.fire(names::BACKGROUND, old, paint);
        self.repaint_all();
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    pub fn set_opaque(&mut self, opaque: bool) {
        if self.opaque == opaque {
            return;
        }
        self.opaque = opaque;
        self.fire(names::OPAQUE, !opaque, opaque);
        self.repaint_all();
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor == cursor {
            return;
        }
        let old = std::mem::replace(&mut self.cursor, cursor);
        self.fire(names::CURSOR, old, cursor);
    }

    // === Repaint queue ===

    /// Receive every dirty rectangle as it is queued.
    pub fn set_repaint_handler(&mut self, handler: Option<Box<dyn Fn(Rect)>>) {
        self.repaint_handler = handler;
    }

    /// Drain the dirty rectangles (device space) queued since the last call.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.dirty)
    }

    /// Queue `region` (panel space) for redraw.
    pub(crate) fn repaint(&mut self, region: Rect) {
        if region.is_empty() {
            return;
        }
        let x = (region.x * self.scale).floor();
        let y = (region.y * self.scale).floor();
        let device = Rect::new(
            x,
            y,
            (region.max_x() * self.scale).ceil() - x,
            (region.max_y() * self.scale).ceil() - y,
        );
        log::trace!("panel {:?} dirty {device:?}", self.id);
        if let Some(handler) = &self.repaint_handler {
            handler(device);
        }
        self.dirty.push(device);
    }

    fn repaint_all(&mut self) {
        let visible = self.visible_rect;
        self.repaint(visible);
    }
}

fn check_spacing(spacing: f64) -> Result<()> {
    if spacing < 0.0 || spacing.is_nan() {
        log::warn!("rejecting grid spacing {spacing}");
        return Err(SceneError::NegativeValue {
            what: "grid spacing",
            value: spacing,
        });
    }
    Ok(())
}

impl Scene {
    /// Create a panel with its five root layers, using the scene's config
    /// for grid, scale and tooltip defaults.
    pub fn create_panel(&mut self) -> PanelId {
        let id = PanelId(self.panels.len());
        let layers = RootLayer::ALL.map(|_| self.create_root());
        let config = self.config().clone();
        self.panels.push(ComponentPanel {
            id,
            layers,
            roots: Vec::new(),
            snap_to_grid: config.snap_to_grid,
            horizontal_grid_enabled: false,
            vertical_grid_enabled: false,
            horizontal_grid_spacing: config.horizontal_grid_spacing,
            vertical_grid_spacing: config.vertical_grid_spacing,
            grid_paint: Brush::SolidColor(Color::from_rgb_u8(230, 230, 230)),
            scale: config.scale,
            visible_rect: Rect::default(),
            preferred_size: Size::default(),
            background: Some(Brush::SolidColor(Color::from_rgb_u8(255, 255, 255))),
            opaque: true,
            cursor: Cursor::Default,
            state: ComponentPanelState::default(),
            tooltips: ToolTipManager::from_config(&config),
            active_tool: None,
            root_listeners: ListenerList::new(),
            root_notification_enabled: true,
            properties: PropertyChangeSupport::new(),
            dirty: Vec::new(),
            repaint_handler: None,
        });
        for root in layers {
            if let Err(err) = self.add_root_component(id, root) {
                log::warn!("layer {root:?} not attached to panel {id:?}: {err}");
            }
        }
        log::debug!("created panel {id:?}");
        id
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.panels.iter().map(|p| p.id)
    }

    pub fn set_panel_cursor(&mut self, panel: PanelId, cursor: Cursor) {
        self.panel_mut(panel).set_cursor(cursor);
    }

    /// The panel displaying `id`, resolved through its topmost ancestor.
    pub fn component_panel(&self, id: ComponentId) -> Option<PanelId> {
        self.component(self.root_of(id)).panel
    }

    /// Attach a parentless component on top of the panel's roots. A root
    /// shown by another panel moves to this one.
    pub fn add_root_component(&mut self, panel: PanelId, root: ComponentId) -> Result<()> {
        if !self.is_root_component(root) {
            log::warn!("{root:?} has a parent and cannot join a panel");
            return Err(SceneError::PanelOnNonRoot(root));
        }
        if self.panel(panel).contains_root(root) {
            return Ok(());
        }
        if let Some(previous) = self.component(root).panel {
            self.remove_root_component(previous, root);
        }

        self.panel_mut(panel).roots.push(root);
        self.node_mut(root).panel = Some(panel);
        self.fire_property(root, names::COMPONENT_PANEL, PropertyValue::None, PropertyValue::Opaque);
        self.fire_root_event(panel, RootEventKind::RootsAdded, root);

        self.revalidate(root);
        self.revalidate_panel(panel);
        self.repaint(root);
        Ok(())
    }

    /// Detach a root from the panel. Returns false if it wasn't attached.
    pub fn remove_root_component(&mut self, panel: PanelId, root: ComponentId) -> bool {
        let roots = &mut self.panel_mut(panel).roots;
        let Some(index) = roots.iter().position(|r| *r == root) else {
            return false;
        };
        roots.remove(index);
        let region = self.component(root).preferred_bounds();
        self.panel_mut(panel).repaint(region);

        self.node_mut(root).panel = None;
        self.fire_property(root, names::COMPONENT_PANEL, PropertyValue::Opaque, PropertyValue::None);
        self.fire_root_event(panel, RootEventKind::RootsRemoved, root);
        self.revalidate_panel(panel);
        true
    }

    /// Attach a parentless root to `panel`, or detach it with `None`.
    pub fn set_component_panel(&mut self, root: ComponentId, panel: Option<PanelId>) -> Result<()> {
        if !self.is_root_component(root) {
            log::warn!("{root:?} has a parent and cannot carry a panel");
            return Err(SceneError::PanelOnNonRoot(root));
        }
        match panel {
            Some(panel) => self.add_root_component(panel, root),
            None => {
                if let Some(previous) = self.component(root).panel {
                    self.remove_root_component(previous, root);
                }
                Ok(())
            }
        }
    }

    fn fire_root_event(&self, panel: PanelId, kind: RootEventKind, root: ComponentId) {
        let panel_ref = self.panel(panel);
        if !panel_ref.root_notification_enabled {
            return;
        }
        let evt = RootEvent {
            panel,
            kind,
            roots: vec![root],
        };
        for listener in panel_ref.root_listeners.snapshot() {
            match kind {
                RootEventKind::RootsAdded => listener.roots_added(&evt),
                RootEventKind::RootsRemoved => listener.roots_removed(&evt),
            }
        }
    }

    /// Recompute the panel's preferred size from its visible rect and the
    /// extent of every root, scaled to device units.
    pub fn revalidate_panel(&mut self, panel: PanelId) {
        let panel_ref = self.panel(panel);
        let visible = panel_ref.visible_rect;
        let extent = panel_ref
            .roots
            .iter()
            .map(|root| self.component(*root).bounds())
            .fold(Size::new(visible.width, visible.height), |acc, b| {
                Size::new(acc.width.max(b.max_x()), acc.height.max(b.max_y()))
            });
        let scale = panel_ref.scale;
        let size = Size::new(extent.width * scale, extent.height * scale);

        let old = panel_ref.preferred_size;
        if old == size {
            return;
        }
        let panel_mut = self.panel_mut(panel);
        panel_mut.preferred_size = size;
        panel_mut.fire(names::PREFERRED_SIZE, old, size);
        log::debug!("panel {panel:?} preferred size {size:?}");
    }

    /// Update the viewport; roots re-layout to cover it.
    pub fn set_visible_rect(&mut self, panel: PanelId, visible: Rect) {
        let old = self.panel(panel).visible_rect;
        if old == visible {
            return;
        }
        let panel_mut = self.panel_mut(panel);
        panel_mut.visible_rect = visible;
        panel_mut.fire(names::VISIBLE_RECT, old, visible);

        let roots = self.panel(panel).roots.clone();
        for root in roots {
            self.revalidate(root);
        }
        self.revalidate_panel(panel);
        self.panel_mut(panel).repaint_all();
    }

    pub fn set_panel_scale(&mut self, panel: PanelId, scale: f64) -> Result<()> {
        if scale <= 0.0 || scale.is_nan() {
            log::warn!("rejecting panel scale {scale}");
            return Err(SceneError::NonPositiveScale(scale));
        }
        let old = self.panel(panel).scale;
        if old == scale {
            return Ok(());
        }
        let panel_mut = self.panel_mut(panel);
        panel_mut.scale = scale;
        panel_mut.fire(names::SCALE, old, scale);
        self.revalidate_panel(panel);
        self.panel_mut(panel).repaint_all();
        Ok(())
    }

    /// Deactivate the panel's current tool and activate `tool` in its place.
    ///
    /// If the new tool fails to activate, the previous tool is reinstalled
    /// and reactivated before the error is returned.
    pub fn set_active_tool(&mut self, panel: PanelId, tool: Option<Rc<dyn ComponentPanelTool>>) -> Result<()> {
        let panel_mut = self.panel_mut(panel);
        let old = panel_mut.active_tool.clone();
        let same = match (&old, &tool) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return Ok(());
        }
        if let Some(old) = &old {
            old.deactivate(panel_mut)?;
        }
        panel_mut.active_tool = tool.clone();
        if let Some(tool) = &tool {
            if let Err(err) = tool.activate(panel_mut) {
                log::warn!("tool '{}' failed to activate: {err}", tool.id());
                panel_mut.active_tool = old.clone();
                if let Some(old) = &old {
                    if let Err(restore) = old.activate(panel_mut) {
                        log::warn!("tool '{}' not restored: {restore}", old.id());
                    }
                }
                return Err(err);
            }
            log::debug!("panel {panel:?} activated tool '{}'", tool.id());
        }
        let id = |t: &Option<Rc<dyn ComponentPanelTool>>| {
            t.as_ref().map_or(PropertyValue::None, |t| PropertyValue::Text(t.id()))
        };
        panel_mut.fire(names::ACTIVE_TOOL, id(&old), id(&tool));
        Ok(())
    }

    /// Advance the panel's tooltip clock.
    pub fn tick_tooltips(&mut self, panel: PanelId, elapsed: std::time::Duration) {
        self.panel_mut(panel).tooltips.tick(elapsed);
    }
}
