//! Component records and the core geometry, flag and validity operations.
//!
//! A [`Component`] is a plain record owned by the [`Scene`] arena. Capabilities
//! (resize policy, connection endpoints, children, drag and resize state) are
//! optional parts chosen by its [`ComponentKind`]. Reads go through the
//! record and its [`Geometry`] impl; writes go through `Scene` so that
//! invalidation, repaint and panel-state hand-off can reach other nodes.

use crate::connected::EndpointHost;
use crate::connection::ConnectionState;
use crate::container::ChildHost;
use crate::cursor::Cursor;
use crate::draggable::DragState;
use crate::event::{ValidationEvent, ValidationEventKind};
use crate::geometry::{Geometry, Point, Rect, Shape, Size};
use crate::handle::{AdjustState, Coordinate, HandleState};
use crate::layout::ContainerLayout;
use crate::listeners::{
    KeyListener, ListenerFamily, ListenerList, Listeners, MouseListener, MouseMotionListener,
    MouseWheelListener, ValidationListener,
};
use crate::painter::{ComponentBorder, ComponentPainter};
use crate::panel::{PanelId, PanelRole};
use crate::property::{names, ComponentModel, PropertyChangeSupport, PropertySource, PropertyValue};
use crate::scene::Scene;
use crate::spacer::Spacer;
use crate::tooltip::ToolTip;
use crate::error::{Result, SceneError};
use slint::Brush;
use std::any::Any;
use std::rc::Rc;

/// Handle to a component inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    /// Position of the component in its scene's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The capability set a component was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Fixed geometry, no capabilities.
    Plain,
    /// Movable/resizable bounds and arrow-key nudging.
    Resizable,
    /// Resizable, and can be the endpoint of connections.
    Connected,
    /// Connected, and owns an ordered list of children.
    Container,
    /// A container that structures a panel layer and never handles input itself.
    Root,
    /// A container that follows the mouse when dragged.
    Draggable,
    /// A draggable container resized through handles.
    Adjustable,
    /// An edge between two connected components.
    Connection,
    /// A resize handle anchored on an adjustable parent.
    Handle,
}

impl ComponentKind {
    pub fn is_resizable(self) -> bool {
        !matches!(self, ComponentKind::Plain | ComponentKind::Connection)
    }

    pub fn is_connected(self) -> bool {
        matches!(
            self,
            ComponentKind::Connected
                | ComponentKind::Container
                | ComponentKind::Root
                | ComponentKind::Draggable
                | ComponentKind::Adjustable
        )
    }

    pub fn is_container(self) -> bool {
        matches!(
            self,
            ComponentKind::Container
                | ComponentKind::Root
                | ComponentKind::Draggable
                | ComponentKind::Adjustable
        )
    }

    pub fn is_draggable(self) -> bool {
        matches!(self, ComponentKind::Draggable | ComponentKind::Adjustable)
    }
}

/// Whether bounds changes may alter position and/or size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePolicy {
    pub movable: bool,
    pub resizable: bool,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            movable: true,
            resizable: true,
        }
    }
}

/// The boolean state flags every component carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Virtual,
    Enabled,
    Visible,
    Opaque,
    Focusable,
    Focused,
    MouseOver,
    MousePressed,
}

impl Flag {
    fn property_name(self) -> &'static str {
        match self {
            Flag::Virtual => names::VIRTUAL,
            Flag::Enabled => names::ENABLED,
            Flag::Visible => names::VISIBLE,
            Flag::Opaque => names::OPAQUE,
            Flag::Focusable => names::FOCUSABLE,
            Flag::Focused => names::FOCUSED,
            Flag::MouseOver => names::MOUSE_OVER,
            Flag::MousePressed => names::MOUSE_PRESSED,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Flags {
    virtual_: bool,
    enabled: bool,
    visible: bool,
    opaque: bool,
    focusable: bool,
    focused: bool,
    mouse_over: bool,
    mouse_pressed: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            virtual_: false,
            enabled: true,
            visible: true,
            opaque: true,
            focusable: true,
            focused: false,
            mouse_over: false,
            mouse_pressed: false,
        }
    }
}

impl Flags {
    fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Virtual => self.virtual_,
            Flag::Enabled => self.enabled,
            Flag::Visible => self.visible,
            Flag::Opaque => self.opaque,
            Flag::Focusable => self.focusable,
            Flag::Focused => self.focused,
            Flag::MouseOver => self.mouse_over,
            Flag::MousePressed => self.mouse_pressed,
        }
    }

    fn slot(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Virtual => &mut self.virtual_,
            Flag::Enabled => &mut self.enabled,
            Flag::Visible => &mut self.visible,
            Flag::Opaque => &mut self.opaque,
            Flag::Focusable => &mut self.focusable,
            Flag::Focused => &mut self.focused,
            Flag::MouseOver => &mut self.mouse_over,
            Flag::MousePressed => &mut self.mouse_pressed,
        }
    }
}

/// A node of the scene graph.
pub struct Component {
    pub(crate) id: ComponentId,
    pub(crate) kind: ComponentKind,
    pub(crate) flags: Flags,
    pub(crate) valid: bool,
    pub(crate) bounds: Rect,
    pub(crate) min_bounds: Rect,
    pub(crate) max_bounds: Rect,
    pub(crate) padding: Spacer,
    pub(crate) background: Option<Brush>,
    pub(crate) foreground: Option<Brush>,
    pub(crate) border: Option<Rc<dyn ComponentBorder>>,
    pub(crate) painter: Option<Rc<dyn ComponentPainter>>,
    pub(crate) cursor: Option<Cursor>,
    pub(crate) saved_panel_cursor: Option<Cursor>,
    pub(crate) tooltip: Option<ToolTip>,
    pub(crate) model: Option<Rc<ComponentModel>>,
    pub(crate) layout_constraints: Option<Rc<dyn Any>>,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) panel: Option<PanelId>,
    pub(crate) properties: PropertyChangeSupport,
    pub(crate) listeners: Listeners,
    pub(crate) policy: Option<ResizePolicy>,
    pub(crate) children: Option<ChildHost>,
    pub(crate) endpoints: Option<EndpointHost>,
    pub(crate) connection: Option<ConnectionState>,
    pub(crate) drag: Option<DragState>,
    pub(crate) adjust: Option<AdjustState>,
    pub(crate) handle: Option<HandleState>,
}

impl Component {
    pub(crate) fn new(id: ComponentId, kind: ComponentKind, connection_width: f64) -> Self {
        let mut flags = Flags::default();
        if kind == ComponentKind::Root {
            flags.opaque = false;
        }
        Self {
            id,
            kind,
            flags,
            valid: false,
            bounds: Rect::default(),
            min_bounds: Rect::new(
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
            ),
            max_bounds: Rect::new(f64::INFINITY, f64::INFINITY, f64::INFINITY, f64::INFINITY),
            padding: Spacer::EMPTY,
            background: None,
            foreground: None,
            border: None,
            painter: None,
            cursor: None,
            saved_panel_cursor: None,
            tooltip: None,
            model: None,
            layout_constraints: None,
            parent: None,
            panel: None,
            properties: PropertyChangeSupport::new(),
            listeners: Listeners::default(),
            policy: kind.is_resizable().then(ResizePolicy::default),
            children: kind.is_container().then(|| ChildHost::for_kind(kind)),
            endpoints: kind.is_connected().then(EndpointHost::default),
            connection: (kind == ComponentKind::Connection)
                .then(|| ConnectionState::new(connection_width)),
            drag: kind.is_draggable().then(DragState::default),
            adjust: (kind == ComponentKind::Adjustable).then(AdjustState::default),
            handle: (kind == ComponentKind::Handle).then(|| HandleState::new(Coordinate::Center)),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.flags.get(flag)
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.virtual_
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.flags.visible
    }

    pub fn is_opaque(&self) -> bool {
        self.flags.opaque
    }

    pub fn is_focusable(&self) -> bool {
        self.flags.focusable
    }

    pub fn is_focused(&self) -> bool {
        self.flags.focused
    }

    pub fn is_mouse_over(&self) -> bool {
        self.flags.mouse_over
    }

    pub fn is_mouse_pressed(&self) -> bool {
        self.flags.mouse_pressed
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn min_bounds(&self) -> Rect {
        self.min_bounds
    }

    pub fn max_bounds(&self) -> Rect {
        self.max_bounds
    }

    /// A copy of the padding; change it with [`Scene::set_padding`].
    pub fn padding(&self) -> Spacer {
        self.padding
    }

    pub fn background(&self) -> Option<&Brush> {
        self.background.as_ref()
    }

    pub fn foreground(&self) -> Option<&Brush> {
        self.foreground.as_ref()
    }

    pub fn border(&self) -> Option<&Rc<dyn ComponentBorder>> {
        self.border.as_ref()
    }

    pub fn painter(&self) -> Option<&Rc<dyn ComponentPainter>> {
        self.painter.as_ref()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn tooltip(&self) -> Option<&ToolTip> {
        self.tooltip.as_ref()
    }

    pub fn model(&self) -> Option<&Rc<ComponentModel>> {
        self.model.as_ref()
    }

    pub fn layout_constraints(&self) -> Option<&Rc<dyn Any>> {
        self.layout_constraints.as_ref()
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// The panel attached directly to this component. Only roots carry one;
    /// use [`Scene::component_panel`] to resolve it for descendants.
    pub fn attached_panel(&self) -> Option<PanelId> {
        self.panel
    }

    pub fn properties(&self) -> &PropertyChangeSupport {
        &self.properties
    }

    pub fn is_movable(&self) -> bool {
        self.policy.map_or(false, |p| p.movable)
    }

    pub fn is_resizable(&self) -> bool {
        self.policy.map_or(false, |p| p.resizable)
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// True when the component can be a connection endpoint.
    pub fn is_connected(&self) -> bool {
        self.endpoints.is_some()
    }

    pub fn is_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn is_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_adjustable(&self) -> bool {
        self.adjust.is_some()
    }

    pub fn is_draggable_kind(&self) -> bool {
        self.drag.is_some()
    }

    /// Children in z-order (last is topmost). Empty for non-containers.
    pub fn children(&self) -> &[ComponentId] {
        self.children.as_ref().map_or(&[], |host| host.children.as_slice())
    }

    pub fn container_layout(&self) -> Option<&Rc<dyn ContainerLayout>> {
        self.children.as_ref().and_then(|host| host.layout.as_ref())
    }

    pub fn is_layout_enabled(&self) -> bool {
        self.children.as_ref().map_or(false, |host| host.layout_enabled)
    }

    pub fn inbound_connections(&self) -> &[ComponentId] {
        self.endpoints.as_ref().map_or(&[], |host| host.inbound.as_slice())
    }

    pub fn outbound_connections(&self) -> &[ComponentId] {
        self.endpoints.as_ref().map_or(&[], |host| host.outbound.as_slice())
    }

    pub fn connection(&self) -> Option<&ConnectionState> {
        self.connection.as_ref()
    }

    pub fn is_draggable(&self) -> bool {
        self.drag.as_ref().map_or(false, |d| d.draggable)
    }

    pub fn is_mouse_dragging(&self) -> bool {
        self.drag.as_ref().map_or(false, |d| d.mouse_dragging)
    }

    pub fn is_real_time_dragging_enabled(&self) -> bool {
        self.drag.as_ref().map_or(false, |d| d.real_time)
    }

    /// The placeholder moved instead of this component during non-real-time drags.
    pub fn drag_shadow(&self) -> Option<ComponentId> {
        self.drag.as_ref().and_then(|d| d.shadow)
    }

    pub fn show_handles(&self) -> bool {
        self.adjust.as_ref().map_or(false, |a| a.show_handles)
    }

    pub fn active_handle(&self) -> Option<ComponentId> {
        self.adjust.as_ref().and_then(|a| a.active_handle)
    }

    pub fn handles(&self) -> &[ComponentId] {
        self.adjust.as_ref().map_or(&[], |a| a.handles.as_slice())
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.handle.as_ref().map(|h| h.coordinate)
    }

    fn border_width(&self) -> f64 {
        self.border.as_ref().map_or(0.0, |b| b.border_width())
    }
}

impl Geometry for Component {
    fn bounds(&self) -> Rect {
        match &self.connection {
            Some(connection) => connection.bounds(),
            None => self.bounds,
        }
    }

    fn preferred_bounds(&self) -> Rect {
        self.bounds().expand(self.border_width())
    }

    fn component_shape(&self) -> Option<Shape> {
        if let Some(connection) = &self.connection {
            let origin = connection.bounds();
            return connection
                .line()
                .map(|line| Shape::Line(line.translate(-origin.x, -origin.y)));
        }
        let pad = &self.padding;
        Some(Shape::Rect(Rect::new(
            pad.left(),
            pad.top(),
            self.bounds.width - pad.horizontal(),
            self.bounds.height - pad.vertical(),
        )))
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        if !self.flags.visible {
            return false;
        }
        match &self.connection {
            Some(connection) => connection.contains(x, y),
            None => self.bounds.contains_point(x, y),
        }
    }
}

// === Scene operations: flags and appearance ===

impl Scene {
    pub(crate) fn fire_property(
        &self,
        id: ComponentId,
        name: &'static str,
        old: impl Into<PropertyValue>,
        new: impl Into<PropertyValue>,
    ) {
        self.component(id)
            .properties
            .fire(PropertySource::Component(id), name, old, new);
    }

    /// Flip a flag, firing its change notification. Returns false when the
    /// flag already had `value`.
    fn update_flag(&mut self, id: ComponentId, flag: Flag, value: bool) -> bool {
        let slot = self.node_mut(id).flags.slot(flag);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.fire_property(id, flag.property_name(), !value, value);
        true
    }

    pub fn set_virtual(&mut self, id: ComponentId, value: bool) {
        if self.update_flag(id, Flag::Virtual, value) {
            self.repaint(id);
        }
    }

    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) {
        if self.update_flag(id, Flag::Enabled, enabled) {
            self.repaint(id);
        }
    }

    pub fn set_visible(&mut self, id: ComponentId, visible: bool) {
        if self.update_flag(id, Flag::Visible, visible) {
            self.repaint(id);
        }
    }

    pub fn set_opaque(&mut self, id: ComponentId, opaque: bool) {
        if self.update_flag(id, Flag::Opaque, opaque) {
            self.repaint(id);
        }
    }

    /// Making a focused component unfocusable drops its focus first.
    pub fn set_focusable(&mut self, id: ComponentId, focusable: bool) {
        if !focusable && self.component(id).is_focused() {
            self.release_focus(id);
        }
        self.update_flag(id, Flag::Focusable, focusable);
    }

    /// Give or take keyboard focus. Gaining focus evicts the panel's
    /// previously focused component.
    pub fn set_focused(&mut self, id: ComponentId, focused: bool) -> Result<()> {
        if focused && !self.component(id).is_focusable() {
            log::warn!("{id:?} cannot take focus: not focusable");
            return Err(SceneError::NotFocusable(id));
        }
        if self.update_flag(id, Flag::Focused, focused) {
            self.claim_role(id, PanelRole::Focused, focused);
        }
        Ok(())
    }

    fn release_focus(&mut self, id: ComponentId) {
        if self.update_flag(id, Flag::Focused, false) {
            self.claim_role(id, PanelRole::Focused, false);
        }
    }

    /// Track whether the pointer is over the component. Entering swaps in the
    /// component's cursor on its panel; leaving restores the previous one.
    pub fn set_mouse_over(&mut self, id: ComponentId, mouse_over: bool) {
        if !self.update_flag(id, Flag::MouseOver, mouse_over) {
            return;
        }
        self.claim_role(id, PanelRole::MouseOver, mouse_over);

        let Some(panel) = self.component_panel(id) else {
            return;
        };
        if mouse_over {
            if let Some(cursor) = self.component(id).cursor {
                let previous = self.panel(panel).cursor();
                self.node_mut(id).saved_panel_cursor = Some(previous);
                self.set_panel_cursor(panel, cursor);
            }
        } else if let Some(previous) = self.node_mut(id).saved_panel_cursor.take() {
            self.set_panel_cursor(panel, previous);
        }
    }

    pub fn set_mouse_pressed(&mut self, id: ComponentId, pressed: bool) {
        if self.update_flag(id, Flag::MousePressed, pressed) {
            self.claim_role(id, PanelRole::MousePressed, pressed);
        }
    }

    /// Record `id` as the holder of `role` in its panel's state registry,
    /// evicting the previous holder, or release the role.
    pub(crate) fn claim_role(&mut self, id: ComponentId, role: PanelRole, active: bool) {
        let Some(panel) = self.component_panel(id) else {
            return;
        };
        let holder = self.panel(panel).state().holder(role);
        if active {
            if let Some(previous) = holder.filter(|previous| *previous != id) {
                log::trace!("{role:?} moves from {previous:?} to {id:?}");
                match role {
                    PanelRole::Focused => self.release_focus(previous),
                    PanelRole::MouseOver => self.set_mouse_over(previous, false),
                    PanelRole::MousePressed => self.set_mouse_pressed(previous, false),
                }
            }
            self.panel_mut(panel).state.set_holder(panel, role, Some(id));
        } else if holder == Some(id) {
            self.panel_mut(panel).state.set_holder(panel, role, None);
        }
    }

    pub fn set_padding(&mut self, id: ComponentId, padding: Spacer) {
        let old = self.component(id).padding;
        if old == padding {
            return;
        }
        self.node_mut(id).padding = padding;
        self.fire_property(id, names::PADDING, old, padding);
        self.repaint(id);
    }

    pub fn set_background(&mut self, id: ComponentId, paint: Option<Brush>) {
        let old = self.component(id).background.clone();
        if old == paint {
            return;
        }
        self.node_mut(id).background = paint.clone();
        self.fire_property(id, names::BACKGROUND, old, paint);
        self.repaint(id);
    }

    pub fn set_foreground(&mut self, id: ComponentId, paint: Option<Brush>) {
        let old = self.component(id).foreground.clone();
        if old == paint {
            return;
        }
        self.node_mut(id).foreground = paint.clone();
        self.fire_property(id, names::FOREGROUND, old, paint);
        self.repaint(id);
    }

    /// Replace the border; repaints the union of the old and new preferred bounds.
    pub fn set_border(&mut self, id: ComponentId, border: Option<Rc<dyn ComponentBorder>>) {
        if same_strategy(&self.component(id).border, &border) {
            return;
        }
        let old_preferred = self.component(id).preferred_bounds();
        self.node_mut(id).border = border;
        self.fire_property(id, names::BORDER, PropertyValue::Opaque, PropertyValue::Opaque);
        let new_preferred = self.component(id).preferred_bounds();
        self.repaint_region(id, old_preferred.union(&new_preferred));
    }

    pub fn set_painter(&mut self, id: ComponentId, painter: Option<Rc<dyn ComponentPainter>>) {
        if same_strategy(&self.component(id).painter, &painter) {
            return;
        }
        self.node_mut(id).painter = painter;
        self.fire_property(id, names::PAINTER, PropertyValue::Opaque, PropertyValue::Opaque);
        self.repaint(id);
    }

    /// Set the cursor shown while the pointer is over the component.
    pub fn set_cursor(&mut self, id: ComponentId, cursor: Option<Cursor>) {
        let old = self.component(id).cursor;
        if old == cursor {
            return;
        }
        self.node_mut(id).cursor = cursor;
        self.fire_property(id, names::CURSOR, old, cursor);

        if self.component(id).is_mouse_over() {
            if let (Some(panel), Some(cursor)) = (self.component_panel(id), cursor) {
                if self.component(id).saved_panel_cursor.is_none() {
                    let previous = self.panel(panel).cursor();
                    self.node_mut(id).saved_panel_cursor = Some(previous);
                }
                self.set_panel_cursor(panel, cursor);
            }
        }
    }

    pub fn set_tooltip(&mut self, id: ComponentId, tooltip: Option<ToolTip>) {
        let old = self.component(id).tooltip.clone();
        if old == tooltip {
            return;
        }
        self.node_mut(id).tooltip = tooltip.clone();
        let text = |t: Option<ToolTip>| t.map_or(PropertyValue::None, |t| PropertyValue::Text(t.text));
        self.fire_property(id, names::TOOLTIP, text(old), text(tooltip));
    }

    pub fn set_component_model(&mut self, id: ComponentId, model: Option<Rc<ComponentModel>>) {
        let unchanged = match (&self.component(id).model, &model) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        self.node_mut(id).model = model;
        self.fire_property(id, names::COMPONENT_MODEL, PropertyValue::Opaque, PropertyValue::Opaque);
        self.repaint(id);
    }

    /// Attach data for the parent's layout strategy; invalidates the component.
    pub fn set_layout_constraints(&mut self, id: ComponentId, constraints: Option<Rc<dyn Any>>) {
        self.node_mut(id).layout_constraints = constraints;
        self.fire_property(
            id,
            names::LAYOUT_CONSTRAINTS,
            PropertyValue::Opaque,
            PropertyValue::Opaque,
        );
        self.invalidate(id);
    }

    pub fn set_min_bounds(&mut self, id: ComponentId, min_bounds: Rect) {
        let old = self.component(id).min_bounds;
        if old == min_bounds {
            return;
        }
        self.node_mut(id).min_bounds = min_bounds;
        self.fire_property(id, names::MIN_BOUNDS, old, min_bounds);
    }

    pub fn set_max_bounds(&mut self, id: ComponentId, max_bounds: Rect) {
        let old = self.component(id).max_bounds;
        if old == max_bounds {
            return;
        }
        self.node_mut(id).max_bounds = max_bounds;
        self.fire_property(id, names::MAX_BOUNDS, old, max_bounds);
    }

    /// Switch a listener family on or off. Built-in behaviour keeps running
    /// while a family is off; only user listeners are skipped.
    pub fn set_notification_enabled(&mut self, id: ComponentId, family: ListenerFamily, enabled: bool) {
        let node = self.node_mut(id);
        let (slot, name) = match family {
            ListenerFamily::Key => (&mut node.listeners.key_enabled, names::KEY_NOTIFICATION_ENABLED),
            ListenerFamily::Mouse => (&mut node.listeners.mouse_enabled, names::MOUSE_NOTIFICATION_ENABLED),
            ListenerFamily::MouseMotion => (
                &mut node.listeners.mouse_motion_enabled,
                names::MOUSE_MOTION_NOTIFICATION_ENABLED,
            ),
            ListenerFamily::MouseWheel => (
                &mut node.listeners.mouse_wheel_enabled,
                names::MOUSE_WHEEL_NOTIFICATION_ENABLED,
            ),
            ListenerFamily::Validation => (
                &mut node.listeners.validation_enabled,
                names::VALIDATION_NOTIFICATION_ENABLED,
            ),
            ListenerFamily::Container => match node.children.as_mut() {
                Some(host) => (&mut host.notification_enabled, names::CONTAINER_NOTIFICATION_ENABLED),
                None => return,
            },
            ListenerFamily::Connected => match node.endpoints.as_mut() {
                Some(host) => (&mut host.notification_enabled, names::CONNECTED_NOTIFICATION_ENABLED),
                None => return,
            },
        };
        if *slot == enabled {
            return;
        }
        *slot = enabled;
        self.fire_property(id, name, !enabled, enabled);
    }

    pub fn is_notification_enabled(&self, id: ComponentId, family: ListenerFamily) -> bool {
        let node = self.component(id);
        match family {
            ListenerFamily::Key => node.listeners.key_enabled,
            ListenerFamily::Mouse => node.listeners.mouse_enabled,
            ListenerFamily::MouseMotion => node.listeners.mouse_motion_enabled,
            ListenerFamily::MouseWheel => node.listeners.mouse_wheel_enabled,
            ListenerFamily::Validation => node.listeners.validation_enabled,
            ListenerFamily::Container => node.children.as_ref().map_or(false, |h| h.notification_enabled),
            ListenerFamily::Connected => node.endpoints.as_ref().map_or(false, |h| h.notification_enabled),
        }
    }

    pub fn key_listeners_mut(&mut self, id: ComponentId) -> &mut ListenerList<dyn KeyListener> {
        &mut self.node_mut(id).listeners.key
    }

    pub fn mouse_listeners_mut(&mut self, id: ComponentId) -> &mut ListenerList<dyn MouseListener> {
        &mut self.node_mut(id).listeners.mouse
    }

    pub fn mouse_motion_listeners_mut(
        &mut self,
        id: ComponentId,
    ) -> &mut ListenerList<dyn MouseMotionListener> {
        &mut self.node_mut(id).listeners.mouse_motion
    }

    pub fn mouse_wheel_listeners_mut(
        &mut self,
        id: ComponentId,
    ) -> &mut ListenerList<dyn MouseWheelListener> {
        &mut self.node_mut(id).listeners.mouse_wheel
    }

    pub fn validation_listeners_mut(
        &mut self,
        id: ComponentId,
    ) -> &mut ListenerList<dyn ValidationListener> {
        &mut self.node_mut(id).listeners.validation
    }
}

fn same_strategy<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const (),
        (None, None) => true,
        _ => false,
    }
}

// === Scene operations: geometry ===

impl Scene {
    pub fn set_movable(&mut self, id: ComponentId, movable: bool) {
        let Some(policy) = self.node_mut(id).policy.as_mut() else {
            return;
        };
        if policy.movable == movable {
            return;
        }
        policy.movable = movable;
        self.fire_property(id, names::MOVABLE, !movable, movable);
    }

    pub fn set_resizable(&mut self, id: ComponentId, resizable: bool) {
        let Some(policy) = self.node_mut(id).policy.as_mut() else {
            return;
        };
        if policy.resizable == resizable {
            return;
        }
        policy.resizable = resizable;
        self.fire_property(id, names::RESIZABLE, !resizable, resizable);
    }

    /// Move the component. No-op unless it is movable and the location changes.
    pub fn set_location(&mut self, id: ComponentId, x: f64, y: f64) {
        let node = self.component(id);
        if !node.is_movable() {
            return;
        }
        let old = node.bounds;
        if old.x == x && old.y == y {
            return;
        }
        let new = Rect::new(x, y, old.width, old.height);
        self.apply_bounds(id, new, names::LOCATION, old.location().into(), new.location().into());
    }

    /// Resize the component. No-op unless it is resizable and the size changes.
    pub fn set_size(&mut self, id: ComponentId, width: f64, height: f64) {
        let node = self.component(id);
        if !node.is_resizable() {
            return;
        }
        let old = node.bounds;
        if old.width == width && old.height == height {
            return;
        }
        let new = Rect::new(old.x, old.y, width, height);
        self.apply_bounds(id, new, names::SIZE, old.size().into(), new.size().into());
    }

    /// Move and resize the component in one step.
    ///
    /// A non-movable component keeps its position and a non-resizable one its
    /// size; with neither permission the call does nothing.
    pub fn set_bounds(&mut self, id: ComponentId, bounds: Rect) {
        let node = self.component(id);
        let old = node.bounds;
        if old == bounds {
            return;
        }
        let (movable, resizable) = (node.is_movable(), node.is_resizable());
        if !movable && !resizable {
            return;
        }
        let mut new = bounds;
        if !movable {
            new.x = old.x;
            new.y = old.y;
        } else if !resizable {
            new.width = old.width;
            new.height = old.height;
        }
        if new == old {
            return;
        }
        self.apply_bounds(id, new, names::BOUNDS, old.into(), new.into());
    }

    fn apply_bounds(
        &mut self,
        id: ComponentId,
        new: Rect,
        name: &'static str,
        old_value: PropertyValue,
        new_value: PropertyValue,
    ) {
        let old_preferred = self.component(id).preferred_bounds();
        let resized = self.component(id).bounds.size() != new.size();
        self.node_mut(id).bounds = new;
        log::trace!("{id:?} bounds -> {new:?}");

        self.fire_property(id, name, old_value, new_value);
        self.invalidate(id);
        self.invalidate_attached_connections(id);

        let new_preferred = self.component(id).preferred_bounds();
        self.repaint_region(id, old_preferred.union(&new_preferred));

        if resized && self.component(id).is_adjustable() {
            self.update_handle_positions(id);
        }
    }

    /// Hit test in the parent's coordinate space. Handles of an adjustable
    /// component that hides its handles are never hit.
    pub fn contains(&self, id: ComponentId, x: f64, y: f64) -> bool {
        if self.is_hidden_handle(id) {
            return false;
        }
        self.component(id).contains(x, y)
    }

    pub(crate) fn is_hidden_handle(&self, id: ComponentId) -> bool {
        let node = self.component(id);
        node.is_handle()
            && node
                .parent
                .map_or(false, |owner| !self.component(owner).show_handles())
    }

    /// Offset of the component's parent space from panel space.
    pub fn panel_offset(&self, id: ComponentId) -> Point {
        let mut offset = Point::default();
        let mut current = self.component(id).parent;
        while let Some(parent) = current {
            let node = self.component(parent);
            offset = offset.translate(node.bounds.x, node.bounds.y);
            current = node.parent;
        }
        offset
    }

    /// The component's center in panel coordinates.
    pub fn center_on_panel(&self, id: ComponentId) -> Point {
        let offset = self.panel_offset(id);
        self.component(id).center().translate(offset.x, offset.y)
    }
}

// === Scene operations: validity and repaint ===

impl Scene {
    pub fn is_valid(&self, id: ComponentId) -> bool {
        self.component(id).valid
    }

    /// Mark the component invalid, then its connections and its ancestors.
    /// No-op if it is already invalid.
    pub fn invalidate(&mut self, id: ComponentId) {
        if !self.component(id).valid {
            return;
        }
        self.node_mut(id).valid = false;

        let connections = self.attached_connections(id);
        for connection in connections {
            self.invalidate(connection);
        }
        if let Some(parent) = self.component(id).parent {
            self.invalidate(parent);
        }
        self.fire_validation(id, ValidationEventKind::Invalidated);
    }

    /// Bring the component back to a consistent state. Containers lay out
    /// and validate their children first; connected components validate their
    /// connections. No-op if it is already valid.
    pub fn validate(&mut self, id: ComponentId) {
        if self.component(id).valid {
            return;
        }
        if self.component(id).is_connection() {
            self.validate_connection(id);
            return;
        }
        if self.component(id).is_container() {
            self.layout_container(id);
            let children = self.component(id).children().to_vec();
            for child in children {
                self.validate(child);
            }
            // A child's validation can reach back through a parent layout pass
            if self.component(id).valid {
                return;
            }
        }
        let connections = self.attached_connections(id);
        for connection in connections {
            self.validate(connection);
        }
        self.mark_valid(id);
    }

    pub(crate) fn mark_valid(&mut self, id: ComponentId) {
        self.node_mut(id).valid = true;
        self.fire_validation(id, ValidationEventKind::Validated);
    }

    /// Force a full recomputation: `invalidate` followed by `validate`.
    pub fn revalidate(&mut self, id: ComponentId) {
        self.invalidate(id);
        self.validate(id);
    }

    fn fire_validation(&mut self, id: ComponentId, kind: ValidationEventKind) {
        let node = self.component(id);
        if !node.listeners.validation_enabled {
            return;
        }
        let listeners = node.listeners.validation.snapshot();
        let evt = ValidationEvent { source: id, kind };
        for listener in listeners {
            match kind {
                ValidationEventKind::Validated => listener.component_validated(&evt),
                ValidationEventKind::Invalidated => listener.component_invalidated(&evt),
            }
        }
    }

    /// Request a repaint of the component's preferred bounds.
    pub fn repaint(&mut self, id: ComponentId) {
        let region = self.component(id).preferred_bounds();
        self.repaint_region(id, region);
    }

    /// Request a repaint of `region`, given in the component's parent space.
    ///
    /// The region is translated up the ancestor chain and handed to the panel
    /// of the topmost ancestor, if it has one.
    pub fn repaint_region(&mut self, id: ComponentId, region: Rect) {
        let mut region = region;
        let mut current = id;
        while let Some(parent) = self.component(current).parent {
            let origin = self.component(parent).bounds.location();
            region = region.translate(origin.x, origin.y);
            current = parent;
        }
        if let Some(panel) = self.component(current).panel {
            self.panel_mut(panel).repaint(region);
        }
    }

    /// Preferred size a container would need to show all its children.
    pub fn children_extent(&self, id: ComponentId) -> Size {
        self.component(id)
            .children()
            .iter()
            .map(|child| self.component(*child).preferred_bounds())
            .fold(Size::default(), |acc, b| {
                Size::new(acc.width.max(b.max_x()), acc.height.max(b.max_y()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ValidationHandler;
    use crate::painter::LineBorder;
    use std::cell::RefCell;

    fn recorder(scene: &Scene, id: ComponentId) -> Rc<RefCell<Vec<&'static str>>> {
        let names = Rc::new(RefCell::new(Vec::new()));
        let sink = names.clone();
        scene.component(id).properties().add_listener(Rc::new(
            move |evt: &crate::property::PropertyChangeEvent| sink.borrow_mut().push(evt.name),
        ));
        names
    }

    // ========================================================================
    // Defaults
    // ========================================================================

    #[test]
    fn test_default_flags() {
        let mut scene = Scene::new();
        let id = scene.create_component(Rect::new(0.0, 0.0, 10.0, 10.0));
        let node = scene.component(id);
        assert!(node.is_enabled() && node.is_visible() && node.is_opaque() && node.is_focusable());
        assert!(!node.is_virtual() && !node.is_focused() && !node.is_mouse_over());
        assert!(!node.is_valid());
        assert_eq!(node.min_bounds().width, f64::NEG_INFINITY);
        assert_eq!(node.max_bounds().height, f64::INFINITY);
    }

    #[test]
    fn test_plain_component_ignores_bounds_setters() {
        let mut scene = Scene::new();
        let id = scene.create_component(Rect::new(1.0, 2.0, 3.0, 4.0));
        scene.set_location(id, 10.0, 10.0);
        scene.set_bounds(id, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(scene.component(id).bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    // ========================================================================
    // Flags
    // ========================================================================

    #[test]
    fn test_flag_setter_fires_only_on_change() {
        let mut scene = Scene::new();
        let id = scene.create_component(Rect::default());
        let names = recorder(&scene, id);

        scene.set_visible(id, true);
        scene.set_visible(id, false);
        scene.set_visible(id, false);

        assert_eq!(*names.borrow(), vec!["visible"]);
    }

    #[test]
    fn test_focus_requires_focusable() {
        let mut scene = Scene::new();
        let id = scene.create_component(Rect::default());
        scene.set_focusable(id, false);
        let err = scene.set_focused(id, true).unwrap_err();
        assert!(err.is_illegal_state());
        assert!(!scene.component(id).is_focused());
    }

    #[test]
    fn test_unfocusable_drops_focus() {
        let mut scene = Scene::new();
        let id = scene.create_component(Rect::default());
        scene.set_focused(id, true).unwrap();
        scene.set_focusable(id, false);
        assert!(!scene.component(id).is_focused());
    }

    // ========================================================================
    // Bounds Policy
    // ========================================================================

    #[test]
    fn test_set_bounds_not_movable_applies_size_only() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 30.0));
        scene.set_movable(id, false);
        scene.set_bounds(id, Rect::new(40.0, 40.0, 80.0, 60.0));
        assert_eq!(scene.component(id).bounds(), Rect::new(10.0, 10.0, 80.0, 60.0));
    }

    #[test]
    fn test_set_bounds_not_resizable_applies_position_only() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 30.0));
        scene.set_resizable(id, false);
        scene.set_bounds(id, Rect::new(40.0, 40.0, 80.0, 60.0));
        assert_eq!(scene.component(id).bounds(), Rect::new(40.0, 40.0, 50.0, 30.0));
        scene.set_size(id, 1.0, 1.0);
        assert_eq!(scene.component(id).size(), Size::new(50.0, 30.0));
    }

    #[test]
    fn test_set_bounds_neither_flag_is_noop() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 30.0));
        scene.set_movable(id, false);
        scene.set_resizable(id, false);
        let names = recorder(&scene, id);
        scene.set_bounds(id, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(scene.component(id).bounds(), Rect::new(10.0, 10.0, 50.0, 30.0));
        assert!(names.borrow().is_empty());
    }

    #[test]
    fn test_same_location_is_silent_noop() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 30.0));
        scene.validate(id);
        let names = recorder(&scene, id);

        scene.set_location(id, 10.0, 10.0);

        assert!(names.borrow().is_empty());
        assert!(scene.is_valid(id));
    }

    #[test]
    fn test_geometry_change_fires_and_invalidates() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 30.0));
        scene.validate(id);
        let names = recorder(&scene, id);

        scene.set_location(id, 20.0, 10.0);
        scene.set_size(id, 60.0, 30.0);

        assert_eq!(*names.borrow(), vec!["location", "size"]);
        assert!(!scene.is_valid(id));
    }

    #[test]
    fn test_preferred_bounds_include_border() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(10.0, 10.0, 20.0, 20.0));
        let border = LineBorder::new(Brush::default(), 2.0).unwrap();
        scene.set_border(id, Some(Rc::new(border)));
        assert_eq!(
            scene.component(id).preferred_bounds(),
            Rect::new(8.0, 8.0, 24.0, 24.0)
        );
    }

    #[test]
    fn test_component_shape_is_local_and_padded() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(100.0, 100.0, 40.0, 20.0));
        scene.set_padding(id, Spacer::new(1.0, 2.0, 3.0, 4.0).unwrap());
        assert_eq!(
            scene.component(id).component_shape(),
            Some(Shape::Rect(Rect::new(3.0, 1.0, 33.0, 17.0)))
        );
    }

    #[test]
    fn test_invisible_component_contains_nothing() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(scene.contains(id, 5.0, 5.0));
        scene.set_visible(id, false);
        assert!(!scene.contains(id, 5.0, 5.0));
    }

    // ========================================================================
    // Validity
    // ========================================================================

    #[test]
    fn test_validate_and_invalidate_fire_once() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        scene
            .validation_listeners_mut(id)
            .add(Rc::new(ValidationHandler(move |evt: &ValidationEvent| {
                sink.borrow_mut().push(evt.kind)
            })));

        scene.validate(id);
        scene.validate(id);
        scene.invalidate(id);
        scene.invalidate(id);

        assert_eq!(
            *events.borrow(),
            vec![ValidationEventKind::Validated, ValidationEventKind::Invalidated]
        );
    }

    #[test]
    fn test_revalidate_forces_cycle() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.validate(id);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        scene
            .validation_listeners_mut(id)
            .add(Rc::new(ValidationHandler(move |_: &ValidationEvent| *sink.borrow_mut() += 1)));

        scene.revalidate(id);

        assert_eq!(*count.borrow(), 2);
        assert!(scene.is_valid(id));
    }

    #[test]
    fn test_disabled_validation_notification_is_silent() {
        let mut scene = Scene::new();
        let id = scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        scene
            .validation_listeners_mut(id)
            .add(Rc::new(ValidationHandler(move |_: &ValidationEvent| *sink.borrow_mut() += 1)));
        let names = recorder(&scene, id);

        scene.set_notification_enabled(id, ListenerFamily::Validation, false);
        scene.validate(id);

        assert_eq!(*count.borrow(), 0);
        assert_eq!(*names.borrow(), vec!["validationNotificationEnabled"]);
    }
}
