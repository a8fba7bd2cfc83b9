//! Observable properties.
//!
//! Every stateful entity in the scene (components, panels, the panel state
//! registry, tools and component models) owns a [`PropertyChangeSupport`] and
//! reports `(source, name, old, new)` to its subscribers whenever a value
//! actually changes.

use crate::component::ComponentId;
use crate::cursor::Cursor;
use crate::geometry::{Point, Rect, Size};
use crate::listeners::ListenerList;
use crate::panel::PanelId;
use crate::spacer::Spacer;
use slint::{Brush, SharedString};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Property names reported in [`PropertyChangeEvent::name`].
pub mod names {
    pub const VIRTUAL: &str = "virtual";
    pub const ENABLED: &str = "enabled";
    pub const VISIBLE: &str = "visible";
    pub const OPAQUE: &str = "opaque";
    pub const FOCUSABLE: &str = "focusable";
    pub const FOCUSED: &str = "focused";
    pub const MOUSE_OVER: &str = "mouseOver";
    pub const MOUSE_PRESSED: &str = "mousePressed";
    pub const LOCATION: &str = "location";
    pub const SIZE: &str = "size";
    pub const BOUNDS: &str = "bounds";
    pub const MIN_BOUNDS: &str = "minBounds";
    pub const MAX_BOUNDS: &str = "maxBounds";
    pub const PADDING: &str = "padding";
    pub const BACKGROUND: &str = "background";
    pub const FOREGROUND: &str = "foreground";
    pub const BORDER: &str = "border";
    pub const PAINTER: &str = "painter";
    pub const CURSOR: &str = "cursor";
    pub const TOOLTIP: &str = "toolTip";
    pub const COMPONENT_MODEL: &str = "componentModel";
    pub const LAYOUT_CONSTRAINTS: &str = "layoutConstraints";
    pub const PARENT_COMPONENT: &str = "parentComponent";
    pub const COMPONENT_PANEL: &str = "componentPanel";
    pub const MOVABLE: &str = "movable";
    pub const RESIZABLE: &str = "resizable";
    pub const CONTAINER_LAYOUT: &str = "containerLayout";
    pub const LAYOUT_ENABLED: &str = "layoutEnabled";
    pub const SOURCE_COMPONENT: &str = "sourceComponent";
    pub const DESTINATION_COMPONENT: &str = "destinationComponent";
    pub const DIRECTED: &str = "directed";
    pub const CONNECTION_WIDTH: &str = "connectionWidth";
    pub const DRAGGABLE: &str = "draggable";
    pub const MOUSE_DRAGGING: &str = "mouseDragging";
    pub const DRAG_SHADOW_COMPONENT: &str = "dragShadowComponent";
    pub const REAL_TIME_DRAGGING_ENABLED: &str = "realTimeDraggingEnabled";
    pub const SHOW_HANDLES: &str = "showHandles";
    pub const ACTIVE_HANDLE: &str = "activeHandle";
    pub const KEY_NOTIFICATION_ENABLED: &str = "keyNotificationEnabled";
    pub const MOUSE_NOTIFICATION_ENABLED: &str = "mouseNotificationEnabled";
    pub const MOUSE_MOTION_NOTIFICATION_ENABLED: &str = "mouseMotionNotificationEnabled";
    pub const MOUSE_WHEEL_NOTIFICATION_ENABLED: &str = "mouseWheelNotificationEnabled";
    pub const VALIDATION_NOTIFICATION_ENABLED: &str = "validationNotificationEnabled";
    pub const CONTAINER_NOTIFICATION_ENABLED: &str = "containerNotificationEnabled";
    pub const CONNECTED_NOTIFICATION_ENABLED: &str = "connectedNotificationEnabled";
    pub const ROOT_NOTIFICATION_ENABLED: &str = "rootNotificationEnabled";

    // Panel
    pub const SNAP_TO_GRID_ENABLED: &str = "snapToGridEnabled";
    pub const HORIZONTAL_GRID_ENABLED: &str = "horizontalGridEnabled";
    pub const VERTICAL_GRID_ENABLED: &str = "verticalGridEnabled";
    pub const HORIZONTAL_GRID_SPACING: &str = "horizontalGridSpacing";
    pub const VERTICAL_GRID_SPACING: &str = "verticalGridSpacing";
    pub const GRID_PAINT: &str = "gridPaint";
    pub const SCALE: &str = "scale";
    pub const VISIBLE_RECT: &str = "visibleRect";
    pub const PREFERRED_SIZE: &str = "preferredSize";
    pub const ACTIVE_TOOL: &str = "activeTool";

    // Panel tools
    pub const ACTIVE: &str = "active";

    // Overview
    pub const SHOW_VISIBLE_REGION: &str = "showVisibleRegion";
    pub const VISIBLE_REGION_PAINT: &str = "visibleRegionPaint";

    // Panel state
    pub const FOCUSED_COMPONENT: &str = "focusedComponent";
    pub const MOUSE_OVER_COMPONENT: &str = "mouseOverComponent";
    pub const MOUSE_PRESSED_COMPONENT: &str = "mousePressedComponent";
}

/// A property value carried by a change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    None,
    Bool(bool),
    Number(f64),
    Text(SharedString),
    Point(Point),
    Size(Size),
    Rect(Rect),
    Spacer(Spacer),
    Component(Option<ComponentId>),
    Brush(Option<Brush>),
    Cursor(Cursor),
    /// A strategy or other value without a comparable representation.
    /// Events carrying it always fire.
    Opaque,
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(SharedString::from(value))
    }
}

impl From<SharedString> for PropertyValue {
    fn from(value: SharedString) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Point> for PropertyValue {
    fn from(value: Point) -> Self {
        PropertyValue::Point(value)
    }
}

impl From<Size> for PropertyValue {
    fn from(value: Size) -> Self {
        PropertyValue::Size(value)
    }
}

impl From<Rect> for PropertyValue {
    fn from(value: Rect) -> Self {
        PropertyValue::Rect(value)
    }
}

impl From<Spacer> for PropertyValue {
    fn from(value: Spacer) -> Self {
        PropertyValue::Spacer(value)
    }
}

impl From<Option<ComponentId>> for PropertyValue {
    fn from(value: Option<ComponentId>) -> Self {
        PropertyValue::Component(value)
    }
}

impl From<Option<Brush>> for PropertyValue {
    fn from(value: Option<Brush>) -> Self {
        PropertyValue::Brush(value)
    }
}

impl From<Cursor> for PropertyValue {
    fn from(value: Cursor) -> Self {
        PropertyValue::Cursor(value)
    }
}

impl From<Option<Cursor>> for PropertyValue {
    fn from(value: Option<Cursor>) -> Self {
        value.map_or(PropertyValue::None, PropertyValue::Cursor)
    }
}

/// The entity a property change originated from.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySource {
    Component(ComponentId),
    Panel(PanelId),
    PanelState(PanelId),
    Tool(SharedString),
    Overview,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChangeEvent {
    pub source: PropertySource,
    pub name: &'static str,
    pub old_value: PropertyValue,
    pub new_value: PropertyValue,
}

/// Observer of property changes.
pub trait PropertyChangeListener {
    fn property_changed(&self, evt: &PropertyChangeEvent);
}

impl<F> PropertyChangeListener for F
where
    F: Fn(&PropertyChangeEvent),
{
    fn property_changed(&self, evt: &PropertyChangeEvent) {
        self(evt)
    }
}

/// Subscriber list for one observable entity.
#[derive(Default)]
pub struct PropertyChangeSupport {
    listeners: RefCell<ListenerList<dyn PropertyChangeListener>>,
}

impl PropertyChangeSupport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe; returns false if the listener was already subscribed.
    pub fn add_listener(&self, listener: Rc<dyn PropertyChangeListener>) -> bool {
        self.listeners.borrow_mut().add(listener)
    }

    pub fn remove_listener(&self, listener: &Rc<dyn PropertyChangeListener>) -> bool {
        self.listeners.borrow_mut().remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Notify subscribers, unless old and new values are equal.
    ///
    /// Listeners are snapshotted first so they may subscribe or unsubscribe
    /// while being notified.
    pub fn fire(
        &self,
        source: PropertySource,
        name: &'static str,
        old_value: impl Into<PropertyValue>,
        new_value: impl Into<PropertyValue>,
    ) {
        let old_value = old_value.into();
        let new_value = new_value.into();
        if old_value == new_value && old_value != PropertyValue::Opaque {
            return;
        }
        let listeners = self.listeners.borrow().snapshot();
        if listeners.is_empty() {
            return;
        }
        let evt = PropertyChangeEvent {
            source,
            name,
            old_value,
            new_value,
        };
        for listener in listeners {
            listener.property_changed(&evt);
        }
    }
}

/// A bag of named, observable values attached to a component.
///
/// Models are shared (`Rc`) so several components may present the same data.
#[derive(Default)]
pub struct ComponentModel {
    values: RefCell<BTreeMap<String, PropertyValue>>,
    properties: PropertyChangeSupport,
}

impl ComponentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values.borrow().get(name).cloned()
    }

    /// Store a value, firing a change event if it differs from the previous one.
    ///
    /// The event's `name` is the static `name` passed here.
    pub fn set(&self, name: &'static str, value: impl Into<PropertyValue>) {
        let value = value.into();
        let old = self
            .values
            .borrow_mut()
            .insert(name.to_string(), value.clone())
            .unwrap_or(PropertyValue::None);
        self.properties.fire(PropertySource::Model, name, old, value);
    }

    pub fn remove(&self, name: &'static str) -> Option<PropertyValue> {
        let old = self.values.borrow_mut().remove(name)?;
        self.properties
            .fire(PropertySource::Model, name, old.clone(), PropertyValue::None);
        Some(old)
    }

    pub fn names(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }

    pub fn properties(&self) -> &PropertyChangeSupport {
        &self.properties
    }
}
