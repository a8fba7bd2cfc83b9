//! Input and notification event records.
//!
//! Input events carry coordinates in the receiving component's parent space
//! and a consumed flag; containers translate coordinates while routing them
//! to children.

use crate::component::ComponentId;
use crate::geometry::Point;
use crate::panel::PanelId;
use slint::platform::{Key, PointerEventButton};
use slint::SharedString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Entered,
    Exited,
    Pressed,
    Released,
    Clicked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: f64,
    pub y: f64,
    pub button: PointerEventButton,
    pub click_count: u32,
    consumed: bool,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            button: PointerEventButton::Left,
            click_count: if kind == MouseEventKind::Clicked { 1 } else { 0 },
            consumed: false,
        }
    }

    pub fn with_button(mut self, button: PointerEventButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseMotionKind {
    Moved,
    Dragged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseMotionEvent {
    pub kind: MouseMotionKind,
    pub x: f64,
    pub y: f64,
    consumed: bool,
}

impl MouseMotionEvent {
    pub fn new(kind: MouseMotionKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            consumed: false,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseWheelEvent {
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    consumed: bool,
}

impl MouseWheelEvent {
    pub fn new(x: f64, y: f64, delta_x: f64, delta_y: f64) -> Self {
        Self {
            x,
            y,
            delta_x,
            delta_y,
            consumed: false,
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
    Typed,
}

/// A key event. `text` follows Slint's convention: printable keys carry their
/// character, special keys the private-use character of [`Key`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub text: SharedString,
    consumed: bool,
}

impl KeyEvent {
    pub fn new(kind: KeyEventKind, text: impl Into<SharedString>) -> Self {
        Self {
            kind,
            text: text.into(),
            consumed: false,
        }
    }

    /// Event for a special key such as an arrow key.
    pub fn for_key(kind: KeyEventKind, key: Key) -> Self {
        Self::new(kind, SharedString::from(key))
    }

    pub fn is_key(&self, key: Key) -> bool {
        self.text == SharedString::from(key)
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationEventKind {
    Validated,
    Invalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationEvent {
    pub source: ComponentId,
    pub kind: ValidationEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerEventKind {
    ComponentsAdded,
    ComponentsRemoved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEvent {
    pub container: ComponentId,
    pub kind: ContainerEventKind,
    pub components: Vec<ComponentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectedEventKind {
    InboundAdded,
    InboundRemoved,
    OutboundAdded,
    OutboundRemoved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedEvent {
    pub component: ComponentId,
    pub kind: ConnectedEventKind,
    pub connections: Vec<ComponentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootEventKind {
    RootsAdded,
    RootsRemoved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootEvent {
    pub panel: PanelId,
    pub kind: RootEventKind,
    pub roots: Vec<ComponentId>,
}
