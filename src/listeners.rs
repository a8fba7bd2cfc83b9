//! Ordered, duplicate-rejecting listener collections and the listener traits
//! they hold.
//!
//! Input listeners receive the scene mutably so they can react by changing it;
//! firing always iterates a snapshot, so listeners may add or remove
//! listeners while being notified.

use crate::component::ComponentId;
use crate::event::{
    ConnectedEvent, ContainerEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
    MouseMotionEvent, MouseMotionKind, MouseWheelEvent, RootEvent, ValidationEvent,
};
use crate::scene::Scene;
use std::rc::Rc;

fn same_listener<L: ?Sized>(a: &Rc<L>, b: &Rc<L>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// An ordered list of shared listeners, compared by identity.
pub struct ListenerList<L: ?Sized> {
    listeners: Vec<Rc<L>>,
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<L: ?Sized> ListenerList<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, listener: &Rc<L>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    /// Append a listener. Returns false if it is already registered.
    pub fn add(&mut self, listener: Rc<L>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Insert a listener at `index` (clamped to the list length).
    /// Returns false if it is already registered.
    pub fn insert(&mut self, index: usize, listener: Rc<L>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        let index = index.min(self.listeners.len());
        self.listeners.insert(index, listener);
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn index_of(&self, listener: &Rc<L>) -> Option<usize> {
        self.listeners.iter().position(|l| same_listener(l, listener))
    }

    pub fn get(&self, index: usize) -> Option<&Rc<L>> {
        self.listeners.get(index)
    }

    /// Copy of the current listeners, in order.
    pub fn snapshot(&self) -> Vec<Rc<L>> {
        self.listeners.clone()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Rc<L>> {
        if index < self.listeners.len() {
            Some(self.listeners.remove(index))
        } else {
            None
        }
    }

    pub fn remove(&mut self, listener: &Rc<L>) -> bool {
        match self.index_of(listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<L>> {
        self.listeners.iter()
    }
}

// === Input listeners ===

#[allow(unused_variables)]
pub trait MouseListener {
    fn mouse_entered(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {}
    fn mouse_exited(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {}
    fn mouse_pressed(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {}
    fn mouse_released(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {}
    fn mouse_clicked(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {}
}

#[allow(unused_variables)]
pub trait MouseMotionListener {
    fn mouse_moved(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseMotionEvent) {}
    fn mouse_dragged(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseMotionEvent) {}
}

pub trait MouseWheelListener {
    fn mouse_wheel_moved(&self, scene: &mut Scene, target: ComponentId, evt: &MouseWheelEvent);
}

#[allow(unused_variables)]
pub trait KeyListener {
    fn key_pressed(&self, scene: &mut Scene, target: ComponentId, evt: &mut KeyEvent) {}
    fn key_released(&self, scene: &mut Scene, target: ComponentId, evt: &mut KeyEvent) {}
    fn key_typed(&self, scene: &mut Scene, target: ComponentId, evt: &mut KeyEvent) {}
}

// === Structural observers ===

#[allow(unused_variables)]
pub trait ValidationListener {
    fn component_validated(&self, evt: &ValidationEvent) {}
    fn component_invalidated(&self, evt: &ValidationEvent) {}
}

#[allow(unused_variables)]
pub trait ContainerListener {
    fn components_added(&self, evt: &ContainerEvent) {}
    fn components_removed(&self, evt: &ContainerEvent) {}
}

#[allow(unused_variables)]
pub trait ConnectedListener {
    fn inbound_connections_added(&self, evt: &ConnectedEvent) {}
    fn inbound_connections_removed(&self, evt: &ConnectedEvent) {}
    fn outbound_connections_added(&self, evt: &ConnectedEvent) {}
    fn outbound_connections_removed(&self, evt: &ConnectedEvent) {}
}

#[allow(unused_variables)]
pub trait RootListener {
    fn roots_added(&self, evt: &RootEvent) {}
    fn roots_removed(&self, evt: &RootEvent) {}
}

// === Closure adapters ===

/// Route every mouse event kind to one closure.
pub struct MouseHandler<F>(pub F);

impl<F> MouseListener for MouseHandler<F>
where
    F: Fn(&mut Scene, ComponentId, &mut MouseEvent),
{
    fn mouse_entered(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {
        (self.0)(scene, target, evt)
    }
    fn mouse_exited(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {
        (self.0)(scene, target, evt)
    }
    fn mouse_pressed(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {
        (self.0)(scene, target, evt)
    }
    fn mouse_released(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {
        (self.0)(scene, target, evt)
    }
    fn mouse_clicked(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseEvent) {
        (self.0)(scene, target, evt)
    }
}

/// Route both motion kinds to one closure.
pub struct MouseMotionHandler<F>(pub F);

impl<F> MouseMotionListener for MouseMotionHandler<F>
where
    F: Fn(&mut Scene, ComponentId, &mut MouseMotionEvent),
{
    fn mouse_moved(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseMotionEvent) {
        (self.0)(scene, target, evt)
    }
    fn mouse_dragged(&self, scene: &mut Scene, target: ComponentId, evt: &mut MouseMotionEvent) {
        (self.0)(scene, target, evt)
    }
}

impl<F> MouseWheelListener for F
where
    F: Fn(&mut Scene, ComponentId, &MouseWheelEvent),
{
    fn mouse_wheel_moved(&self, scene: &mut Scene, target: ComponentId, evt: &MouseWheelEvent) {
        self(scene, target, evt)
    }
}

/// Route every key event kind to one closure.
pub struct KeyHandler<F>(pub F);

impl<F> KeyListener for KeyHandler<F>
where
    F: Fn(&mut Scene, ComponentId, &mut KeyEvent),
{
    fn key_pressed(&self, scene: &mut Scene, target: ComponentId, evt: &mut KeyEvent) {
        (self.0)(scene, target, evt)
    }
    fn key_released(&self, scene: &mut Scene, target: ComponentId, evt: &mut KeyEvent) {
        (self.0)(scene, target, evt)
    }
    fn key_typed(&self, scene: &mut Scene, target: ComponentId, evt: &mut KeyEvent) {
        (self.0)(scene, target, evt)
    }
}

/// Observe both validation transitions with one closure.
pub struct ValidationHandler<F>(pub F);

impl<F> ValidationListener for ValidationHandler<F>
where
    F: Fn(&ValidationEvent),
{
    fn component_validated(&self, evt: &ValidationEvent) {
        (self.0)(evt)
    }
    fn component_invalidated(&self, evt: &ValidationEvent) {
        (self.0)(evt)
    }
}

/// Observe container membership changes with one closure.
pub struct ContainerHandler<F>(pub F);

impl<F> ContainerListener for ContainerHandler<F>
where
    F: Fn(&ContainerEvent),
{
    fn components_added(&self, evt: &ContainerEvent) {
        (self.0)(evt)
    }
    fn components_removed(&self, evt: &ContainerEvent) {
        (self.0)(evt)
    }
}

/// Observe connection list changes with one closure.
pub struct ConnectedHandler<F>(pub F);

impl<F> ConnectedListener for ConnectedHandler<F>
where
    F: Fn(&ConnectedEvent),
{
    fn inbound_connections_added(&self, evt: &ConnectedEvent) {
        (self.0)(evt)
    }
    fn inbound_connections_removed(&self, evt: &ConnectedEvent) {
        (self.0)(evt)
    }
    fn outbound_connections_added(&self, evt: &ConnectedEvent) {
        (self.0)(evt)
    }
    fn outbound_connections_removed(&self, evt: &ConnectedEvent) {
        (self.0)(evt)
    }
}

/// Observe panel root changes with one closure.
pub struct RootHandler<F>(pub F);

impl<F> RootListener for RootHandler<F>
where
    F: Fn(&RootEvent),
{
    fn roots_added(&self, evt: &RootEvent) {
        (self.0)(evt)
    }
    fn roots_removed(&self, evt: &RootEvent) {
        (self.0)(evt)
    }
}

/// Every listener family a component owns, plus its notification switches.
pub struct Listeners {
    pub(crate) key: ListenerList<dyn KeyListener>,
    pub(crate) mouse: ListenerList<dyn MouseListener>,
    pub(crate) mouse_motion: ListenerList<dyn MouseMotionListener>,
    pub(crate) mouse_wheel: ListenerList<dyn MouseWheelListener>,
    pub(crate) validation: ListenerList<dyn ValidationListener>,
    pub(crate) key_enabled: bool,
    pub(crate) mouse_enabled: bool,
    pub(crate) mouse_motion_enabled: bool,
    pub(crate) mouse_wheel_enabled: bool,
    pub(crate) validation_enabled: bool,
}

impl Default for Listeners {
    fn default() -> Self {
        Self {
            key: ListenerList::new(),
            mouse: ListenerList::new(),
            mouse_motion: ListenerList::new(),
            mouse_wheel: ListenerList::new(),
            validation: ListenerList::new(),
            key_enabled: true,
            mouse_enabled: true,
            mouse_motion_enabled: true,
            mouse_wheel_enabled: true,
            validation_enabled: true,
        }
    }
}

/// Listener families whose notification can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerFamily {
    Key,
    Mouse,
    MouseMotion,
    MouseWheel,
    Validation,
    Container,
    Connected,
}

pub(crate) fn dispatch_mouse(
    listener: &dyn MouseListener,
    scene: &mut Scene,
    target: ComponentId,
    evt: &mut MouseEvent,
) {
    match evt.kind {
        MouseEventKind::Entered => listener.mouse_entered(scene, target, evt),
        MouseEventKind::Exited => listener.mouse_exited(scene, target, evt),
        MouseEventKind::Pressed => listener.mouse_pressed(scene, target, evt),
        MouseEventKind::Released => listener.mouse_released(scene, target, evt),
        MouseEventKind::Clicked => listener.mouse_clicked(scene, target, evt),
    }
}

pub(crate) fn dispatch_motion(
    listener: &dyn MouseMotionListener,
    scene: &mut Scene,
    target: ComponentId,
    evt: &mut MouseMotionEvent,
) {
    match evt.kind {
        MouseMotionKind::Moved => listener.mouse_moved(scene, target, evt),
        MouseMotionKind::Dragged => listener.mouse_dragged(scene, target, evt),
    }
}

pub(crate) fn dispatch_key(
    listener: &dyn KeyListener,
    scene: &mut Scene,
    target: ComponentId,
    evt: &mut KeyEvent,
) {
    match evt.kind {
        KeyEventKind::Pressed => listener.key_pressed(scene, target, evt),
        KeyEventKind::Released => listener.key_released(scene, target, evt),
        KeyEventKind::Typed => listener.key_typed(scene, target, evt),
    }
}
