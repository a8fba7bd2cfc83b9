//! Input routing: from the panel to its roots, through containers in reverse
//! z-order, down to the component that consumes the event.
//!
//! A component receives events in its parent's coordinate space, the same
//! space as its bounds. Containers shift coordinates into their own space
//! before offering an event to their children and shift them back afterwards.

use crate::component::ComponentId;
use crate::event::{
    KeyEvent, KeyEventKind, MouseEvent, MouseEventKind, MouseMotionEvent, MouseMotionKind,
    MouseWheelEvent,
};
use crate::geometry::{Geometry, Point};
use crate::grid::{next_grid_line, previous_grid_line};
use crate::listeners::{dispatch_key, dispatch_motion, dispatch_mouse};
use crate::panel::{PanelId, PanelRole};
use crate::scene::Scene;
use slint::platform::Key;

/// An event that can be routed through the container tree.
trait Routed {
    fn shift(&mut self, dx: f64, dy: f64);
    fn consumed(&self) -> bool;
    fn scale_down(&mut self, scale: f64);

    /// Whether `container` offers the event to its children at all.
    fn enters(&self, _scene: &Scene, _container: ComponentId) -> bool {
        true
    }

    /// Handle the event on `id` itself.
    fn handle(scene: &mut Scene, id: ComponentId, evt: &mut Self);
}

impl Routed for MouseEvent {
    fn shift(&mut self, dx: f64, dy: f64) {
        self.translate(dx, dy);
    }

    fn consumed(&self) -> bool {
        self.is_consumed()
    }

    fn scale_down(&mut self, scale: f64) {
        self.x /= scale;
        self.y /= scale;
    }

    fn enters(&self, scene: &Scene, container: ComponentId) -> bool {
        match self.kind {
            MouseEventKind::Entered | MouseEventKind::Pressed | MouseEventKind::Clicked => {
                scene.contains(container, self.x, self.y)
            }
            MouseEventKind::Exited | MouseEventKind::Released => true,
        }
    }

    fn handle(scene: &mut Scene, id: ComponentId, evt: &mut Self) {
        scene.handle_mouse_event(id, evt);
    }
}

impl Routed for MouseMotionEvent {
    fn shift(&mut self, dx: f64, dy: f64) {
        self.translate(dx, dy);
    }

    fn consumed(&self) -> bool {
        self.is_consumed()
    }

    fn scale_down(&mut self, scale: f64) {
        self.x /= scale;
        self.y /= scale;
    }

    fn handle(scene: &mut Scene, id: ComponentId, evt: &mut Self) {
        scene.handle_motion_event(id, evt);
    }
}

impl Routed for MouseWheelEvent {
    fn shift(&mut self, dx: f64, dy: f64) {
        self.translate(dx, dy);
    }

    fn consumed(&self) -> bool {
        self.is_consumed()
    }

    fn scale_down(&mut self, scale: f64) {
        self.x /= scale;
        self.y /= scale;
    }

    fn handle(scene: &mut Scene, id: ComponentId, evt: &mut Self) {
        scene.handle_wheel_event(id, evt);
    }
}

// === Panel entry points ===

impl Scene {
    /// Deliver a mouse event given in device coordinates. Returns whether a
    /// component consumed it.
    pub fn dispatch_mouse_event(&mut self, panel: PanelId, mut evt: MouseEvent) -> bool {
        log::trace!("panel {panel:?} mouse {:?} at ({}, {})", evt.kind, evt.x, evt.y);
        self.dispatch_to_roots(panel, &mut evt);
        evt.is_consumed()
    }

    pub fn dispatch_mouse_motion_event(&mut self, panel: PanelId, mut evt: MouseMotionEvent) -> bool {
        log::trace!("panel {panel:?} motion {:?} at ({}, {})", evt.kind, evt.x, evt.y);
        self.dispatch_to_roots(panel, &mut evt);
        evt.is_consumed()
    }

    pub fn dispatch_mouse_wheel_event(&mut self, panel: PanelId, mut evt: MouseWheelEvent) -> bool {
        self.dispatch_to_roots(panel, &mut evt);
        evt.is_consumed()
    }

    /// Deliver a key event to the panel's focused component, if any.
    pub fn dispatch_key_event(&mut self, panel: PanelId, mut evt: KeyEvent) -> bool {
        let Some(focused) = self.panel(panel).state().focused_component() else {
            return false;
        };
        self.process_key_event(focused, &mut evt);
        evt.is_consumed()
    }

    fn dispatch_to_roots<E: Routed>(&mut self, panel: PanelId, evt: &mut E) {
        evt.scale_down(self.panel(panel).scale());
        let roots = self.panel(panel).roots().to_vec();
        for root in roots.into_iter().rev() {
            self.route(root, evt);
            if evt.consumed() {
                break;
            }
        }
    }

    fn route<E: Routed>(&mut self, id: ComponentId, evt: &mut E) {
        if evt.consumed() {
            return;
        }
        if self.component(id).is_container() {
            if !evt.enters(self, id) {
                return;
            }
            let origin = self.component(id).location();
            evt.shift(-origin.x, -origin.y);
            let children = self.component(id).children().to_vec();
            for child in children.into_iter().rev() {
                self.route(child, evt);
                if evt.consumed() {
                    break;
                }
            }
            evt.shift(origin.x, origin.y);
        }
        if evt.consumed() || self.is_root_component(id) {
            return;
        }
        E::handle(self, id, evt);
    }
}

// === Component processing ===

impl Scene {
    /// Offer a mouse event (in the component's parent space) to the
    /// component and, for containers, to its children first.
    pub fn process_mouse_event(&mut self, id: ComponentId, evt: &mut MouseEvent) {
        self.route(id, evt);
    }

    pub fn process_mouse_motion_event(&mut self, id: ComponentId, evt: &mut MouseMotionEvent) {
        self.route(id, evt);
    }

    pub fn process_mouse_wheel_event(&mut self, id: ComponentId, evt: &mut MouseWheelEvent) {
        self.route(id, evt);
    }

    /// Key events reach only the focused component. Roots never take them.
    pub fn process_key_event(&mut self, id: ComponentId, evt: &mut KeyEvent) {
        if evt.is_consumed() || self.is_root_component(id) || !self.component(id).is_focused() {
            return;
        }
        if evt.kind == KeyEventKind::Pressed {
            self.nudge(id, evt);
        }
        self.fire_key_listeners(id, evt);
        evt.consume();
    }

    fn handle_mouse_event(&mut self, id: ComponentId, evt: &mut MouseEvent) {
        if evt.is_consumed() {
            return;
        }
        let node = self.component(id);
        let accepted = match evt.kind {
            MouseEventKind::Entered => !node.is_mouse_over() && self.contains(id, evt.x, evt.y),
            MouseEventKind::Exited => node.is_mouse_over(),
            MouseEventKind::Pressed | MouseEventKind::Clicked => self.contains(id, evt.x, evt.y),
            MouseEventKind::Released => node.is_mouse_pressed(),
        };
        if !accepted {
            return;
        }
        self.track_mouse_state(id, evt);
        self.fire_mouse_listeners(id, evt);
        evt.consume();
    }

    fn track_mouse_state(&mut self, id: ComponentId, evt: &MouseEvent) {
        let pointer = evt.point();
        match evt.kind {
            MouseEventKind::Entered => {
                self.set_mouse_over(id, true);
                self.request_tooltip(id, pointer);
            }
            MouseEventKind::Exited => {
                self.set_mouse_over(id, false);
                self.dismiss_tooltip(id);
            }
            MouseEventKind::Pressed => {
                self.set_mouse_pressed(id, true);
                if self.component(id).is_handle() {
                    self.handle_pressed(id, pointer);
                } else if self.component(id).is_draggable_kind() {
                    self.drag_pressed(id, pointer);
                }
            }
            MouseEventKind::Released => {
                self.set_mouse_pressed(id, false);
                if self.component(id).is_handle() {
                    self.handle_released(id);
                } else if self.component(id).is_draggable_kind() {
                    self.drag_released(id);
                }
                if !self.contains(id, pointer.x, pointer.y) && self.component(id).is_mouse_over() {
                    self.set_mouse_over(id, false);
                    self.dismiss_tooltip(id);
                }
            }
            MouseEventKind::Clicked => {
                if self.component(id).is_focusable() {
                    if let Err(err) = self.set_focused(id, true) {
                        log::warn!("click could not focus {id:?}: {err}");
                    }
                }
            }
        }
    }

    fn handle_motion_event(&mut self, id: ComponentId, evt: &mut MouseMotionEvent) {
        let pointer = evt.point();
        match evt.kind {
            MouseMotionKind::Moved => {
                if self.contains(id, pointer.x, pointer.y) {
                    if self.component(id).is_mouse_over() {
                        self.fire_motion_listeners(id, evt);
                    } else {
                        self.exit_previous_mouse_over(id, pointer);
                        let mut entered = MouseEvent::new(MouseEventKind::Entered, pointer.x, pointer.y);
                        self.handle_mouse_event(id, &mut entered);
                    }
                    evt.consume();
                } else if self.component(id).is_mouse_over() {
                    let mut exited = MouseEvent::new(MouseEventKind::Exited, pointer.x, pointer.y);
                    self.handle_mouse_event(id, &mut exited);
                    evt.consume();
                }
            }
            MouseMotionKind::Dragged => {
                if !self.component(id).is_mouse_pressed() {
                    return;
                }
                if self.component(id).is_handle() {
                    self.handle_dragged(id, pointer);
                } else if self.component(id).is_draggable_kind() {
                    self.drag_dragged(id, pointer);
                }
                self.fire_motion_listeners(id, evt);
                evt.consume();
            }
        }
    }

    /// Send an exit to whichever component of the panel currently has the
    /// pointer over it. `pointer` is in `id`'s parent space.
    fn exit_previous_mouse_over(&mut self, id: ComponentId, pointer: Point) {
        let Some(panel) = self.component_panel(id) else {
            return;
        };
        let Some(previous) = self
            .panel(panel)
            .state()
            .holder(PanelRole::MouseOver)
            .filter(|previous| *previous != id)
        else {
            return;
        };
        let from = self.panel_offset(id);
        let to = self.panel_offset(previous);
        let at = pointer.translate(from.x - to.x, from.y - to.y);
        let mut exited = MouseEvent::new(MouseEventKind::Exited, at.x, at.y);
        self.handle_mouse_event(previous, &mut exited);
    }

    fn handle_wheel_event(&mut self, id: ComponentId, evt: &mut MouseWheelEvent) {
        if !self.contains(id, evt.x, evt.y) {
            return;
        }
        let listeners = &self.component(id).listeners;
        if listeners.mouse_wheel_enabled {
            for listener in listeners.mouse_wheel.snapshot() {
                listener.mouse_wheel_moved(self, id, evt);
            }
        }
        evt.consume();
    }

    /// Arrow keys move a movable component by one unit, or to the next grid
    /// line in that direction while its panel snaps to the grid.
    fn nudge(&mut self, id: ComponentId, evt: &KeyEvent) {
        let node = self.component(id);
        if !node.is_movable() {
            return;
        }
        let snap = self
            .component_panel(id)
            .and_then(|panel| self.panel(panel).grid_snap());
        let (x_spacing, y_spacing) = match snap {
            Some(snap) => (snap.vertical_spacing, snap.horizontal_spacing),
            None => (0.0, 0.0),
        };
        let (x, y) = (node.x(), node.y());
        let (x, y) = if evt.is_key(Key::LeftArrow) {
            (previous_grid_line(x, x_spacing), y)
        } else if evt.is_key(Key::RightArrow) {
            (next_grid_line(x, x_spacing), y)
        } else if evt.is_key(Key::UpArrow) {
            (x, previous_grid_line(y, y_spacing))
        } else if evt.is_key(Key::DownArrow) {
            (x, next_grid_line(y, y_spacing))
        } else {
            return;
        };
        log::trace!("{id:?} nudged to ({x}, {y})");
        self.set_location(id, x, y);
    }

    // === User listeners ===

    fn fire_mouse_listeners(&mut self, id: ComponentId, evt: &mut MouseEvent) {
        let listeners = &self.component(id).listeners;
        if !listeners.mouse_enabled {
            return;
        }
        for listener in listeners.mouse.snapshot() {
            dispatch_mouse(listener.as_ref(), self, id, evt);
            if evt.is_consumed() {
                break;
            }
        }
    }

    fn fire_motion_listeners(&mut self, id: ComponentId, evt: &mut MouseMotionEvent) {
        let listeners = &self.component(id).listeners;
        if !listeners.mouse_motion_enabled {
            return;
        }
        for listener in listeners.mouse_motion.snapshot() {
            dispatch_motion(listener.as_ref(), self, id, evt);
            if evt.is_consumed() {
                break;
            }
        }
    }

    fn fire_key_listeners(&mut self, id: ComponentId, evt: &mut KeyEvent) {
        let listeners = &self.component(id).listeners;
        if !listeners.key_enabled {
            return;
        }
        for listener in listeners.key.snapshot() {
            dispatch_key(listener.as_ref(), self, id, evt);
            if evt.is_consumed() {
                break;
            }
        }
    }
}
