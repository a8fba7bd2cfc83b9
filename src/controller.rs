//! Glue between a Slint window and a scene panel.
//!
//! The [`SceneController`] owns the scene behind an `Rc<RefCell<_>>` and hands
//! out closures shaped for Slint callbacks, so a window can forward its input
//! and viewport changes without touching the scene directly.
//!
//! # Example
//!
//! ```ignore
//! use slint_scene_graph::{MouseEventKind, Overview, Scene, SceneController, Size};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = SceneController::new(Scene::new());
//!
//!     window.on_pointer_event(ctrl.pointer_event_callback());
//!     window.on_pointer_moved(ctrl.pointer_motion_callback());
//!     window.on_scrolled(ctrl.wheel_callback());
//!     window.on_key_event(ctrl.key_event_callback());
//!     window.on_viewport_changed(ctrl.viewport_callback());
//!
//!     let overview = Rc::new(RefCell::new(Overview::new(Some(ctrl.panel()), Size::new(200.0, 150.0))));
//!     window.on_overview_pointer_event(ctrl.overview_pointer_callback(overview.clone()));
//!     window.on_overview_pointer_moved(ctrl.overview_motion_callback(overview));
//!
//!     // Keep the timer alive for as long as tooltips should advance
//!     let _tooltips = ctrl.start_tooltip_timer(std::time::Duration::from_millis(100));
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::event::{KeyEvent, KeyEventKind, MouseEvent, MouseEventKind, MouseMotionEvent, MouseMotionKind, MouseWheelEvent};
use crate::geometry::{Point, Rect};
use crate::overview::Overview;
use crate::panel::PanelId;
use crate::scene::Scene;
use slint::platform::PointerEventButton;
use slint::{SharedString, Timer, TimerMode};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Shared handle to a scene and the panel a window displays.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct SceneController {
    scene: Rc<RefCell<Scene>>,
    panel: PanelId,
}

impl SceneController {
    /// Take ownership of `scene` and create the panel this controller drives.
    pub fn new(mut scene: Scene) -> Self {
        let panel = scene.create_panel();
        Self {
            scene: Rc::new(RefCell::new(scene)),
            panel,
        }
    }

    /// Drive an existing panel of a shared scene.
    pub fn for_panel(scene: Rc<RefCell<Scene>>, panel: PanelId) -> Self {
        Self { scene, panel }
    }

    pub fn scene(&self) -> Rc<RefCell<Scene>> {
        self.scene.clone()
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    /// Forward every queued dirty rectangle (device space) to `handler`.
    ///
    /// The handler runs while the scene is borrowed and must not borrow it.
    pub fn set_repaint_handler(&self, handler: impl Fn(Rect) + 'static) {
        self.scene
            .borrow_mut()
            .panel_mut(self.panel)
            .set_repaint_handler(Some(Box::new(handler)));
    }

    // === Callback factories ===

    /// Returns a callback for pointer button events: kind, button, x, y and
    /// click count. The callback reports whether the event was consumed.
    pub fn pointer_event_callback(
        &self,
    ) -> impl Fn(MouseEventKind, PointerEventButton, f32, f32, i32) -> bool {
        let scene = self.scene.clone();
        let panel = self.panel;
        move |kind, button, x, y, click_count| {
            let evt = MouseEvent::new(kind, f64::from(x), f64::from(y))
                .with_button(button)
                .with_click_count(click_count.max(0) as u32);
            scene.borrow_mut().dispatch_mouse_event(panel, evt)
        }
    }

    /// Returns a callback for pointer motion: x, y and whether a button is held.
    pub fn pointer_motion_callback(&self) -> impl Fn(f32, f32, bool) -> bool {
        let scene = self.scene.clone();
        let panel = self.panel;
        move |x, y, pressed| {
            let kind = if pressed {
                MouseMotionKind::Dragged
            } else {
                MouseMotionKind::Moved
            };
            let evt = MouseMotionEvent::new(kind, f64::from(x), f64::from(y));
            scene.borrow_mut().dispatch_mouse_motion_event(panel, evt)
        }
    }

    /// Returns a callback for scroll wheel events: x, y, delta x, delta y.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32, f32) -> bool {
        let scene = self.scene.clone();
        let panel = self.panel;
        move |x, y, delta_x, delta_y| {
            let evt = MouseWheelEvent::new(
                f64::from(x),
                f64::from(y),
                f64::from(delta_x),
                f64::from(delta_y),
            );
            scene.borrow_mut().dispatch_mouse_wheel_event(panel, evt)
        }
    }

    /// Returns a callback for key events: Slint key text and whether the key
    /// went down. A key press with printable text is followed by a typed event.
    pub fn key_event_callback(&self) -> impl Fn(SharedString, bool) -> bool {
        let scene = self.scene.clone();
        let panel = self.panel;
        move |text, pressed| {
            let mut scene = scene.borrow_mut();
            if !pressed {
                return scene.dispatch_key_event(panel, KeyEvent::new(KeyEventKind::Released, text));
            }
            let printable = text.chars().next().map_or(false, |c| !is_special_key(c));
            let consumed = scene.dispatch_key_event(panel, KeyEvent::new(KeyEventKind::Pressed, text.clone()));
            if printable {
                scene.dispatch_key_event(panel, KeyEvent::new(KeyEventKind::Typed, text)) || consumed
            } else {
                consumed
            }
        }
    }

    /// Returns a callback for viewport changes: x, y, width, height of the
    /// visible area in panel coordinates.
    pub fn viewport_callback(&self) -> impl Fn(f32, f32, f32, f32) {
        let scene = self.scene.clone();
        let panel = self.panel;
        move |x, y, width, height| {
            let visible = Rect::new(f64::from(x), f64::from(y), f64::from(width), f64::from(height));
            scene.borrow_mut().set_visible_rect(panel, visible);
        }
    }

    /// Returns a callback for pointer buttons on an overview of this panel:
    /// kind, x and y in overview coordinates. Presses re-centre the panel's
    /// viewport.
    pub fn overview_pointer_callback(
        &self,
        overview: Rc<RefCell<Overview>>,
    ) -> impl Fn(MouseEventKind, f32, f32) -> bool {
        let scene = self.scene.clone();
        move |kind, x, y| {
            let point = Point::new(f64::from(x), f64::from(y));
            match kind {
                MouseEventKind::Pressed => overview
                    .borrow_mut()
                    .overview_pressed(&mut scene.borrow_mut(), point),
                MouseEventKind::Released => {
                    overview.borrow_mut().overview_released();
                    true
                }
                _ => false,
            }
        }
    }

    /// Returns a callback for pointer motion over an overview: x and y in
    /// overview coordinates.
    pub fn overview_motion_callback(&self, overview: Rc<RefCell<Overview>>) -> impl Fn(f32, f32) -> bool {
        let scene = self.scene.clone();
        move |x, y| {
            let point = Point::new(f64::from(x), f64::from(y));
            overview
                .borrow_mut()
                .overview_dragged(&mut scene.borrow_mut(), point)
        }
    }

    /// Advance the panel's tooltip clock every `interval`. The returned timer
    /// stops when dropped.
    pub fn start_tooltip_timer(&self, interval: Duration) -> Timer {
        let scene = self.scene.clone();
        let panel = self.panel;
        let timer = Timer::default();
        timer.start(TimerMode::Repeated, interval, move || {
            scene.borrow_mut().tick_tooltips(panel, interval);
        });
        timer
    }
}

/// Slint encodes special keys as characters of the Unicode private use area
/// and control characters.
fn is_special_key(c: char) -> bool {
    c.is_control() || ('\u{F700}'..='\u{F8FF}').contains(&c)
}
