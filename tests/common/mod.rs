//! Common test utilities for integration tests.

#![allow(dead_code)]

use slint_scene_graph::{
    ComponentId, ContainerEvent, ContainerHandler, MouseEvent, MouseEventKind, MouseHandler,
    MouseMotionEvent, MouseMotionKind, PanelId, PropertyChangeEvent, PropertyChangeListener, Rect,
    RootLayer, Scene, SceneConfig, ValidationEvent, ValidationEventKind, ValidationHandler,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Records listener invocations for testing.
///
/// Each field collects what the corresponding listener family saw, in order.
#[derive(Default, Clone)]
pub struct ListenerTracker {
    /// (target, kind)
    pub mouse: Rc<RefCell<Vec<(ComponentId, MouseEventKind)>>>,
    /// Property names, in firing order
    pub properties: Rc<RefCell<Vec<&'static str>>>,
    /// Container membership events
    pub container: Rc<RefCell<Vec<ContainerEvent>>>,
    /// (source, kind)
    pub validation: Rc<RefCell<Vec<(ComponentId, ValidationEventKind)>>>,
}

impl ListenerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded invocations.
    pub fn clear(&self) {
        self.mouse.borrow_mut().clear();
        self.properties.borrow_mut().clear();
        self.container.borrow_mut().clear();
        self.validation.borrow_mut().clear();
    }

    pub fn track_mouse(&self, scene: &mut Scene, id: ComponentId) {
        let sink = self.mouse.clone();
        scene
            .mouse_listeners_mut(id)
            .add(Rc::new(MouseHandler(move |_: &mut Scene, target, evt: &mut MouseEvent| {
                sink.borrow_mut().push((target, evt.kind));
            })));
    }

    pub fn track_properties(&self, scene: &Scene, id: ComponentId) {
        let sink = self.properties.clone();
        let listener: Rc<dyn PropertyChangeListener> =
            Rc::new(move |evt: &PropertyChangeEvent| sink.borrow_mut().push(evt.name));
        scene.component(id).properties().add_listener(listener);
    }

    pub fn track_container(&self, scene: &mut Scene, id: ComponentId) {
        let sink = self.container.clone();
        if let Some(listeners) = scene.container_listeners_mut(id) {
            listeners.add(Rc::new(ContainerHandler(move |evt: &ContainerEvent| {
                sink.borrow_mut().push(evt.clone());
            })));
        }
    }

    pub fn track_validation(&self, scene: &mut Scene, id: ComponentId) {
        let sink = self.validation.clone();
        scene
            .validation_listeners_mut(id)
            .add(Rc::new(ValidationHandler(move |evt: &ValidationEvent| {
                sink.borrow_mut().push((evt.source, evt.kind));
            })));
    }

    pub fn mouse_kinds(&self) -> Vec<MouseEventKind> {
        self.mouse.borrow().iter().map(|(_, kind)| *kind).collect()
    }

    pub fn property_count(&self, name: &str) -> usize {
        self.properties.borrow().iter().filter(|n| **n == name).count()
    }
}

/// A scene with one panel showing a 400x300 viewport.
pub struct EditorScene {
    pub scene: Scene,
    pub panel: PanelId,
    /// The panel's component layer
    pub layer: ComponentId,
}

impl EditorScene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        let mut scene = Scene::with_config(config);
        let panel = scene.create_panel();
        scene.set_visible_rect(panel, Rect::new(0.0, 0.0, 400.0, 300.0));
        let layer = scene.panel(panel).layer(RootLayer::Component);
        Self { scene, panel, layer }
    }

    /// Snapping disabled, so gestures follow the pointer exactly.
    pub fn free() -> Self {
        Self::with_config(SceneConfig::default().with_snap_to_grid(false))
    }

    pub fn layer(&self, layer: RootLayer) -> ComponentId {
        self.scene.panel(self.panel).layer(layer)
    }

    /// Add `id` to the component layer.
    pub fn add(&mut self, id: ComponentId) -> ComponentId {
        self.scene
            .add_component(self.layer, id)
            .expect("component layer accepts children");
        id
    }

    pub fn press(&mut self, x: f64, y: f64) -> bool {
        self.mouse(MouseEventKind::Pressed, x, y)
    }

    pub fn release(&mut self, x: f64, y: f64) -> bool {
        self.mouse(MouseEventKind::Released, x, y)
    }

    pub fn click(&mut self, x: f64, y: f64) -> bool {
        self.mouse(MouseEventKind::Clicked, x, y)
    }

    pub fn mouse(&mut self, kind: MouseEventKind, x: f64, y: f64) -> bool {
        self.scene
            .dispatch_mouse_event(self.panel, MouseEvent::new(kind, x, y))
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> bool {
        self.scene.dispatch_mouse_motion_event(
            self.panel,
            MouseMotionEvent::new(MouseMotionKind::Moved, x, y),
        )
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        self.scene.dispatch_mouse_motion_event(
            self.panel,
            MouseMotionEvent::new(MouseMotionKind::Dragged, x, y),
        )
    }

    /// Press at `from`, drag through `to`, release at `to`.
    pub fn drag_gesture(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.press(from.0, from.1);
        self.drag_to(to.0, to.1);
        self.release(to.0, to.1);
    }
}
