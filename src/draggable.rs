//! Mouse dragging of draggable containers.
//!
//! A drag moves either the component itself (real-time dragging) or its drag
//! shadow, a dashed placeholder shown on the panel's drag layer. The shadow
//! lives in panel space; the component's final location is taken from it
//! when the mouse is released.

use crate::component::ComponentId;
use crate::error::{Result, SceneError};
use crate::geometry::{Geometry, Point};
use crate::grid::GridSnap;
use crate::painter::LineBorder;
use crate::panel::RootLayer;
use crate::property::names;
use crate::scene::Scene;
use slint::{Brush, Color};
use std::rc::Rc;

/// Drag configuration and in-flight gesture state of a draggable component.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DragState {
    pub(crate) draggable: bool,
    pub(crate) mouse_dragging: bool,
    pub(crate) real_time: bool,
    pub(crate) shadow: Option<ComponentId>,
    pub(crate) session: Option<DragSession>,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            draggable: true,
            mouse_dragging: false,
            real_time: false,
            shadow: None,
            session: None,
        }
    }
}

/// Captured when the mouse is pressed; lives until release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragSession {
    /// Pointer position relative to the component origin.
    pub(crate) offset: Point,
    pub(crate) snap: Option<GridSnap>,
}

impl Scene {
    pub(crate) fn create_drag_shadow(&mut self) -> ComponentId {
        let shadow = self.create_resizable(Default::default());
        let border = LineBorder::default().dashed();
        self.node_mut(shadow).border = Some(Rc::new(border));
        self.node_mut(shadow).background =
            Some(Brush::SolidColor(Color::from_argb_u8(125, 200, 200, 200)));
        shadow
    }

    /// Turning dragging off ends a drag in progress.
    pub fn set_draggable(&mut self, id: ComponentId, draggable: bool) {
        let Some(drag) = self.node_mut(id).drag.as_mut() else {
            return;
        };
        if drag.draggable == draggable {
            return;
        }
        drag.draggable = draggable;
        if !draggable && drag.mouse_dragging {
            drag.mouse_dragging = false;
            self.fire_property(id, names::MOUSE_DRAGGING, true, false);
        }
        self.fire_property(id, names::DRAGGABLE, !draggable, draggable);
    }

    pub fn set_mouse_dragging(&mut self, id: ComponentId, dragging: bool) -> Result<()> {
        let Some(drag) = self.node_mut(id).drag.as_mut() else {
            return Ok(());
        };
        if dragging && !drag.draggable {
            log::warn!("{id:?} cannot start dragging: draggable is off");
            return Err(SceneError::DraggingDisabled(id));
        }
        if drag.mouse_dragging == dragging {
            return Ok(());
        }
        drag.mouse_dragging = dragging;
        self.fire_property(id, names::MOUSE_DRAGGING, !dragging, dragging);
        Ok(())
    }

    /// Choose between moving the component itself or its shadow. Cannot be
    /// changed mid-drag.
    pub fn set_real_time_dragging_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<()> {
        let Some(drag) = self.node_mut(id).drag.as_mut() else {
            return Ok(());
        };
        if drag.mouse_dragging {
            log::warn!("{id:?} is dragging; real-time dragging stays {}", drag.real_time);
            return Err(SceneError::DragInProgress(id));
        }
        if drag.real_time == enabled {
            return Ok(());
        }
        drag.real_time = enabled;
        self.fire_property(id, names::REAL_TIME_DRAGGING_ENABLED, !enabled, enabled);
        Ok(())
    }

    /// Replace the placeholder used for non-real-time drags.
    pub fn set_drag_shadow_component(&mut self, id: ComponentId, shadow: Option<ComponentId>) {
        let Some(drag) = self.node_mut(id).drag.as_mut() else {
            return;
        };
        let old = drag.shadow;
        if old == shadow {
            return;
        }
        drag.shadow = shadow;
        self.fire_property(id, names::DRAG_SHADOW_COMPONENT, old, shadow);
    }

    /// Start a gesture. `pointer` is in the component's parent space.
    pub(crate) fn drag_pressed(&mut self, id: ComponentId, pointer: Point) {
        let node = self.component(id);
        let Some(drag) = node.drag.as_ref() else {
            return;
        };
        let offset = Point::new(pointer.x - node.x(), pointer.y - node.y());
        let (real_time, shadow) = (drag.real_time, drag.shadow);
        let bounds = node.bounds();

        let panel = self.component_panel(id);
        let snap = panel.and_then(|panel| self.panel(panel).grid_snap());
        if let Some(drag) = self.node_mut(id).drag.as_mut() {
            drag.session = Some(DragSession { offset, snap });
        }

        if real_time {
            return;
        }
        let Some(shadow) = shadow else {
            return;
        };
        let origin = self.panel_offset(id);
        self.set_bounds(shadow, bounds.translate(origin.x, origin.y));
        if let Some(panel) = panel {
            let layer = self.panel(panel).layer(RootLayer::Drag);
            if let Err(err) = self.add_component(layer, shadow) {
                log::warn!("drag shadow of {id:?} not shown: {err}");
            }
        }
        log::debug!("drag of {id:?} started at {pointer:?}");
    }

    /// Follow the pointer. Does nothing unless the component is draggable.
    pub(crate) fn drag_dragged(&mut self, id: ComponentId, pointer: Point) {
        let Some(drag) = self.component(id).drag.as_ref() else {
            return;
        };
        if !drag.draggable {
            return;
        }
        let Some(session) = drag.session else {
            return;
        };
        let (real_time, shadow) = (drag.real_time, drag.shadow);
        if self.set_mouse_dragging(id, true).is_err() {
            return;
        }

        let mut target = Point::new(pointer.x - session.offset.x, pointer.y - session.offset.y);
        if let Some(snap) = session.snap {
            target = snap.snap_point(target);
        }

        if real_time {
            self.set_location(id, target.x, target.y);
        } else if let Some(shadow) = shadow {
            let origin = self.panel_offset(id);
            self.set_location(shadow, target.x + origin.x, target.y + origin.y);
        }
    }

    /// Finish the gesture, moving the component to where its shadow ended up.
    pub(crate) fn drag_released(&mut self, id: ComponentId) {
        let Some(drag) = self.node_mut(id).drag.as_mut() else {
            return;
        };
        let session = drag.session.take();
        let (real_time, shadow) = (drag.real_time, drag.shadow);
        if let Err(err) = self.set_mouse_dragging(id, false) {
            log::warn!("drag of {id:?} not cleared: {err}");
        }

        if session.is_none() || real_time {
            return;
        }
        let Some(shadow) = shadow else {
            return;
        };
        if let Some(layer) = self.component(shadow).parent {
            self.remove_component(layer, shadow);
        }
        let origin = self.panel_offset(id);
        let location = self.component(shadow).location();
        self.set_location(id, location.x - origin.x, location.y - origin.y);
        log::debug!("drag of {id:?} finished at {location:?}");
    }
}
