//! Resize handles and the resize gestures of adjustable components.
//!
//! Handles are children of an adjustable owner, positioned at one of nine
//! anchors on its outline. Pressing a handle makes it the owner's active
//! handle; dragging it recomputes the owner's bounds for that anchor.

use crate::component::{ComponentId, ComponentKind};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::geometry::{Geometry, Point, Rect, Size};
use crate::grid::GridSnap;
use crate::painter::{DefaultComponentPainter, LineBorder};
use crate::property::names;
use crate::scene::Scene;
use slint::{Brush, Color};
use std::rc::Rc;

/// Anchor of a handle on its owner's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Center,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Coordinate {
    /// The eight outline anchors, clockwise from the top-left corner.
    pub const COMPASS: [Coordinate; 8] = [
        Coordinate::NorthWest,
        Coordinate::North,
        Coordinate::NorthEast,
        Coordinate::East,
        Coordinate::SouthEast,
        Coordinate::South,
        Coordinate::SouthWest,
        Coordinate::West,
    ];

    pub fn cursor(self) -> Cursor {
        match self {
            Coordinate::Center => Cursor::Move,
            Coordinate::NorthWest => Cursor::NorthWestResize,
            Coordinate::North => Cursor::NorthResize,
            Coordinate::NorthEast => Cursor::NorthEastResize,
            Coordinate::East => Cursor::EastResize,
            Coordinate::SouthEast => Cursor::SouthEastResize,
            Coordinate::South => Cursor::SouthResize,
            Coordinate::SouthWest => Cursor::SouthWestResize,
            Coordinate::West => Cursor::WestResize,
        }
    }

    /// Top-left corner of a handle of `handle` size anchored here on an
    /// owner of `owner` size, in the owner's local space.
    pub fn handle_origin(self, owner: Size, handle: Size) -> Point {
        let center_x = owner.width / 2.0 - handle.width / 2.0;
        let center_y = owner.height / 2.0 - handle.height / 2.0;
        let right = owner.width - handle.width;
        let bottom = owner.height - handle.height;
        match self {
            Coordinate::Center => Point::new(center_x, center_y),
            Coordinate::NorthWest => Point::new(0.0, 0.0),
            Coordinate::North => Point::new(center_x, 0.0),
            Coordinate::NorthEast => Point::new(right, 0.0),
            Coordinate::East => Point::new(right, center_y),
            Coordinate::SouthEast => Point::new(right, bottom),
            Coordinate::South => Point::new(center_x, bottom),
            Coordinate::SouthWest => Point::new(0.0, bottom),
            Coordinate::West => Point::new(0.0, center_y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HandleState {
    pub(crate) coordinate: Coordinate,
}

impl HandleState {
    pub(crate) fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

/// Handle registry and resize gesture state of an adjustable component.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AdjustState {
    pub(crate) show_handles: bool,
    pub(crate) active_handle: Option<ComponentId>,
    pub(crate) handles: Vec<ComponentId>,
    pub(crate) session: Option<ResizeSession>,
}

impl Default for AdjustState {
    fn default() -> Self {
        Self {
            show_handles: true,
            active_handle: None,
            handles: Vec::new(),
            session: None,
        }
    }
}

/// Pointer offsets captured when a handle is pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResizeSession {
    /// Pointer position relative to the owner's origin.
    pub(crate) xy_offset: Point,
    /// Distance from the pointer to the owner's right and bottom edges.
    pub(crate) wh_offset: Size,
    pub(crate) snap: Option<GridSnap>,
}

/// Owner bounds after dragging the handle at `coordinate` to `pointer`
/// (owner's parent space).
///
/// The x/width pair and the y/height pair are checked against `min`/`max`
/// independently; a pair that falls outside reverts to its `current` value.
pub(crate) fn resize_bounds(
    coordinate: Coordinate,
    current: Rect,
    pointer: Point,
    session: &ResizeSession,
    min: Rect,
    max: Rect,
) -> Rect {
    let Rect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = current;
    let snap = session.snap;
    let moved_x = pointer.x - session.xy_offset.x;
    let moved_y = pointer.y - session.xy_offset.y;
    let east_width = pointer.x - current.x + session.wh_offset.width;
    let south_height = pointer.y - current.y + session.wh_offset.height;

    let moves_west = matches!(
        coordinate,
        Coordinate::NorthWest | Coordinate::SouthWest | Coordinate::West
    );
    let moves_north = matches!(
        coordinate,
        Coordinate::NorthWest | Coordinate::North | Coordinate::NorthEast
    );
    let moves_east = matches!(
        coordinate,
        Coordinate::NorthEast | Coordinate::East | Coordinate::SouthEast
    );
    let moves_south = matches!(
        coordinate,
        Coordinate::SouthEast | Coordinate::South | Coordinate::SouthWest
    );

    if coordinate == Coordinate::Center {
        x = moved_x;
        y = moved_y;
        if let Some(snap) = snap {
            x -= snap.x_remainder(x);
            y -= snap.y_remainder(y);
        }
    }
    if moves_west {
        x = moved_x;
        width = current.width + (current.x - x);
        if let Some(snap) = snap {
            let diff = snap.x_remainder(x);
            x -= diff;
            width += diff;
        }
    }
    if moves_north {
        y = moved_y;
        height = current.height + (current.y - y);
        if let Some(snap) = snap {
            let diff = snap.y_remainder(y);
            y -= diff;
            height += diff;
        }
    }
    if moves_east {
        width = east_width;
        if let Some(snap) = snap {
            width -= snap.x_remainder(width);
        }
    }
    if moves_south {
        height = south_height;
        if let Some(snap) = snap {
            height -= snap.y_remainder(height);
        }
    }

    if x < min.x || x > max.x || width < min.width || width > max.width {
        x = current.x;
        width = current.width;
    }
    if y < min.y || y > max.y || height < min.height || height > max.height {
        y = current.y;
        height = current.height;
    }
    Rect::new(x, y, width, height)
}

impl Scene {
    /// A handle with the default look: white fill, thin black border and
    /// the anchor's resize cursor.
    pub fn create_handle(&mut self, coordinate: Coordinate) -> ComponentId {
        let id = self.push(ComponentKind::Handle);
        let size = self.config().handle_size;
        let node = self.node_mut(id);
        node.bounds = Rect::new(0.0, 0.0, size.width, size.height);
        node.border = Some(Rc::new(LineBorder::default()));
        node.background = Some(Brush::SolidColor(Color::from_rgb_u8(255, 255, 255)));
        node.painter = Some(Rc::new(DefaultComponentPainter));
        node.cursor = Some(coordinate.cursor());
        node.handle = Some(HandleState::new(coordinate));
        id
    }

    /// Create and attach the eight compass handles. Fails on the first handle
    /// if `owner` is not adjustable.
    pub fn add_resize_handles(&mut self, owner: ComponentId) -> Result<Vec<ComponentId>> {
        let mut handles = Vec::with_capacity(Coordinate::COMPASS.len());
        for coordinate in Coordinate::COMPASS {
            let handle = self.create_handle(coordinate);
            self.add_component(owner, handle)?;
            handles.push(handle);
        }
        Ok(handles)
    }

    /// Move a handle to another anchor.
    pub fn set_handle_coordinate(&mut self, handle: ComponentId, coordinate: Coordinate) {
        let Some(state) = self.node_mut(handle).handle.as_mut() else {
            return;
        };
        if state.coordinate == coordinate {
            return;
        }
        state.coordinate = coordinate;
        self.set_cursor(handle, Some(coordinate.cursor()));
        if let Some(owner) = self.component(handle).parent {
            self.update_handle_positions(owner);
        }
    }

    /// Hidden handles are neither painted nor hit.
    pub fn set_show_handles(&mut self, owner: ComponentId, show: bool) {
        let Some(adjust) = self.node_mut(owner).adjust.as_mut() else {
            return;
        };
        if adjust.show_handles == show {
            return;
        }
        adjust.show_handles = show;
        self.fire_property(owner, names::SHOW_HANDLES, !show, show);
        self.repaint(owner);
    }

    /// Make `handle` the owner's active handle, recording the press `pointer`
    /// (owner's parent space), or clear it with `None`.
    pub fn set_active_handle(&mut self, owner: ComponentId, handle: Option<ComponentId>, pointer: Point) {
        let node = self.component(owner);
        let Some(adjust) = node.adjust.as_ref() else {
            return;
        };
        let old = adjust.active_handle;
        if old == handle {
            return;
        }
        let bounds = node.bounds();
        let snap = self
            .component_panel(owner)
            .and_then(|panel| self.panel(panel).grid_snap());
        let session = handle.map(|_| ResizeSession {
            xy_offset: Point::new(pointer.x - bounds.x, pointer.y - bounds.y),
            wh_offset: Size::new(bounds.max_x() - pointer.x, bounds.max_y() - pointer.y),
            snap,
        });
        if let Some(adjust) = self.node_mut(owner).adjust.as_mut() {
            adjust.active_handle = handle;
            adjust.session = session;
        }
        self.fire_property(owner, names::ACTIVE_HANDLE, old, handle);
        if handle.is_some() {
            log::debug!("resize of {owner:?} started with {handle:?}");
        }
    }

    /// Re-anchor every handle after the owner's size changed.
    pub(crate) fn update_handle_positions(&mut self, owner: ComponentId) {
        let handles = self.component(owner).handles().to_vec();
        for handle in handles {
            self.update_handle_position(owner, handle);
        }
    }

    fn update_handle_position(&mut self, owner: ComponentId, handle: ComponentId) {
        let Some(coordinate) = self.component(handle).coordinate() else {
            return;
        };
        let origin = coordinate.handle_origin(self.component(owner).size(), self.component(handle).size());
        self.set_location(handle, origin.x, origin.y);
    }

    pub(crate) fn register_handle(&mut self, owner: ComponentId, handle: ComponentId) {
        let Some(adjust) = self.node_mut(owner).adjust.as_mut() else {
            return;
        };
        if !adjust.handles.contains(&handle) {
            adjust.handles.push(handle);
        }
        self.update_handle_position(owner, handle);
    }

    pub(crate) fn deregister_handle(&mut self, owner: ComponentId, handle: ComponentId) {
        let Some(adjust) = self.node_mut(owner).adjust.as_mut() else {
            return;
        };
        adjust.handles.retain(|h| *h != handle);
        if adjust.active_handle == Some(handle) {
            self.set_active_handle(owner, None, Point::default());
        }
    }

    // === Gesture hooks; `pointer` is in the handle's parent (owner-local) space ===

    pub(crate) fn handle_pressed(&mut self, handle: ComponentId, pointer: Point) {
        let Some(owner) = self.handle_owner(handle) else {
            return;
        };
        let origin = self.component(owner).location();
        self.set_active_handle(owner, Some(handle), pointer.translate(origin.x, origin.y));
    }

    pub(crate) fn handle_released(&mut self, handle: ComponentId) {
        if let Some(owner) = self.handle_owner(handle) {
            if self.component(owner).active_handle() == Some(handle) {
                self.set_active_handle(owner, None, Point::default());
            }
        }
    }

    pub(crate) fn handle_dragged(&mut self, handle: ComponentId, pointer: Point) {
        let Some(owner) = self.handle_owner(handle) else {
            return;
        };
        let node = self.component(owner);
        let (Some(adjust), Some(coordinate)) = (node.adjust.as_ref(), self.component(handle).coordinate())
        else {
            return;
        };
        if adjust.active_handle != Some(handle) {
            return;
        }
        let Some(session) = adjust.session else {
            return;
        };
        let current = node.bounds();
        let pointer = pointer.translate(current.x, current.y);
        let bounds = resize_bounds(
            coordinate,
            current,
            pointer,
            &session,
            node.min_bounds(),
            node.max_bounds(),
        );
        self.set_bounds(owner, bounds);
    }

    fn handle_owner(&self, handle: ComponentId) -> Option<ComponentId> {
        self.component(handle)
            .parent
            .filter(|owner| self.component(*owner).is_adjustable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_MIN: Rect = Rect::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    const NO_MAX: Rect = Rect::new(f64::INFINITY, f64::INFINITY, f64::INFINITY, f64::INFINITY);

    fn session_at(current: Rect, pointer: Point, snap: Option<GridSnap>) -> ResizeSession {
        ResizeSession {
            xy_offset: Point::new(pointer.x - current.x, pointer.y - current.y),
            wh_offset: Size::new(current.max_x() - pointer.x, current.max_y() - pointer.y),
            snap,
        }
    }

    // ========================================================================
    // Anchors
    // ========================================================================

    #[test]
    fn test_handle_origins() {
        let owner = Size::new(100.0, 50.0);
        let handle = Size::new(6.0, 6.0);
        assert_eq!(Coordinate::NorthWest.handle_origin(owner, handle), Point::new(0.0, 0.0));
        assert_eq!(Coordinate::North.handle_origin(owner, handle), Point::new(47.0, 0.0));
        assert_eq!(Coordinate::SouthEast.handle_origin(owner, handle), Point::new(94.0, 44.0));
        assert_eq!(Coordinate::West.handle_origin(owner, handle), Point::new(0.0, 22.0));
        assert_eq!(Coordinate::Center.handle_origin(owner, handle), Point::new(47.0, 22.0));
    }

    // ========================================================================
    // Resize Math
    // ========================================================================

    #[test]
    fn test_south_east_grows() {
        let current = Rect::new(10.0, 10.0, 100.0, 50.0);
        let session = session_at(current, Point::new(108.0, 58.0), None);
        let bounds = resize_bounds(Coordinate::SouthEast, current, Point::new(128.0, 68.0), &session, NO_MIN, NO_MAX);
        assert_eq!(bounds, Rect::new(10.0, 10.0, 120.0, 60.0));
    }

    #[test]
    fn test_north_east_keeps_x_and_bottom() {
        let current = Rect::new(10.0, 10.0, 100.0, 50.0);
        let session = session_at(current, Point::new(108.0, 12.0), None);
        let bounds = resize_bounds(Coordinate::NorthEast, current, Point::new(118.0, 2.0), &session, NO_MIN, NO_MAX);
        assert_eq!(bounds, Rect::new(10.0, 0.0, 110.0, 60.0));
        assert_eq!(bounds.max_y(), current.max_y());
    }

    #[test]
    fn test_west_keeps_right_edge() {
        let current = Rect::new(10.0, 10.0, 100.0, 50.0);
        let session = session_at(current, Point::new(12.0, 30.0), None);
        let bounds = resize_bounds(Coordinate::West, current, Point::new(32.0, 90.0), &session, NO_MIN, NO_MAX);
        assert_eq!(bounds, Rect::new(30.0, 10.0, 80.0, 50.0));
    }

    #[test]
    fn test_min_width_reverts_only_horizontal_pair() {
        let current = Rect::new(10.0, 10.0, 100.0, 50.0);
        let min = Rect::new(f64::NEG_INFINITY, f64::NEG_INFINITY, 40.0, f64::NEG_INFINITY);
        let session = session_at(current, Point::new(110.0, 60.0), None);

        let bounds = resize_bounds(Coordinate::SouthEast, current, Point::new(40.0, 80.0), &session, min, NO_MAX);

        assert_eq!(bounds, Rect::new(10.0, 10.0, 100.0, 70.0));
    }

    #[test]
    fn test_snap_applies_per_axis() {
        let current = Rect::new(0.0, 0.0, 32.0, 32.0);
        let session = session_at(current, Point::new(32.0, 32.0), Some(GridSnap::new(16.0, 16.0)));
        let bounds = resize_bounds(Coordinate::SouthEast, current, Point::new(45.0, 70.0), &session, NO_MIN, NO_MAX);
        assert_eq!(bounds, Rect::new(0.0, 0.0, 32.0, 64.0));
    }

    // ========================================================================
    // Registration
    // ========================================================================

    #[test]
    fn test_add_resize_handles_positions_them() {
        let mut scene = Scene::new();
        let owner = scene.create_adjustable(Rect::new(10.0, 10.0, 100.0, 50.0));
        let handles = scene.add_resize_handles(owner).unwrap();

        assert_eq!(scene.component(owner).handles(), handles.as_slice());
        let south_east = handles[4];
        assert_eq!(scene.component(south_east).coordinate(), Some(Coordinate::SouthEast));
        assert_eq!(scene.component(south_east).location(), Point::new(94.0, 44.0));
    }

    #[test]
    fn test_handles_follow_owner_resize() {
        let mut scene = Scene::new();
        let owner = scene.create_adjustable(Rect::new(10.0, 10.0, 100.0, 50.0));
        let handles = scene.add_resize_handles(owner).unwrap();
        scene.set_size(owner, 200.0, 100.0);
        assert_eq!(scene.component(handles[4]).location(), Point::new(194.0, 94.0));
    }

    #[test]
    fn test_handle_rejected_by_plain_container() {
        let mut scene = Scene::new();
        let container = scene.create_container();
        let handle = scene.create_handle(Coordinate::East);
        let err = scene.add_component(container, handle).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(scene.component(handle).parent(), None);
    }

    #[test]
    fn test_removing_active_handle_clears_it() {
        let mut scene = Scene::new();
        let owner = scene.create_adjustable(Rect::new(0.0, 0.0, 100.0, 50.0));
        let handles = scene.add_resize_handles(owner).unwrap();
        scene.set_active_handle(owner, Some(handles[0]), Point::new(1.0, 1.0));

        scene.remove_component(owner, handles[0]);

        assert_eq!(scene.component(owner).active_handle(), None);
        assert_eq!(scene.component(owner).handles().len(), 7);
    }

    #[test]
    fn test_drag_gesture_resizes_owner() {
        let mut scene = Scene::new();
        let owner = scene.create_adjustable(Rect::new(10.0, 10.0, 100.0, 50.0));
        let handles = scene.add_resize_handles(owner).unwrap();
        let east = handles[3];

        scene.handle_pressed(east, Point::new(97.0, 25.0));
        scene.handle_dragged(east, Point::new(117.0, 25.0));
        scene.handle_released(east);

        assert_eq!(scene.component(owner).bounds(), Rect::new(10.0, 10.0, 120.0, 50.0));
        assert_eq!(scene.component(owner).active_handle(), None);
    }
}
