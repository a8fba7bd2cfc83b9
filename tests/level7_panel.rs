//! Level 7: Panel Tests
//!
//! Tests panels end to end: root layers, scaling, repaint regions, tools,
//! painting and the window-facing controller.

mod common;

use common::EditorScene;
use slint::platform::PointerEventButton;
use slint::{Brush, Color};
use slint_scene_graph::{
    names, ComponentPanel, ComponentPanelTool, Cursor, DefaultPanelTool, DrawOp, Geometry, Line,
    MouseEventKind, Overview, Point, PropertyChangeEvent, PropertyChangeListener,
    RecordingSurface, Rect, RootEvent, RootEventKind, RootHandler, RootLayer, Scene, SceneConfig,
    SceneController, SceneError, Shape, Size,
};
use std::cell::RefCell;
use std::rc::Rc;

fn red() -> Brush {
    Brush::SolidColor(Color::from_rgb_u8(255, 0, 0))
}

// ============================================================================
// Roots
// ============================================================================

#[test]
fn test_panel_layers_in_paint_order() {
    let editor = EditorScene::new();
    let panel = editor.scene.panel(editor.panel);
    let layers: Vec<_> = RootLayer::ALL.iter().map(|layer| panel.layer(*layer)).collect();
    assert_eq!(panel.roots(), layers.as_slice(), "layers are the panel's roots, bottom first");
    for root in layers {
        assert_eq!(editor.scene.component_panel(root), Some(editor.panel));
    }
}

#[test]
fn test_only_parentless_components_attach_to_panels() {
    let mut editor = EditorScene::new();
    let container = editor.scene.create_container();
    editor.add(container);
    assert_eq!(
        editor.scene.add_root_component(editor.panel, container).unwrap_err(),
        SceneError::PanelOnNonRoot(container)
    );

    let loose = editor.scene.create_draggable(Rect::new(0.0, 0.0, 20.0, 20.0));
    editor.scene.add_root_component(editor.panel, loose).unwrap();
    assert!(editor.scene.is_root_component(loose));
    assert_eq!(editor.scene.panel(editor.panel).roots().last(), Some(&loose));
}

#[test]
fn test_parentless_root_routes_but_never_consumes() {
    let mut editor = EditorScene::free();
    let loose = editor.scene.create_draggable(Rect::new(0.0, 0.0, 400.0, 300.0));
    editor.scene.set_real_time_dragging_enabled(loose, true).unwrap();
    editor.scene.add_root_component(editor.panel, loose).unwrap();

    assert!(!editor.press(20.0, 20.0), "a root does not take the press itself");
    assert!(!editor.scene.component(loose).is_mouse_pressed());
}

#[test]
fn test_root_moves_between_panels() {
    let mut editor = EditorScene::new();
    let other = editor.scene.create_panel();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    editor
        .scene
        .panel_mut(editor.panel)
        .root_listeners_mut()
        .add(Rc::new(RootHandler(move |evt: &RootEvent| {
            sink.borrow_mut().push(evt.kind);
        })));

    let extra = editor.scene.create_root();
    let leaf = editor.scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
    editor.scene.add_component(extra, leaf).unwrap();
    editor.scene.add_root_component(editor.panel, extra).unwrap();
    assert_eq!(editor.scene.component_panel(leaf), Some(editor.panel));

    editor.scene.add_root_component(other, extra).unwrap();
    assert!(!editor.scene.panel(editor.panel).contains_root(extra));
    assert!(editor.scene.panel(other).contains_root(extra));
    assert_eq!(
        editor.scene.component_panel(leaf),
        Some(other),
        "descendants resolve their panel through the root"
    );
    assert_eq!(
        *events.borrow(),
        vec![RootEventKind::RootsAdded, RootEventKind::RootsRemoved]
    );
}

#[test]
fn test_detaching_root_clears_panel() {
    let mut editor = EditorScene::new();
    let extra = editor.scene.create_root();
    editor.scene.set_component_panel(extra, Some(editor.panel)).unwrap();
    editor.scene.set_component_panel(extra, None).unwrap();
    assert_eq!(editor.scene.component_panel(extra), None);
    assert_eq!(editor.scene.panel(editor.panel).roots().len(), 5);
}

// ============================================================================
// Scale
// ============================================================================

#[test]
fn test_scale_maps_device_input_and_preferred_size() {
    let mut editor = EditorScene::new();
    let leaf = editor.scene.create_resizable(Rect::new(10.0, 10.0, 20.0, 20.0));
    editor.add(leaf);
    editor.scene.set_panel_scale(editor.panel, 2.0).unwrap();

    assert_eq!(
        editor.scene.panel(editor.panel).preferred_size(),
        Size::new(800.0, 600.0)
    );
    assert!(!editor.press(70.0, 70.0), "device (70, 70) is panel (35, 35): a miss");
    assert!(editor.press(30.0, 30.0), "device (30, 30) is panel (15, 15): a hit");
    assert!(editor.scene.component(leaf).is_mouse_pressed());
}

#[test]
fn test_scale_must_be_positive() {
    let mut editor = EditorScene::new();
    assert!(editor.scene.set_panel_scale(editor.panel, 0.0).is_err());
    assert!(editor.scene.set_panel_scale(editor.panel, -2.0).is_err());
    assert_eq!(editor.scene.panel(editor.panel).scale(), 1.0);
}

#[test]
fn test_config_scale_applies_to_new_panels() {
    let editor = EditorScene::with_config(SceneConfig::default().with_scale(1.5));
    assert_eq!(editor.scene.panel(editor.panel).scale(), 1.5);
    assert_eq!(
        editor.scene.panel(editor.panel).preferred_size(),
        Size::new(600.0, 450.0)
    );
}

// ============================================================================
// Repaint
// ============================================================================

#[test]
fn test_moves_queue_device_regions() {
    let mut editor = EditorScene::new();
    let leaf = editor.scene.create_resizable(Rect::new(10.0, 10.0, 20.0, 20.0));
    editor.add(leaf);
    editor.scene.set_panel_scale(editor.panel, 2.0).unwrap();
    editor.scene.panel_mut(editor.panel).take_dirty_regions();

    editor.scene.set_location(leaf, 40.0, 10.0);

    let regions = editor.scene.panel_mut(editor.panel).take_dirty_regions();
    assert_eq!(
        regions.last(),
        Some(&Rect::new(20.0, 20.0, 100.0, 40.0)),
        "old and new bounds, scaled to device units"
    );
    assert!(editor.scene.panel_mut(editor.panel).take_dirty_regions().is_empty());
}

#[test]
fn test_detached_components_do_not_repaint() {
    let mut editor = EditorScene::new();
    editor.scene.panel_mut(editor.panel).take_dirty_regions();
    let loose = editor.scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
    editor.scene.set_location(loose, 5.0, 5.0);
    assert!(editor.scene.panel_mut(editor.panel).take_dirty_regions().is_empty());
}

// ============================================================================
// Tools
// ============================================================================

#[test]
fn test_active_tool_switches_cursor_and_notifies() {
    let mut editor = EditorScene::new();
    let names_seen = Rc::new(RefCell::new(Vec::new()));
    let sink = names_seen.clone();
    let listener: Rc<dyn PropertyChangeListener> =
        Rc::new(move |evt: &PropertyChangeEvent| sink.borrow_mut().push(evt.name));
    editor.scene.panel(editor.panel).properties().add_listener(listener);

    let connect = Rc::new(
        DefaultPanelTool::new("connect", "Connect")
            .with_cursor(Cursor::Crosshair)
            .with_short_description("Draw connections"),
    );
    editor
        .scene
        .set_active_tool(editor.panel, Some(connect.clone()))
        .unwrap();
    assert!(connect.is_active());
    assert_eq!(editor.scene.panel(editor.panel).cursor(), Cursor::Crosshair);
    assert_eq!(
        editor.scene.panel(editor.panel).active_tool().map(|t| t.id()),
        Some("connect".into())
    );

    // Re-installing the same tool does nothing
    editor
        .scene
        .set_active_tool(editor.panel, Some(connect.clone()))
        .unwrap();

    editor.scene.set_active_tool(editor.panel, None).unwrap();
    assert!(!connect.is_active());
    assert_eq!(editor.scene.panel(editor.panel).cursor(), Cursor::Default);

    let tool_events = names_seen
        .borrow()
        .iter()
        .filter(|name| **name == names::ACTIVE_TOOL)
        .count();
    assert_eq!(tool_events, 2);
}

#[test]
fn test_tool_without_cursor_keeps_panel_cursor() {
    let mut editor = EditorScene::new();
    editor.scene.set_panel_cursor(editor.panel, Cursor::Hand);
    let select = Rc::new(DefaultPanelTool::new("select", "Select"));
    editor
        .scene
        .set_active_tool(editor.panel, Some(select.clone()))
        .unwrap();
    assert_eq!(editor.scene.panel(editor.panel).cursor(), Cursor::Hand);
    assert_eq!(select.name().as_str(), "Select");
}

/// A tool that refuses to activate.
struct LockedTool;

impl ComponentPanelTool for LockedTool {
    fn id(&self) -> slint::SharedString {
        "locked".into()
    }

    fn is_active(&self) -> bool {
        false
    }

    fn activate(&self, _panel: &mut ComponentPanel) -> Result<(), SceneError> {
        Err(SceneError::ToolNotActive(self.id()))
    }

    fn deactivate(&self, _panel: &mut ComponentPanel) -> Result<(), SceneError> {
        Ok(())
    }
}

#[test]
fn test_failed_activation_restores_previous_tool() {
    let mut editor = EditorScene::new();
    let connect = Rc::new(DefaultPanelTool::new("connect", "Connect").with_cursor(Cursor::Crosshair));
    editor
        .scene
        .set_active_tool(editor.panel, Some(connect.clone()))
        .unwrap();

    assert!(editor
        .scene
        .set_active_tool(editor.panel, Some(Rc::new(LockedTool)))
        .is_err());

    assert!(connect.is_active(), "previous tool is reactivated");
    assert_eq!(
        editor.scene.panel(editor.panel).active_tool().map(|t| t.id()),
        Some("connect".into())
    );
    assert_eq!(editor.scene.panel(editor.panel).cursor(), Cursor::Crosshair);
}

// ============================================================================
// Overview
// ============================================================================

/// 800x600 of content behind a 400x300 viewport, in a 200x150 overview.
fn overview_scene() -> (EditorScene, Overview) {
    let mut editor = EditorScene::new();
    let far = editor.scene.create_resizable(Rect::new(760.0, 560.0, 40.0, 40.0));
    editor.scene.set_background(far, Some(red()));
    editor.add(far);
    let overview = Overview::new(Some(editor.panel), Size::new(200.0, 150.0));
    (editor, overview)
}

#[test]
fn test_overview_scale_maps_preferred_size() {
    let (mut editor, overview) = overview_scene();
    assert_eq!(overview.overview_scale(&editor.scene), Some((0.25, 0.25)));
    assert_eq!(
        overview.visible_region_in_overview(&editor.scene),
        Some(Rect::new(0.0, 0.0, 100.0, 75.0))
    );

    editor.scene.set_panel_scale(editor.panel, 2.0).unwrap();
    assert_eq!(overview.overview_scale(&editor.scene), Some((0.125, 0.125)));
    assert_eq!(
        overview.visible_region_in_overview(&editor.scene),
        Some(Rect::new(0.0, 0.0, 100.0, 75.0)),
        "zooming the panel keeps the marker over the same content"
    );
}

#[test]
fn test_overview_press_centres_visible_rect() {
    let (mut editor, mut overview) = overview_scene();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener: Rc<dyn PropertyChangeListener> =
        Rc::new(move |evt: &PropertyChangeEvent| sink.borrow_mut().push(evt.name));
    editor.scene.panel(editor.panel).properties().add_listener(listener);

    assert!(overview.overview_pressed(&mut editor.scene, Point::new(100.0, 75.0)));

    assert_eq!(
        editor.scene.panel(editor.panel).visible_rect(),
        Rect::new(200.0, 150.0, 400.0, 300.0)
    );
    assert_eq!(
        overview.visible_region_in_overview(&editor.scene),
        Some(Rect::new(50.0, 37.5, 100.0, 75.0))
    );
    assert!(seen.borrow().contains(&names::VISIBLE_RECT));
}

#[test]
fn test_overview_drag_clamps_to_panel() {
    let (mut editor, mut overview) = overview_scene();

    overview.overview_pressed(&mut editor.scene, Point::new(10.0, 10.0));
    assert_eq!(
        editor.scene.panel(editor.panel).visible_rect(),
        Rect::new(0.0, 0.0, 400.0, 300.0),
        "clamped at the top left"
    );

    assert!(overview.overview_dragged(&mut editor.scene, Point::new(195.0, 145.0)));
    assert_eq!(
        editor.scene.panel(editor.panel).visible_rect(),
        Rect::new(400.0, 300.0, 400.0, 300.0),
        "clamped at the bottom right"
    );
    assert_eq!(
        editor.scene.panel(editor.panel).preferred_size(),
        Size::new(800.0, 600.0)
    );
}

#[test]
fn test_overview_paints_scaled_roots_and_marker() {
    let (mut editor, overview) = overview_scene();
    let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 200.0, 150.0));
    overview.paint_overview(&mut editor.scene, &mut surface);

    let shapes: Vec<Shape> = surface.ops().iter().map(|op| *op.shape()).collect();
    assert_eq!(
        shapes,
        vec![
            Shape::Rect(Rect::new(0.0, 0.0, 200.0, 150.0)),
            Shape::Rect(Rect::new(190.0, 140.0, 10.0, 10.0)),
            Shape::Rect(Rect::new(0.0, 0.0, 100.0, 75.0)),
        ]
    );
    assert!(matches!(surface.ops().last(), Some(DrawOp::Stroke { .. })));
}

#[test]
fn test_overview_hides_marker_when_everything_is_visible() {
    let mut editor = EditorScene::new();
    let overview = Overview::new(Some(editor.panel), Size::new(200.0, 150.0));
    let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 200.0, 150.0));
    overview.paint_overview(&mut editor.scene, &mut surface);
    assert!(surface.ops().iter().all(|op| matches!(op, DrawOp::Fill { .. })));
}

// ============================================================================
// Painting
// ============================================================================

fn painted_scene() -> EditorScene {
    let mut editor = EditorScene::new();
    let a = editor.scene.create_connected(Rect::new(10.0, 10.0, 40.0, 20.0));
    let b = editor.scene.create_connected(Rect::new(100.0, 10.0, 40.0, 20.0));
    for id in [a, b] {
        editor.scene.set_background(id, Some(red()));
        editor.add(id);
    }
    let edge = editor.scene.create_connection(Some(a), Some(b)).unwrap();
    let connections = editor.layer(RootLayer::Connection);
    editor.scene.add_component(connections, edge).unwrap();
    editor
}

#[test]
fn test_paint_panel_draws_layers_bottom_up() {
    let mut editor = painted_scene();
    let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 400.0, 300.0));
    editor.scene.paint_panel(editor.panel, &mut surface);

    let shapes: Vec<Shape> = surface.ops().iter().map(|op| *op.shape()).collect();
    assert_eq!(
        shapes,
        vec![
            Shape::Rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
            Shape::Rect(Rect::new(10.0, 10.0, 40.0, 20.0)),
            Shape::Rect(Rect::new(100.0, 10.0, 40.0, 20.0)),
            Shape::Line(Line::new(Point::new(30.0, 20.0), Point::new(120.0, 20.0))),
        ],
        "background, then components, then connections on top"
    );
    assert!(matches!(surface.ops().last(), Some(DrawOp::Stroke { .. })));
}

#[test]
fn test_paint_region_skips_components_outside() {
    let mut editor = painted_scene();
    let mut surface = RecordingSurface::new(Rect::new(0.0, 0.0, 400.0, 300.0));
    editor
        .scene
        .paint_panel_region(editor.panel, Rect::new(0.0, 0.0, 60.0, 60.0), &mut surface);

    let fills: Vec<Shape> = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Fill { .. }))
        .map(|op| *op.shape())
        .collect();
    assert_eq!(
        fills,
        vec![
            Shape::Rect(Rect::new(0.0, 0.0, 60.0, 60.0)),
            Shape::Rect(Rect::new(10.0, 10.0, 40.0, 20.0)),
        ]
    );
}

// ============================================================================
// Controller
// ============================================================================

#[test]
fn test_controller_drives_a_drag() {
    let ctrl = SceneController::new(Scene::with_config(
        SceneConfig::default().with_snap_to_grid(false),
    ));
    ctrl.viewport_callback()(0.0, 0.0, 400.0, 300.0);
    let node = {
        let scene = ctrl.scene();
        let mut scene = scene.borrow_mut();
        let layer = scene.panel(ctrl.panel()).layer(RootLayer::Component);
        let node = scene.create_draggable(Rect::new(10.0, 10.0, 40.0, 40.0));
        scene.add_component(layer, node).unwrap();
        node
    };

    let pointer = ctrl.pointer_event_callback();
    let motion = ctrl.pointer_motion_callback();
    assert!(pointer(MouseEventKind::Pressed, PointerEventButton::Left, 20.0, 20.0, 1));
    assert!(motion(60.0, 45.0, true));
    pointer(MouseEventKind::Released, PointerEventButton::Left, 60.0, 45.0, 1);

    assert_eq!(
        ctrl.scene().borrow().component(node).location(),
        Point::new(50.0, 35.0)
    );
}

#[test]
fn test_controller_typed_follows_printable_press() {
    let ctrl = SceneController::new(Scene::new());
    let kinds = Rc::new(RefCell::new(Vec::new()));
    {
        let scene = ctrl.scene();
        let mut scene = scene.borrow_mut();
        let layer = scene.panel(ctrl.panel()).layer(RootLayer::Component);
        let leaf = scene.create_resizable(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.add_component(layer, leaf).unwrap();
        scene.set_focused(leaf, true).unwrap();
        let sink = kinds.clone();
        scene
            .key_listeners_mut(leaf)
            .add(Rc::new(slint_scene_graph::KeyHandler(
                move |_: &mut Scene, _, evt: &mut slint_scene_graph::KeyEvent| {
                    sink.borrow_mut().push(evt.kind)
                },
            )));
    }

    let key = ctrl.key_event_callback();
    assert!(key("q".into(), true));
    assert!(key("q".into(), false));

    use slint_scene_graph::KeyEventKind::*;
    assert_eq!(*kinds.borrow(), vec![Pressed, Typed, Released]);
}
