//! Level 6: Event Tests
//!
//! Tests focus, mouse-over tracking, key and wheel delivery, notification
//! switches and tooltips through the panel's dispatch entry points.

mod common;

use common::{EditorScene, ListenerTracker};
use slint::platform::Key;
use slint_scene_graph::{
    ComponentId, Cursor, Geometry, KeyEvent, KeyEventKind, KeyHandler, ListenerFamily,
    MouseEventKind, MouseWheelEvent, Point, Rect, Scene, ToolTip, ToolTipRenderer,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn two_boxes(editor: &mut EditorScene) -> (ComponentId, ComponentId) {
    let a = editor.scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 50.0));
    let b = editor.scene.create_resizable(Rect::new(100.0, 10.0, 50.0, 50.0));
    editor.add(a);
    editor.add(b);
    (a, b)
}

// ============================================================================
// Focus
// ============================================================================

#[test]
fn test_click_moves_focus() {
    let mut editor = EditorScene::new();
    let (a, b) = two_boxes(&mut editor);

    editor.click(20.0, 20.0);
    assert!(editor.scene.component(a).is_focused());
    assert_eq!(editor.scene.panel(editor.panel).state().focused_component(), Some(a));

    editor.click(120.0, 20.0);
    assert!(!editor.scene.component(a).is_focused(), "only one component holds focus");
    assert!(editor.scene.component(b).is_focused());
    assert_eq!(editor.scene.panel(editor.panel).state().focused_component(), Some(b));
}

#[test]
fn test_click_on_unfocusable_leaves_focus() {
    let mut editor = EditorScene::new();
    let (a, b) = two_boxes(&mut editor);
    editor.scene.set_focusable(b, false);

    editor.click(20.0, 20.0);
    editor.click(120.0, 20.0);

    assert!(editor.scene.component(a).is_focused());
    assert!(!editor.scene.component(b).is_focused());
}

#[test]
fn test_unfocusing_clears_panel_state() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    editor.scene.set_focused(a, true).unwrap();
    editor.scene.set_focusable(a, false);

    assert!(!editor.scene.component(a).is_focused());
    assert_eq!(editor.scene.panel(editor.panel).state().focused_component(), None);
}

// ============================================================================
// Mouse Over
// ============================================================================

#[test]
fn test_moving_between_components_exits_previous() {
    let mut editor = EditorScene::new();
    let (a, b) = two_boxes(&mut editor);
    let tracker = ListenerTracker::new();
    tracker.track_mouse(&mut editor.scene, a);
    tracker.track_mouse(&mut editor.scene, b);

    editor.move_to(20.0, 20.0);
    editor.move_to(120.0, 20.0);

    assert_eq!(
        *tracker.mouse.borrow(),
        vec![
            (a, MouseEventKind::Entered),
            (a, MouseEventKind::Exited),
            (b, MouseEventKind::Entered),
        ]
    );
    assert!(!editor.scene.component(a).is_mouse_over());
    assert_eq!(editor.scene.panel(editor.panel).state().mouse_over_component(), Some(b));
}

#[test]
fn test_moving_off_exits() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    let tracker = ListenerTracker::new();
    tracker.track_mouse(&mut editor.scene, a);

    editor.move_to(20.0, 20.0);
    editor.move_to(300.0, 250.0);

    assert_eq!(tracker.mouse_kinds(), vec![MouseEventKind::Entered, MouseEventKind::Exited]);
    assert_eq!(editor.scene.panel(editor.panel).state().mouse_over_component(), None);
}

#[test]
fn test_hover_swaps_panel_cursor() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    editor.scene.set_cursor(a, Some(Cursor::Hand));

    editor.move_to(20.0, 20.0);
    assert_eq!(editor.scene.panel(editor.panel).cursor(), Cursor::Hand);

    editor.move_to(300.0, 250.0);
    assert_eq!(editor.scene.panel(editor.panel).cursor(), Cursor::Default);
}

#[test]
fn test_release_outside_clears_mouse_over() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);

    editor.move_to(20.0, 20.0);
    editor.press(20.0, 20.0);
    assert!(editor.release(300.0, 250.0), "release goes to the pressed component");

    assert!(!editor.scene.component(a).is_mouse_pressed());
    assert!(!editor.scene.component(a).is_mouse_over());
}

#[test]
fn test_topmost_takes_press() {
    let mut editor = EditorScene::new();
    let below = editor.scene.create_resizable(Rect::new(10.0, 10.0, 50.0, 50.0));
    let above = editor.scene.create_resizable(Rect::new(30.0, 30.0, 50.0, 50.0));
    editor.add(below);
    editor.add(above);

    editor.press(40.0, 40.0);
    assert!(editor.scene.component(above).is_mouse_pressed());
    assert!(!editor.scene.component(below).is_mouse_pressed());
    assert_eq!(
        editor.scene.panel(editor.panel).state().mouse_pressed_component(),
        Some(above)
    );
}

// ============================================================================
// Notification Switches
// ============================================================================

#[test]
fn test_disabled_mouse_notification_still_tracks_state() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    let tracker = ListenerTracker::new();
    tracker.track_mouse(&mut editor.scene, a);
    editor
        .scene
        .set_notification_enabled(a, ListenerFamily::Mouse, false);

    assert!(editor.press(20.0, 20.0), "the event is still consumed");
    assert!(editor.scene.component(a).is_mouse_pressed());
    assert!(tracker.mouse.borrow().is_empty(), "listeners stay silent");

    editor
        .scene
        .set_notification_enabled(a, ListenerFamily::Mouse, true);
    editor.release(20.0, 20.0);
    assert_eq!(tracker.mouse_kinds(), vec![MouseEventKind::Released]);
}

#[test]
fn test_consuming_listener_stops_later_listeners() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    let seen = Rc::new(RefCell::new(Vec::new()));

    for name in ["first", "second"] {
        let sink = seen.clone();
        editor
            .scene
            .key_listeners_mut(a)
            .add(Rc::new(KeyHandler(move |_: &mut Scene, _, evt: &mut KeyEvent| {
                sink.borrow_mut().push(name);
                evt.consume();
            })));
    }
    editor.scene.set_focused(a, true).unwrap();
    editor
        .scene
        .dispatch_key_event(editor.panel, KeyEvent::new(KeyEventKind::Typed, "x"));

    assert_eq!(*seen.borrow(), vec!["first"]);
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn test_keys_go_to_focused_component() {
    let mut editor = EditorScene::new();
    let (a, b) = two_boxes(&mut editor);
    let seen = Rc::new(RefCell::new(Vec::new()));
    for id in [a, b] {
        let sink = seen.clone();
        editor
            .scene
            .key_listeners_mut(id)
            .add(Rc::new(KeyHandler(move |_: &mut Scene, target, evt: &mut KeyEvent| {
                sink.borrow_mut().push((target, evt.kind));
            })));
    }

    assert!(
        !editor
            .scene
            .dispatch_key_event(editor.panel, KeyEvent::new(KeyEventKind::Pressed, "a")),
        "nothing is focused yet"
    );

    editor.scene.set_focused(b, true).unwrap();
    assert!(editor
        .scene
        .dispatch_key_event(editor.panel, KeyEvent::new(KeyEventKind::Pressed, "a")));
    editor
        .scene
        .dispatch_key_event(editor.panel, KeyEvent::new(KeyEventKind::Typed, "a"));

    assert_eq!(
        *seen.borrow(),
        vec![(b, KeyEventKind::Pressed), (b, KeyEventKind::Typed)]
    );
}

#[test]
fn test_arrow_keys_walk_the_grid() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    editor.scene.set_focused(a, true).unwrap();

    let press = |editor: &mut EditorScene, key| {
        editor
            .scene
            .dispatch_key_event(editor.panel, KeyEvent::for_key(KeyEventKind::Pressed, key))
    };
    press(&mut editor, Key::RightArrow);
    assert_eq!(editor.scene.component(a).location(), Point::new(16.0, 10.0));
    press(&mut editor, Key::RightArrow);
    assert_eq!(editor.scene.component(a).location(), Point::new(32.0, 10.0));
    press(&mut editor, Key::UpArrow);
    assert_eq!(editor.scene.component(a).location(), Point::new(32.0, 0.0));
    press(&mut editor, Key::UpArrow);
    assert_eq!(editor.scene.component(a).location(), Point::new(32.0, -16.0));
}

#[test]
fn test_arrow_keys_ignore_fixed_components() {
    let mut editor = EditorScene::free();
    let (a, _) = two_boxes(&mut editor);
    editor.scene.set_focused(a, true).unwrap();
    editor
        .scene
        .dispatch_key_event(editor.panel, KeyEvent::for_key(KeyEventKind::Pressed, Key::LeftArrow));
    assert_eq!(editor.scene.component(a).location(), Point::new(9.0, 10.0));

    editor.scene.set_movable(a, false);
    editor
        .scene
        .dispatch_key_event(editor.panel, KeyEvent::for_key(KeyEventKind::Pressed, Key::LeftArrow));
    assert_eq!(editor.scene.component(a).location(), Point::new(9.0, 10.0));
}

// ============================================================================
// Wheel
// ============================================================================

#[test]
fn test_wheel_reaches_every_listener_of_target() {
    let mut editor = EditorScene::new();
    let (a, _) = two_boxes(&mut editor);
    let deltas = Rc::new(RefCell::new(Vec::new()));
    for _ in 0..2 {
        let sink = deltas.clone();
        editor.scene.mouse_wheel_listeners_mut(a).add(Rc::new(
            move |_: &mut Scene, _: ComponentId, evt: &MouseWheelEvent| {
                sink.borrow_mut().push(evt.delta_y)
            },
        ));
    }

    assert!(editor
        .scene
        .dispatch_mouse_wheel_event(editor.panel, MouseWheelEvent::new(20.0, 20.0, 0.0, -3.0)));
    assert_eq!(*deltas.borrow(), vec![-3.0, -3.0]);

    assert!(!editor
        .scene
        .dispatch_mouse_wheel_event(editor.panel, MouseWheelEvent::new(300.0, 250.0, 0.0, 1.0)));
}

// ============================================================================
// Tooltips
// ============================================================================

#[derive(Default)]
struct TooltipLog {
    shown: RefCell<Vec<(String, Point)>>,
    hidden: RefCell<usize>,
}

impl ToolTipRenderer for TooltipLog {
    fn show_tooltip(&self, tooltip: &ToolTip, location: Point) {
        self.shown.borrow_mut().push((tooltip.text.to_string(), location));
    }

    fn hide_tooltip(&self, _tooltip: &ToolTip) {
        *self.hidden.borrow_mut() += 1;
    }
}

fn tooltip_scene() -> (EditorScene, ComponentId, ComponentId, Rc<TooltipLog>) {
    let mut editor = EditorScene::new();
    let (a, b) = two_boxes(&mut editor);
    editor.scene.set_tooltip(a, Some(ToolTip::new("first")));
    editor.scene.set_tooltip(b, Some(ToolTip::new("second")));
    let log = Rc::new(TooltipLog::default());
    editor
        .scene
        .panel_mut(editor.panel)
        .tooltip_manager_mut()
        .set_renderer(Some(log.clone()));
    (editor, a, b, log)
}

#[test]
fn test_tooltip_shows_after_initial_delay() {
    let (mut editor, _, _, log) = tooltip_scene();

    editor.move_to(20.0, 30.0);
    assert!(editor.scene.panel(editor.panel).tooltip_manager().is_pending());
    editor.scene.tick_tooltips(editor.panel, Duration::from_millis(600));
    assert!(log.shown.borrow().is_empty(), "not before the initial delay");

    editor.scene.tick_tooltips(editor.panel, Duration::from_millis(400));
    assert_eq!(
        *log.shown.borrow(),
        vec![("first".to_string(), Point::new(20.0, 54.0))],
        "shown below the pointer in panel space"
    );
}

#[test]
fn test_tooltip_dismissed_after_delay() {
    let (mut editor, _, _, log) = tooltip_scene();
    editor.move_to(20.0, 30.0);
    editor.scene.tick_tooltips(editor.panel, Duration::from_millis(1000));
    editor.scene.tick_tooltips(editor.panel, Duration::from_millis(5000));

    assert_eq!(*log.hidden.borrow(), 1);
    assert!(!editor.scene.panel(editor.panel).tooltip_manager().is_showing());
}

#[test]
fn test_leaving_hides_and_next_tooltip_reshows_at_once() {
    let (mut editor, _, _, log) = tooltip_scene();
    editor.move_to(20.0, 30.0);
    editor.scene.tick_tooltips(editor.panel, Duration::from_millis(1000));

    editor.move_to(120.0, 30.0);
    assert_eq!(*log.hidden.borrow(), 1, "leaving the first component hides its tooltip");
    let shown: Vec<_> = log.shown.borrow().iter().map(|(text, _)| text.clone()).collect();
    assert_eq!(shown, vec!["first", "second"], "within the reshow window the next one is immediate");
}
