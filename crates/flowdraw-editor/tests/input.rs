use flowdraw_editor::{EditorConfig, EditorState, HitTarget, InputEvent, Key, Modifiers};
use flowdraw_model::{EdgeKind, EdgeStyle, NodeId, NodeKind, Point, Selection};

fn down_on(node: &NodeId, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown {
        position: Point::new(x, y),
        target: HitTarget::Node(node.clone()),
    }
}

fn move_to(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove {
        position: Point::new(x, y),
    }
}

fn key(c: char, modifiers: Modifiers) -> InputEvent {
    InputEvent::Key {
        key: Key::Char(c),
        modifiers,
        typing: false,
    }
}

fn press(key: Key) -> InputEvent {
    InputEvent::Key {
        key,
        modifiers: Modifiers::NONE,
        typing: false,
    }
}

fn editor_with_pair() -> (EditorState, NodeId, NodeId) {
    let mut editor = EditorState::default();
    let a = editor.add_node_at(NodeKind::Generic, Point::new(200.0, 200.0));
    let b = editor.add_node_at(NodeKind::Generic, Point::new(500.0, 200.0));
    (editor, a, b)
}

fn position(editor: &EditorState, id: &NodeId) -> Point {
    editor.graph().node(id).expect("node").position()
}

#[test]
fn drag_snaps_center_and_captures_once() {
    let (mut editor, a, _) = editor_with_pair();
    let history = editor.history().len();

    assert!(editor.handle_event(down_on(&a, 260.0, 230.0)));
    assert!(editor.is_dragging());
    assert_eq!(editor.selection(), &Selection::Node(a.clone()));

    assert!(editor.handle_event(move_to(333.0, 247.0)));
    assert_eq!(position(&editor, &a), Point::new(280.0, 220.0));
    assert!(!editor.handle_event(move_to(340.0, 250.0)));
    assert_eq!(editor.history().len(), history);

    assert!(editor.handle_event(InputEvent::PointerUp));
    assert!(!editor.is_dragging());
    assert_eq!(editor.history().len(), history + 1);

    assert!(editor.undo());
    assert_eq!(position(&editor, &a), Point::new(200.0, 200.0));
}

#[test]
fn click_without_motion_is_not_captured() {
    let (mut editor, a, _) = editor_with_pair();
    let history = editor.history().len();
    editor.handle_event(down_on(&a, 260.0, 230.0));
    assert!(!editor.handle_event(InputEvent::PointerUp));
    assert_eq!(editor.history().len(), history);
    assert_eq!(editor.selection(), &Selection::Node(a));
}

#[test]
fn press_during_drag_settles_the_drag() {
    let (mut editor, a, b) = editor_with_pair();
    let history = editor.history().len();

    editor.handle_event(down_on(&a, 260.0, 230.0));
    editor.handle_event(move_to(400.0, 400.0));
    let dragged = position(&editor, &a);
    editor.handle_event(down_on(&b, 560.0, 230.0));
    assert_eq!(editor.history().len(), history + 1);
    assert_eq!(editor.selection(), &Selection::Node(b.clone()));

    editor.handle_event(InputEvent::PointerUp);
    assert_eq!(editor.history().len(), history + 1);
    assert_eq!(position(&editor, &a), dragged);

    assert!(editor.undo());
    assert_eq!(position(&editor, &a), Point::new(200.0, 200.0));
    assert_eq!(position(&editor, &b), Point::new(500.0, 200.0));
}

#[test]
fn cancelled_drag_restores_start() {
    let (mut editor, a, _) = editor_with_pair();
    let history = editor.history().len();
    editor.handle_event(down_on(&a, 260.0, 230.0));
    editor.handle_event(move_to(600.0, 400.0));
    assert_ne!(position(&editor, &a), Point::new(200.0, 200.0));

    assert!(editor.handle_event(InputEvent::PointerCancel));
    assert_eq!(position(&editor, &a), Point::new(200.0, 200.0));
    assert_eq!(editor.history().len(), history);
    assert!(!editor.is_dragging());
}

#[test]
fn drag_respects_zoom() {
    let (mut editor, a, _) = editor_with_pair();
    editor.set_snap_to_grid(false);
    editor.handle_event(InputEvent::Wheel {
        position: Point::ORIGIN,
        delta_y: 1.0,
    });
    assert_eq!(editor.view().zoom, 0.9);
    editor.handle_event(down_on(&a, 0.0, 0.0));
    editor.handle_event(move_to(180.0, 90.0));
    let moved = position(&editor, &a);
    assert!((moved.x - 140.0).abs() < 1e-9);
    assert!((moved.y - 70.0).abs() < 1e-9);
}

#[test]
fn canvas_press_pans_and_clears_single_selection() {
    let (mut editor, a, _) = editor_with_pair();
    editor.select_node(&a);
    editor.handle_event(InputEvent::PointerDown {
        position: Point::new(10.0, 10.0),
        target: HitTarget::Canvas,
    });
    assert_eq!(editor.selection(), &Selection::None);
    assert!(editor.is_panning());

    editor.handle_event(move_to(40.0, 30.0));
    editor.handle_event(move_to(45.0, 30.0));
    assert_eq!(editor.view().pan, Point::new(35.0, 20.0));
    editor.handle_event(InputEvent::PointerUp);
    assert!(!editor.is_panning());
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn canvas_press_keeps_multi_selection() {
    let (mut editor, a, b) = editor_with_pair();
    editor.toggle_membership(&a);
    editor.toggle_membership(&b);
    editor.handle_event(InputEvent::PointerDown {
        position: Point::ORIGIN,
        target: HitTarget::Canvas,
    });
    assert_eq!(editor.selection().members().len(), 2);
}

#[test]
fn edge_press_selects_edge() {
    let (mut editor, a, b) = editor_with_pair();
    let edge = editor.add_edge(&a, &b, EdgeKind::Plain).expect("edge");
    assert!(editor.handle_event(InputEvent::PointerDown {
        position: Point::ORIGIN,
        target: HitTarget::Edge(edge.clone()),
    }));
    assert_eq!(editor.selection(), &Selection::Edge(edge));
    assert!(!editor.is_panning());
}

#[test]
fn connect_gesture_creates_selected_edge() {
    let (mut editor, a, b) = editor_with_pair();
    editor.start_connection(EdgeKind::Conditional);

    editor.handle_event(down_on(&a, 0.0, 0.0));
    assert_eq!(
        editor.connection().and_then(|c| c.start.clone()),
        Some(a.clone())
    );
    assert!(!editor.is_dragging());

    assert!(editor.handle_event(down_on(&b, 0.0, 0.0)));
    let edge = editor.graph().edges.first().expect("edge");
    assert_eq!((&edge.source, &edge.target), (&a, &b));
    assert_eq!(edge.style, EdgeStyle::Dashed);
    assert_eq!(editor.selection(), &Selection::Edge(edge.id.clone()));
    assert!(editor.connection().is_none());
}

#[test]
fn connect_gesture_refuses_self_loop_by_default() {
    let (mut editor, a, _) = editor_with_pair();
    editor.start_connection(EdgeKind::Plain);
    editor.handle_event(down_on(&a, 0.0, 0.0));
    assert!(!editor.handle_event(down_on(&a, 0.0, 0.0)));
    assert!(editor.graph().edges.is_empty());
    assert!(editor.connection().is_some());
}

#[test]
fn connect_gesture_allows_self_loop_when_configured() {
    let mut editor = EditorState::new(EditorConfig {
        allow_self_loop_connections: true,
        ..EditorConfig::default()
    });
    let a = editor.add_node(NodeKind::Generic);
    editor.start_connection(EdgeKind::Plain);
    editor.handle_event(down_on(&a, 0.0, 0.0));
    editor.handle_event(down_on(&a, 0.0, 0.0));
    assert!(editor.graph().edges[0].is_self_loop());
}

#[test]
fn canvas_press_cancels_connection() {
    let (mut editor, a, _) = editor_with_pair();
    editor.start_connection(EdgeKind::Plain);
    editor.handle_event(down_on(&a, 0.0, 0.0));
    editor.handle_event(InputEvent::PointerDown {
        position: Point::ORIGIN,
        target: HitTarget::Canvas,
    });
    assert!(editor.connection().is_none());
}

#[test]
fn multi_select_keyboard_flow() {
    let (mut editor, a, b) = editor_with_pair();
    editor.select_node(&a);
    editor.handle_event(key('s', Modifiers::NONE));
    assert!(editor.is_multi_select());
    assert!(editor.selection().is_empty());

    editor.handle_event(down_on(&a, 0.0, 0.0));
    editor.handle_event(down_on(&b, 0.0, 0.0));
    assert!(!editor.is_dragging());
    assert_eq!(editor.selection().members().len(), 2);

    assert!(editor.handle_event(key('d', Modifiers::CTRL)));
    assert_eq!(editor.graph().nodes.len(), 4);
    assert!(editor.handle_event(press(Key::Delete)));
    assert_eq!(editor.graph().nodes.len(), 2);

    editor.handle_event(down_on(&a, 0.0, 0.0));
    editor.handle_event(press(Key::Escape));
    assert!(!editor.is_multi_select());
    assert!(editor.selection().is_empty());
}

#[test]
fn typing_suppresses_delete() {
    let (mut editor, a, _) = editor_with_pair();
    editor.select_node(&a);
    assert!(!editor.handle_event(InputEvent::Key {
        key: Key::Backspace,
        modifiers: Modifiers::NONE,
        typing: true,
    }));
    assert_eq!(editor.graph().nodes.len(), 2);
    assert!(editor.handle_event(press(Key::Backspace)));
    assert_eq!(editor.graph().nodes.len(), 1);
}

#[test]
fn select_all_and_history_chords() {
    let (mut editor, _, _) = editor_with_pair();
    editor.handle_event(key('a', Modifiers::CTRL));
    assert_eq!(editor.selection().members().len(), 2);

    assert!(editor.handle_event(key('z', Modifiers::CTRL)));
    assert_eq!(editor.graph().nodes.len(), 1);
    let redo = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
    assert!(editor.handle_event(key('Z', redo)));
    assert_eq!(editor.graph().nodes.len(), 2);
    assert!(!editor.handle_event(key('y', Modifiers::CTRL)));
}

#[test]
fn wheel_zooms_around_cursor() {
    let mut editor = EditorState::default();
    let cursor = Point::new(300.0, 120.0);
    let before = editor.screen_to_world(cursor);
    editor.handle_event(InputEvent::Wheel {
        position: cursor,
        delta_y: -120.0,
    });
    assert_eq!(editor.view().zoom, 1.1);
    let after = editor.screen_to_world(cursor);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[test]
fn events_deserialize_from_json() {
    let down: InputEvent = serde_json::from_str(
        r#"{"type":"pointerDown","position":{"x":1,"y":2},"target":{"kind":"node","id":"node-1"}}"#,
    )
    .expect("pointer down");
    assert_eq!(down, down_on(&NodeId::from("node-1"), 1.0, 2.0));

    let canvas: InputEvent = serde_json::from_str(
        r#"{"type":"pointerDown","position":{"x":0,"y":0},"target":{"kind":"canvas"}}"#,
    )
    .expect("canvas");
    assert!(matches!(
        canvas,
        InputEvent::PointerDown {
            target: HitTarget::Canvas,
            ..
        }
    ));

    let key: InputEvent =
        serde_json::from_str(r#"{"type":"key","key":{"char":"s"}}"#).expect("key");
    assert_eq!(key, press(Key::Char('s')));

    let wheel: InputEvent =
        serde_json::from_str(r#"{"type":"wheel","position":{"x":0,"y":0},"deltaY":3}"#)
            .expect("wheel");
    assert!(matches!(wheel, InputEvent::Wheel { delta_y, .. } if delta_y == 3.0));
}
