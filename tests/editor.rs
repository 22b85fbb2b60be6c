//! Tests for gesture routing, geometry publishing and node lifecycle in the editor.
mod common;
use common::*;
use std::cell::RefCell;
use std::rc::Rc;
use tsunagi::prelude::*;

#[test]
fn test_point_positions_are_resolved_on_load() {
    let editor = create_editor();
    assert_eq!(
        editor.point_position(&ep("nodeA", "outA")),
        Some(Position::new(10.0, 10.0))
    );
    assert_eq!(
        editor.point_position(&ep("nodeB", "outB")),
        Some(Position::new(350.0, 20.0))
    );
    assert_eq!(editor.point_position(&ep("nodeB", "missing")), None);
}

#[test]
fn test_move_node_republishes_geometry() {
    let mut editor = create_editor();
    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = published.clone();
    editor.subscribe_layout(move |event| sink.borrow_mut().push(event.clone()));

    assert!(editor.move_node("nodeB", Position::new(100.0, 100.0)));
    assert_eq!(
        editor.point_position(&ep("nodeB", "inB")),
        Some(Position::new(100.0, 120.0))
    );
    assert_eq!(
        editor.point_position(&ep("nodeB", "outB")),
        Some(Position::new(250.0, 120.0))
    );

    let events = published.borrow();
    assert_eq!(events.len(), 1);
    match &events[0] {
        LayoutEvent::PointsMoved { node_id, positions } => {
            assert_eq!(node_id, "nodeB");
            assert_eq!(positions.len(), 2);
            assert!(positions.contains(&(ep("nodeB", "inB"), Position::new(100.0, 120.0))));
        }
        other => panic!("Expected PointsMoved, got {:?}", other),
    }

    assert!(!editor.move_node("ghost", Position::ORIGIN));
}

#[test]
fn test_set_point_offset_republishes_geometry() {
    let mut editor = create_editor();
    assert!(editor.set_point_offset(&ep("nodeC", "inC2"), Position::new(5.0, 60.0)));
    assert_eq!(
        editor.point_position(&ep("nodeC", "inC2")),
        Some(Position::new(405.0, 160.0))
    );
    assert!(!editor.set_point_offset(&ep("nodeC", "nope"), Position::ORIGIN));
}

#[test]
fn test_unchanged_geometry_is_ignored_silently() {
    let mut editor = create_editor();
    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = published.clone();
    editor.subscribe_layout(move |event| sink.borrow_mut().push(event.clone()));

    let same_offset = GestureEvent::SetPointOffset {
        node: "nodeB".to_string(),
        point: "inB".to_string(),
        x: 0.0,
        y: 20.0,
    };
    let same_position = GestureEvent::MoveNode {
        node: "nodeB".to_string(),
        x: 200.0,
        y: 0.0,
    };
    assert_eq!(editor.apply(&same_offset), Applied::Ignored);
    assert_eq!(editor.apply(&same_position), Applied::Ignored);
    assert!(!editor.set_point_offset(&ep("nodeB", "inB"), Position::new(0.0, 20.0)));
    assert!(!editor.move_node("nodeB", Position::new(200.0, 0.0)));
    assert!(published.borrow().is_empty());

    assert_eq!(
        editor.point_position(&ep("nodeB", "inB")),
        Some(Position::new(200.0, 20.0))
    );
}

#[test]
fn test_pointer_move_to_same_position_is_ignored() {
    let mut editor = create_editor();
    assert!(editor.press(&ep("nodeA", "outA")));
    assert!(editor.pointer_moved(Position::new(60.0, 60.0)));

    let graph_events = Rc::new(RefCell::new(Vec::new()));
    let sink = graph_events.clone();
    editor.subscribe_graph(move |event| sink.borrow_mut().push(event.clone()));

    let event = GestureEvent::PointerMove { x: 60.0, y: 60.0 };
    assert_eq!(editor.apply(&event), Applied::Ignored);
    assert!(graph_events.borrow().is_empty());
    assert!(editor.store().is_connecting());
}

#[test]
fn test_with_store_starts_from_an_empty_graph() {
    let mut store = create_store();
    store
        .load(vec![Connection::new(
            ConnectionId::new("stale"),
            ep("ghostA", "out"),
            ep("ghostB", "in"),
        )])
        .unwrap();
    store
        .start(ep("ghostA", "out"), Position::ORIGIN)
        .unwrap();

    let mut editor = WorkflowEditor::with_store(store);
    assert!(editor.store().is_empty());
    assert!(!editor.store().is_connecting());
    assert!(!editor.is_point_connected(&ep("ghostA", "out")));

    let snapshot = editor.snapshot();
    assert!(snapshot.connections.is_empty());
    assert!(snapshot.validate().is_ok());
    assert!(editor.load(snapshot).is_ok());

    // Configuration survives: ids still come from the sequential strategy.
    editor.load(create_three_node_layout()).unwrap();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));
    assert!(editor.store().connection(&ConnectionId::new("c1")).is_some());
}

#[test]
fn test_press_anchors_pending_at_resolved_position() {
    let mut editor = create_editor();
    editor.move_node("nodeA", Position::new(30.0, 40.0));

    assert!(editor.press(&ep("nodeA", "outA")));
    let pending = editor.store().pending().expect("pending connection");
    assert_eq!(pending.origin, ep("nodeA", "outA"));
    assert_eq!(pending.free_end, Position::new(30.0, 40.0));
}

#[test]
fn test_full_drag_commits_connection() {
    let mut editor = create_editor();

    assert!(editor.press(&ep("nodeA", "outA")));
    assert!(editor.pointer_moved(Position::new(50.0, 50.0)));
    let outcome = editor.release(&ep("nodeB", "inB"));

    assert_eq!(outcome, Some(FinishOutcome::Committed(ConnectionId::new("c1"))));
    assert!(editor.store().pending().is_none());
    let connection = &editor.store().connections()[0];
    assert_eq!(connection.from, ep("nodeA", "outA"));
    assert_eq!(connection.to, ep("nodeB", "inB"));
}

#[test]
fn test_press_on_input_does_not_start() {
    let mut editor = create_editor();
    assert!(!editor.press(&ep("nodeB", "inB")));
    assert!(!editor.store().is_connecting());
}

#[test]
fn test_press_while_connecting_is_swallowed() {
    let mut editor = WorkflowEditor::with_store(
        ConnectionStore::builder()
            .with_redundant_start(RedundantStart::Replace)
            .build(),
    );
    editor.load(create_three_node_layout()).unwrap();

    assert!(editor.press(&ep("nodeA", "outA")));
    // The handle gate keeps the first origin even with a replacing store.
    assert!(!editor.press(&ep("nodeB", "outB")));
    assert_eq!(
        editor.store().pending().map(|p| p.origin.clone()),
        Some(ep("nodeA", "outA"))
    );
}

#[test]
fn test_release_on_same_node_cancels_without_edge() {
    let mut editor = create_editor();
    editor.press(&ep("nodeA", "outA"));

    assert_eq!(editor.release(&ep("nodeA", "inA")), None);
    assert!(editor.store().is_empty());
    assert!(editor.store().pending().is_none());
}

#[test]
fn test_release_on_output_cancels_without_edge() {
    let mut editor = create_editor();
    editor.press(&ep("nodeA", "outA"));

    assert_eq!(editor.release(&ep("nodeB", "outB")), None);
    assert!(editor.store().is_empty());
    assert!(!editor.store().is_connecting());
}

#[test]
fn test_duplicate_drag_is_rejected() {
    let mut editor = create_editor();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));
    let second = drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));

    assert_eq!(second, Some(FinishOutcome::Rejected(RejectReason::Duplicate)));
    assert_eq!(editor.store().connections().len(), 1);
}

#[test]
fn test_release_canvas_and_escape_cancel() {
    let mut editor = create_editor();
    editor.press(&ep("nodeA", "outA"));
    assert!(editor.release_canvas());
    assert!(!editor.release_canvas());

    editor.press(&ep("nodeA", "outA"));
    assert!(editor.escape());
    assert!(editor.store().is_empty());
}

#[test]
fn test_connected_flags_follow_store() {
    let mut editor = create_editor();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));

    let node_a = editor.node("nodeA").unwrap();
    assert!(node_a.point("outA").unwrap().connected);
    assert!(!node_a.point("inA").unwrap().connected);
    assert!(editor.node("nodeB").unwrap().point("inB").unwrap().connected);
    assert!(editor.is_point_connected(&ep("nodeB", "inB")));
    assert!(editor.handle(&ep("nodeB", "inB")).unwrap().is_connected(editor.store()));

    let id = editor.store().connections()[0].id.clone();
    editor.remove_connection(&id);
    assert!(!editor.node("nodeA").unwrap().point("outA").unwrap().connected);
}

#[test]
fn test_remove_node_cascades_connections() {
    let mut editor = create_editor();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));
    drag(&mut editor, ep("nodeB", "outB"), ep("nodeC", "inC"));
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeC", "inC2"));
    assert_eq!(editor.store().connections().len(), 3);

    let removed = editor.remove_node("nodeB").expect("node removed");
    assert_eq!(removed.id, "nodeB");
    assert_eq!(editor.store().connections().len(), 1);
    assert!(editor.point_position(&ep("nodeB", "inB")).is_none());
    assert!(editor.handle(&ep("nodeB", "inB")).is_none());
    assert!(!editor.node("nodeC").unwrap().point("inC").unwrap().connected);
    assert!(editor.node("nodeC").unwrap().point("inC2").unwrap().connected);
    assert!(editor.remove_node("nodeB").is_none());
}

#[test]
fn test_remove_origin_node_mid_drag_cancels_pending() {
    let mut editor = create_editor();
    editor.press(&ep("nodeA", "outA"));
    editor.remove_node("nodeA");

    assert!(!editor.store().is_connecting());
    assert_eq!(editor.release(&ep("nodeB", "inB")), None);
    assert!(editor.store().is_empty());
}

#[test]
fn test_add_node_rejects_duplicates_and_misplaced_points() {
    let mut editor = create_editor();

    let err = editor
        .add_node(WorkflowNode::new("nodeA", Position::ORIGIN))
        .unwrap_err();
    assert_eq!(err, LayoutError::DuplicateNode("nodeA".to_string()));

    let err = editor
        .add_node(
            WorkflowNode::new("nodeD", Position::ORIGIN)
                .with_input("p", Position::ORIGIN)
                .with_output("p", Position::ORIGIN),
        )
        .unwrap_err();
    assert!(matches!(err, LayoutError::DuplicatePoint { .. }));

    let mut misplaced = WorkflowNode::new("nodeE", Position::ORIGIN);
    misplaced
        .inputs
        .push(ConnectionPoint::output("o", Position::ORIGIN));
    let err = editor.add_node(misplaced).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::WrongPointKind {
            expected: PointKind::Input,
            found: PointKind::Output,
            ..
        }
    ));

    assert_eq!(editor.node_count(), 3);
}

#[test]
fn test_nodes_keep_insertion_order() {
    let mut editor = create_editor();
    editor
        .add_node(WorkflowNode::new("nodeD", Position::ORIGIN).with_input("in", Position::ORIGIN))
        .unwrap();
    let ids: Vec<&str> = editor.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["nodeA", "nodeB", "nodeC", "nodeD"]);
}

#[test]
fn test_hover_is_local_to_handle() {
    let mut editor = create_editor();
    let events = Rc::new(RefCell::new(0usize));
    let sink = events.clone();
    editor.subscribe_graph(move |_| *sink.borrow_mut() += 1);

    assert!(editor.hover_point(&ep("nodeB", "inB"), true));
    assert!(editor.handle(&ep("nodeB", "inB")).unwrap().is_hovered());
    assert!(editor.hover_point(&ep("nodeB", "inB"), false));
    assert!(!editor.handle(&ep("nodeB", "inB")).unwrap().is_hovered());
    assert!(!editor.hover_point(&ep("nodeB", "ghost"), true));

    assert_eq!(*events.borrow(), 0, "point hover never touches the store");
}

#[test]
fn test_load_rejects_invalid_layout_and_keeps_state() {
    let mut editor = create_editor();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));

    let mut layout = create_three_node_layout();
    layout.connections.push(Connection::new(
        ConnectionId::new("bad"),
        ep("nodeB", "inB"),
        ep("nodeC", "inC"),
    ));
    let err = editor.load(layout).unwrap_err();
    assert!(matches!(err, LayoutError::WrongPointKind { .. }));

    assert_eq!(editor.node_count(), 3);
    assert_eq!(editor.store().connections().len(), 1);
}

#[test]
fn test_snapshot_load_round_trip_preserves_graph() {
    let mut editor = create_editor();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));
    drag(&mut editor, ep("nodeB", "outB"), ep("nodeC", "inC"));
    editor.move_node("nodeC", Position::new(500.0, 300.0));

    let snapshot = editor.snapshot();
    assert!(snapshot.nodes[1].point("inB").unwrap().connected);

    let mut restored = WorkflowEditor::new();
    restored.load(snapshot.clone()).unwrap();
    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(
        restored.point_position(&ep("nodeC", "inC")),
        Some(Position::new(500.0, 320.0))
    );
}

#[test]
fn test_clear_connections_keeps_nodes() {
    let mut editor = create_editor();
    drag(&mut editor, ep("nodeA", "outA"), ep("nodeB", "inB"));
    editor.press(&ep("nodeB", "outB"));

    editor.clear_connections();
    assert!(editor.store().is_empty());
    assert!(!editor.store().is_connecting());
    assert_eq!(editor.node_count(), 3);
    assert!(!editor.node("nodeA").unwrap().point("outA").unwrap().connected);

    editor.clear();
    assert_eq!(editor.node_count(), 0);
    assert!(editor.point_position(&ep("nodeA", "outA")).is_none());
}

#[test]
fn test_apply_replays_gesture_script() {
    let mut editor = create_editor();
    let script: Vec<GestureEvent> = serde_json::from_str(
        r#"[
            { "type": "press", "node": "nodeA", "point": "outA" },
            { "type": "pointer_move", "x": 50.0, "y": 50.0 },
            { "type": "release", "node": "nodeB", "point": "inB" },
            { "type": "press", "node": "nodeA", "point": "outA" },
            { "type": "release", "node": "nodeA", "point": "inA" },
            { "type": "press", "node": "nodeB", "point": "inB" },
            { "type": "move_node", "node": "nodeB", "x": 0.0, "y": 0.0 },
            { "type": "press", "node": "nodeB", "point": "outB" },
            { "type": "release_canvas" },
            { "type": "hover_connection", "id": "c1" }
        ]"#,
    )
    .expect("script should parse");

    let applied: Vec<Applied> = script.iter().map(|e| editor.apply(e)).collect();
    assert_eq!(
        applied,
        vec![
            Applied::Changed,
            Applied::Changed,
            Applied::Finished(FinishOutcome::Committed(ConnectionId::new("c1"))),
            Applied::Changed,
            Applied::Changed,
            Applied::Ignored,
            Applied::Changed,
            Applied::Changed,
            Applied::Changed,
            Applied::Changed,
        ]
    );
    assert_eq!(editor.store().connections().len(), 1);
    assert_eq!(editor.store().hovered(), Some(&ConnectionId::new("c1")));

    let tail = [
        GestureEvent::RemoveConnection {
            id: ConnectionId::new("c1"),
        },
        GestureEvent::RemoveNode {
            node: "nodeC".to_string(),
        },
        GestureEvent::Clear,
    ];
    let applied: Vec<Applied> = tail.iter().map(|e| editor.apply(e)).collect();
    assert_eq!(
        applied,
        vec![Applied::Changed, Applied::Changed, Applied::Ignored]
    );
    assert!(editor.store().hovered().is_none());
    assert_eq!(editor.node_count(), 2);
}
