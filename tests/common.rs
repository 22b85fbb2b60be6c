//! Common test utilities for building layouts, stores and editors.
use std::cell::RefCell;
use std::rc::Rc;
use tsunagi::prelude::*;

/// Shorthand for an endpoint.
#[allow(dead_code)]
pub fn ep(node: &str, point: &str) -> Endpoint {
    Endpoint::new(node, point)
}

/// A store with deterministic ids `c1`, `c2`, ...
#[allow(dead_code)]
pub fn create_store() -> ConnectionStore {
    ConnectionStore::builder().with_sequential_ids("c").build()
}

/// Three nodes, each with one input and one output.
///
/// `nodeA` sits at (10, 10) with `outA` at offset (0, 0), so `outA` resolves to (10, 10).
/// `nodeB` sits at (200, 0) and `nodeC` at (400, 100).
#[allow(dead_code)]
pub fn create_three_node_layout() -> WorkflowLayout {
    WorkflowLayout::new(
        vec![
            WorkflowNode::new("nodeA", Position::new(10.0, 10.0))
                .with_input("inA", Position::new(0.0, 40.0))
                .with_output("outA", Position::new(0.0, 0.0)),
            WorkflowNode::new("nodeB", Position::new(200.0, 0.0))
                .with_input("inB", Position::new(0.0, 20.0))
                .with_output("outB", Position::new(150.0, 20.0)),
            WorkflowNode::new("nodeC", Position::new(400.0, 100.0))
                .with_input("inC", Position::new(0.0, 20.0))
                .with_input("inC2", Position::new(0.0, 44.0))
                .with_output("outC", Position::new(150.0, 20.0)),
        ],
        vec![],
    )
}

/// An editor with sequential ids loaded with `create_three_node_layout`.
#[allow(dead_code)]
pub fn create_editor() -> WorkflowEditor {
    let mut editor = WorkflowEditor::with_store(create_store());
    editor
        .load(create_three_node_layout())
        .expect("fixture layout should be valid");
    editor
}

/// Runs one full drag from `from` to `to` through the editor.
#[allow(dead_code)]
pub fn drag(editor: &mut WorkflowEditor, from: Endpoint, to: Endpoint) -> Option<FinishOutcome> {
    editor.press(&from);
    editor.pointer_moved(Position::new(120.0, 60.0));
    editor.release(&to)
}

/// Collects every event the store emits.
#[allow(dead_code)]
pub fn record_store_events(store: &mut ConnectionStore) -> Rc<RefCell<Vec<StoreEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Asserts the structural invariants of the committed graph.
#[allow(dead_code)]
pub fn assert_graph_invariants(store: &ConnectionStore) {
    let connections = store.connections();
    for c in connections {
        assert_ne!(c.from.node_id, c.to.node_id, "self-loop committed: {}", c);
    }
    for (i, a) in connections.iter().enumerate() {
        for b in &connections[i + 1..] {
            assert!(
                !(a.from == b.from && a.to == b.to),
                "duplicate edge: {} and {}",
                a,
                b
            );
            assert_ne!(a.id, b.id, "duplicate id");
        }
    }
}
