//! # Tsunagi - Connection Graph Engine for Workflow Editors
//!
//! **Tsunagi** models the edit-time connection graph of a node-based workflow editor:
//! nodes with typed input and output points, the committed connections between them,
//! and the single connection the user is currently dragging out of an output point.
//!
//! ## Core Pieces
//!
//! 1.  **Data model** ([`model`]): `WorkflowNode`, `ConnectionPoint`, `Connection`,
//!     `PendingConnection` and the serializable `WorkflowLayout`.
//! 2.  **Geometry** ([`geometry`]): absolute point positions derived from node position
//!     plus the point's node-local offset.
//! 3.  **Store** ([`store`]): the authoritative state machine (`Idle` / `Connecting`)
//!     that commits connections and rejects self-loops and duplicates.
//! 4.  **Handles** ([`handle`]): per-point gesture gates (only outputs start, only
//!     inputs on another node finish).
//! 5.  **Editor** ([`editor`]): the container that owns all of the above and routes
//!     gestures, node moves and node removal.
//!
//! ## Quick Start
//!
//! ```rust
//! use tsunagi::prelude::*;
//!
//! let mut editor = WorkflowEditor::with_store(
//!     ConnectionStore::builder().with_sequential_ids("edge-").build(),
//! );
//!
//! editor
//!     .add_node(
//!         WorkflowNode::new("fetch", Position::new(0.0, 0.0))
//!             .with_output("out", Position::new(160.0, 24.0)),
//!     )
//!     .unwrap();
//! editor
//!     .add_node(
//!         WorkflowNode::new("notify", Position::new(300.0, 0.0))
//!             .with_input("in", Position::new(0.0, 24.0)),
//!     )
//!     .unwrap();
//!
//! // Drag from fetch:out to notify:in.
//! assert!(editor.press(&Endpoint::new("fetch", "out")));
//! editor.pointer_moved(Position::new(220.0, 30.0));
//! let outcome = editor.release(&Endpoint::new("notify", "in"));
//!
//! assert_eq!(outcome, Some(FinishOutcome::Committed(ConnectionId::new("edge-1"))));
//! assert_eq!(editor.store().connections().len(), 1);
//! assert!(editor.store().pending().is_none());
//! ```

pub mod editor;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod handle;
pub mod model;
pub mod observer;
pub mod prelude;
pub mod store;
