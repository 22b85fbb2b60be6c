//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the tsunagi crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use tsunagi::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("path/to/layout.json")?;
//! let layout = WorkflowLayout::from_json(&json)?;
//!
//! let mut editor = WorkflowEditor::new();
//! editor.load(layout)?;
//! editor.remove_node("obsolete-step");
//!
//! println!("{}", editor.snapshot().to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Editor and store
pub use crate::editor::{LayoutEvent, WorkflowEditor};
pub use crate::store::{
    ConnectionStore, FinishOutcome, GestureState, GraphSnapshot, IdStrategy, RedundantStart,
    RejectReason, StartOutcome, StoreConfig, StoreEvent,
};

// Data model and geometry
pub use crate::geometry::{Position, PositionCache, resolve_absolute};
pub use crate::handle::PointHandle;
pub use crate::model::{
    Connection, ConnectionId, ConnectionPoint, Endpoint, IntoLayout, PendingConnection,
    PointKind, WorkflowLayout, WorkflowNode,
};

// Gesture scripts
pub use crate::gesture::{Applied, GestureEvent};

// Error types
pub use crate::error::{ArtifactError, ConfigError, LayoutError, StoreError};
