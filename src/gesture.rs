use crate::geometry::Position;
use crate::model::{ConnectionId, Endpoint};
use crate::store::FinishOutcome;
use serde::{Deserialize, Serialize};

/// One inbound editor event: a pointer gesture or a node mutation.
///
/// Scripts of these events replay an editing session deterministically through
/// [`WorkflowEditor::apply`](crate::editor::WorkflowEditor::apply). In JSON each event
/// is an object tagged by `type`:
///
/// ```json
/// [
///   { "type": "press", "node": "a", "point": "out" },
///   { "type": "pointer_move", "x": 120.0, "y": 48.0 },
///   { "type": "release", "node": "b", "point": "in" }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    Press {
        node: String,
        point: String,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    Release {
        node: String,
        point: String,
    },
    /// Pointer released over empty canvas.
    ReleaseCanvas,
    /// Escape key, pointer leaving the canvas, or any other abort.
    Cancel,
    MoveNode {
        node: String,
        x: f64,
        y: f64,
    },
    SetPointOffset {
        node: String,
        point: String,
        x: f64,
        y: f64,
    },
    RemoveNode {
        node: String,
    },
    RemoveConnection {
        id: ConnectionId,
    },
    HoverPoint {
        node: String,
        point: String,
        hovered: bool,
    },
    HoverConnection {
        id: Option<ConnectionId>,
    },
    Clear,
}

impl GestureEvent {
    /// The point this event targets, for events that target one.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            GestureEvent::Press { node, point }
            | GestureEvent::Release { node, point }
            | GestureEvent::SetPointOffset { node, point, .. }
            | GestureEvent::HoverPoint { node, point, .. } => Some(Endpoint::new(node, point)),
            _ => None,
        }
    }

    /// The canvas or node-local position carried by the event, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            GestureEvent::PointerMove { x, y }
            | GestureEvent::MoveNode { x, y, .. }
            | GestureEvent::SetPointOffset { x, y, .. } => Some(Position::new(*x, *y)),
            _ => None,
        }
    }
}

/// What applying a [`GestureEvent`] did to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Editor or graph state changed.
    Changed,
    /// The event was legal but had no effect, or referenced something unknown.
    Ignored,
    /// A release ended a pending connection at a valid target.
    Finished(FinishOutcome),
}

impl Applied {
    pub(crate) fn from_flag(changed: bool) -> Self {
        if changed {
            Applied::Changed
        } else {
            Applied::Ignored
        }
    }
}
