use crate::geometry::Position;
use crate::model::{Connection, ConnectionId, Endpoint};
use std::fmt;

/// Why `finish` discarded a pending connection instead of committing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The target point sits on the node the connection started from.
    SelfLoop,
    /// An identical `(from, to)` connection already exists.
    Duplicate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::SelfLoop => write!(f, "self-loop"),
            RejectReason::Duplicate => write!(f, "duplicate edge"),
        }
    }
}

/// One state change of the connection store, delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    PendingStarted {
        origin: Endpoint,
        position: Position,
        /// Origin of the pending connection this one replaced, if any.
        replaced: Option<Endpoint>,
    },
    PendingMoved {
        position: Position,
    },
    PendingCancelled {
        origin: Endpoint,
    },
    Committed(Connection),
    Rejected {
        origin: Endpoint,
        target: Endpoint,
        reason: RejectReason,
    },
    Removed(Connection),
    NodeDetached {
        node_id: String,
        removed: Vec<ConnectionId>,
    },
    /// Every connection was dropped, along with any pending connection and hover.
    Cleared {
        removed: usize,
    },
    /// The graph was replaced wholesale. Preceded by `PendingCancelled` and
    /// `HoverChanged(None)` when there was something to reset.
    Loaded {
        connections: usize,
    },
    HoverChanged(Option<ConnectionId>),
}
