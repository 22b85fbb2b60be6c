use crate::geometry::Position;
use crate::model::{ConnectionPoint, Endpoint, PointKind, WorkflowNode};
use crate::store::{ConnectionStore, FinishOutcome};

/// The interactive side of a connection point.
///
/// A handle filters press and release gestures by the point's kind before they reach
/// the store. Illegal combinations are swallowed silently. The store still checks
/// every invariant on its own, so this is only a convenience layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointHandle {
    endpoint: Endpoint,
    kind: PointKind,
    hovered: bool,
}

impl PointHandle {
    pub fn new(node_id: &str, point: &ConnectionPoint) -> Self {
        Self {
            endpoint: Endpoint::new(node_id, &point.id),
            kind: point.kind,
            hovered: false,
        }
    }

    /// Builds the handle for `point_id` on `node`, if the node has such a point.
    pub fn for_point(node: &WorkflowNode, point_id: &str) -> Option<Self> {
        node.point(point_id).map(|point| Self::new(&node.id, point))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn kind(&self) -> PointKind {
        self.kind
    }

    /// Press on this point. Only an output point on an idle store starts a pending
    /// connection, anchored at `absolute`. Returns whether a gesture began.
    pub fn press(&self, store: &mut ConnectionStore, absolute: Position) -> bool {
        if self.kind != PointKind::Output || store.is_connecting() {
            return false;
        }
        store.start(self.endpoint.clone(), absolute).is_ok()
    }

    /// Release over this point. Finishes the pending connection only when this is an
    /// input point on a different node than the one the connection started from.
    pub fn release(&self, store: &mut ConnectionStore) -> Option<FinishOutcome> {
        if self.kind != PointKind::Input {
            return None;
        }
        let pending = store.pending()?;
        if pending.origin.node_id == self.endpoint.node_id {
            return None;
        }
        Some(store.finish(self.endpoint.clone()))
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_connected(&self, store: &ConnectionStore) -> bool {
        store.is_point_connected(&self.endpoint)
    }
}
