use crate::geometry::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses one connection point globally: a node plus a point on that node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(alias = "nodeId")]
    pub node_id: String,
    #[serde(alias = "pointId")]
    pub point_id: String,
}

impl Endpoint {
    pub fn new(node_id: impl Into<String>, point_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            point_id: point_id.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_id, self.point_id)
    }
}

/// Identifier of a committed connection, unique within its store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A committed, directed edge from an output point to an input point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(id: ConnectionId, from: Endpoint, to: Endpoint) -> Self {
        Self { id, from, to }
    }

    /// Whether either end of this connection sits on `node_id`.
    pub fn involves_node(&self, node_id: &str) -> bool {
        self.from.node_id == node_id || self.to.node_id == node_id
    }

    /// Whether either end of this connection is `endpoint`.
    pub fn involves_point(&self, endpoint: &Endpoint) -> bool {
        &self.from == endpoint || &self.to == endpoint
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} [{}]", self.from, self.to, self.id)
    }
}

/// The single in-progress connection being dragged out of an output point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConnection {
    pub origin: Endpoint,
    /// Current canvas position of the unattached end.
    pub free_end: Position,
}
