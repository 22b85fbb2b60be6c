use crate::geometry::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a connection point plays. Fixed for the lifetime of the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// Receives connections. Never originates one.
    Input,
    /// Originates connections.
    Output,
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKind::Input => write!(f, "input"),
            PointKind::Output => write!(f, "output"),
        }
    }
}

/// A typed attachment site on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    /// Unique within the owning node only.
    pub id: String,
    pub kind: PointKind,
    /// Offset from the owning node's position.
    #[serde(default, alias = "relativePosition")]
    pub relative_position: Position,
    /// Advisory flag mirrored from the store; the store is the source of truth.
    #[serde(default)]
    pub connected: bool,
}

impl ConnectionPoint {
    pub fn input(id: impl Into<String>, relative_position: Position) -> Self {
        Self {
            id: id.into(),
            kind: PointKind::Input,
            relative_position,
            connected: false,
        }
    }

    pub fn output(id: impl Into<String>, relative_position: Position) -> Self {
        Self {
            id: id.into(),
            kind: PointKind::Output,
            relative_position,
            connected: false,
        }
    }
}

/// A workflow step placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub inputs: Vec<ConnectionPoint>,
    #[serde(default)]
    pub outputs: Vec<ConnectionPoint>,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Adds an input point at the given node-local offset.
    pub fn with_input(mut self, id: impl Into<String>, relative_position: Position) -> Self {
        self.inputs
            .push(ConnectionPoint::input(id, relative_position));
        self
    }

    /// Adds an output point at the given node-local offset.
    pub fn with_output(mut self, id: impl Into<String>, relative_position: Position) -> Self {
        self.outputs
            .push(ConnectionPoint::output(id, relative_position));
        self
    }

    /// Iterates over every point of this node, inputs first.
    pub fn points(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut ConnectionPoint> {
        self.inputs.iter_mut().chain(self.outputs.iter_mut())
    }

    pub fn point(&self, point_id: &str) -> Option<&ConnectionPoint> {
        self.points().find(|p| p.id == point_id)
    }

    pub fn point_mut(&mut self, point_id: &str) -> Option<&mut ConnectionPoint> {
        self.points_mut().find(|p| p.id == point_id)
    }

    pub fn point_kind(&self, point_id: &str) -> Option<PointKind> {
        self.point(point_id).map(|p| p.kind)
    }
}
