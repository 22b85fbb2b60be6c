use crate::model::{Endpoint, WorkflowNode};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A 2D coordinate, either in canvas space or node-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Resolves a point's absolute canvas coordinate from its owning node's position
/// and the point's node-local offset.
pub fn resolve_absolute(node_position: Position, relative: Position) -> Position {
    node_position + relative
}

/// Absolute positions of every known connection point, keyed by endpoint.
///
/// The editor republishes a node's points here whenever the node moves or one of its
/// point offsets changes, so renderers and the store can read current coordinates
/// without recomputing them.
#[derive(Debug, Default, Clone)]
pub struct PositionCache {
    positions: AHashMap<Endpoint, Position>,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the absolute position of every point on `node` and returns the
    /// published values in point order (inputs first, then outputs).
    pub fn publish_node(&mut self, node: &WorkflowNode) -> Vec<(Endpoint, Position)> {
        let published: Vec<(Endpoint, Position)> = node
            .points()
            .map(|point| {
                (
                    Endpoint::new(&node.id, &point.id),
                    resolve_absolute(node.position, point.relative_position),
                )
            })
            .collect();

        for (endpoint, position) in &published {
            self.positions.insert(endpoint.clone(), *position);
        }
        published
    }

    pub fn get(&self, endpoint: &Endpoint) -> Option<Position> {
        self.positions.get(endpoint).copied()
    }

    /// Drops every cached position belonging to `node_id`.
    pub fn forget_node(&mut self, node_id: &str) {
        self.positions.retain(|endpoint, _| endpoint.node_id != node_id);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}
