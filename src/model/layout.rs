use super::connection::{Connection, Endpoint};
use super::node::{PointKind, WorkflowNode};
use crate::error::{ArtifactError, LayoutError};
use ahash::{AHashMap, AHashSet};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// The `{nodes, connections}` shape of a workflow canvas.
///
/// This is what a persistence collaborator stores and hands back. Loading one into a
/// [`WorkflowEditor`](crate::editor::WorkflowEditor) validates it in full first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowLayout {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl WorkflowLayout {
    pub fn new(nodes: Vec<WorkflowNode>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// Checks every structural invariant of the layout.
    ///
    /// Nodes must have unique ids and correctly typed, uniquely named points. Every
    /// connection must run from an existing output point to an existing input point on
    /// a different node, and neither connection ids nor `(from, to)` pairs may repeat.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if let Some(id) = self.nodes.iter().map(|n| n.id.as_str()).duplicates().next() {
            return Err(LayoutError::DuplicateNode(id.to_string()));
        }
        for node in &self.nodes {
            validate_node(node)?;
        }

        let by_id: AHashMap<&str, &WorkflowNode> =
            self.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        for connection in &self.connections {
            check_endpoint(&by_id, &connection.from, PointKind::Output)?;
            check_endpoint(&by_id, &connection.to, PointKind::Input)?;
        }
        validate_edges(&self.connections)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        serde_json::from_str(json).map_err(|e| ArtifactError::Json(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ArtifactError> {
        serde_json::to_string_pretty(self).map_err(|e| ArtifactError::Json(e.to_string()))
    }

    /// Encodes the layout into the compact binary artifact format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Encode(format!("Serialization failed: {}", e)))
    }

    /// Decodes a layout from the compact binary artifact format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(layout, _)| layout)
            .map_err(|e| ArtifactError::Decode(format!("Deserialization failed: {}", e)))
    }

    /// Saves the layout to a file using the binary artifact format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            message: format!("could not create file: {}", e),
        })?;
        file.write_all(&bytes).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            message: format!("could not write file: {}", e),
        })?;
        Ok(())
    }

    /// Loads a layout previously written with [`WorkflowLayout::save`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let mut file = fs::File::open(path).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            message: format!("could not open file: {}", e),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            message: format!("could not read file: {}", e),
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Point ids must be unique within the node, and each point must sit in the list
/// matching its kind.
pub(crate) fn validate_node(node: &WorkflowNode) -> Result<(), LayoutError> {
    if let Some(point_id) = node.points().map(|p| p.id.as_str()).duplicates().next() {
        return Err(LayoutError::DuplicatePoint {
            node_id: node.id.clone(),
            point_id: point_id.to_string(),
        });
    }

    let misplaced = node
        .inputs
        .iter()
        .map(|p| (p, PointKind::Input))
        .chain(node.outputs.iter().map(|p| (p, PointKind::Output)))
        .find(|(p, expected)| p.kind != *expected);
    if let Some((point, expected)) = misplaced {
        return Err(LayoutError::WrongPointKind {
            endpoint: Endpoint::new(&node.id, &point.id),
            expected,
            found: point.kind,
        });
    }
    Ok(())
}

/// Edge-level invariants that do not need node information.
pub(crate) fn validate_edges(connections: &[Connection]) -> Result<(), LayoutError> {
    let mut ids = AHashSet::with_capacity(connections.len());
    let mut pairs = AHashSet::with_capacity(connections.len());
    for connection in connections {
        if connection.from.node_id == connection.to.node_id {
            return Err(LayoutError::SelfLoop {
                connection_id: connection.id.clone(),
                node_id: connection.from.node_id.clone(),
            });
        }
        if !ids.insert(&connection.id) {
            return Err(LayoutError::DuplicateConnectionId(connection.id.clone()));
        }
        if !pairs.insert((&connection.from, &connection.to)) {
            return Err(LayoutError::DuplicateEdge {
                from: connection.from.clone(),
                to: connection.to.clone(),
            });
        }
    }
    Ok(())
}

fn check_endpoint(
    nodes: &AHashMap<&str, &WorkflowNode>,
    endpoint: &Endpoint,
    expected: PointKind,
) -> Result<(), LayoutError> {
    let node = nodes
        .get(endpoint.node_id.as_str())
        .ok_or_else(|| LayoutError::NodeNotFound(endpoint.node_id.clone()))?;
    let kind = node
        .point_kind(&endpoint.point_id)
        .ok_or_else(|| LayoutError::PointNotFound(endpoint.clone()))?;
    if kind != expected {
        return Err(LayoutError::WrongPointKind {
            endpoint: endpoint.clone(),
            expected,
            found: kind,
        });
    }
    Ok(())
}
