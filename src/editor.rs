//! The owning container of a workflow canvas.
//!
//! [`WorkflowEditor`] holds the nodes, their absolute point positions, one
//! [`PointHandle`] per point and the [`ConnectionStore`]. It routes pointer gestures to
//! the right handle, republishes geometry when nodes move, cascades node removal into
//! the store and keeps each point's advisory `connected` flag in step with the store.

use crate::error::LayoutError;
use crate::geometry::{Position, PositionCache};
use crate::gesture::{Applied, GestureEvent};
use crate::handle::PointHandle;
use crate::model::layout::validate_node;
use crate::model::{Connection, ConnectionId, Endpoint, WorkflowLayout, WorkflowNode};
use crate::observer::{Observers, SubscriptionId};
use crate::store::{ConnectionStore, FinishOutcome, StoreEvent};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, trace};

/// A change to the editor's nodes or their geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    NodeAdded {
        node_id: String,
    },
    /// Fresh absolute positions for the points of one node.
    PointsMoved {
        node_id: String,
        positions: Vec<(Endpoint, Position)>,
    },
    NodeRemoved {
        node_id: String,
        connections_removed: usize,
    },
    Loaded {
        nodes: usize,
    },
    Cleared,
}

#[derive(Debug, Default)]
pub struct WorkflowEditor {
    nodes: AHashMap<String, WorkflowNode>,
    /// Node ids in insertion order.
    order: Vec<String>,
    handles: AHashMap<Endpoint, PointHandle>,
    geometry: PositionCache,
    store: ConnectionStore,
    observers: Observers<LayoutEvent>,
}

impl WorkflowEditor {
    pub fn new() -> Self {
        Self::with_store(ConnectionStore::new())
    }

    /// Creates an editor around an existing store, keeping its configuration and
    /// subscribers.
    ///
    /// The editor starts without nodes, so any connections or pending connection
    /// already in the store are cleared. Use [`load`](Self::load) to open a saved
    /// workflow together with its connections.
    pub fn with_store(mut store: ConnectionStore) -> Self {
        store.clear();
        Self {
            nodes: AHashMap::new(),
            order: Vec::new(),
            handles: AHashMap::new(),
            geometry: PositionCache::new(),
            store,
            observers: Observers::new(),
        }
    }

    pub fn store(&self) -> &ConnectionStore {
        &self.store
    }

    pub fn subscribe_layout(
        &mut self,
        listener: impl FnMut(&LayoutEvent) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe_layout(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn subscribe_graph(
        &mut self,
        listener: impl FnMut(&StoreEvent) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe_graph(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Nodes and geometry ---

    pub fn node(&self, node_id: &str) -> Option<&WorkflowNode> {
        self.nodes.get(node_id)
    }

    /// Nodes in the order they were added.
    pub fn nodes(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn handle(&self, endpoint: &Endpoint) -> Option<&PointHandle> {
        self.handles.get(endpoint)
    }

    /// Current absolute canvas position of a point.
    pub fn point_position(&self, endpoint: &Endpoint) -> Option<Position> {
        self.geometry.get(endpoint)
    }

    pub fn is_point_connected(&self, endpoint: &Endpoint) -> bool {
        self.store.is_point_connected(endpoint)
    }

    pub fn add_node(&mut self, mut node: WorkflowNode) -> Result<(), LayoutError> {
        if self.nodes.contains_key(&node.id) {
            return Err(LayoutError::DuplicateNode(node.id));
        }
        validate_node(&node)?;

        for point in node.points_mut() {
            point.connected = false;
        }
        for point in node.points() {
            let handle = PointHandle::new(&node.id, point);
            self.handles.insert(handle.endpoint().clone(), handle);
        }
        let positions = self.geometry.publish_node(&node);
        let node_id = node.id.clone();
        debug!(node_id = %node_id, points = positions.len(), "node added");

        self.order.push(node_id.clone());
        self.nodes.insert(node_id.clone(), node);
        self.sync_connected_flags();

        self.observers.notify(&LayoutEvent::NodeAdded {
            node_id: node_id.clone(),
        });
        self.observers
            .notify(&LayoutEvent::PointsMoved { node_id, positions });
        Ok(())
    }

    /// Moves a node and republishes the absolute positions of its points. Returns
    /// `false` if the node is unknown or already at `position`.
    pub fn move_node(&mut self, node_id: &str, position: Position) -> bool {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        if node.position == position {
            return false;
        }
        node.position = position;
        let positions = self.geometry.publish_node(node);
        trace!(node_id, %position, "node moved");
        self.observers.notify(&LayoutEvent::PointsMoved {
            node_id: node_id.to_string(),
            positions,
        });
        true
    }

    /// Changes a point's node-local offset and republishes the node's geometry.
    /// Returns `false` if the point is unknown or the offset is unchanged.
    pub fn set_point_offset(&mut self, endpoint: &Endpoint, offset: Position) -> bool {
        let Some(node) = self.nodes.get_mut(&endpoint.node_id) else {
            return false;
        };
        let Some(point) = node.point_mut(&endpoint.point_id) else {
            return false;
        };
        if point.relative_position == offset {
            return false;
        }
        point.relative_position = offset;
        let positions = self.geometry.publish_node(node);
        trace!(point = %endpoint, %offset, "point offset changed");
        self.observers.notify(&LayoutEvent::PointsMoved {
            node_id: endpoint.node_id.clone(),
            positions,
        });
        true
    }

    /// Removes a node together with every connection touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Option<WorkflowNode> {
        let node = self.nodes.remove(node_id)?;
        let removed = self.store.remove_connections_for_node(node_id);
        self.order.retain(|id| id != node_id);
        self.handles.retain(|endpoint, _| endpoint.node_id != node_id);
        self.geometry.forget_node(node_id);
        self.sync_connected_flags();

        debug!(node_id, connections = removed.len(), "node removed");
        self.observers.notify(&LayoutEvent::NodeRemoved {
            node_id: node_id.to_string(),
            connections_removed: removed.len(),
        });
        Some(node)
    }

    // --- Gestures ---

    /// Press on a point. Returns whether a pending connection started.
    pub fn press(&mut self, endpoint: &Endpoint) -> bool {
        let (Some(handle), Some(anchor)) =
            (self.handles.get(endpoint), self.geometry.get(endpoint))
        else {
            return false;
        };
        handle.press(&mut self.store, anchor)
    }

    /// Pointer moved while a connection may be in progress.
    pub fn pointer_moved(&mut self, position: Position) -> bool {
        self.store.update_position(position)
    }

    /// Pointer released over a point.
    ///
    /// The point's [`PointHandle`] decides whether the release finishes the pending
    /// connection; a handle that does not accept it ignores the release and leaves the
    /// store untouched. The editor owns the whole pointer gesture, though, and a
    /// pointer-up ends it wherever it lands. So when the handle declines (an output
    /// point, an input on the origin node, an unknown point) the pending connection is
    /// cancelled here, as if released over the canvas, rather than left dangling with
    /// no pointer held. Callers driving [`ConnectionStore`] through handles directly
    /// get the plain no-op.
    pub fn release(&mut self, endpoint: &Endpoint) -> Option<FinishOutcome> {
        let outcome = self
            .handles
            .get(endpoint)
            .and_then(|handle| handle.release(&mut self.store));
        match &outcome {
            Some(FinishOutcome::Committed(_)) => self.sync_connected_flags(),
            Some(_) => {}
            None => {
                self.store.cancel();
            }
        }
        outcome
    }

    /// Pointer released over empty canvas. Returns whether a connection was dropped.
    pub fn release_canvas(&mut self) -> bool {
        self.store.cancel().is_some()
    }

    /// Aborts any connection in progress.
    pub fn escape(&mut self) -> bool {
        self.store.cancel().is_some()
    }

    pub fn hover_point(&mut self, endpoint: &Endpoint, hovered: bool) -> bool {
        let Some(handle) = self.handles.get_mut(endpoint) else {
            return false;
        };
        if hovered {
            handle.pointer_enter();
        } else {
            handle.pointer_leave();
        }
        true
    }

    pub fn hover_connection(&mut self, id: Option<ConnectionId>) {
        self.store.set_hovered(id);
    }

    // --- Connections ---

    pub fn remove_connection(&mut self, id: &ConnectionId) -> Option<Connection> {
        let removed = self.store.remove(id)?;
        self.sync_connected_flags();
        Some(removed)
    }

    /// Removes every connection but keeps the nodes.
    pub fn clear_connections(&mut self) {
        self.store.clear();
        self.sync_connected_flags();
    }

    /// Removes every node and connection.
    pub fn clear(&mut self) {
        self.store.clear();
        self.nodes.clear();
        self.order.clear();
        self.handles.clear();
        self.geometry.clear();
        debug!("editor cleared");
        self.observers.notify(&LayoutEvent::Cleared);
    }

    // --- Layout import/export ---

    /// Replaces the whole canvas with `layout`, after validating it in full. The editor
    /// is left untouched if the layout is invalid.
    pub fn load(&mut self, layout: WorkflowLayout) -> Result<(), LayoutError> {
        layout.validate()?;
        let WorkflowLayout { nodes, connections } = layout;
        self.store.load(connections)?;

        self.nodes.clear();
        self.order.clear();
        self.handles.clear();
        self.geometry.clear();
        for node in nodes {
            for point in node.points() {
                let handle = PointHandle::new(&node.id, point);
                self.handles.insert(handle.endpoint().clone(), handle);
            }
            self.geometry.publish_node(&node);
            self.order.push(node.id.clone());
            self.nodes.insert(node.id.clone(), node);
        }
        self.sync_connected_flags();

        debug!(
            nodes = self.order.len(),
            connections = self.store.len(),
            "layout loaded"
        );
        self.observers.notify(&LayoutEvent::Loaded {
            nodes: self.order.len(),
        });
        Ok(())
    }

    /// The current canvas as a layout, with `connected` flags derived from the store.
    pub fn snapshot(&self) -> WorkflowLayout {
        WorkflowLayout {
            nodes: self.nodes().cloned().collect(),
            connections: self.store.connections().to_vec(),
        }
    }

    /// Applies one scripted event.
    pub fn apply(&mut self, event: &GestureEvent) -> Applied {
        match event {
            GestureEvent::Press { node, point } => {
                Applied::from_flag(self.press(&Endpoint::new(node, point)))
            }
            GestureEvent::PointerMove { x, y } => {
                Applied::from_flag(self.pointer_moved(Position::new(*x, *y)))
            }
            GestureEvent::Release { node, point } => {
                let was_connecting = self.store.is_connecting();
                match self.release(&Endpoint::new(node, point)) {
                    Some(outcome) => Applied::Finished(outcome),
                    None => Applied::from_flag(was_connecting),
                }
            }
            GestureEvent::ReleaseCanvas => Applied::from_flag(self.release_canvas()),
            GestureEvent::Cancel => Applied::from_flag(self.escape()),
            GestureEvent::MoveNode { node, x, y } => {
                Applied::from_flag(self.move_node(node, Position::new(*x, *y)))
            }
            GestureEvent::SetPointOffset { node, point, x, y } => Applied::from_flag(
                self.set_point_offset(&Endpoint::new(node, point), Position::new(*x, *y)),
            ),
            GestureEvent::RemoveNode { node } => {
                Applied::from_flag(self.remove_node(node).is_some())
            }
            GestureEvent::RemoveConnection { id } => {
                Applied::from_flag(self.remove_connection(id).is_some())
            }
            GestureEvent::HoverPoint {
                node,
                point,
                hovered,
            } => Applied::from_flag(self.hover_point(&Endpoint::new(node, point), *hovered)),
            GestureEvent::HoverConnection { id } => {
                let changed = self.store.hovered() != id.as_ref();
                self.hover_connection(id.clone());
                Applied::from_flag(changed)
            }
            GestureEvent::Clear => {
                let changed = !self.store.is_empty() || self.store.is_connecting();
                self.clear_connections();
                Applied::from_flag(changed)
            }
        }
    }

    fn sync_connected_flags(&mut self) {
        let connected: AHashSet<&Endpoint> = self
            .store
            .connections()
            .iter()
            .flat_map(|c| [&c.from, &c.to])
            .collect();
        for node in self.nodes.values_mut() {
            let node_id = node.id.clone();
            for point in node.points_mut() {
                point.connected = connected.contains(&Endpoint::new(&node_id, &point.id));
            }
        }
    }
}
