//! The authoritative connection graph state and its mutation protocol.
//!
//! A [`ConnectionStore`] holds every committed [`Connection`], the single in-flight
//! [`PendingConnection`] and the hovered connection. All writes go through its methods,
//! which enforce the graph invariants no matter what the gesture layer already filtered:
//!
//! * no connection joins a node to itself,
//! * at most one connection exists per `(from, to)` pair,
//! * at most one pending connection exists at any time.
//!
//! Rejected attempts are not errors. `finish` always ends the gesture and reports what
//! happened through [`FinishOutcome`].

use crate::error::{LayoutError, StoreError};
use crate::geometry::Position;
use crate::model::layout::validate_edges;
use crate::model::{Connection, ConnectionId, Endpoint, PendingConnection};
use crate::observer::{Observers, SubscriptionId};
use ahash::AHashSet;
use tracing::{debug, trace, warn};
use uuid::Uuid;

mod config;
mod events;

pub use config::{IdStrategy, RedundantStart, StoreConfig};
pub use events::{RejectReason, StoreEvent};

/// Whether a connection gesture is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Connecting,
}

/// Result of a successful call to [`ConnectionStore::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// The previous pending connection, which started at this endpoint, was dropped.
    Replaced(Endpoint),
    /// A connection was already in progress and was kept.
    Ignored,
}

/// Result of [`ConnectionStore::finish`]. The store is `Idle` afterwards in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    Committed(ConnectionId),
    Rejected(RejectReason),
    /// There was no pending connection to finish.
    NotConnecting,
}

impl FinishOutcome {
    pub fn committed(&self) -> Option<&ConnectionId> {
        match self {
            FinishOutcome::Committed(id) => Some(id),
            _ => None,
        }
    }
}

/// An owned, immutable copy of the store's state for readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphSnapshot {
    pub connections: Vec<Connection>,
    pub pending: Option<PendingConnection>,
    pub hovered: Option<ConnectionId>,
}

pub struct StoreBuilder {
    config: StoreConfig,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
        }
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_redundant_start(mut self, policy: RedundantStart) -> Self {
        self.config.redundant_start = policy;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.config.id_strategy = strategy;
        self
    }

    /// Shorthand for sequential ids with the given prefix.
    pub fn with_sequential_ids(self, prefix: impl Into<String>) -> Self {
        self.with_id_strategy(IdStrategy::Sequential {
            prefix: prefix.into(),
        })
    }

    pub fn build(self) -> ConnectionStore {
        ConnectionStore::with_config(self.config)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ConnectionStore {
    config: StoreConfig,
    connections: Vec<Connection>,
    /// Mirrors `connections` as `(from, to)` pairs for duplicate checks.
    edges: AHashSet<(Endpoint, Endpoint)>,
    pending: Option<PendingConnection>,
    hovered: Option<ConnectionId>,
    next_sequence: u64,
    observers: Observers<StoreEvent>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            connections: Vec::new(),
            edges: AHashSet::new(),
            pending: None,
            hovered: None,
            next_sequence: 1,
            observers: Observers::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Subscriptions ---

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // --- Readers ---

    pub fn state(&self) -> GestureState {
        if self.pending.is_some() {
            GestureState::Connecting
        } else {
            GestureState::Idle
        }
    }

    pub fn is_connecting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingConnection> {
        self.pending.as_ref()
    }

    /// Committed connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    pub fn hovered(&self) -> Option<&ConnectionId> {
        self.hovered.as_ref()
    }

    pub fn has_edge(&self, from: &Endpoint, to: &Endpoint) -> bool {
        self.edges.contains(&(from.clone(), to.clone()))
    }

    pub fn connections_for_node<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |c| c.involves_node(node_id))
    }

    /// Whether any committed connection touches `endpoint`.
    pub fn is_point_connected(&self, endpoint: &Endpoint) -> bool {
        self.connections.iter().any(|c| c.involves_point(endpoint))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            connections: self.connections.clone(),
            pending: self.pending.clone(),
            hovered: self.hovered.clone(),
        }
    }

    // --- Mutation protocol ---

    /// Begins a pending connection at `origin`, with its free end at `position`.
    ///
    /// While another connection is in progress the configured [`RedundantStart`]
    /// policy decides the result.
    pub fn start(
        &mut self,
        origin: Endpoint,
        position: Position,
    ) -> Result<StartOutcome, StoreError> {
        let replaced = match (&self.pending, self.config.redundant_start) {
            (None, _) => None,
            (Some(_), RedundantStart::Ignore) => {
                trace!(requested = %origin, "connection already in progress, start ignored");
                return Ok(StartOutcome::Ignored);
            }
            (Some(current), RedundantStart::Error) => {
                return Err(StoreError::AlreadyConnecting {
                    origin: current.origin.clone(),
                    requested: origin,
                });
            }
            (Some(current), RedundantStart::Replace) => Some(current.origin.clone()),
        };

        debug!(origin = %origin, %position, "connection started");
        self.pending = Some(PendingConnection {
            origin: origin.clone(),
            free_end: position,
        });
        self.observers.notify(&StoreEvent::PendingStarted {
            origin,
            position,
            replaced: replaced.clone(),
        });

        Ok(match replaced {
            Some(previous) => StartOutcome::Replaced(previous),
            None => StartOutcome::Started,
        })
    }

    /// Moves the free end of the pending connection. Returns `false` when idle or when
    /// the free end is already at `position`.
    pub fn update_position(&mut self, position: Position) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        if pending.free_end == position {
            return false;
        }
        trace!(%position, "pending connection moved");
        pending.free_end = position;
        self.observers
            .notify(&StoreEvent::PendingMoved { position });
        true
    }

    /// Ends the gesture at `target`, committing a new connection unless it would be a
    /// self-loop or a duplicate.
    pub fn finish(&mut self, target: Endpoint) -> FinishOutcome {
        let Some(pending) = self.pending.take() else {
            return FinishOutcome::NotConnecting;
        };
        let origin = pending.origin;

        let rejection = if target.node_id == origin.node_id {
            Some(RejectReason::SelfLoop)
        } else if self.has_edge(&origin, &target) {
            Some(RejectReason::Duplicate)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(origin = %origin, target = %target, %reason, "connection rejected");
            self.observers.notify(&StoreEvent::Rejected {
                origin,
                target,
                reason,
            });
            return FinishOutcome::Rejected(reason);
        }

        let id = self.generate_id();
        let connection = Connection::new(id.clone(), origin, target);
        debug!(connection_id = %id, from = %connection.from, to = %connection.to, "connection committed");
        self.edges
            .insert((connection.from.clone(), connection.to.clone()));
        self.connections.push(connection.clone());
        self.observers.notify(&StoreEvent::Committed(connection));
        FinishOutcome::Committed(id)
    }

    /// Drops the pending connection, if any, without committing anything.
    pub fn cancel(&mut self) -> Option<PendingConnection> {
        let pending = self.pending.take()?;
        debug!(origin = %pending.origin, "connection cancelled");
        self.observers.notify(&StoreEvent::PendingCancelled {
            origin: pending.origin.clone(),
        });
        Some(pending)
    }

    /// Deletes a committed connection. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        let connection = self.connections.remove(index);
        self.edges
            .remove(&(connection.from.clone(), connection.to.clone()));
        debug!(connection_id = %id, "connection removed");
        self.observers
            .notify(&StoreEvent::Removed(connection.clone()));
        if self.hovered.as_ref() == Some(id) {
            self.set_hovered(None);
        }
        Some(connection)
    }

    /// Removes every connection touching `node_id` and cancels a pending connection
    /// that started on it. Call before the node itself goes away.
    pub fn remove_connections_for_node(&mut self, node_id: &str) -> Vec<Connection> {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.origin.node_id == node_id)
        {
            self.cancel();
        }

        let (removed, kept): (Vec<Connection>, Vec<Connection>) = self
            .connections
            .drain(..)
            .partition(|c| c.involves_node(node_id));
        self.connections = kept;
        if removed.is_empty() {
            return removed;
        }

        for connection in &removed {
            self.edges
                .remove(&(connection.from.clone(), connection.to.clone()));
        }
        let removed_ids: Vec<ConnectionId> = removed.iter().map(|c| c.id.clone()).collect();
        debug!(node_id, removed = removed_ids.len(), "node detached from graph");
        let hovered_gone = self
            .hovered
            .as_ref()
            .is_some_and(|h| removed_ids.contains(h));
        self.observers.notify(&StoreEvent::NodeDetached {
            node_id: node_id.to_string(),
            removed: removed_ids,
        });
        if hovered_gone {
            self.set_hovered(None);
        }
        removed
    }

    /// Marks a connection as under pointer focus. Display only.
    pub fn set_hovered(&mut self, id: Option<ConnectionId>) {
        if self.hovered == id {
            return;
        }
        self.hovered = id.clone();
        self.observers.notify(&StoreEvent::HoverChanged(id));
    }

    /// Removes all connections and returns to `Idle`.
    pub fn clear(&mut self) {
        let removed = self.connections.len();
        let changed = removed > 0 || self.pending.is_some() || self.hovered.is_some();
        self.connections.clear();
        self.edges.clear();
        self.pending = None;
        self.hovered = None;
        if changed {
            debug!(removed, "connection graph cleared");
            self.observers.notify(&StoreEvent::Cleared { removed });
        }
    }

    /// Replaces the whole graph with `connections`, e.g. when a saved workflow is
    /// opened. The store is left untouched if any edge invariant is violated.
    ///
    /// A pending connection is cancelled and the hover is reset first, each with its
    /// own event, before [`StoreEvent::Loaded`].
    ///
    /// Endpoint kinds are not known here; use
    /// [`WorkflowEditor::load`](crate::editor::WorkflowEditor::load) for full checks.
    pub fn load(&mut self, connections: Vec<Connection>) -> Result<(), LayoutError> {
        if let Err(e) = validate_edges(&connections) {
            warn!(error = %e, "rejected connection graph load");
            return Err(e);
        }

        self.cancel();
        self.set_hovered(None);

        self.edges = connections
            .iter()
            .map(|c| (c.from.clone(), c.to.clone()))
            .collect();
        self.connections = connections;
        debug!(connections = self.connections.len(), "connection graph loaded");
        self.observers.notify(&StoreEvent::Loaded {
            connections: self.connections.len(),
        });
        Ok(())
    }

    fn generate_id(&mut self) -> ConnectionId {
        loop {
            let candidate = match &self.config.id_strategy {
                IdStrategy::Uuid => ConnectionId(format!("conn-{}", Uuid::new_v4())),
                IdStrategy::Sequential { prefix } => {
                    let id = ConnectionId(format!("{}{}", prefix, self.next_sequence));
                    self.next_sequence += 1;
                    id
                }
            };
            if self.connection(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}
