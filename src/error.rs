use crate::model::{ConnectionId, Endpoint, PointKind};
use thiserror::Error;

/// Errors raised by the connection store itself.
///
/// Rejected connection attempts are not errors; they come back as
/// [`FinishOutcome::Rejected`](crate::store::FinishOutcome::Rejected).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error(
        "Cannot start a connection at '{requested}': a connection from '{origin}' is already in progress"
    )]
    AlreadyConnecting {
        origin: Endpoint,
        requested: Endpoint,
    },
}

/// Errors that make a node or a whole layout unacceptable to the editor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Node '{0}' is defined more than once")]
    DuplicateNode(String),

    #[error("Node '{node_id}' defines point '{point_id}' more than once")]
    DuplicatePoint { node_id: String, point_id: String },

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Connection point '{0}' not found")]
    PointNotFound(Endpoint),

    #[error("Connection point '{endpoint}' is an {found} point, expected an {expected} point")]
    WrongPointKind {
        endpoint: Endpoint,
        expected: PointKind,
        found: PointKind,
    },

    #[error("Connection '{connection_id}' loops back into node '{node_id}'")]
    SelfLoop {
        connection_id: ConnectionId,
        node_id: String,
    },

    #[error("More than one connection runs from '{from}' to '{to}'")]
    DuplicateEdge { from: Endpoint, to: Endpoint },

    #[error("Connection id '{0}' is used more than once")]
    DuplicateConnectionId(ConnectionId),
}

/// Errors that can occur when converting a host canvas format into a `WorkflowLayout`.
#[derive(Error, Debug, Clone)]
pub enum LayoutConversionError {
    #[error("Invalid canvas data: {0}")]
    ValidationError(String),
}

/// Errors from encoding, decoding, reading or writing layout artifacts.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Invalid layout JSON: {0}")]
    Json(String),

    #[error("{0}")]
    Encode(String),

    #[error("{0}")]
    Decode(String),

    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors from loading store configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to parse store configuration: {0}")]
    Parse(String),

    #[error("Could not read configuration file '{path}': {message}")]
    Io { path: String, message: String },
}
