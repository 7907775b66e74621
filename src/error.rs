//! Error types for the selnet engine.
//!
//! Every failure the engine reports is a caller error: an out-of-range value,
//! a malformed identifier, or a topology change that is no longer allowed.
//! They surface as typed `SelnetError` values instead of silent clamping so
//! that experiment-configuration mistakes are never masked.

use thiserror::Error;

/// The main error type for selnet operations.
#[derive(Error, Debug)]
pub enum SelnetError {
    /// A unit-interval value was constructed or assigned outside [0, 1]
    #[error("Value {value} is outside the unit interval [0, 1]")]
    OutOfRange {
        /// The rejected value
        value: f64,
    },

    /// A connection weight was assigned outside [0, 1]
    #[error("Weight {value} is outside the unit interval [0, 1]")]
    WeightOutOfRange {
        /// The rejected weight
        value: f64,
    },

    /// Identifier text does not follow the identifier grammar
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Node has no identifier and cannot be registered
    #[error("Node has no identifier and cannot be registered")]
    MissingIdentifier,

    /// Identifier already names another node in the network
    #[error("Identifier already registered: {0}")]
    DuplicateIdentifier(String),

    /// Topology mutation attempted after `lock_structure()`
    #[error("Network structure is locked - topology can no longer change")]
    StructureLocked,

    /// No node is registered under the identifier
    #[error("No node registered under identifier {0:?}")]
    UnknownIdentifier(String),

    /// Node exists but does not have the requested capabilities
    #[error("Node {identifier} is {actual}, expected {expected}")]
    WrongNodeKind {
        /// Identifier that was looked up
        identifier: String,
        /// Requested kind
        expected: &'static str,
        /// Kind actually registered
        actual: &'static str,
    },

    /// Index out of bounds on a locked container
    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds {
        /// The index that was accessed
        index: usize,
        /// The valid length
        length: usize,
    },

    /// `create` targeted a slot that already holds a child
    #[error("Container slot {index} is already occupied")]
    SlotOccupied {
        /// The occupied index
        index: usize,
    },

    /// Connection endpoints do not support the requested connection
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// `update()` re-entered while the updater was already running
    #[error("Updater is already running")]
    UpdaterBusy,

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Restored state does not match the network topology
    #[error("State mismatch: {0}")]
    StateMismatch(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// A specialized `Result` type for selnet operations.
pub type Result<T> = std::result::Result<T, SelnetError>;
