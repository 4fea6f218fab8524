//! Surface compiler error types.

use crate::operations::Operation;
use thiserror::Error;

/// Errors that can occur while computing the API surface. Any of these
/// aborts the whole generation run; there is no partial failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The eager-load walk exceeded the global ceiling. Indicates a
    /// structurally pathological schema rather than a transient condition.
    #[error("max eager-load depth of {0} reached")]
    MaxDepth(usize),

    /// An edge references a type name missing from the graph.
    #[error("unknown type {0:?}")]
    UnknownType(String),

    /// The operation has no serialization-group source (delete responses
    /// carry no body).
    #[error("no serialization groups exist for {0} operations")]
    NoOperationGroups(Operation),

    /// An operation was explicitly exposed on an edge whose shape cannot
    /// support it.
    #[error("{op} operations are not allowed on {} edge {edge:?}", if *unique { "unique" } else { "non-unique" })]
    UnsupportedEdgeOperation {
        /// The requested operation.
        op: Operation,
        /// The edge name.
        edge: String,
        /// Whether the edge is to-one.
        unique: bool,
    },

    /// An annotation blob failed to decode.
    #[error("invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// The generator config blob failed to decode.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
}
