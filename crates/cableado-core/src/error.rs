//! Error taxonomy for patch graph operations.
//!
//! Every rejection here is local and non-fatal: a failed connect or
//! disconnect leaves the graph exactly as it was. Nothing in this crate
//! escalates to a process-level failure — callers that detect a
//! graph/view inconsistency resynchronize instead of surfacing an error.

use thiserror::Error;

use crate::graph::{Connection, NodeId, PortKind, PortRef};

/// Errors returned by graph mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The endpoint does not refer to a live node, an in-range port, or
    /// a port with the right direction for its role in the edge.
    ///
    /// Always possible under node deletion racing a drag gesture;
    /// endpoints are therefore re-validated at commit time.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(PortRef),

    /// The exact edge is already present.
    ///
    /// Interaction layers treat this as a silent confirm, not a failure.
    #[error("connection already exists: {0}")]
    DuplicateEdge(Connection),

    /// The edge to remove is not in the graph.
    #[error("connection not found: {0}")]
    EdgeNotFound(Connection),

    /// The node is not in the graph.
    #[error("{0} not found")]
    NodeNotFound(NodeId),

    /// The edge is well-formed but violates a routing policy.
    #[error("rejected: {0}")]
    Rejected(#[from] PolicyViolation),
}

/// Routing policies enforced consistently by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The destination input port already has a connection.
    /// Fan-in is one edge per input port; re-route by unplugging first.
    #[error("input port already occupied: {0}")]
    InputOccupied(PortRef),

    /// Adding the edge would create a feedback cycle.
    #[error("connection would create a cycle")]
    WouldCycle,

    /// The two ports carry different signal kinds.
    #[error("port kinds do not match: {source:?} -> {dest:?}")]
    KindMismatch {
        /// Kind of the source output port.
        source: PortKind,
        /// Kind of the destination input port.
        dest: PortKind,
    },
}
