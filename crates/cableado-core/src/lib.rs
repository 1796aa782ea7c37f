//! Cableado Core - live-mutable audio patch graph
//!
//! This crate owns the concurrency/consistency core of a patchable
//! audio processor: a directed graph of nodes connected through typed
//! ports, editable at arbitrary times from a user-interaction thread
//! while a render thread continuously reads the current topology.
//!
//! # Core Abstractions
//!
//! ## Topology
//!
//! - [`PatchGraph`] - node registry plus the authoritative edge set
//! - [`Connection`] / [`PortRef`] - value-typed edges and endpoints
//! - [`EdgeSnapshot`] / [`RenderReader`] - immutable, revision-stamped
//!   edge-set copies for the render thread (wait-free `ArcSwap` loads,
//!   no lock on the audio path)
//!
//! ## Editing
//!
//! - [`PatchGateway`] - the single authorized mutator; validates,
//!   wraps every edit in an undoable command, and scopes reentrancy
//!   suppression
//! - [`UndoHistory`] / [`PatchCommand`] - document-scoped undo/redo
//! - [`SuppressionFlag`] - cooperative, thread-confined guard that
//!   keeps notification handlers from re-issuing the edit they are
//!   reacting to
//!
//! ## Notifications
//!
//! - [`NotificationBus`] / [`GraphEvent`] - synchronous, ordered
//!   delivery on the mutating thread, always after the mutation is
//!   visible
//!
//! # Threading Contract
//!
//! All mutation happens on one interaction thread. The render thread
//! holds only a [`RenderReader`]; it never blocks and never observes a
//! torn edge set. Nothing in this crate suspends; the only shared
//! state is the published snapshot.
//!
//! # Example
//!
//! ```rust
//! use cableado_core::{Connection, PatchGateway, PatchGraph, PortKind};
//!
//! let mut graph = PatchGraph::new();
//! let fuzz = graph.add_node("fuzz", vec![], vec![PortKind::Audio]);
//! let delay = graph.add_node("delay", vec![PortKind::Audio], vec![]);
//!
//! let mut gateway = PatchGateway::new(graph);
//! let reader = gateway.graph().render_reader();
//!
//! gateway.add_connection(Connection::between(fuzz, 0, delay, 0))?;
//! assert_eq!(reader.snapshot().edges().len(), 1);
//!
//! gateway.undo()?;
//! assert!(reader.snapshot().edges().is_empty());
//! # Ok::<(), cableado_core::GraphError>(())
//! ```

pub mod error;
pub mod graph;

pub use error::{GraphError, PolicyViolation};
pub use graph::{
    CommitStatus, Connection, EdgeSnapshot, GraphEvent, NodeId, NotificationBus, PatchCommand,
    PatchGateway, PatchGraph, PortDir, PortKind, PortRef, RenderReader, SubscriberId,
    SuppressionFlag, SuppressionGuard, UndoHistory,
};
