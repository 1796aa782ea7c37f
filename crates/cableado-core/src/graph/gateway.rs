//! Mutation gateway — the single entry point for topology edits.
//!
//! [`PatchGateway`] owns the graph, the undo history, and the
//! reentrancy [`SuppressionFlag`]. Every accepted edit is wrapped in a
//! [`PatchCommand`](super::PatchCommand) that is recorded *before* it
//! runs, so undo always restores the exact prior edge set and the
//! history is final before any notification subscriber observes the
//! change.
//!
//! User-gesture code that reacts to its own notifications runs inside
//! [`with_self_suppression`](PatchGateway::with_self_suppression): the
//! flag tells subscribers "this event is self-caused — update truth
//! (indicators), but skip the reconstruction that would loop back
//! here". It suppresses redundant re-entrant command issuance only,
//! never the mutation or its notification.

use crate::error::GraphError;

use super::bus::NotificationBus;
use super::command::PatchCommand;
use super::edge::Connection;
use super::node::{NodeId, PortKind};
use super::patch::PatchGraph;
use super::suppress::SuppressionFlag;
use super::undo::UndoHistory;

/// Result of an accepted connect request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStatus {
    /// The edge was added and recorded in the undo history.
    Connected,
    /// The edge already existed; nothing changed, nothing was recorded.
    /// Re-creating an existing connection is a confirm, not an error.
    AlreadyConnected,
}

/// Sole authorized mutator of a [`PatchGraph`].
pub struct PatchGateway {
    graph: PatchGraph,
    history: UndoHistory,
    suppression: SuppressionFlag,
}

impl PatchGateway {
    /// Wraps a graph. From here on, all edits should go through the
    /// gateway.
    pub fn new(graph: PatchGraph) -> Self {
        Self {
            graph,
            history: UndoHistory::new(),
            suppression: SuppressionFlag::new(),
        }
    }

    /// Read access to the graph.
    pub fn graph(&self) -> &PatchGraph {
        &self.graph
    }

    /// The notification bus, for subscriber registration.
    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        self.graph.bus_mut()
    }

    /// A clone of the suppression flag for subscribers to observe.
    pub fn suppression(&self) -> SuppressionFlag {
        self.suppression.clone()
    }

    // --- Topology edits ---

    /// Adds a node. Node creation is not an undoable command.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        inputs: Vec<PortKind>,
        outputs: Vec<PortKind>,
    ) -> NodeId {
        self.graph.add_node(label, inputs, outputs)
    }

    /// Adds the designated input/source node.
    pub fn add_source_node(
        &mut self,
        label: impl Into<String>,
        inputs: Vec<PortKind>,
        outputs: Vec<PortKind>,
    ) -> NodeId {
        self.graph.add_source_node(label, inputs, outputs)
    }

    /// Removes a node and its incident edges.
    ///
    /// The cascade emits one `ConnectionRemoved` per edge but records
    /// no undo entries; instead, history entries touching the node are
    /// pruned, since they could never replay against a missing node.
    pub fn remove_node(&mut self, node: NodeId) -> Result<usize, GraphError> {
        let removed = self.graph.remove_node(node)?;
        self.history.prune_node(node);
        Ok(removed)
    }

    /// Validates and commits a new connection.
    ///
    /// Re-adding an existing edge succeeds silently as a confirm
    /// ([`CommitStatus::AlreadyConnected`]): no mutation, no undo
    /// entry, no notification.
    pub fn add_connection(&mut self, edge: Connection) -> Result<CommitStatus, GraphError> {
        if self.graph.has_edge(&edge) {
            return Ok(CommitStatus::AlreadyConnected);
        }
        self.history
            .perform(PatchCommand::Connect(edge), &mut self.graph)?;
        Ok(CommitStatus::Connected)
    }

    /// Validates and commits a connection removal.
    pub fn remove_connection(&mut self, edge: Connection) -> Result<(), GraphError> {
        self.history
            .perform(PatchCommand::Disconnect(edge), &mut self.graph)
    }

    /// Replaces the whole edge set (preset load, chain reset).
    ///
    /// Atomic: on rejection nothing changes. On success a single
    /// `GraphReset` is emitted and the undo history is cleared — a
    /// loaded patch is a fresh document state.
    pub fn load_patch(&mut self, edges: &[Connection]) -> Result<(), GraphError> {
        self.graph.load_edges(edges)?;
        self.history.clear();
        Ok(())
    }

    // --- Undo / redo ---

    /// Reverts the latest edit. `Ok(false)` when the history is empty.
    pub fn undo(&mut self) -> Result<bool, GraphError> {
        self.history.undo(&mut self.graph)
    }

    /// Re-applies the latest undone edit.
    pub fn redo(&mut self) -> Result<bool, GraphError> {
        self.history.redo(&mut self.graph)
    }

    /// Depth of the undo stack.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Depth of the redo stack.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    // --- Reentrancy scope ---

    /// Runs `f` with the suppression flag raised.
    ///
    /// The flag is restored on exit even if `f` unwinds. Use this
    /// around edits whose notifications the calling code itself will
    /// absorb (a drag commit whose cable already exists on screen).
    pub fn with_self_suppression<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let _guard = self.suppression.raise();
        f(self)
    }
}
