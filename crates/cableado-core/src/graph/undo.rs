//! Document-scoped undo/redo history for edge commands.
//!
//! Two stacks of [`PatchCommand`]s. [`perform`](UndoHistory::perform)
//! records the command *before* running it, so by the time the graph's
//! notification reaches any subscriber the undo bookkeeping is already
//! final — subscribers may query history depth from inside a handler
//! and see the post-edit state.
//!
//! Replaying is best-effort under topology churn: a recorded command
//! whose endpoints have since vanished fails its revalidation, is
//! dropped from the history, and the error is reported as a local,
//! non-fatal rejection.

use crate::error::GraphError;

use super::command::PatchCommand;
use super::node::NodeId;
use super::patch::PatchGraph;

/// Undo/redo stacks for reversible topology edits.
#[derive(Default)]
pub struct UndoHistory {
    undos: Vec<PatchCommand>,
    redos: Vec<PatchCommand>,
}

impl UndoHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `command`, then applies it.
    ///
    /// On failure the record is removed again and the graph is
    /// untouched. A fresh edit invalidates the redo stack.
    pub fn perform(
        &mut self,
        command: PatchCommand,
        graph: &mut PatchGraph,
    ) -> Result<(), GraphError> {
        self.undos.push(command);
        match command.perform(graph) {
            Ok(()) => {
                self.redos.clear();
                Ok(())
            }
            Err(err) => {
                self.undos.pop();
                Err(err)
            }
        }
    }

    /// Reverts the most recent command.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. A command
    /// that can no longer be reverted (endpoint gone) is dropped and
    /// its error returned.
    pub fn undo(&mut self, graph: &mut PatchGraph) -> Result<bool, GraphError> {
        let Some(command) = self.undos.pop() else {
            return Ok(false);
        };
        command.revert(graph)?;
        self.redos.push(command);
        Ok(true)
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self, graph: &mut PatchGraph) -> Result<bool, GraphError> {
        let Some(command) = self.redos.pop() else {
            return Ok(false);
        };
        command.perform(graph)?;
        self.undos.push(command);
        Ok(true)
    }

    /// Drops every recorded command touching `node`.
    ///
    /// Called when a node is deleted: commands that reference it could
    /// never replay successfully, so they are pruned instead of left to
    /// fail one by one.
    pub fn prune_node(&mut self, node: NodeId) {
        self.undos.retain(|cmd| !cmd.edge().touches(node));
        self.redos.retain(|cmd| !cmd.edge().touches(node));
    }

    /// Clears both stacks.
    pub fn clear(&mut self) {
        self.undos.clear();
        self.redos.clear();
    }

    /// Number of undoable commands.
    pub fn undo_depth(&self) -> usize {
        self.undos.len()
    }

    /// Number of redoable commands.
    pub fn redo_depth(&self) -> usize {
        self.redos.len()
    }
}
