//! Reversible edge commands.
//!
//! A [`PatchCommand`] captures the full edge value, which is everything
//! needed to reverse a single add or remove. Commands carry no graph
//! references — they are replayed against whatever graph the history
//! hands them, and they fail cleanly (leaving the graph untouched) if
//! an endpoint has since disappeared.

use crate::error::GraphError;

use super::edge::Connection;
use super::patch::PatchGraph;

/// One reversible topology edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchCommand {
    /// Add the edge.
    Connect(Connection),
    /// Remove the edge.
    Disconnect(Connection),
}

impl PatchCommand {
    /// Applies the command.
    pub fn perform(&self, graph: &mut PatchGraph) -> Result<(), GraphError> {
        match self {
            Self::Connect(edge) => graph.add_edge(*edge),
            Self::Disconnect(edge) => graph.remove_edge(*edge),
        }
    }

    /// Applies the inverse of the command.
    pub fn revert(&self, graph: &mut PatchGraph) -> Result<(), GraphError> {
        self.inverted().perform(graph)
    }

    /// The command that undoes this one.
    pub fn inverted(&self) -> Self {
        match self {
            Self::Connect(edge) => Self::Disconnect(*edge),
            Self::Disconnect(edge) => Self::Connect(*edge),
        }
    }

    /// The edge this command acts on.
    pub fn edge(&self) -> Connection {
        match self {
            Self::Connect(edge) | Self::Disconnect(edge) => *edge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, PortKind};

    #[test]
    fn perform_and_revert_round_trip() {
        let mut graph = PatchGraph::new();
        let a = graph.add_node("a", vec![], vec![PortKind::Audio]);
        let b = graph.add_node("b", vec![PortKind::Audio], vec![]);
        let edge = Connection::between(a, 0, b, 0);

        let cmd = PatchCommand::Connect(edge);
        cmd.perform(&mut graph).unwrap();
        assert!(graph.has_edge(&edge));
        cmd.revert(&mut graph).unwrap();
        assert!(!graph.has_edge(&edge));
    }

    #[test]
    fn inversion_is_an_involution() {
        let edge = Connection::between(crate::graph::NodeId(0), 0, crate::graph::NodeId(1), 0);
        let cmd = PatchCommand::Connect(edge);
        assert_eq!(cmd.inverted().inverted(), cmd);
    }
}
