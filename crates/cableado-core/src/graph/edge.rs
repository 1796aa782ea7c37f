//! Edge (connection) value type for the patch graph.
//!
//! A [`Connection`] links one output port to one input port. Connections
//! are compared by value — the graph holds no separate edge identifiers,
//! so the `(source, dest)` pair *is* the identity, which is what makes
//! the visual-layer bijection mechanically checkable.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::node::{NodeId, PortRef};

/// A directed link from an output port to an input port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    /// Source endpoint; must be an output port.
    pub source: PortRef,
    /// Destination endpoint; must be an input port.
    pub dest: PortRef,
}

impl Connection {
    /// Builds a connection from two endpoints.
    ///
    /// Direction correctness is enforced by the graph at commit time,
    /// not here.
    #[inline]
    pub fn new(source: PortRef, dest: PortRef) -> Self {
        Self { source, dest }
    }

    /// Convenience constructor from node ids and port indices.
    pub fn between(source_node: NodeId, source_port: u16, dest_node: NodeId, dest_port: u16) -> Self {
        Self {
            source: PortRef::output(source_node, source_port),
            dest: PortRef::input(dest_node, dest_port),
        }
    }

    /// Whether either endpoint belongs to `node`.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.source.node == node || self.dest.node == node
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_matches_both_endpoints() {
        let c = Connection::between(NodeId(1), 0, NodeId(2), 1);
        assert!(c.touches(NodeId(1)));
        assert!(c.touches(NodeId(2)));
        assert!(!c.touches(NodeId(3)));
    }

    #[test]
    fn value_equality_ignores_nothing() {
        let a = Connection::between(NodeId(1), 0, NodeId(2), 0);
        let b = Connection::between(NodeId(1), 0, NodeId(2), 0);
        let c = Connection::between(NodeId(1), 1, NodeId(2), 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
