//! Node and port identity for the patch graph.
//!
//! Every processing node gets a [`NodeId`] and a fixed set of typed,
//! directional ports. Edge endpoints are expressed as [`PortRef`]s — a
//! `(node, port index, direction)` triple that is only meaningful while
//! its node is a member of the graph.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node in the patch graph.
///
/// Node IDs are assigned sequentially and never reused within a graph
/// instance. They remain stable across graph mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// Signal type carried by a port.
///
/// Connections are only valid between ports of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortKind {
    /// Audio-rate signal.
    Audio,
    /// Control-rate signal (modulation, envelopes).
    Control,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortKind::Audio => "audio",
            PortKind::Control => "control",
        };
        f.write_str(name)
    }
}

impl std::error::Error for PortKind {}

/// Direction of a port relative to its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortDir {
    /// The port receives signal.
    Input,
    /// The port produces signal.
    Output,
}

/// Reference to one port on one node, usable as an edge endpoint.
///
/// A `PortRef` is valid only while its node is present in the graph;
/// the graph re-validates endpoints at commit time rather than trusting
/// references captured earlier (e.g. at drag start).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    /// The owning node.
    pub node: NodeId,
    /// Port index within the node's input or output list.
    pub port: u16,
    /// Which list `port` indexes into.
    pub dir: PortDir,
}

impl PortRef {
    /// Reference to an output port.
    #[inline]
    pub fn output(node: NodeId, port: u16) -> Self {
        Self {
            node,
            port,
            dir: PortDir::Output,
        }
    }

    /// Reference to an input port.
    #[inline]
    pub fn input(node: NodeId, port: u16) -> Self {
        Self {
            node,
            port,
            dir: PortDir::Input,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.dir {
            PortDir::Input => "in",
            PortDir::Output => "out",
        };
        write!(f, "{} {}[{}]", self.node, dir, self.port)
    }
}

/// Internal bookkeeping for a registered node.
pub(crate) struct NodeData {
    pub label: String,
    /// Kind of each input port, in index order.
    pub inputs: Vec<PortKind>,
    /// Kind of each output port, in index order.
    pub outputs: Vec<PortKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_ref_constructors_set_direction() {
        let n = NodeId(3);
        assert_eq!(PortRef::output(n, 1).dir, PortDir::Output);
        assert_eq!(PortRef::input(n, 0).dir, PortDir::Input);
    }

    #[test]
    fn display_is_compact() {
        let p = PortRef::input(NodeId(7), 2);
        assert_eq!(p.to_string(), "node 7 in[2]");
    }
}
