//! Patch graph — node registry, edge mutations, and snapshot publication.
//!
//! [`PatchGraph`] owns the authoritative topology: the node registry and
//! the ordered edge list. All mutations happen on the interaction
//! thread; after every mutation the full edge set is republished as an
//! immutable [`EdgeSnapshot`] (copy-on-write, via `ArcSwap`), and only
//! then is the change broadcast on the [`NotificationBus`]. The render
//! thread reads snapshots through a [`RenderReader`] and never blocks.
//!
//! Rejections are value-level `Err`s and leave the graph untouched;
//! see [`GraphError`] for the taxonomy.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{GraphError, PolicyViolation};

use super::bus::{GraphEvent, NotificationBus};
use super::edge::Connection;
use super::node::{NodeData, NodeId, PortDir, PortKind, PortRef};
use super::snapshot::{EdgeSnapshot, RenderReader};

/// Authoritative connection graph: node registry plus edge set.
///
/// Owned by the interaction context. Mutate it through the
/// [`PatchGateway`](super::PatchGateway) so every edit is undoable;
/// direct mutation is available for initial construction and tests.
pub struct PatchGraph {
    nodes: Vec<Option<NodeData>>,
    next_node_slot: u32,
    /// The designated chain input, drawn last in the stacking order.
    source_node: Option<NodeId>,
    /// Edge set in insertion order — the single source of truth.
    edges: Vec<Connection>,
    bus: NotificationBus,
    published: Arc<ArcSwap<EdgeSnapshot>>,
    revision: u64,
}

impl Default for PatchGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_node_slot: 0,
            source_node: None,
            edges: Vec::new(),
            bus: NotificationBus::new(),
            published: Arc::new(ArcSwap::from_pointee(EdgeSnapshot::default())),
            revision: 0,
        }
    }

    // --- Node registry ---

    /// Registers a node with the given port layout. Returns its id.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        inputs: Vec<PortKind>,
        outputs: Vec<PortKind>,
    ) -> NodeId {
        let id = NodeId(self.next_node_slot);
        self.next_node_slot += 1;

        let data = NodeData {
            label: label.into(),
            inputs,
            outputs,
        };
        let idx = id.0 as usize;
        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || None);
        }
        tracing::debug!("graph_add: {} ({})", id, data.label);
        self.nodes[idx] = Some(data);
        id
    }

    /// Registers the designated input/source node.
    ///
    /// At most one node is the source; a later call replaces the
    /// designation, not the earlier node.
    pub fn add_source_node(
        &mut self,
        label: impl Into<String>,
        inputs: Vec<PortKind>,
        outputs: Vec<PortKind>,
    ) -> NodeId {
        let id = self.add_node(label, inputs, outputs);
        self.source_node = Some(id);
        id
    }

    /// The designated input/source node, if any.
    pub fn source_node(&self) -> Option<NodeId> {
        self.source_node
    }

    /// Removes a node and, first, every edge touching it.
    ///
    /// Each cascaded edge removal is individually visible: the snapshot
    /// is republished and `ConnectionRemoved` emitted per edge, so no
    /// observer ever sees an edge with a missing endpoint. Returns the
    /// number of edges removed.
    pub fn remove_node(&mut self, id: NodeId) -> Result<usize, GraphError> {
        if !self.contains_node(id) {
            return Err(GraphError::NodeNotFound(id));
        }
        let removed = self.remove_all_edges_for_node(id);
        self.nodes[id.0 as usize] = None;
        if self.source_node == Some(id) {
            self.source_node = None;
        }
        tracing::debug!("graph_remove: {} ({} edges)", id, removed);
        Ok(removed)
    }

    /// Whether `id` refers to a live node.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.0 as usize)
            .is_some_and(|slot| slot.is_some())
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Label of a node.
    pub fn node_label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    /// Number of input ports on a node.
    pub fn input_count(&self, id: NodeId) -> Option<usize> {
        self.node(id).map(|n| n.inputs.len())
    }

    /// Number of output ports on a node.
    pub fn output_count(&self, id: NodeId) -> Option<usize> {
        self.node(id).map(|n| n.outputs.len())
    }

    /// Signal kind of a port, or `None` if the reference is dead.
    pub fn port_kind(&self, port: PortRef) -> Option<PortKind> {
        let node = self.node(port.node)?;
        let kinds = match port.dir {
            PortDir::Input => &node.inputs,
            PortDir::Output => &node.outputs,
        };
        kinds.get(port.port as usize).copied()
    }

    /// Live node ids in deterministic stacking order: general nodes in
    /// creation order, the designated source node last.
    pub fn nodes_stacked(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = (0..self.nodes.len() as u32)
            .map(NodeId)
            .filter(|id| self.contains_node(*id) && Some(*id) != self.source_node)
            .collect();
        if let Some(source) = self.source_node {
            ids.push(source);
        }
        ids
    }

    // --- Edge mutations ---

    /// Adds an edge after full validation.
    ///
    /// Validates endpoint liveness and direction, duplicate edges, port
    /// kind compatibility, the one-edge-per-input policy, and acyclicity
    /// — in that order. On success the edge list is updated, the
    /// snapshot republished, and `ConnectionAdded` emitted, strictly in
    /// that sequence.
    pub fn add_edge(&mut self, edge: Connection) -> Result<(), GraphError> {
        self.validate_edge(edge)?;
        self.edges.push(edge);
        self.bump_and_publish();
        tracing::debug!("graph_connect: {}", edge);
        self.bus.emit(&GraphEvent::ConnectionAdded(edge));
        Ok(())
    }

    /// Removes an edge by value.
    pub fn remove_edge(&mut self, edge: Connection) -> Result<(), GraphError> {
        let pos = self
            .edges
            .iter()
            .position(|e| *e == edge)
            .ok_or(GraphError::EdgeNotFound(edge))?;
        self.edges.remove(pos);
        self.bump_and_publish();
        tracing::debug!("graph_disconnect: {}", edge);
        self.bus.emit(&GraphEvent::ConnectionRemoved(edge));
        Ok(())
    }

    /// Removes every edge touching `node`, one fully-applied removal at
    /// a time. Returns the number removed.
    pub fn remove_all_edges_for_node(&mut self, node: NodeId) -> usize {
        let incident: Vec<Connection> = self.edges_for_node(node);
        for edge in &incident {
            // Present by construction; ignore the impossible miss.
            let _ = self.remove_edge(*edge);
        }
        incident.len()
    }

    /// Replaces the entire edge set atomically.
    ///
    /// The new list is validated in full first; on any rejection the
    /// previous edge set is left untouched. On success a single
    /// `GraphReset` is emitted (no per-edge events) — subscribers are
    /// expected to rebuild.
    pub fn load_edges(&mut self, edges: &[Connection]) -> Result<(), GraphError> {
        let prev = std::mem::take(&mut self.edges);
        for &edge in edges {
            if let Err(err) = self.validate_edge(edge) {
                self.edges = prev;
                return Err(err);
            }
            self.edges.push(edge);
        }
        self.bump_and_publish();
        tracing::debug!("graph_reset: {} edges", self.edges.len());
        self.bus.emit(&GraphEvent::GraphReset);
        Ok(())
    }

    // --- Queries ---

    /// Whether the exact edge is present.
    pub fn has_edge(&self, edge: &Connection) -> bool {
        self.edges.contains(edge)
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Every edge touching `node`, in insertion order.
    pub fn edges_for_node(&self, node: NodeId) -> Vec<Connection> {
        self.edges.iter().filter(|e| e.touches(node)).copied().collect()
    }

    /// Number of edges leaving an output port.
    pub fn output_fan_out(&self, port: PortRef) -> usize {
        self.edges.iter().filter(|e| e.source == port).count()
    }

    /// The edge occupying an input port, if any.
    pub fn input_occupied(&self, port: PortRef) -> Option<Connection> {
        self.edges.iter().find(|e| e.dest == port).copied()
    }

    /// Point-in-time ordered copy of the edge set for interaction-side
    /// consumers that cannot tolerate iteration under mutation.
    pub fn snapshot_edges(&self) -> Vec<Connection> {
        self.edges.clone()
    }

    /// Current mutation revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A cloneable, `Send + Sync` handle for the render context.
    pub fn render_reader(&self) -> RenderReader {
        RenderReader::new(Arc::clone(&self.published))
    }

    /// The notification bus, for subscribing and unsubscribing.
    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }

    // --- Internal helpers ---

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    /// Checks liveness and role of an endpoint; returns its port kind.
    fn validate_endpoint(
        &self,
        port: PortRef,
        expected: PortDir,
    ) -> Result<PortKind, GraphError> {
        if port.dir != expected {
            return Err(GraphError::InvalidEndpoint(port));
        }
        self.port_kind(port)
            .ok_or(GraphError::InvalidEndpoint(port))
    }

    /// Full admission check against the current edge list: endpoint
    /// liveness and direction, duplicates, kind compatibility, the
    /// one-edge-per-input policy, and acyclicity — in that order.
    fn validate_edge(&self, edge: Connection) -> Result<(), GraphError> {
        let source_kind = self.validate_endpoint(edge.source, PortDir::Output)?;
        let dest_kind = self.validate_endpoint(edge.dest, PortDir::Input)?;
        if self.has_edge(&edge) {
            return Err(GraphError::DuplicateEdge(edge));
        }
        if source_kind != dest_kind {
            return Err(PolicyViolation::KindMismatch {
                source: source_kind,
                dest: dest_kind,
            }
            .into());
        }
        if self.input_occupied(edge.dest).is_some() {
            return Err(PolicyViolation::InputOccupied(edge.dest).into());
        }
        // A cycle exists if the destination can already reach the source.
        if self.can_reach(edge.dest.node, edge.source.node) {
            return Err(PolicyViolation::WouldCycle.into());
        }
        Ok(())
    }

    /// DFS reachability over the current edge set.
    fn can_reach(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            let idx = current.0 as usize;
            if idx >= visited.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;

            for edge in &self.edges {
                if edge.source.node == current {
                    stack.push(edge.dest.node);
                }
            }
        }
        false
    }

    fn bump_and_publish(&mut self) {
        self.revision += 1;
        self.published.store(Arc::new(EdgeSnapshot::new(
            self.edges.clone(),
            self.revision,
        )));
    }
}
