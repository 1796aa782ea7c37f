//! Cable view synchronizer.
//!
//! [`CableView`] keeps one committed [`Cable`] per graph edge and the
//! per-port connected indicators truthful while the graph mutates under
//! it. It subscribes to the graph's notification bus (see
//! [`attach`](CableView::attach)) and reconciles on every event:
//!
//! - Indicator state updates on **every** event, suppression or not —
//!   indicators always reflect the graph.
//! - Cable objects are created/destroyed only when the gateway's
//!   suppression scope is *inactive*. During a user-driven commit the
//!   committed cable already exists on screen as the former dangling
//!   cable; the drag interaction adopts it instead of letting the
//!   handler build a duplicate.
//!
//! Handlers are pure functions of the event value and the view's own
//! state — they never call back into the graph or the gateway, which
//! makes the bus structurally loop-free. Whole-graph work (initial
//! population, `GraphReset`) goes through
//! [`refresh_all`](CableView::refresh_all), which walks nodes in the
//! graph's stable stacking order so cable z-order is deterministic.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cableado_core::{
    Connection, GraphEvent, NodeId, PatchGateway, PatchGraph, PortDir, PortKind, PortRef,
    SubscriberId, SuppressionFlag,
};
use egui::Pos2;

use crate::cable::Cable;
use crate::editor::NodeEditor;
use crate::locator::{self, PortHit};

/// Offered interaction for an existing cable (a click, not a drag).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CableAction {
    /// Remove the cable's edge (routed through the gateway).
    Disconnect(Connection),
}

/// Visual mirror of the graph's edge set.
pub struct CableView {
    /// Editors in registration order (also the locator search order).
    editors: Vec<(NodeId, Box<dyn NodeEditor>)>,
    /// Committed cables in stacking order.
    cables: Vec<Cable>,
    /// Edge value -> position in `cables`; the bijection witness.
    index: HashMap<Connection, usize>,
    /// Live edge count per port endpoint — indicator truth.
    port_refs: HashMap<PortRef, usize>,
    /// Origin port of an in-flight drag, if any (it reads as
    /// connected even with zero edges).
    drag_anchor: Option<PortRef>,
    suppression: SuppressionFlag,
    needs_rebuild: bool,
    repaint_needed: bool,
}

impl CableView {
    /// Creates an empty view observing the gateway's suppression flag.
    pub fn new(suppression: SuppressionFlag) -> Self {
        Self {
            editors: Vec::new(),
            cables: Vec::new(),
            index: HashMap::new(),
            port_refs: HashMap::new(),
            drag_anchor: None,
            suppression,
            needs_rebuild: false,
            repaint_needed: false,
        }
    }

    /// Subscribes the view to the gateway's notification bus and
    /// performs the initial full rebuild.
    pub fn attach(view: &Rc<RefCell<CableView>>, gateway: &mut PatchGateway) -> SubscriberId {
        let handler = Rc::clone(view);
        let id = gateway
            .bus_mut()
            .subscribe(Box::new(move |event| handler.borrow_mut().handle_event(event)));
        view.borrow_mut().refresh_all(gateway.graph());
        id
    }

    // --- Node lifecycle (driven directly by the board owner) ---

    /// Registers a node's editor and creates cables for any edges
    /// already incident to it (relevant when nodes arrive with
    /// pre-existing connections, e.g. after a bulk load).
    pub fn on_node_added(
        &mut self,
        node: NodeId,
        editor: Box<dyn NodeEditor>,
        graph: &PatchGraph,
    ) {
        self.editors.push((node, editor));
        for edge in graph.edges_for_node(node) {
            if !self.index.contains_key(&edge) {
                self.insert_cable(edge);
            }
        }
        self.repaint_needed = true;
    }

    /// Drops a node's editor and defensively sweeps any cable still
    /// touching it (the removal cascade normally removed them already,
    /// one notification per edge).
    pub fn on_node_removed(&mut self, node: NodeId) {
        self.editors.retain(|(id, _)| *id != node);

        let stale: Vec<Connection> = self
            .index
            .keys()
            .filter(|edge| edge.touches(node))
            .copied()
            .collect();
        for edge in stale {
            tracing::warn!("cable_sweep: stale cable {} survived node removal", edge);
            self.remove_cable(edge);
        }

        self.port_refs.retain(|port, _| port.node != node);
        if self.drag_anchor.is_some_and(|anchor| anchor.node == node) {
            self.drag_anchor = None;
        }
        self.repaint_needed = true;
    }

    // --- Notification handling ---

    fn handle_event(&mut self, event: &GraphEvent) {
        match event {
            GraphEvent::ConnectionAdded(edge) => {
                self.bump_ref(edge.source);
                self.bump_ref(edge.dest);
                self.refresh_indicator(edge.source);
                self.refresh_indicator(edge.dest);

                if !self.suppression.is_active() {
                    if !self.index.contains_key(edge) {
                        self.push_cable(*edge);
                    }
                    self.repaint_needed = true;
                }
            }
            GraphEvent::ConnectionRemoved(edge) => {
                self.drop_ref(edge.source);
                self.drop_ref(edge.dest);
                self.refresh_indicator(edge.source);
                self.refresh_indicator(edge.dest);

                if !self.suppression.is_active() {
                    self.remove_cable(*edge);
                    self.repaint_needed = true;
                }
            }
            GraphEvent::GraphReset => {
                self.cables.clear();
                self.index.clear();
                let stale: Vec<PortRef> = self.port_refs.keys().copied().collect();
                self.port_refs.clear();
                for port in stale {
                    self.refresh_indicator(port);
                }
                self.needs_rebuild = true;
                self.repaint_needed = true;
            }
        }
    }

    // --- Reconciliation ---

    /// Full rebuild: one cable per current edge, created by walking
    /// nodes in the graph's stable stacking order (general nodes
    /// first, the designated source node last).
    pub fn refresh_all(&mut self, graph: &PatchGraph) {
        self.cables.clear();
        self.index.clear();
        self.port_refs.clear();

        let edges = graph.snapshot_edges();
        for node in graph.nodes_stacked() {
            for edge in edges.iter().filter(|e| e.source.node == node) {
                self.insert_cable(*edge);
            }
        }

        // Re-derive every indicator from the fresh counts.
        self.refresh_all_indicators(graph);
        self.needs_rebuild = false;
        self.repaint_needed = true;
        tracing::debug!("cable_refresh: {} cables rebuilt", self.cables.len());
    }

    /// Rebuilds if a reset is pending or the bijection has drifted.
    /// Detected inconsistency heals itself here rather than erroring.
    pub fn reconcile(&mut self, graph: &PatchGraph) {
        if self.needs_rebuild || !self.is_consistent(graph) {
            self.refresh_all(graph);
        }
    }

    /// Whether committed cables are in one-to-one correspondence with
    /// the graph's edge set.
    pub fn is_consistent(&self, graph: &PatchGraph) -> bool {
        let edges = graph.snapshot_edges();
        self.cables.len() == edges.len()
            && edges.iter().all(|edge| self.index.contains_key(edge))
    }

    // --- Drag support ---

    /// Marks `port` as a live drag origin so its indicator stays lit
    /// while the cable dangles.
    pub fn on_drag_started(&mut self, port: PortRef) {
        self.drag_anchor = Some(port);
        self.refresh_indicator(port);
        self.repaint_needed = true;
    }

    /// Clears the drag origin and re-derives its indicator from the
    /// remaining edges.
    pub fn on_drag_ended(&mut self, port: PortRef) {
        if self.drag_anchor == Some(port) {
            self.drag_anchor = None;
        }
        self.refresh_indicator(port);
        self.repaint_needed = true;
    }

    /// Adopts a formerly dangling cable as the committed cable for its
    /// edge. Called by the drag interaction inside the suppression
    /// scope, where the notification handler deliberately did not
    /// create one.
    pub(crate) fn adopt_committed(&mut self, cable: Cable) {
        debug_assert!(!cable.is_dangling());
        if let Some(edge) = cable.connection {
            if self.index.contains_key(&edge) {
                return;
            }
            self.index.insert(edge, self.cables.len());
            self.cables.push(cable);
            self.repaint_needed = true;
        }
    }

    /// Detaches the committed cable for `edge` from the view, handing
    /// ownership to the caller (the unplug gesture re-dangles it).
    pub(crate) fn take_cable(&mut self, edge: Connection) -> Option<Cable> {
        let pos = self.index.remove(&edge)?;
        let cable = self.cables.remove(pos);
        self.reindex_from(pos);
        self.repaint_needed = true;
        Some(cable)
    }

    /// Nearest compatible input jack for a drop, searched in editor
    /// registration order.
    pub fn nearest_input_port(
        &self,
        graph: &PatchGraph,
        kind: PortKind,
        cursor: Pos2,
        exclude: Option<NodeId>,
        radius: f32,
    ) -> Option<PortHit> {
        locator::nearest_input_port(
            self.editors.iter().map(|(id, e)| (*id, e.as_ref())),
            graph,
            kind,
            cursor,
            exclude,
            radius,
        )
    }

    // --- Click interactions ---

    /// Interactions offered for a clicked cable. The actual mutation is
    /// applied through the gateway — never by editing the cable list.
    pub fn cable_actions(&self, edge: Connection) -> Vec<CableAction> {
        if self.index.contains_key(&edge) {
            vec![CableAction::Disconnect(edge)]
        } else {
            Vec::new()
        }
    }

    // --- Queries for the rendering backend and tests ---

    /// Endpoint pairs of the committed cables, in stacking order.
    pub fn geometry(&self) -> Vec<(Pos2, Pos2)> {
        self.cables.iter().map(Cable::endpoints).collect()
    }

    /// Number of committed cables.
    pub fn cable_count(&self) -> usize {
        self.cables.len()
    }

    /// Whether a committed cable exists for `edge`.
    pub fn has_cable(&self, edge: &Connection) -> bool {
        self.index.contains_key(edge)
    }

    /// Indicator truth for a port: at least one edge, or the port is
    /// the origin of an in-flight drag.
    pub fn is_port_connected(&self, port: PortRef) -> bool {
        self.port_refs.get(&port).copied().unwrap_or(0) > 0 || self.drag_anchor == Some(port)
    }

    /// Consumes the pending-redraw flag; the rendering backend calls
    /// this once per frame.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_needed)
    }

    /// Screen position of a port, if its node has an editor.
    pub fn port_position(&self, port: PortRef) -> Option<Pos2> {
        let editor = self.editor(port.node)?;
        Some(match port.dir {
            PortDir::Input => editor.input_port_position(port.port as usize),
            PortDir::Output => editor.output_port_position(port.port as usize),
        })
    }

    fn editor(&self, node: NodeId) -> Option<&dyn NodeEditor> {
        self.editors
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, e)| e.as_ref())
    }

    // --- Internal helpers ---

    /// Creates the cable for `edge` and counts it (full-rebuild and
    /// node-added paths, where events were never delivered).
    fn insert_cable(&mut self, edge: Connection) {
        self.bump_ref(edge.source);
        self.bump_ref(edge.dest);
        self.push_cable(edge);
        self.refresh_indicator(edge.source);
        self.refresh_indicator(edge.dest);
    }

    /// Appends the cable object only (event path: counts already done).
    fn push_cable(&mut self, edge: Connection) {
        let start = self.port_position(edge.source).unwrap_or(Pos2::ZERO);
        let end = self.port_position(edge.dest).unwrap_or(Pos2::ZERO);
        self.index.insert(edge, self.cables.len());
        self.cables.push(Cable::committed(edge, start, end));
    }

    fn remove_cable(&mut self, edge: Connection) {
        if let Some(pos) = self.index.remove(&edge) {
            self.cables.remove(pos);
            self.reindex_from(pos);
        }
    }

    /// Shifts index entries down after a removal at `from`.
    fn reindex_from(&mut self, from: usize) {
        for slot in self.index.values_mut() {
            if *slot > from {
                *slot -= 1;
            }
        }
    }

    fn bump_ref(&mut self, port: PortRef) {
        *self.port_refs.entry(port).or_insert(0) += 1;
    }

    fn drop_ref(&mut self, port: PortRef) {
        if let Some(count) = self.port_refs.get_mut(&port) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.port_refs.remove(&port);
            }
        }
    }

    /// Pushes a port's current truth to its editor.
    fn refresh_indicator(&mut self, port: PortRef) {
        let connected = self.is_port_connected(port);
        let is_input = port.dir == PortDir::Input;
        if let Some((_, editor)) = self.editors.iter_mut().find(|(id, _)| *id == port.node) {
            editor.set_connection_status(connected, port.port as usize, is_input);
        }
    }

    /// Re-derives indicators for every registered port from the graph.
    fn refresh_all_indicators(&mut self, graph: &PatchGraph) {
        let nodes: Vec<NodeId> = self.editors.iter().map(|(id, _)| *id).collect();
        for node in nodes {
            let inputs = graph.input_count(node).unwrap_or(0);
            for port in 0..inputs as u16 {
                self.refresh_indicator(PortRef::input(node, port));
            }
            let outputs = graph.output_count(node).unwrap_or(0);
            for port in 0..outputs as u16 {
                self.refresh_indicator(PortRef::output(node, port));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PedalEditor;
    use cableado_core::PatchGraph;
    use egui::pos2;

    fn board() -> (PatchGateway, Rc<RefCell<CableView>>, Connection) {
        let mut graph = PatchGraph::new();
        let a = graph.add_node("a", vec![], vec![PortKind::Audio]);
        let b = graph.add_node("b", vec![PortKind::Audio], vec![]);
        let mut gateway = PatchGateway::new(graph);

        let view = Rc::new(RefCell::new(CableView::new(gateway.suppression())));
        CableView::attach(&view, &mut gateway);
        view.borrow_mut().on_node_added(
            a,
            Box::new(PedalEditor::new(pos2(0.0, 0.0), 0, 1)),
            gateway.graph(),
        );
        view.borrow_mut().on_node_added(
            b,
            Box::new(PedalEditor::new(pos2(200.0, 0.0), 1, 0)),
            gateway.graph(),
        );
        (gateway, view, Connection::between(a, 0, b, 0))
    }

    #[test]
    fn unsuppressed_add_creates_cable_and_lights_ports() {
        let (mut gateway, view, edge) = board();
        gateway.add_connection(edge).unwrap();

        let v = view.borrow();
        assert!(v.has_cable(&edge));
        assert!(v.is_port_connected(edge.source));
        assert!(v.is_port_connected(edge.dest));
        assert!(v.is_consistent(gateway.graph()));
    }

    #[test]
    fn suppressed_add_updates_indicators_but_not_cables() {
        let (mut gateway, view, edge) = board();
        gateway
            .with_self_suppression(|gw| gw.add_connection(edge))
            .unwrap();

        let v = view.borrow();
        // Indicator truth always follows the graph.
        assert!(v.is_port_connected(edge.dest));
        // Cable creation was the drag's job, which this test skipped.
        assert!(!v.has_cable(&edge));
        assert!(!v.is_consistent(gateway.graph()));
        drop(v);

        // Self-healing resync closes the gap.
        view.borrow_mut().reconcile(gateway.graph());
        assert!(view.borrow().is_consistent(gateway.graph()));
    }

    #[test]
    fn remove_updates_both_ends_with_fan_out_awareness() {
        let mut graph = PatchGraph::new();
        let src = graph.add_node("src", vec![], vec![PortKind::Audio]);
        let x = graph.add_node("x", vec![PortKind::Audio], vec![]);
        let y = graph.add_node("y", vec![PortKind::Audio], vec![]);
        let mut gateway = PatchGateway::new(graph);

        let view = Rc::new(RefCell::new(CableView::new(gateway.suppression())));
        CableView::attach(&view, &mut gateway);
        for (node, origin, ins, outs) in [
            (src, pos2(0.0, 0.0), 0, 1),
            (x, pos2(200.0, 0.0), 1, 0),
            (y, pos2(200.0, 100.0), 1, 0),
        ] {
            view.borrow_mut().on_node_added(
                node,
                Box::new(PedalEditor::new(origin, ins, outs)),
                gateway.graph(),
            );
        }

        let to_x = Connection::between(src, 0, x, 0);
        let to_y = Connection::between(src, 0, y, 0);
        gateway.add_connection(to_x).unwrap();
        gateway.add_connection(to_y).unwrap();

        gateway.remove_connection(to_x).unwrap();
        let v = view.borrow();
        // The output still fans out to y, so it stays lit.
        assert!(v.is_port_connected(PortRef::output(src, 0)));
        assert!(!v.is_port_connected(PortRef::input(x, 0)));
        assert!(v.is_port_connected(PortRef::input(y, 0)));
        assert_eq!(v.cable_count(), 1);
    }

    #[test]
    fn refresh_all_orders_cables_by_stacking() {
        let mut graph = PatchGraph::new();
        let fx = graph.add_node("fx", vec![PortKind::Audio], vec![PortKind::Audio]);
        let out = graph.add_node("out", vec![PortKind::Audio], vec![]);
        let input = graph.add_source_node("input", vec![], vec![PortKind::Audio]);

        graph.add_edge(Connection::between(input, 0, fx, 0)).unwrap();
        graph.add_edge(Connection::between(fx, 0, out, 0)).unwrap();
        let mut gateway = PatchGateway::new(graph);

        let view = Rc::new(RefCell::new(CableView::new(gateway.suppression())));
        CableView::attach(&view, &mut gateway);

        // Cables from general nodes come first; the source node's cable
        // is stacked last.
        let v = view.borrow();
        assert_eq!(v.cable_count(), 2);
        assert!(v.is_consistent(gateway.graph()));
    }

    #[test]
    fn graph_reset_defers_to_reconcile() {
        let (mut gateway, view, edge) = board();
        gateway.add_connection(edge).unwrap();

        gateway.load_patch(&[edge]).unwrap();
        assert_eq!(view.borrow().cable_count(), 0);

        view.borrow_mut().reconcile(gateway.graph());
        let v = view.borrow();
        assert_eq!(v.cable_count(), 1);
        assert!(v.is_port_connected(edge.dest));
    }

    #[test]
    fn node_removal_sweeps_editor_and_anchor() {
        let (mut gateway, view, edge) = board();
        gateway.add_connection(edge).unwrap();

        view.borrow_mut().on_drag_started(edge.source);
        gateway.remove_node(edge.source.node).unwrap();
        view.borrow_mut().on_node_removed(edge.source.node);

        let v = view.borrow();
        assert_eq!(v.cable_count(), 0);
        assert!(!v.is_port_connected(edge.dest));
        assert!(v.is_consistent(gateway.graph()));
    }

    #[test]
    fn cable_actions_exist_only_for_real_cables() {
        let (mut gateway, view, edge) = board();
        assert!(view.borrow().cable_actions(edge).is_empty());

        gateway.add_connection(edge).unwrap();
        assert_eq!(
            view.borrow().cable_actions(edge),
            vec![CableAction::Disconnect(edge)]
        );
    }
}
