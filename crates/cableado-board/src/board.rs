//! Board facade wiring the gateway, the cable view, and the drag
//! interaction together.
//!
//! [`Patchboard`] is the owner a host embeds: it keeps node editors in
//! step with the node registry, forwards gestures to the drag state
//! machine, and hands the rendering backend one ordered list of cable
//! endpoint pairs (committed cables in stacking order, the dangling
//! cable last).

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use cableado_core::{
    Connection, GraphError, NodeId, PatchGateway, PatchGraph, PortKind, PortRef, RenderReader,
};
use egui::Pos2;

use crate::drag::{DragInteraction, DragOutcome};
use crate::editor::NodeEditor;
use crate::view::{CableAction, CableView};

/// Owner of one patch editing surface.
pub struct Patchboard {
    gateway: PatchGateway,
    view: Rc<RefCell<CableView>>,
    drag: DragInteraction,
}

impl Patchboard {
    /// Wraps a graph and attaches a fresh cable view to it.
    pub fn new(graph: PatchGraph) -> Self {
        let mut gateway = PatchGateway::new(graph);
        let view = Rc::new(RefCell::new(CableView::new(gateway.suppression())));
        CableView::attach(&view, &mut gateway);
        Self {
            gateway,
            view,
            drag: DragInteraction::new(),
        }
    }

    // --- Node lifecycle ---

    /// Adds a node and registers its editor.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        inputs: Vec<PortKind>,
        outputs: Vec<PortKind>,
        editor: Box<dyn NodeEditor>,
    ) -> NodeId {
        let id = self.gateway.add_node(label, inputs, outputs);
        self.view
            .borrow_mut()
            .on_node_added(id, editor, self.gateway.graph());
        id
    }

    /// Adds the designated input/source node and registers its editor.
    pub fn add_source_node(
        &mut self,
        label: impl Into<String>,
        inputs: Vec<PortKind>,
        outputs: Vec<PortKind>,
        editor: Box<dyn NodeEditor>,
    ) -> NodeId {
        let id = self.gateway.add_source_node(label, inputs, outputs);
        self.view
            .borrow_mut()
            .on_node_added(id, editor, self.gateway.graph());
        id
    }

    /// Removes a node, its edges, its cables, and its editor.
    ///
    /// An in-flight drag anchored on the node is cancelled first.
    pub fn remove_node(&mut self, node: NodeId) -> Result<usize, GraphError> {
        if self.drag.origin().is_some_and(|origin| origin.node == node) {
            self.drag.cancel(&self.view);
        }
        let removed = self.gateway.remove_node(node)?;
        self.view.borrow_mut().on_node_removed(node);
        Ok(removed)
    }

    // --- Gestures ---

    /// Mouse-down on a jack. See [`DragInteraction::begin`].
    pub fn begin_drag(&mut self, port: PortRef, cursor: Pos2) -> bool {
        self.drag.begin(port, cursor, &self.view, &mut self.gateway)
    }

    /// Mouse-move while dragging.
    pub fn drag_to(&mut self, cursor: Pos2) {
        self.drag.drag_to(cursor);
    }

    /// Mouse-up: commit or discard.
    pub fn release_drag(&mut self, cursor: Pos2) -> DragOutcome {
        self.drag.release(cursor, &self.view, &mut self.gateway)
    }

    /// Explicit abort of the current drag.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel(&self.view);
    }

    /// Interactions offered for a clicked cable.
    pub fn cable_actions(&self, edge: Connection) -> Vec<CableAction> {
        self.view.borrow().cable_actions(edge)
    }

    /// Applies a cable action through the gateway — the resulting
    /// notification performs the visual removal.
    pub fn apply_cable_action(&mut self, action: CableAction) -> Result<(), GraphError> {
        match action {
            CableAction::Disconnect(edge) => self.gateway.remove_connection(edge),
        }
    }

    // --- Edits & history ---

    /// Programmatic connect (preset tooling, tests).
    pub fn connect(&mut self, edge: Connection) -> Result<(), GraphError> {
        self.gateway.add_connection(edge).map(|_| ())
    }

    /// Programmatic disconnect.
    pub fn disconnect(&mut self, edge: Connection) -> Result<(), GraphError> {
        self.gateway.remove_connection(edge)
    }

    /// Undoes the latest edit and reconciles the view.
    pub fn undo(&mut self) -> Result<bool, GraphError> {
        let undone = self.gateway.undo()?;
        self.reconcile();
        Ok(undone)
    }

    /// Redoes the latest undone edit and reconciles the view.
    pub fn redo(&mut self) -> Result<bool, GraphError> {
        let redone = self.gateway.redo()?;
        self.reconcile();
        Ok(redone)
    }

    /// Replaces the whole edge set and rebuilds the cable layer.
    pub fn load_patch(&mut self, edges: &[Connection]) -> Result<(), GraphError> {
        self.gateway.load_patch(edges)?;
        self.reconcile();
        Ok(())
    }

    /// Self-healing resync: rebuilds the cable layer if it has drifted
    /// from the graph.
    pub fn reconcile(&mut self) {
        self.view.borrow_mut().reconcile(self.gateway.graph());
    }

    // --- Rendering backend surface ---

    /// Endpoint pairs for every cable: committed cables in stacking
    /// order, the dangling cable (if any) last.
    pub fn geometry(&self) -> Vec<(Pos2, Pos2)> {
        let mut pairs = self.view.borrow().geometry();
        if let Some(cable) = self.drag.dangling() {
            pairs.push(cable.endpoints());
        }
        pairs
    }

    /// Indicator truth for a port.
    pub fn is_port_connected(&self, port: PortRef) -> bool {
        self.view.borrow().is_port_connected(port)
    }

    // --- Accessors ---

    /// The mutation gateway (undo depth, suppression, graph access).
    pub fn gateway(&self) -> &PatchGateway {
        &self.gateway
    }

    /// Mutable gateway access for host-level operations.
    pub fn gateway_mut(&mut self) -> &mut PatchGateway {
        &mut self.gateway
    }

    /// Shared view access.
    pub fn view(&self) -> Ref<'_, CableView> {
        self.view.borrow()
    }

    /// A render-thread handle onto the graph's published snapshots.
    pub fn render_reader(&self) -> RenderReader {
        self.gateway.graph().render_reader()
    }

    /// Whether the drag interaction currently owns a dangling cable.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}
