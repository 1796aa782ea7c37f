//! Drag-to-connect interaction.
//!
//! State machine: `Idle -> Dragging` on a port press (a dangling
//! [`Cable`] is created, its free end bound to the cursor), then on
//! release either **Committed** (a compatible input jack within the
//! snap radius accepted the drop and the gateway validated the edge)
//! or **Discarded** (anything else — the dangling cable evaporates and
//! the graph is untouched). A drag can be cancelled at any time with
//! no persistent state change.
//!
//! Pressing an *occupied* input jack unplugs instead: the existing
//! edge is removed through the gateway under suppression and its cable
//! re-dangles from the far (output) end, ready to re-route.
//!
//! Commits run inside the gateway's suppression scope. The view's
//! notification handler still fires (indicator truth), but skips cable
//! creation; this interaction then *adopts* its dangling cable as the
//! committed one. That is the whole reentrancy story: one user action,
//! one mutation, no echo.

use std::cell::RefCell;
use std::rc::Rc;

use cableado_core::{CommitStatus, Connection, PatchGateway, PortDir, PortRef};
use egui::Pos2;

use crate::cable::{Cable, SNAP_RADIUS};
use crate::view::CableView;

/// How a drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The edge is in the graph (a fresh commit, or a confirm of an
    /// edge that already existed).
    Committed(Connection),
    /// No graph mutation happened; the dangling cable is gone.
    Discarded,
    /// There was no drag in flight.
    NotDragging,
}

enum DragState {
    Idle,
    Dragging { origin: PortRef, cable: Cable },
}

/// Owner of the in-flight dangling cable.
pub struct DragInteraction {
    state: DragState,
    snap_radius: f32,
}

impl Default for DragInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl DragInteraction {
    /// Creates an idle interaction with the default snap radius.
    pub fn new() -> Self {
        Self::with_snap_radius(SNAP_RADIUS)
    }

    /// Creates an idle interaction with a custom snap radius.
    pub fn with_snap_radius(snap_radius: f32) -> Self {
        Self {
            state: DragState::Idle,
            snap_radius,
        }
    }

    /// Whether a drag is in flight.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The dangling cable, while dragging.
    pub fn dangling(&self) -> Option<&Cable> {
        match &self.state {
            DragState::Dragging { cable, .. } => Some(cable),
            DragState::Idle => None,
        }
    }

    /// The port the drag grew out of, while dragging.
    pub fn origin(&self) -> Option<PortRef> {
        match &self.state {
            DragState::Dragging { origin, .. } => Some(*origin),
            DragState::Idle => None,
        }
    }

    /// Starts a drag from `port` with the cursor at `cursor`.
    ///
    /// - Output port: a new dangling cable grows out of the jack.
    /// - Occupied input port: the existing edge is unplugged (through
    ///   the gateway, under suppression) and its cable re-dangles from
    ///   its source output jack.
    /// - Anything else: no drag starts.
    pub fn begin(
        &mut self,
        port: PortRef,
        cursor: Pos2,
        view: &Rc<RefCell<CableView>>,
        gateway: &mut PatchGateway,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }

        match port.dir {
            PortDir::Output => {
                if gateway.graph().port_kind(port).is_none() {
                    return false;
                }
                let start = view.borrow().port_position(port).unwrap_or(cursor);
                view.borrow_mut().on_drag_started(port);
                self.state = DragState::Dragging {
                    origin: port,
                    cable: Cable::dangling(start, cursor),
                };
                true
            }
            PortDir::Input => {
                let Some(existing) = gateway.graph().input_occupied(port) else {
                    return false;
                };
                // Unplug through the gateway; the handler keeps the
                // indicators truthful but leaves the cable to us.
                let removed =
                    gateway.with_self_suppression(|gw| gw.remove_connection(existing));
                if removed.is_err() {
                    return false;
                }

                let mut v = view.borrow_mut();
                let mut cable = v
                    .take_cable(existing)
                    .unwrap_or_else(|| Cable::dangling(cursor, cursor));
                cable.connection = None;
                cable.end = cursor;
                let origin = existing.source;
                cable.start = v.port_position(origin).unwrap_or(cable.start);
                v.on_drag_started(origin);
                drop(v);

                self.state = DragState::Dragging { origin, cable };
                true
            }
        }
    }

    /// Moves the free end of the dangling cable.
    pub fn drag_to(&mut self, cursor: Pos2) {
        if let DragState::Dragging { cable, .. } = &mut self.state {
            cable.end = cursor;
        }
    }

    /// Releases the drag at `cursor`.
    ///
    /// Endpoints are re-validated here, at commit time — the origin
    /// port may have died mid-drag, and the drop target is whatever
    /// jack is nearest *now*.
    pub fn release(
        &mut self,
        cursor: Pos2,
        view: &Rc<RefCell<CableView>>,
        gateway: &mut PatchGateway,
    ) -> DragOutcome {
        let DragState::Dragging { origin, mut cable } =
            std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return DragOutcome::NotDragging;
        };

        // The origin must still exist; otherwise the drop is void.
        let Some(kind) = gateway.graph().port_kind(origin) else {
            view.borrow_mut().on_drag_ended(origin);
            return DragOutcome::Discarded;
        };

        let hit = view.borrow().nearest_input_port(
            gateway.graph(),
            kind,
            cursor,
            Some(origin.node),
            self.snap_radius,
        );
        let Some(hit) = hit else {
            tracing::trace!("drag_discard: released clear of any jack");
            view.borrow_mut().on_drag_ended(origin);
            return DragOutcome::Discarded;
        };

        let edge = Connection::new(origin, hit.port_ref());
        let commit = gateway.with_self_suppression(|gw| gw.add_connection(edge));
        let mut v = view.borrow_mut();
        match commit {
            Ok(CommitStatus::Connected) => {
                cable.connection = Some(edge);
                cable.end = hit.pos;
                v.adopt_committed(cable);
                v.on_drag_ended(origin);
                DragOutcome::Committed(edge)
            }
            Ok(CommitStatus::AlreadyConnected) => {
                // Confirming an existing edge: its cable is already on
                // screen; the dangling duplicate just evaporates.
                v.on_drag_ended(origin);
                DragOutcome::Committed(edge)
            }
            Err(err) => {
                tracing::debug!("drag_reject: {err}");
                v.on_drag_ended(origin);
                DragOutcome::Discarded
            }
        }
    }

    /// Aborts the drag; the dangling cable is discarded with no graph
    /// mutation.
    pub fn cancel(&mut self, view: &Rc<RefCell<CableView>>) {
        if let DragState::Dragging { origin, .. } =
            std::mem::replace(&mut self.state, DragState::Idle)
        {
            view.borrow_mut().on_drag_ended(origin);
        }
    }
}
