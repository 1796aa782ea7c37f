//! End-to-end tests for the cable overlay.
//!
//! Builds a small pedalboard and drives it the way a host would:
//! gestures through [`Patchboard`], programmatic rewiring through the
//! gateway, undo/redo, and bulk loads — checking after each step that
//! the cable layer, the indicators, and the graph agree.

use std::cell::RefCell;
use std::rc::Rc;

use cableado_board::{DragOutcome, Patchboard, PedalEditor};
use cableado_core::{Connection, GraphEvent, NodeId, PatchGraph, PortKind, PortRef};
use egui::{Pos2, pos2};

/// Board with a source pedal (1 audio out) and two sink pedals
/// (1 audio in each), laid out left to right.
fn pedalboard() -> (Patchboard, NodeId, NodeId, NodeId) {
    let mut board = Patchboard::new(PatchGraph::new());
    let src = board.add_node(
        "fuzz",
        vec![],
        vec![PortKind::Audio],
        Box::new(PedalEditor::new(pos2(0.0, 0.0), 0, 1)),
    );
    let sink_a = board.add_node(
        "delay",
        vec![PortKind::Audio],
        vec![],
        Box::new(PedalEditor::new(pos2(200.0, 0.0), 1, 0)),
    );
    let sink_b = board.add_node(
        "reverb",
        vec![PortKind::Audio],
        vec![],
        Box::new(PedalEditor::new(pos2(200.0, 200.0), 1, 0)),
    );
    (board, src, sink_a, sink_b)
}

fn jack(board: &Patchboard, port: PortRef) -> Pos2 {
    board.view().port_position(port).unwrap()
}

#[test]
fn connect_scenario_with_indicators_and_undo() {
    let (mut board, src, sink, _) = pedalboard();
    let edge = Connection::between(src, 0, sink, 0);

    board.connect(edge).unwrap();
    assert_eq!(board.gateway().graph().snapshot_edges(), vec![edge]);
    assert!(board.is_port_connected(PortRef::input(sink, 0)));
    assert!(board.is_port_connected(PortRef::output(src, 0)));

    board.undo().unwrap();
    assert!(board.gateway().graph().snapshot_edges().is_empty());
    assert!(!board.is_port_connected(PortRef::input(sink, 0)));
    assert!(!board.is_port_connected(PortRef::output(src, 0)));
    assert_eq!(board.geometry().len(), 0);
}

#[test]
fn drag_commit_yields_exactly_one_cable_and_one_mutation() {
    let (mut board, src, sink, _) = pedalboard();

    // Count every edge-added notification during the gesture.
    let adds = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&adds);
    board.gateway_mut().bus_mut().subscribe(Box::new(move |ev| {
        if matches!(ev, GraphEvent::ConnectionAdded(_)) {
            *counter.borrow_mut() += 1;
        }
    }));

    let origin = PortRef::output(src, 0);
    assert!(board.begin_drag(origin, jack(&board, origin)));
    board.drag_to(pos2(100.0, 10.0));
    assert_eq!(board.geometry().len(), 1, "dangling cable renders");

    let outcome = board.release_drag(jack(&board, PortRef::input(sink, 0)));
    let edge = Connection::between(src, 0, sink, 0);
    assert_eq!(outcome, DragOutcome::Committed(edge));

    // One user action, one mutation, one cable.
    assert_eq!(*adds.borrow(), 1);
    assert_eq!(board.geometry().len(), 1);
    assert!(board.view().has_cable(&edge));
    assert!(board.view().is_consistent(board.gateway().graph()));
    assert_eq!(board.gateway().undo_depth(), 1);
}

#[test]
fn drag_released_in_space_discards_everything() {
    let (mut board, src, _, _) = pedalboard();

    let origin = PortRef::output(src, 0);
    assert!(board.begin_drag(origin, jack(&board, origin)));
    // Mid-drag the origin jack reads as connected.
    assert!(board.is_port_connected(origin));

    let outcome = board.release_drag(pos2(900.0, 900.0));
    assert_eq!(outcome, DragOutcome::Discarded);
    assert!(board.gateway().graph().snapshot_edges().is_empty());
    assert_eq!(board.geometry().len(), 0);
    assert!(!board.is_port_connected(origin));
    assert_eq!(board.gateway().undo_depth(), 0);
}

#[test]
fn drag_onto_occupied_input_falls_back_to_discard() {
    let (mut board, src, sink, _) = pedalboard();
    board.connect(Connection::between(src, 0, sink, 0)).unwrap();

    // A second source pedal tries the same input jack.
    let rival = board.add_node(
        "octave",
        vec![],
        vec![PortKind::Audio],
        Box::new(PedalEditor::new(pos2(0.0, 200.0), 0, 1)),
    );
    let origin = PortRef::output(rival, 0);
    assert!(board.begin_drag(origin, jack(&board, origin)));
    let outcome = board.release_drag(jack(&board, PortRef::input(sink, 0)));

    assert_eq!(outcome, DragOutcome::Discarded);
    assert_eq!(board.gateway().graph().edge_count(), 1);
    assert_eq!(board.geometry().len(), 1);
    assert!(board.view().is_consistent(board.gateway().graph()));
}

#[test]
fn redropping_an_existing_edge_confirms_silently() {
    let (mut board, src, sink, _) = pedalboard();
    let edge = Connection::between(src, 0, sink, 0);
    board.connect(edge).unwrap();

    let origin = PortRef::output(src, 0);
    assert!(board.begin_drag(origin, jack(&board, origin)));
    let outcome = board.release_drag(jack(&board, PortRef::input(sink, 0)));

    assert_eq!(outcome, DragOutcome::Committed(edge));
    // No duplicate cable, no extra undo entry.
    assert_eq!(board.geometry().len(), 1);
    assert_eq!(board.gateway().undo_depth(), 1);
    assert!(board.view().is_consistent(board.gateway().graph()));
}

#[test]
fn unplugging_an_input_re_dangles_the_cable() {
    let (mut board, src, sink_a, sink_b) = pedalboard();
    let edge = Connection::between(src, 0, sink_a, 0);
    board.connect(edge).unwrap();

    // Grab the occupied input jack: the edge leaves the graph, the
    // cable dangles from the fuzz output again.
    let grab = PortRef::input(sink_a, 0);
    assert!(board.begin_drag(grab, jack(&board, grab)));
    assert!(board.gateway().graph().snapshot_edges().is_empty());
    assert!(board.is_dragging());
    assert_eq!(board.geometry().len(), 1, "dangling cable still renders");
    assert!(!board.is_port_connected(grab));
    assert!(
        board.is_port_connected(PortRef::output(src, 0)),
        "drag origin stays lit"
    );

    // Re-route onto the other sink.
    let outcome = board.release_drag(jack(&board, PortRef::input(sink_b, 0)));
    assert_eq!(
        outcome,
        DragOutcome::Committed(Connection::between(src, 0, sink_b, 0))
    );
    assert!(board.is_port_connected(PortRef::input(sink_b, 0)));
    assert!(board.view().is_consistent(board.gateway().graph()));
}

#[test]
fn cancel_drag_restores_idle_state() {
    let (mut board, src, _, _) = pedalboard();
    let origin = PortRef::output(src, 0);
    board.begin_drag(origin, jack(&board, origin));
    board.cancel_drag();

    assert!(!board.is_dragging());
    assert_eq!(board.geometry().len(), 0);
    assert!(!board.is_port_connected(origin));
}

#[test]
fn node_removal_cascade_clears_cables_and_indicators() {
    let (mut board, src, sink_a, sink_b) = pedalboard();
    board.connect(Connection::between(src, 0, sink_a, 0)).unwrap();
    board.connect(Connection::between(src, 0, sink_b, 0)).unwrap();
    assert_eq!(board.geometry().len(), 2);

    let removed = board.remove_node(src).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(board.geometry().len(), 0);
    assert!(!board.is_port_connected(PortRef::input(sink_a, 0)));
    assert!(!board.is_port_connected(PortRef::input(sink_b, 0)));
    assert!(board.view().is_consistent(board.gateway().graph()));
}

#[test]
fn load_patch_rebuilds_deterministically() {
    let (mut board, src, sink_a, sink_b) = pedalboard();
    let edges = vec![
        Connection::between(src, 0, sink_a, 0),
        Connection::between(src, 0, sink_b, 0),
    ];

    board.load_patch(&edges).unwrap();
    assert_eq!(board.geometry().len(), 2);
    assert!(board.view().is_consistent(board.gateway().graph()));
    assert!(board.is_port_connected(PortRef::input(sink_a, 0)));
    // History does not survive a load.
    assert_eq!(board.gateway().undo_depth(), 0);

    // Loading the same patch twice produces identical geometry.
    let first = board.geometry();
    board.load_patch(&edges).unwrap();
    assert_eq!(board.geometry(), first);
}

#[test]
fn clicked_cable_removal_routes_through_gateway() {
    let (mut board, src, sink, _) = pedalboard();
    let edge = Connection::between(src, 0, sink, 0);
    board.connect(edge).unwrap();

    let actions = board.cable_actions(edge);
    assert_eq!(actions.len(), 1);
    board.apply_cable_action(actions[0]).unwrap();

    assert!(board.gateway().graph().snapshot_edges().is_empty());
    assert_eq!(board.geometry().len(), 0);
    // Routed through the gateway, so it is undoable.
    board.undo().unwrap();
    assert!(board.view().has_cable(&edge));
}

#[test]
fn mid_drag_node_removal_voids_the_drop() {
    let (mut board, src, sink, _) = pedalboard();
    let origin = PortRef::output(src, 0);
    board.begin_drag(origin, jack(&board, origin));

    // The source pedal dies while the cable is in hand.
    board.remove_node(src).unwrap();
    assert!(!board.is_dragging());

    // A stray release is a no-op.
    let outcome = board.release_drag(jack(&board, PortRef::input(sink, 0)));
    assert_eq!(outcome, DragOutcome::NotDragging);
    assert!(board.gateway().graph().snapshot_edges().is_empty());
}
