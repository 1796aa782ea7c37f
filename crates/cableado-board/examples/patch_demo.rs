//! Patchboard walkthrough: wire a small pedalboard by "hand", watch the
//! render thread follow along, then undo the lot.
//!
//! Run with: `cargo run -p cableado-board --example patch_demo`
//! (set `RUST_LOG=debug` to see the graph mutation trace)
#![allow(missing_docs)]

use std::thread;
use std::time::Duration;

use cableado_board::{DragOutcome, Patchboard, PedalEditor};
use cableado_core::{PatchGraph, PortKind, PortRef};
use egui::pos2;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut board = Patchboard::new(PatchGraph::new());

    let input = board.add_source_node(
        "input",
        vec![],
        vec![PortKind::Audio],
        Box::new(PedalEditor::new(pos2(0.0, 100.0), 0, 1)),
    );
    let fuzz = board.add_node(
        "fuzz",
        vec![PortKind::Audio],
        vec![PortKind::Audio],
        Box::new(PedalEditor::new(pos2(150.0, 100.0), 1, 1)),
    );
    let delay = board.add_node(
        "delay",
        vec![PortKind::Audio],
        vec![PortKind::Audio],
        Box::new(PedalEditor::new(pos2(300.0, 100.0), 1, 1)),
    );

    // A render "thread" polling the published topology.
    let reader = board.render_reader();
    let render = thread::spawn(move || {
        let mut last = u64::MAX;
        for _ in 0..50 {
            let snap = reader.snapshot();
            if snap.revision() != last {
                last = snap.revision();
                println!("[render] rev {} -> {} edges", snap.revision(), snap.edges().len());
            }
            thread::sleep(Duration::from_millis(2));
        }
    });

    // Drag input -> fuzz.
    let origin = PortRef::output(input, 0);
    let grab = board.view().port_position(origin).unwrap();
    board.begin_drag(origin, grab);
    let drop = board.view().port_position(PortRef::input(fuzz, 0)).unwrap();
    match board.release_drag(drop) {
        DragOutcome::Committed(edge) => println!("[board] committed {edge}"),
        other => println!("[board] {other:?}"),
    }

    // Drag fuzz -> delay.
    let origin = PortRef::output(fuzz, 0);
    let grab = board.view().port_position(origin).unwrap();
    board.begin_drag(origin, grab);
    let drop = board.view().port_position(PortRef::input(delay, 0)).unwrap();
    board.release_drag(drop);

    println!("[board] cables: {:?}", board.geometry());

    // A sloppy drag that misses everything costs nothing.
    let origin = PortRef::output(delay, 0);
    let grab = board.view().port_position(origin).unwrap();
    board.begin_drag(origin, grab);
    assert_eq!(board.release_drag(pos2(900.0, 900.0)), DragOutcome::Discarded);

    // Unwind the whole session.
    while board.undo().unwrap_or(false) {}
    println!(
        "[board] after undo: {} edges, {} cables",
        board.gateway().graph().edge_count(),
        board.geometry().len()
    );

    render.join().unwrap();
}
