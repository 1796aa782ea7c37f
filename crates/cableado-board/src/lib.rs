//! Cableado Board - cable overlay for the patch graph
//!
//! This crate keeps a visual cable layer in lockstep with a
//! [`cableado_core`] patch graph while both a user and programmatic
//! rewiring (presets, undo, node deletion cascades) mutate it.
//!
//! # Core Abstractions
//!
//! - [`CableView`] - the synchronizer: one committed [`Cable`] per
//!   graph edge, per-port connected indicators, self-healing full
//!   rebuilds
//! - [`DragInteraction`] - the drag-to-connect state machine,
//!   including unplug-and-re-route from occupied input jacks
//! - [`NodeEditor`] / [`PedalEditor`] - the seam to per-node widgets:
//!   indicator pushes down, jack geometry back up
//! - [`Patchboard`] - the facade a host embeds; owns the gateway, the
//!   view, and the drag state, and feeds the rendering backend an
//!   ordered list of cable endpoint pairs
//!
//! # Consistency Contract
//!
//! After any completed operation — gesture, undo, preset load — the
//! set of non-dangling cables corresponds one-to-one with the graph's
//! edge set. Notification handlers keep indicator truth unconditionally
//! but create and destroy cable objects only outside the gateway's
//! suppression scope; a drag commit adopts its own dangling cable
//! instead. Any detected drift heals through
//! [`CableView::reconcile`], never through an error.
//!
//! # Example
//!
//! ```rust
//! use cableado_board::{Patchboard, PedalEditor};
//! use cableado_core::{PatchGraph, PortKind, PortRef};
//! use egui::pos2;
//!
//! let mut board = Patchboard::new(PatchGraph::new());
//! let fuzz = board.add_node(
//!     "fuzz",
//!     vec![],
//!     vec![PortKind::Audio],
//!     Box::new(PedalEditor::new(pos2(0.0, 0.0), 0, 1)),
//! );
//! let delay = board.add_node(
//!     "delay",
//!     vec![PortKind::Audio],
//!     vec![],
//!     Box::new(PedalEditor::new(pos2(200.0, 0.0), 1, 0)),
//! );
//!
//! // Drag from fuzz's output jack onto delay's input jack.
//! let jack = board.view().port_position(PortRef::output(fuzz, 0)).unwrap();
//! board.begin_drag(PortRef::output(fuzz, 0), jack);
//! let target = board.view().port_position(PortRef::input(delay, 0)).unwrap();
//! let outcome = board.release_drag(target);
//!
//! assert!(matches!(outcome, cableado_board::DragOutcome::Committed(_)));
//! assert_eq!(board.geometry().len(), 1);
//! ```

pub mod board;
pub mod cable;
pub mod drag;
pub mod editor;
pub mod locator;
pub mod view;

pub use board::Patchboard;
pub use cable::{CONTROL_OFFSET, Cable, SNAP_RADIUS, cable_path};
pub use drag::{DragInteraction, DragOutcome};
pub use editor::{NodeEditor, PEDAL_HEIGHT, PEDAL_WIDTH, PedalEditor};
pub use locator::{PortHit, nearest_input_port};
pub use view::{CableAction, CableView};
