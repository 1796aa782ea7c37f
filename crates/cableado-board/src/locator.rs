//! Nearest-port search for drop targets.
//!
//! When a drag is released, the free cable end snaps to the nearest
//! *compatible* input jack within a bounded pixel radius: same signal
//! kind as the drag's source port, not on the excluded (source) node.
//! Ties are broken by smallest Euclidean distance, then by editor
//! registration order — the search walks editors in the order they
//! were registered and only a strictly closer jack displaces the
//! current best.

use cableado_core::{NodeId, PatchGraph, PortKind, PortRef};
use egui::Pos2;

use crate::editor::NodeEditor;

/// A snap candidate returned by [`nearest_input_port`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortHit {
    /// The node owning the jack.
    pub node: NodeId,
    /// Input port index on that node.
    pub port: u16,
    /// Jack screen position (where the cable end snaps to).
    pub pos: Pos2,
    /// Distance from the cursor at release time.
    pub distance: f32,
}

impl PortHit {
    /// The port reference for graph validation.
    pub fn port_ref(&self) -> PortRef {
        PortRef::input(self.node, self.port)
    }
}

/// Finds the nearest compatible input jack within `radius` of `cursor`.
///
/// Port existence and kind come from the graph (the registry is the
/// truth, editors only provide geometry); `exclude` removes the drag's
/// own source node from consideration. Occupancy is *not* checked here
/// — commit-time validation owns that policy.
pub fn nearest_input_port<'a>(
    editors: impl Iterator<Item = (NodeId, &'a dyn NodeEditor)>,
    graph: &PatchGraph,
    kind: PortKind,
    cursor: Pos2,
    exclude: Option<NodeId>,
    radius: f32,
) -> Option<PortHit> {
    let mut best: Option<PortHit> = None;

    for (node, editor) in editors {
        if exclude == Some(node) {
            continue;
        }
        let Some(input_count) = graph.input_count(node) else {
            continue;
        };
        for port in 0..input_count as u16 {
            if graph.port_kind(PortRef::input(node, port)) != Some(kind) {
                continue;
            }
            let pos = editor.input_port_position(port as usize);
            let distance = cursor.distance(pos);
            if distance > radius {
                continue;
            }
            // Strict comparison keeps the earlier registration on ties.
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(PortHit {
                    node,
                    port,
                    pos,
                    distance,
                });
            }
        }
    }
    best
}
