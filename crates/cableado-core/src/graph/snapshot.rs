//! Immutable edge-set snapshots for the render context.
//!
//! The graph is a two-object split: [`PatchGraph`](super::PatchGraph)
//! is owned and mutated by the interaction thread; the render thread
//! only ever sees an [`EdgeSnapshot`] — an immutable, revision-stamped
//! copy of the edge list, republished whole after every mutation
//! through an [`ArcSwap`]. The render path never takes a lock and can
//! never observe a half-applied mutation.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::edge::Connection;

/// Point-in-time copy of the graph's edge set.
///
/// Edges appear in insertion order. The revision increases by one per
/// mutation, so a render scheduler can cheaply detect topology changes
/// between blocks.
#[derive(Debug, Default)]
pub struct EdgeSnapshot {
    edges: Vec<Connection>,
    revision: u64,
}

impl EdgeSnapshot {
    pub(crate) fn new(edges: Vec<Connection>, revision: u64) -> Self {
        Self { edges, revision }
    }

    /// The edges, in insertion order.
    #[inline]
    pub fn edges(&self) -> &[Connection] {
        &self.edges
    }

    /// Monotonic mutation counter at the time of capture.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the snapshot contains `edge`.
    pub fn contains(&self, edge: &Connection) -> bool {
        self.edges.contains(edge)
    }
}

/// Read-only, thread-safe handle onto the published edge set.
///
/// Clone one per consumer; [`snapshot()`](Self::snapshot) is a
/// wait-free atomic load suitable for a real-time render callback (the
/// only cost is an `Arc` refcount bump — no lock, no allocation).
#[derive(Clone)]
pub struct RenderReader {
    shared: Arc<ArcSwap<EdgeSnapshot>>,
}

impl RenderReader {
    pub(crate) fn new(shared: Arc<ArcSwap<EdgeSnapshot>>) -> Self {
        Self { shared }
    }

    /// Loads the most recently published snapshot.
    pub fn snapshot(&self) -> Arc<EdgeSnapshot> {
        self.shared.load_full()
    }

    /// Revision of the current snapshot without retaining it.
    pub fn revision(&self) -> u64 {
        self.shared.load().revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    #[test]
    fn reader_sees_whole_replacements_only() {
        let shared = Arc::new(ArcSwap::from_pointee(EdgeSnapshot::default()));
        let reader = RenderReader::new(Arc::clone(&shared));

        let held = reader.snapshot();
        assert_eq!(held.revision(), 0);

        let edge = Connection::between(NodeId(0), 0, NodeId(1), 0);
        shared.store(Arc::new(EdgeSnapshot::new(vec![edge], 1)));

        // The retained snapshot is unchanged; a fresh load sees the new set.
        assert!(held.edges().is_empty());
        let fresh = reader.snapshot();
        assert_eq!(fresh.edges(), &[edge]);
        assert_eq!(reader.revision(), 1);
    }
}
