//! Visual cables.
//!
//! A [`Cable`] is the on-screen counterpart of one graph edge — or, mid
//! drag, of no edge at all (a *dangling* cable whose free end follows
//! the cursor). The cable owns only endpoint geometry; stroke rendering
//! belongs to the backend, which consumes endpoint pairs and may use
//! [`cable_path`] for a relaxed bezier shape.

use cableado_core::Connection;
use egui::{Pos2, vec2};

/// Horizontal pull of the bezier control points away from the ports,
/// so cables leave ports perpendicular to the node edge.
pub const CONTROL_OFFSET: f32 = 25.0;

/// Default pixel radius within which a release snaps to a port.
pub const SNAP_RADIUS: f32 = 24.0;

/// One visual cable.
#[derive(Clone, Debug, PartialEq)]
pub struct Cable {
    /// The graph edge this cable mirrors; `None` while dangling.
    pub connection: Option<Connection>,
    /// Screen position of the source end.
    pub start: Pos2,
    /// Screen position of the destination end (the cursor, while
    /// dangling).
    pub end: Pos2,
}

impl Cable {
    /// A committed cable mirroring `connection`.
    pub fn committed(connection: Connection, start: Pos2, end: Pos2) -> Self {
        Self {
            connection: Some(connection),
            start,
            end,
        }
    }

    /// A dangling cable anchored at `start`, free end at `cursor`.
    pub fn dangling(start: Pos2, cursor: Pos2) -> Self {
        Self {
            connection: None,
            start,
            end: cursor,
        }
    }

    /// Whether the cable has no graph counterpart yet.
    #[inline]
    pub fn is_dangling(&self) -> bool {
        self.connection.is_none()
    }

    /// The endpoint pair consumed by the rendering backend.
    #[inline]
    pub fn endpoints(&self) -> (Pos2, Pos2) {
        (self.start, self.end)
    }
}

/// Cubic bezier in polynomial-coefficient form, evaluated with Horner's
/// scheme.
struct CubicBezier {
    ax: f32,
    bx: f32,
    cx: f32,
    x0: f32,
    ay: f32,
    by: f32,
    cy: f32,
    y0: f32,
}

impl CubicBezier {
    fn new(p1: Pos2, p2: Pos2, p3: Pos2, p4: Pos2) -> Self {
        let cx = 3.0 * (p2.x - p1.x);
        let bx = 3.0 * (p3.x - p2.x) - cx;
        let ax = p4.x - p1.x - cx - bx;

        let cy = 3.0 * (p2.y - p1.y);
        let by = 3.0 * (p3.y - p2.y) - cy;
        let ay = p4.y - p1.y - cy - by;

        Self {
            ax,
            bx,
            cx,
            x0: p1.x,
            ay,
            by,
            cy,
            y0: p1.y,
        }
    }

    fn point_at(&self, t: f32) -> Pos2 {
        let x = ((self.ax * t + self.bx) * t + self.cx) * t + self.x0;
        let y = ((self.ay * t + self.by) * t + self.cy) * t + self.y0;
        Pos2::new(x, y)
    }
}

/// Polyline approximation of a cable's relaxed curve.
///
/// Control points are pulled horizontally out of the ports by
/// [`CONTROL_OFFSET`] scaled with the view; the sample count follows the
/// endpoint distance so short cables stay cheap.
pub fn cable_path(start: Pos2, end: Pos2, scale: f32) -> Vec<Pos2> {
    let pull = CONTROL_OFFSET + scale;
    let bezier = CubicBezier::new(
        start,
        start + vec2(pull, 0.0),
        end - vec2(pull, 0.0),
        end,
    );

    let samples = (start.distance(end) as usize).max(1);
    (0..=samples)
        .map(|i| bezier.point_at(i as f32 / samples as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cableado_core::{PatchGraph, PortKind};
    use egui::pos2;

    #[test]
    fn path_hits_both_endpoints() {
        let start = pos2(10.0, 20.0);
        let end = pos2(110.0, 80.0);
        let path = cable_path(start, end, 1.0);

        let first = path.first().unwrap();
        let last = path.last().unwrap();
        assert!(first.distance(start) < 1e-3);
        assert!(last.distance(end) < 1e-3);
    }

    #[test]
    fn short_cables_still_sample() {
        let p = pos2(5.0, 5.0);
        let path = cable_path(p, p, 1.0);
        assert!(path.len() >= 2);
    }

    #[test]
    fn dangling_state_tracks_connection() {
        let mut cable = Cable::dangling(pos2(0.0, 0.0), pos2(4.0, 4.0));
        assert!(cable.is_dangling());

        let mut graph = PatchGraph::new();
        let a = graph.add_node("a", vec![], vec![PortKind::Audio]);
        let b = graph.add_node("b", vec![PortKind::Audio], vec![]);
        cable.connection = Some(Connection::between(a, 0, b, 0));
        assert!(!cable.is_dangling());
    }
}
