//! Per-node visual editor seam.
//!
//! The view synchronizer talks to node widgets through [`NodeEditor`]:
//! it pushes connected-indicator state down and reads port screen
//! positions back. [`PedalEditor`] is the stock implementation — a
//! pedal-sized rectangle with input jacks along the left edge and
//! output jacks along the right — used by the demo and the tests; a
//! real widget layer substitutes its own implementation.

use egui::{Pos2, Rect, pos2, vec2};

/// On-screen footprint of a stock pedal editor.
pub const PEDAL_WIDTH: f32 = 70.0;
/// Height of a stock pedal editor.
pub const PEDAL_HEIGHT: f32 = 50.0;

/// What the view synchronizer needs from a node's widget.
pub trait NodeEditor {
    /// Pushes a port's connected-indicator state.
    ///
    /// Called whenever the port's truth changes — including while a
    /// notification suppression scope is active, since indicator state
    /// must always reflect the graph.
    fn set_connection_status(&mut self, connected: bool, port_index: usize, is_input: bool);

    /// Screen position of an input jack.
    fn input_port_position(&self, port_index: usize) -> Pos2;

    /// Screen position of an output jack.
    fn output_port_position(&self, port_index: usize) -> Pos2;
}

/// Stock pedal-shaped editor: inputs on the left edge, outputs on the
/// right, jacks evenly spaced vertically.
#[derive(Clone, Debug)]
pub struct PedalEditor {
    rect: Rect,
    input_connected: Vec<bool>,
    output_connected: Vec<bool>,
}

impl PedalEditor {
    /// Creates a pedal at `origin` (top-left corner) with the given
    /// jack counts.
    pub fn new(origin: Pos2, inputs: usize, outputs: usize) -> Self {
        Self {
            rect: Rect::from_min_size(origin, vec2(PEDAL_WIDTH, PEDAL_HEIGHT)),
            input_connected: vec![false; inputs],
            output_connected: vec![false; outputs],
        }
    }

    /// The pedal's bounding rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Indicator state of an input jack.
    pub fn is_input_connected(&self, port_index: usize) -> bool {
        self.input_connected.get(port_index).copied().unwrap_or(false)
    }

    /// Indicator state of an output jack.
    pub fn is_output_connected(&self, port_index: usize) -> bool {
        self.output_connected.get(port_index).copied().unwrap_or(false)
    }

    /// Vertical center of jack `index` among `count` evenly spaced jacks.
    fn jack_y(&self, index: usize, count: usize) -> f32 {
        let step = self.rect.height() / (count.max(1) as f32 + 1.0);
        self.rect.top() + step * (index as f32 + 1.0)
    }
}

impl NodeEditor for PedalEditor {
    fn set_connection_status(&mut self, connected: bool, port_index: usize, is_input: bool) {
        let flags = if is_input {
            &mut self.input_connected
        } else {
            &mut self.output_connected
        };
        if let Some(slot) = flags.get_mut(port_index) {
            *slot = connected;
        }
    }

    fn input_port_position(&self, port_index: usize) -> Pos2 {
        pos2(
            self.rect.left(),
            self.jack_y(port_index, self.input_connected.len()),
        )
    }

    fn output_port_position(&self, port_index: usize) -> Pos2 {
        pos2(
            self.rect.right(),
            self.jack_y(port_index, self.output_connected.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jacks_sit_on_opposite_edges() {
        let pedal = PedalEditor::new(pos2(100.0, 40.0), 1, 1);
        assert_eq!(pedal.input_port_position(0).x, 100.0);
        assert_eq!(pedal.output_port_position(0).x, 100.0 + PEDAL_WIDTH);
    }

    #[test]
    fn jacks_spread_evenly() {
        let pedal = PedalEditor::new(pos2(0.0, 0.0), 2, 0);
        let top = pedal.input_port_position(0).y;
        let bottom = pedal.input_port_position(1).y;
        assert!(top < bottom);
        assert!(top > 0.0 && bottom < PEDAL_HEIGHT);
    }

    #[test]
    fn status_writes_are_bounds_checked() {
        let mut pedal = PedalEditor::new(pos2(0.0, 0.0), 1, 1);
        pedal.set_connection_status(true, 0, true);
        pedal.set_connection_status(true, 9, false);
        assert!(pedal.is_input_connected(0));
        assert!(!pedal.is_output_connected(9));
    }
}
