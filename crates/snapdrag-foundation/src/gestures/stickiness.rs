use crate::scroll::{ScrollEdge, ScrollableEdges};

/// Edges a drag has broken through during the current gesture.
///
/// Once an edge is sticky the element keeps the axis even when the pointer
/// briefly reverses. Cleared only when the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStickiness {
    enabled: bool,
    edges: ScrollableEdges,
}

impl EdgeStickiness {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            edges: ScrollableEdges::empty(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Always false when stickiness is disabled.
    pub fn is_sticky(&self, edge: ScrollEdge) -> bool {
        self.enabled && self.edges.contains(edge.as_edges())
    }

    pub fn stick(&mut self, edge: ScrollEdge) {
        if self.enabled && !self.edges.contains(edge.as_edges()) {
            log::debug!("edge {edge:?} is now sticky");
            self.edges |= edge.as_edges();
        }
    }

    pub fn edges(&self) -> ScrollableEdges {
        if self.enabled {
            self.edges
        } else {
            ScrollableEdges::empty()
        }
    }

    pub fn reset(&mut self) {
        self.edges = ScrollableEdges::empty();
    }
}
