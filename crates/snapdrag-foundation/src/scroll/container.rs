//! Interface to the nested scrollable container a drag may hand off to.
//!
//! The engine never owns a container. Hosts expose theirs through
//! [`ScrollContainer`] and find the one under a touch through
//! [`ScrollContainerLocator`]; both are held weakly for the length of a
//! gesture.

use std::rc::{Rc, Weak};

use bitflags::bitflags;
use snapdrag_ui_graphics::{EdgeInsets, Point, Size};

bitflags! {
    /// Edges of a container's content not yet scrolled to.
    ///
    /// Also used per gesture for the edges a drag has claimed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScrollableEdges: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl ScrollEdge {
    pub fn as_edges(self) -> ScrollableEdges {
        match self {
            ScrollEdge::Top => ScrollableEdges::TOP,
            ScrollEdge::Bottom => ScrollableEdges::BOTTOM,
            ScrollEdge::Left => ScrollableEdges::LEFT,
            ScrollEdge::Right => ScrollableEdges::RIGHT,
        }
    }

    pub fn opposite(self) -> ScrollEdge {
        match self {
            ScrollEdge::Top => ScrollEdge::Bottom,
            ScrollEdge::Bottom => ScrollEdge::Top,
            ScrollEdge::Left => ScrollEdge::Right,
            ScrollEdge::Right => ScrollEdge::Left,
        }
    }
}

/// Live geometry of a scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollGeometry {
    pub content_offset: Point,
    pub content_size: Size,
    pub bounds_size: Size,
    /// Content inset after safe-area adjustment.
    pub adjusted_inset: EdgeInsets,
}

impl ScrollGeometry {
    pub fn scrollable_edges(&self) -> ScrollableEdges {
        let offset = self.content_offset;
        let inset = self.adjusted_inset;
        let mut edges = ScrollableEdges::empty();

        if offset.y > -inset.top {
            edges |= ScrollableEdges::TOP;
        }
        if offset.x > -inset.left {
            edges |= ScrollableEdges::LEFT;
        }
        if offset.y + self.bounds_size.height < self.content_size.height + inset.bottom {
            edges |= ScrollableEdges::BOTTOM;
        }
        if offset.x + self.bounds_size.width < self.content_size.width + inset.right {
            edges |= ScrollableEdges::RIGHT;
        }
        edges
    }

    /// Content offset that shows `edge` exactly, other axis unchanged.
    ///
    /// When content is shorter than the viewport the far edge coincides with
    /// the near one rather than sitting before it.
    pub fn offset_at_edge(&self, edge: ScrollEdge) -> Point {
        let inset = self.adjusted_inset;
        let mut offset = self.content_offset;
        let top = -inset.top;
        let left = -inset.left;
        match edge {
            ScrollEdge::Top => offset.y = top,
            ScrollEdge::Bottom => {
                offset.y = (self.content_size.height - self.bounds_size.height + inset.bottom).max(top)
            }
            ScrollEdge::Left => offset.x = left,
            ScrollEdge::Right => {
                offset.x = (self.content_size.width - self.bounds_size.width + inset.right).max(left)
            }
        }
        offset
    }

    /// Whether the content can move on at least one axis.
    pub fn is_scrollable(&self) -> bool {
        let inset = self.adjusted_inset;
        self.bounds_size.width - inset.horizontal_sum() <= self.content_size.width
            || self.bounds_size.height - inset.vertical_sum() <= self.content_size.height
    }
}

/// A content offset write observed on a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentOffsetChange {
    pub old: Point,
    pub new: Point,
}

/// Receives every content offset write on a container.
pub trait ContentOffsetObserver {
    fn content_offset_changed(&self, change: ContentOffsetChange);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Opaque identity of a container, used to match gestures attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u64);

/// A host scroll view.
///
/// Implementations must notify every registered observer after each offset
/// write, including writes issued from inside an observer callback.
pub trait ScrollContainer {
    fn id(&self) -> ContainerId;

    fn geometry(&self) -> ScrollGeometry;

    fn set_content_offset(&self, offset: Point);

    fn add_offset_observer(&self, observer: Weak<dyn ContentOffsetObserver>) -> ObserverId;

    fn remove_offset_observer(&self, id: ObserverId);
}

/// Hit-test collaborator finding the container a drag should cooperate with.
pub trait ScrollContainerLocator {
    fn container_at(&self, location: Point) -> Option<Rc<dyn ScrollContainer>>;
}

impl<F> ScrollContainerLocator for F
where
    F: Fn(Point) -> Option<Rc<dyn ScrollContainer>>,
{
    fn container_at(&self, location: Point) -> Option<Rc<dyn ScrollContainer>> {
        self(location)
    }
}

/// Pick the outermost scrollable container from an innermost-first chain of
/// ancestors.
pub fn outermost_scrollable<I>(chain: I) -> Option<Rc<dyn ScrollContainer>>
where
    I: IntoIterator<Item = Rc<dyn ScrollContainer>>,
{
    chain
        .into_iter()
        .filter(|container| container.geometry().is_scrollable())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(offset_y: f32) -> ScrollGeometry {
        ScrollGeometry {
            content_offset: Point::new(0.0, offset_y),
            content_size: Size::new(300.0, 1_000.0),
            bounds_size: Size::new(300.0, 400.0),
            adjusted_inset: EdgeInsets::default(),
        }
    }

    #[test]
    fn edges_at_top_of_content() {
        let edges = geometry(0.0).scrollable_edges();
        assert_eq!(edges, ScrollableEdges::BOTTOM);
    }

    #[test]
    fn edges_in_the_middle_and_at_the_bottom() {
        let middle = geometry(200.0).scrollable_edges();
        assert_eq!(middle, ScrollableEdges::TOP | ScrollableEdges::BOTTOM);

        let bottom = geometry(600.0).scrollable_edges();
        assert_eq!(bottom, ScrollableEdges::TOP);
    }

    #[test]
    fn insets_extend_the_scroll_range() {
        let mut geometry = geometry(-20.0);
        geometry.adjusted_inset = EdgeInsets::from_components(0.0, 20.0, 0.0, 30.0);
        assert!(!geometry.scrollable_edges().contains(ScrollableEdges::TOP));

        geometry.content_offset.y = 610.0;
        assert!(geometry.scrollable_edges().contains(ScrollableEdges::BOTTOM));
        assert_eq!(geometry.offset_at_edge(ScrollEdge::Bottom).y, 630.0);
        assert_eq!(geometry.offset_at_edge(ScrollEdge::Top).y, -20.0);
    }

    #[test]
    fn offset_at_edge_reaches_that_edge() {
        let geometry = geometry(250.0);
        for edge in [ScrollEdge::Top, ScrollEdge::Bottom, ScrollEdge::Left, ScrollEdge::Right] {
            let moved = ScrollGeometry {
                content_offset: geometry.offset_at_edge(edge),
                ..geometry
            };
            assert!(
                !moved.scrollable_edges().contains(edge.as_edges()),
                "{edge:?} should be exhausted"
            );
        }
    }

    #[test]
    fn short_content_pins_far_edge_to_near_edge() {
        let geometry = ScrollGeometry {
            content_offset: Point::ZERO,
            content_size: Size::new(100.0, 100.0),
            bounds_size: Size::new(300.0, 400.0),
            adjusted_inset: EdgeInsets::default(),
        };
        assert_eq!(geometry.offset_at_edge(ScrollEdge::Bottom), Point::ZERO);
        assert_eq!(geometry.scrollable_edges(), ScrollableEdges::empty());
    }

    #[test]
    fn opposite_edges_pair_up() {
        assert_eq!(ScrollEdge::Top.opposite(), ScrollEdge::Bottom);
        assert_eq!(ScrollEdge::Left.opposite().opposite(), ScrollEdge::Left);
    }
}
