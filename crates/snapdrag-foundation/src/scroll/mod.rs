//! Nested scroll container support.

mod container;
mod lock;

pub use container::{
    outermost_scrollable, ContainerId, ContentOffsetChange, ContentOffsetObserver, ObserverId,
    ScrollContainer, ScrollContainerLocator, ScrollEdge, ScrollGeometry, ScrollableEdges,
};
pub use lock::{LockingDirection, ScrollLockController};
