//! Foundation layer for snapdrag
//!
//! Drag handling for elements that live on top of nested scroll
//! containers: arbitration of each pointer frame between the element and
//! the container, scroll locking, rubber-banded boundaries, detents and the
//! spring-driven snap on release.

pub mod blanket;
pub mod boundary;
pub mod detent;
pub mod error;
pub mod gesture_constants;
pub mod gestures;
pub mod input;
pub mod rubber_band;
pub mod scroll;
pub mod snap;
pub mod snap_dragging;
pub mod velocity_tracker;

pub use blanket::{Blanket, BlanketConfig};
pub use boundary::{Axes, Boundary};
pub use detent::{Detent, DetentContext, DetentKind, DetentSet, ResolvedDetent};
pub use error::ConfigError;
pub use gestures::{
    pan_direction, should_recognize_simultaneously, ArbitrationConfig, DragEvent, DragValue,
    EdgeStickiness, GestureArbiter, GestureDescriptor, GestureKind, GestureMode, GesturePhase,
    GesturePrecedence, PanDirection, TrackingSession,
};
pub use input::{PointerSample, RecognizerPhase};
pub use rubber_band::rubber_band;
pub use scroll::{
    outermost_scrollable, ContainerId, ContentOffsetChange, ContentOffsetObserver, LockingDirection,
    ObserverId, ScrollContainer, ScrollContainerLocator, ScrollEdge, ScrollGeometry,
    ScrollLockController, ScrollableEdges,
};
pub use snap::{map_velocity, NearestDetent, SnapAxis, SnapDecision, SnapEngine};
pub use snap_dragging::{
    Activation, ActivationRegion, EdgeSet, LayoutDirection, SnapDraggable, SnapDraggingConfig,
    SnapDraggingHandler,
};
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::boundary::{Axes, Boundary};
    pub use crate::detent::{Detent, DetentSet};
    pub use crate::gestures::{ArbitrationConfig, DragEvent, GestureArbiter, GestureMode};
    pub use crate::input::{PointerSample, RecognizerPhase};
    pub use crate::scroll::{ScrollContainer, ScrollContainerLocator, ScrollLockController};
    pub use crate::snap::{SnapDecision, SnapEngine};
    pub use crate::snap_dragging::{SnapDraggable, SnapDraggingConfig, SnapDraggingHandler};
}
