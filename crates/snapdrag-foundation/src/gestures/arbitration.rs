//! Frame-by-frame arbitration of a drag between the element and a nested
//! scroll container.
//!
//! Every sample's incremental movement is split by direction. For each
//! direction the element claims the axis when the container cannot scroll
//! further that way, or when the gesture has already broken through the
//! matching edge (edge stickiness). Claimed movement accumulates into the
//! translation reported to the element and locks the container on that
//! axis. Unclaimed movement is left to the container.

use std::rc::Rc;

use bitflags::bitflags;
use snapdrag_ui_graphics::{Offset, Point, Velocity};

use super::simultaneous::{self, GestureDescriptor};
use super::stickiness::EdgeStickiness;
use crate::input::{PointerSample, RecognizerPhase};
use crate::scroll::{
    ContainerId, LockingDirection, ScrollContainerLocator, ScrollEdge, ScrollLockController,
    ScrollableEdges,
};
use crate::velocity_tracker::VelocityTracker;

bitflags! {
    /// Directions of one frame's movement. Up and down (left and right) are
    /// mutually exclusive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PanDirection: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// Directions of `diff`; a zero component contributes none.
pub fn pan_direction(diff: Offset) -> PanDirection {
    let mut direction = PanDirection::empty();
    if diff.height > 0.0 {
        direction |= PanDirection::DOWN;
    } else if diff.height < 0.0 {
        direction |= PanDirection::UP;
    }
    if diff.width > 0.0 {
        direction |= PanDirection::RIGHT;
    } else if diff.width < 0.0 {
        direction |= PanDirection::LEFT;
    }
    direction
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrationConfig {
    /// Never cooperate with a container; every movement drags the element.
    pub ignores_scroll_view: bool,
    /// Keep an axis claimed once the drag broke through its edge.
    ///
    /// The first claim on an axis snaps the container onto its edge either
    /// way; this flag only controls whether a reversal hands the axis back.
    pub sticks_to_edges: bool,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            ignores_scroll_view: false,
            sticks_to_edges: true,
        }
    }
}

impl ArbitrationConfig {
    pub fn with_ignores_scroll_view(mut self, ignores: bool) -> Self {
        self.ignores_scroll_view = ignores;
        self
    }

    pub fn with_sticks_to_edges(mut self, sticks: bool) -> Self {
        self.sticks_to_edges = sticks;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Tracking,
    Ended,
    Cancelled,
}

/// Normalized drag state handed to the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragValue {
    /// Translation claimed by the element since the gesture began.
    pub translation: Offset,
    pub start_location: Point,
    pub location: Point,
    pub velocity: Velocity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Changed(DragValue),
    /// Final value of the gesture, whether released or cancelled. Velocity on
    /// axes the element was not dragging at the end is zero.
    Ended(DragValue),
}

impl DragEvent {
    pub fn value(&self) -> &DragValue {
        match self {
            DragEvent::Changed(value) | DragEvent::Ended(value) => value,
        }
    }
}

/// Everything that lives for exactly one gesture.
#[derive(Debug)]
pub struct TrackingSession {
    start_location: Point,
    location: Point,
    previous_translation: Offset,
    translation: Offset,
    is_dragging_x: bool,
    is_dragging_y: bool,
    controller: Option<ScrollLockController>,
    stickiness: EdgeStickiness,
    /// Edges claimed at least once, sticky or not.
    claimed: ScrollableEdges,
    velocity_tracker: VelocityTracker,
    reported_velocity: Option<Velocity>,
}

impl TrackingSession {
    fn new(sample: &PointerSample, controller: Option<ScrollLockController>, sticks: bool) -> Self {
        Self {
            start_location: sample.start_location,
            location: sample.location,
            previous_translation: Offset::ZERO,
            translation: Offset::ZERO,
            is_dragging_x: false,
            is_dragging_y: false,
            controller,
            stickiness: EdgeStickiness::new(sticks),
            claimed: ScrollableEdges::empty(),
            velocity_tracker: VelocityTracker::new(),
            reported_velocity: None,
        }
    }

    pub fn translation(&self) -> Offset {
        self.translation
    }

    pub fn is_dragging_x(&self) -> bool {
        self.is_dragging_x
    }

    pub fn is_dragging_y(&self) -> bool {
        self.is_dragging_y
    }

    pub fn sticky_edges(&self) -> ScrollableEdges {
        self.stickiness.edges()
    }

    pub fn container_id(&self) -> Option<ContainerId> {
        self.controller.as_ref().map(ScrollLockController::container_id)
    }

    pub fn locking_direction(&self) -> LockingDirection {
        self.controller
            .as_ref()
            .map(ScrollLockController::locking_direction)
            .unwrap_or_default()
    }

    fn record(&mut self, sample: &PointerSample) {
        self.location = sample.location;
        self.velocity_tracker
            .add_translation(sample.uptime_millis, sample.translation);
        if sample.velocity.is_some() {
            self.reported_velocity = sample.velocity;
        }
    }

    fn velocity(&self) -> Velocity {
        self.reported_velocity
            .unwrap_or_else(|| self.velocity_tracker.velocity())
    }

    fn value(&self, velocity: Velocity) -> DragValue {
        DragValue {
            translation: self.translation,
            start_location: self.start_location,
            location: self.location,
            velocity,
        }
    }

    /// Consume this sample's movement; returns whether anything was claimed.
    fn advance(&mut self, translation: Offset) -> bool {
        let diff = translation - self.previous_translation;
        self.previous_translation = translation;

        let edges = self
            .controller
            .as_ref()
            .and_then(ScrollLockController::scrollable_edges);
        let Some(edges) = edges else {
            // No live container: the element owns every axis.
            self.is_dragging_x = true;
            self.is_dragging_y = true;
            self.translation += diff;
            return true;
        };

        let direction = pan_direction(diff);
        let mut claimed = false;
        if direction.contains(PanDirection::UP) {
            claimed |= self.arbitrate(edges, ScrollEdge::Bottom, diff);
        }
        if direction.contains(PanDirection::DOWN) {
            claimed |= self.arbitrate(edges, ScrollEdge::Top, diff);
        }
        if direction.contains(PanDirection::LEFT) {
            claimed |= self.arbitrate(edges, ScrollEdge::Right, diff);
        }
        if direction.contains(PanDirection::RIGHT) {
            claimed |= self.arbitrate(edges, ScrollEdge::Left, diff);
        }
        claimed
    }

    /// Decide one direction. `edge` is the container edge the movement
    /// scrolls towards (an upward pan reveals the bottom of the content).
    fn arbitrate(&mut self, edges: ScrollableEdges, edge: ScrollEdge, diff: Offset) -> bool {
        let vertical = matches!(edge, ScrollEdge::Top | ScrollEdge::Bottom);
        let axis = if vertical {
            LockingDirection::VERTICAL
        } else {
            LockingDirection::HORIZONTAL
        };
        let Some(controller) = self.controller.as_ref() else {
            return false;
        };

        let exhausted = !edges.contains(edge.as_edges());
        let stuck = self.stickiness.is_sticky(edge.opposite());
        if !(exhausted || stuck) {
            controller.unlock_scrolling(axis);
            if vertical {
                self.is_dragging_y = false;
            } else {
                self.is_dragging_x = false;
            }
            return false;
        }

        controller.lock_scrolling(axis);
        let axis_edges = edge.as_edges() | edge.opposite().as_edges();
        if !self.claimed.intersects(axis_edges) {
            controller.scroll_to_edge(edge);
        }
        self.claimed |= edge.as_edges();
        self.stickiness.stick(edge);

        if vertical {
            self.is_dragging_y = true;
            self.translation.height += diff.height;
        } else {
            self.is_dragging_x = true;
            self.translation.width += diff.width;
        }
        log::trace!("claimed towards {edge:?}, translation {:?}", self.translation);
        true
    }

    fn finish(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.end_tracking();
        }
    }
}

/// Turns raw pointer samples into element drag events.
pub struct GestureArbiter {
    config: ArbitrationConfig,
    locator: Option<Rc<dyn ScrollContainerLocator>>,
    phase: GesturePhase,
    session: Option<TrackingSession>,
}

impl GestureArbiter {
    pub fn new(config: ArbitrationConfig) -> Self {
        Self {
            config,
            locator: None,
            phase: GesturePhase::Idle,
            session: None,
        }
    }

    pub fn with_locator(mut self, locator: Rc<dyn ScrollContainerLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn set_locator(&mut self, locator: Option<Rc<dyn ScrollContainerLocator>>) {
        self.locator = locator;
    }

    pub fn config(&self) -> ArbitrationConfig {
        self.config
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == GesturePhase::Tracking
    }

    /// Feed one sample; returns the event for the element, if any.
    ///
    /// Terminal samples close the gesture and always produce
    /// [`DragEvent::Ended`] when a gesture was being tracked.
    pub fn handle_sample(&mut self, sample: &PointerSample) -> Option<DragEvent> {
        match sample.phase {
            RecognizerPhase::Began | RecognizerPhase::Changed => {
                if self.session.is_none() || sample.phase == RecognizerPhase::Began {
                    self.begin(sample);
                }
                self.track(sample)
            }
            RecognizerPhase::Ended => self.end(Some(sample), GesturePhase::Ended),
            RecognizerPhase::Cancelled | RecognizerPhase::Failed => {
                self.end(Some(sample), GesturePhase::Cancelled)
            }
        }
    }

    /// Host-side cancellation of the current gesture.
    pub fn cancel(&mut self) -> Option<DragEvent> {
        self.end(None, GesturePhase::Cancelled)
    }

    /// Whether this recognizer may run together with `other`.
    pub fn should_recognize_simultaneously(&self, other: &GestureDescriptor) -> bool {
        let tracked = self.session.as_ref().and_then(TrackingSession::container_id);
        simultaneous::should_recognize_simultaneously(&self.config, tracked, other)
    }

    fn begin(&mut self, sample: &PointerSample) {
        if let Some(mut stale) = self.session.take() {
            stale.finish();
        }

        let controller = if self.config.ignores_scroll_view {
            None
        } else {
            self.locator
                .as_ref()
                .and_then(|locator| locator.container_at(sample.start_location))
                .map(|container| ScrollLockController::new(&container))
        };
        log::debug!(
            "drag began at ({}, {}), container: {:?}",
            sample.start_location.x,
            sample.start_location.y,
            controller.as_ref().map(ScrollLockController::container_id)
        );

        self.session = Some(TrackingSession::new(
            sample,
            controller,
            self.config.sticks_to_edges,
        ));
        self.phase = GesturePhase::Tracking;
    }

    fn track(&mut self, sample: &PointerSample) -> Option<DragEvent> {
        let session = self.session.as_mut()?;
        session.record(sample);
        if session.advance(sample.translation) {
            Some(DragEvent::Changed(session.value(session.velocity())))
        } else {
            None
        }
    }

    fn end(&mut self, sample: Option<&PointerSample>, phase: GesturePhase) -> Option<DragEvent> {
        let mut session = self.session.take()?;
        if let Some(sample) = sample {
            session.record(sample);
        }

        let mut velocity = session.velocity();
        if !session.is_dragging_x {
            velocity.dx = 0.0;
        }
        if !session.is_dragging_y {
            velocity.dy = 0.0;
        }
        let value = session.value(velocity);
        session.finish();

        self.phase = phase;
        log::debug!(
            "drag {} with translation {:?}, velocity {:?}",
            if phase == GesturePhase::Cancelled {
                "cancelled"
            } else {
                "ended"
            },
            value.translation,
            value.velocity
        );
        Some(DragEvent::Ended(value))
    }
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new(ArbitrationConfig::default())
    }
}
