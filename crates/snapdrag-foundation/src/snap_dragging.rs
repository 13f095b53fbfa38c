//! A draggable element that rubber-bands against its boundaries while
//! dragged and springs to a caller-chosen rest position on release.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use snapdrag_animation::SpringParameter;
use snapdrag_core::RuntimeHandle;
use snapdrag_ui_graphics::{Offset, Point, Rect, Size, Velocity};

use crate::boundary::{Axes, Boundary};
use crate::error::ConfigError;
use crate::gesture_constants::EDGE_ACTIVATION_WIDTH;
use crate::gestures::{
    ArbitrationConfig, DragEvent, DragValue, GestureArbiter, GestureDescriptor, GestureMode,
    GesturePrecedence,
};
use crate::input::PointerSample;
use crate::scroll::ScrollContainerLocator;
use crate::snap::{SnapDecision, SnapEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

bitflags! {
    /// Edges of the element; leading and trailing follow the layout
    /// direction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeSet: u8 {
        const LEADING = 1 << 0;
        const TRAILING = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationRegion {
    /// The whole element.
    #[default]
    Screen,
    /// Bands of `EDGE_ACTIVATION_WIDTH` along the given edges.
    Edges(EdgeSet),
}

/// Where a drag may start and how far it must travel before it moves the
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Activation {
    pub minimum_distance: f32,
    pub region: ActivationRegion,
}

impl Activation {
    pub fn new(minimum_distance: f32, region: ActivationRegion) -> Self {
        Self {
            minimum_distance,
            region,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.minimum_distance >= 0.0) {
            return Err(ConfigError::NegativeMinimumDistance(self.minimum_distance));
        }
        Ok(())
    }

    /// Whether a drag starting at `start` (element coordinates) may activate.
    pub fn region_contains(&self, start: Point, content_size: Size, direction: LayoutDirection) -> bool {
        let edges = match self.region {
            ActivationRegion::Screen => return true,
            ActivationRegion::Edges(edges) => edges,
        };

        let band = EDGE_ACTIVATION_WIDTH;
        let Size { width, height } = content_size;
        let left = Rect::new(0.0, 0.0, band, height);
        let right = Rect::new(width - band, 0.0, band, height);
        let (leading, trailing) = match direction {
            LayoutDirection::LeftToRight => (left, right),
            LayoutDirection::RightToLeft => (right, left),
        };

        (edges.contains(EdgeSet::LEADING) && leading.contains_point(start))
            || (edges.contains(EdgeSet::TRAILING) && trailing.contains_point(start))
            || (edges.contains(EdgeSet::TOP) && Rect::new(0.0, 0.0, width, band).contains_point(start))
            || (edges.contains(EdgeSet::BOTTOM)
                && Rect::new(0.0, height - band, width, band).contains_point(start))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapDraggingConfig {
    pub axes: Axes,
    pub horizontal_boundary: Boundary,
    pub vertical_boundary: Boundary,
    pub spring: SpringParameter,
    pub gesture_mode: GestureMode,
    pub activation: Activation,
    pub arbitration: ArbitrationConfig,
    pub layout_direction: LayoutDirection,
}

impl Default for SnapDraggingConfig {
    fn default() -> Self {
        Self {
            axes: Axes::all(),
            horizontal_boundary: Boundary::INFINITE,
            vertical_boundary: Boundary::INFINITE,
            spring: SpringParameter::hard(),
            gesture_mode: GestureMode::Normal,
            activation: Activation::default(),
            arbitration: ArbitrationConfig::default(),
            layout_direction: LayoutDirection::LeftToRight,
        }
    }
}

impl SnapDraggingConfig {
    pub fn with_axes(mut self, axes: Axes) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_horizontal_boundary(mut self, boundary: Boundary) -> Self {
        self.horizontal_boundary = boundary;
        self
    }

    pub fn with_vertical_boundary(mut self, boundary: Boundary) -> Self {
        self.vertical_boundary = boundary;
        self
    }

    pub fn with_spring(mut self, spring: SpringParameter) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_gesture_mode(mut self, mode: GestureMode) -> Self {
        self.gesture_mode = mode;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_arbitration(mut self, arbitration: ArbitrationConfig) -> Self {
        self.arbitration = arbitration;
        self
    }

    pub fn with_layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spring.validate()?;
        self.activation.validate()
    }

    /// Rubber-band `proposed` on the enabled axes; disabled axes keep
    /// `current`.
    pub fn constrain(&self, proposed: Offset, current: Offset) -> Offset {
        let mut offset = current;
        if self.axes.contains(Axes::HORIZONTAL) {
            offset.width = self.horizontal_boundary.apply(proposed.width);
        }
        if self.axes.contains(Axes::VERTICAL) {
            offset.height = self.vertical_boundary.apply(proposed.height);
        }
        offset
    }
}

type CompletionCallback = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

/// Callbacks from a [`SnapDraggable`] to its owner.
///
/// The end-of-drag decision defaults to returning to `Offset::ZERO`.
pub struct SnapDraggingHandler {
    on_start_dragging: Option<Box<dyn FnMut()>>,
    on_change: Option<Box<dyn FnMut(Offset)>>,
    decision: Box<dyn SnapDecision>,
    on_complete_animation: CompletionCallback,
}

impl Default for SnapDraggingHandler {
    fn default() -> Self {
        Self {
            on_start_dragging: None,
            on_change: None,
            decision: Box::new(|_: &mut Velocity, _: Offset, _: Size| Offset::ZERO),
            on_complete_animation: Rc::new(RefCell::new(None)),
        }
    }
}

impl SnapDraggingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start_dragging(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_start_dragging = Some(Box::new(callback));
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(Offset) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Choose the rest offset from `(velocity, offset, content_size)`.
    pub fn on_end_dragging(
        mut self,
        callback: impl FnMut(&mut Velocity, Offset, Size) -> Offset + 'static,
    ) -> Self {
        self.decision = Box::new(callback);
        self
    }

    pub fn snap_decision(mut self, decision: impl SnapDecision + 'static) -> Self {
        self.decision = Box::new(decision);
        self
    }

    /// Runs once both axis springs settle after a release. Must not re-enter
    /// the element: a release onto its current offset completes synchronously.
    pub fn on_complete_animation(self, callback: impl FnMut() + 'static) -> Self {
        *self.on_complete_animation.borrow_mut() = Some(Box::new(callback));
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    base: Offset,
    active: bool,
}

pub struct SnapDraggable {
    config: SnapDraggingConfig,
    handler: SnapDraggingHandler,
    engine: SnapEngine,
    arbiter: GestureArbiter,
    content_size: Size,
    drag: Option<ActiveDrag>,
}

impl SnapDraggable {
    pub fn new(
        config: SnapDraggingConfig,
        handler: SnapDraggingHandler,
        runtime: RuntimeHandle,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine: SnapEngine::new(Offset::ZERO, config.spring, runtime),
            arbiter: GestureArbiter::new(config.arbitration),
            config,
            handler,
            content_size: Size::ZERO,
            drag: None,
        })
    }

    pub fn with_locator(mut self, locator: Rc<dyn ScrollContainerLocator>) -> Self {
        self.arbiter.set_locator(Some(locator));
        self
    }

    pub fn config(&self) -> &SnapDraggingConfig {
        &self.config
    }

    /// Measured size of the element, passed to the end-of-drag decision.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Render stream: every offset the element takes, dragged or animated.
    pub fn set_on_update(&self, listener: impl FnMut(Offset) + 'static) {
        self.engine.set_on_update(listener);
    }

    /// Move the element without a gesture, interrupting any spring.
    pub fn set_offset(&self, offset: Offset) {
        self.engine.snap_to(offset);
    }

    pub fn current_offset(&self) -> Offset {
        self.engine.offset()
    }

    pub fn target_offset(&self) -> Offset {
        self.engine.target()
    }

    pub fn is_tracking(&self) -> bool {
        self.drag.is_some_and(|drag| drag.active)
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    pub fn should_recognize_simultaneously(&self, other: &GestureDescriptor) -> bool {
        self.arbiter.should_recognize_simultaneously(other)
    }

    pub fn precedence_against(&self, sibling: GestureMode) -> GesturePrecedence {
        self.config.gesture_mode.precedence_against(sibling)
    }

    pub fn handle_sample(&mut self, sample: &PointerSample) {
        if self.drag.is_none() && !sample.phase.is_terminal() {
            // A touch catches the element where it is, activated or not.
            self.engine.stop();
            self.drag = Some(ActiveDrag {
                base: self.engine.offset(),
                active: false,
            });
        }

        match self.arbiter.handle_sample(sample) {
            Some(DragEvent::Changed(value)) => self.on_drag_changed(sample, &value),
            Some(DragEvent::Ended(value)) => self.on_drag_ended(&value),
            None => {
                if sample.phase.is_terminal() {
                    self.drag = None;
                }
            }
        }
    }

    fn on_drag_changed(&mut self, sample: &PointerSample, value: &DragValue) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        if !drag.active {
            let activation = self.config.activation;
            let in_region = activation.region_contains(
                sample.start_location,
                self.content_size,
                self.config.layout_direction,
            );
            if !in_region || sample.translation.length() < activation.minimum_distance {
                return;
            }
            drag.active = true;
            log::debug!("drag activated from {:?}", drag.base);
            if let Some(callback) = self.handler.on_start_dragging.as_mut() {
                callback();
            }
        }

        let proposed = drag.base + value.translation;
        let offset = self.config.constrain(proposed, self.engine.offset());
        self.engine.snap_to(offset);
        if let Some(callback) = self.handler.on_change.as_mut() {
            callback(offset);
        }
    }

    fn on_drag_ended(&mut self, value: &DragValue) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if !drag.active {
            return;
        }

        let completion = Rc::clone(&self.handler.on_complete_animation);
        self.engine.release(
            self.engine.offset(),
            value.velocity,
            self.content_size,
            self.handler.decision.as_mut(),
            move || {
                if let Ok(mut callback) = completion.try_borrow_mut() {
                    if let Some(callback) = callback.as_mut() {
                        callback();
                    }
                }
            },
        );
    }
}
