//! Bottom sheet resting on detents.
//!
//! A blanket sits at the bottom of its container. Dragging up stretches it
//! through its detents; dragging below the smallest detent moves the whole
//! sheet down with a rubber band, and a firm downward release hides it.
//! Offsets are vertical, positive downwards, `0` meaning fully shown.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use snapdrag_animation::{Animatable, AnimationEndReason, SpringParameter};
use snapdrag_core::RuntimeHandle;
use snapdrag_ui_graphics::{EdgeInsets, Offset, Size, Velocity};

use crate::detent::{Detent, DetentContext, DetentKind, DetentSet};
use crate::error::ConfigError;
use crate::gesture_constants::{
    BLANKET_BAND_LENGTH, BLANKET_DISMISS_DISTANCE, BLANKET_DISMISS_VELOCITY,
    BLANKET_LARGE_FRACTION, BLANKET_PRESENT_RESPONSE,
};
use crate::gestures::{ArbitrationConfig, DragEvent, GestureArbiter};
use crate::input::PointerSample;
use crate::rubber_band::rubber_band;
use crate::scroll::ScrollContainerLocator;
use crate::snap::map_velocity;

#[derive(Debug, Clone, PartialEq)]
pub struct BlanketConfig {
    pub detents: SmallVec<[Detent; 4]>,
    /// Spring used after a drag.
    pub spring: SpringParameter,
    /// Spring used by `present` and `dismiss`.
    pub presentation_spring: SpringParameter,
    pub arbitration: ArbitrationConfig,
}

impl Default for BlanketConfig {
    fn default() -> Self {
        Self {
            detents: SmallVec::from_slice(&[
                Detent::CONTENT,
                Detent::from_kind(DetentKind::Fraction(BLANKET_LARGE_FRACTION)),
                Detent::from_kind(DetentKind::Fraction(1.0)),
            ]),
            spring: SpringParameter::hard(),
            presentation_spring: SpringParameter::smooth(BLANKET_PRESENT_RESPONSE),
            arbitration: ArbitrationConfig::default(),
        }
    }
}

impl BlanketConfig {
    pub fn with_detents(mut self, detents: &[Detent]) -> Self {
        self.detents = SmallVec::from_slice(detents);
        self
    }

    pub fn with_spring(mut self, spring: SpringParameter) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_presentation_spring(mut self, spring: SpringParameter) -> Self {
        self.presentation_spring = spring;
        self
    }

    pub fn with_arbitration(mut self, arbitration: ArbitrationConfig) -> Self {
        self.arbitration = arbitration;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detents.is_empty() {
            return Err(ConfigError::EmptyDetents);
        }
        self.spring.validate()?;
        self.presentation_spring.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct BlanketDrag {
    base_offset: f32,
    base_custom_height: f32,
}

type DismissCallback = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

pub struct Blanket {
    config: BlanketConfig,
    arbiter: GestureArbiter,
    offset: Animatable,
    height: Animatable,
    /// Whether the sheet is sized by `height` rather than its content.
    uses_custom_height: bool,
    maximum_size: Option<Size>,
    content_size: Option<Size>,
    safe_area: EdgeInsets,
    detents: Option<DetentSet>,
    hiding_offset: f32,
    presented: bool,
    drag: Option<BlanketDrag>,
    on_dismiss: DismissCallback,
}

impl Blanket {
    pub fn new(config: BlanketConfig, runtime: RuntimeHandle) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            arbiter: GestureArbiter::new(config.arbitration),
            offset: Animatable::new(0.0, runtime.clone()).with_label("blanket-offset"),
            height: Animatable::new(0.0, runtime).with_label("blanket-height"),
            config,
            uses_custom_height: false,
            maximum_size: None,
            content_size: None,
            safe_area: EdgeInsets::default(),
            detents: None,
            hiding_offset: 0.0,
            presented: false,
            drag: None,
            on_dismiss: Rc::new(RefCell::new(None)),
        })
    }

    pub fn with_locator(mut self, locator: Rc<dyn ScrollContainerLocator>) -> Self {
        self.arbiter.set_locator(Some(locator));
        self
    }

    /// Runs each time a hide settles, whether from `dismiss` or a drag.
    pub fn set_on_dismiss(&self, callback: impl FnMut() + 'static) {
        *self.on_dismiss.borrow_mut() = Some(Box::new(callback));
    }

    pub fn set_maximum_size(&mut self, size: Size) {
        self.maximum_size = Some(size);
        self.resolve();
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = Some(size);
        self.resolve();
    }

    pub fn set_safe_area_insets(&mut self, insets: EdgeInsets) {
        self.safe_area = insets;
        self.resolve();
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }

    pub fn detents(&self) -> Option<&DetentSet> {
        self.detents.as_ref()
    }

    /// Vertical displacement of the sheet; `hiding_offset` when hidden.
    pub fn content_offset(&self) -> f32 {
        self.offset.value()
    }

    /// Height imposed by a stretch, `None` while sized by content.
    pub fn custom_height(&self) -> Option<f32> {
        self.uses_custom_height.then(|| self.height.value())
    }

    pub fn hiding_offset(&self) -> f32 {
        self.hiding_offset
    }

    pub fn is_animating(&self) -> bool {
        self.offset.is_running() || self.height.is_running()
    }

    pub fn present(&mut self) {
        self.presented = true;
        log::debug!("presenting blanket");
        self.offset
            .animate_to(0.0, self.config.presentation_spring, 0.0, |_| {});
    }

    pub fn dismiss(&mut self) {
        self.hide(self.config.presentation_spring, 0.0);
    }

    pub fn handle_sample(&mut self, sample: &PointerSample) {
        if self.drag.is_none() && !sample.phase.is_terminal() {
            self.offset.stop();
            self.height.stop();
            self.drag = Some(BlanketDrag {
                base_offset: self.offset.value(),
                base_custom_height: self
                    .custom_height()
                    .or_else(|| self.content_size.map(|size| size.height))
                    .unwrap_or(0.0),
            });
        }

        match self.arbiter.handle_sample(sample) {
            Some(DragEvent::Changed(value)) => self.on_drag_changed(value.translation),
            Some(DragEvent::Ended(value)) => {
                self.drag = None;
                self.on_drag_ended(value.velocity);
            }
            None => {
                if sample.phase.is_terminal() {
                    self.drag = None;
                }
            }
        }
    }

    fn resolve(&mut self) {
        if self.uses_custom_height {
            return;
        }
        let Some(content_size) = self.content_size else {
            return;
        };
        let context = DetentContext {
            max_detent_value: self.maximum_size.map_or(0.0, |size| size.height),
            content_height: content_size.height,
        };
        match DetentSet::resolve(&self.config.detents, &context) {
            Ok(detents) => self.detents = Some(detents),
            Err(error) => {
                log::warn!("blanket detents did not resolve: {error}");
                return;
            }
        }

        let hiding_offset = content_size.height + self.safe_area.bottom;
        log::debug!("blanket resolved, hiding offset {hiding_offset}");
        if hiding_offset != self.hiding_offset {
            self.hiding_offset = hiding_offset;
            if !self.presented {
                self.offset.snap_to(hiding_offset);
            }
        }
    }

    fn on_drag_changed(&mut self, translation: Offset) {
        let (Some(detents), Some(drag)) = (self.detents.as_ref(), self.drag) else {
            return;
        };

        let proposed_height = drag.base_custom_height - translation.height;
        let lowest = detents.min_detent().offset;
        let highest = detents.max_detent().offset;

        if proposed_height < lowest {
            // Below the smallest detent the whole sheet moves.
            self.uses_custom_height = false;
            self.height.stop();
            let offset = rubber_band(
                drag.base_offset + translation.height,
                0.0,
                f32::INFINITY,
                BLANKET_BAND_LENGTH,
            );
            self.offset.snap_to(offset);
        } else if proposed_height > highest {
            self.uses_custom_height = true;
            self.height.snap_to(highest);
        } else {
            self.offset.snap_to(0.0);
            self.uses_custom_height = true;
            self.height.snap_to(proposed_height);
        }
    }

    fn on_drag_ended(&mut self, velocity: Velocity) {
        let Some(detents) = self.detents.as_ref() else {
            return;
        };

        if self.uses_custom_height {
            let current = self.height.value();
            let nearest = detents.nearest(current).offset;
            let mapped = map_velocity(velocity, Offset::new(0.0, nearest - current));
            log::debug!("blanket stretched to {current}, settling on detent {nearest}");
            // Height grows upwards while the pointer velocity is positive downwards.
            self.height
                .animate_to(nearest, self.config.spring, -mapped.dy, |_| {});
            return;
        }

        let offset = self.offset.value();
        if velocity.dy > BLANKET_DISMISS_VELOCITY || offset > BLANKET_DISMISS_DISTANCE {
            self.hide(self.config.spring, velocity.dy);
        } else {
            let mapped = map_velocity(velocity, Offset::new(0.0, -offset));
            self.offset
                .animate_to(0.0, self.config.spring, mapped.dy, |_| {});
        }
    }

    fn hide(&mut self, spring: SpringParameter, velocity: f32) {
        self.presented = false;
        let target = self.hiding_offset;
        let mapped = map_velocity(
            Velocity::new(0.0, velocity),
            Offset::new(0.0, target - self.offset.value()),
        );
        log::debug!("hiding blanket at {target}");
        let on_dismiss = Rc::clone(&self.on_dismiss);
        self.offset
            .animate_to(target, spring, mapped.dy, move |reason| {
                if reason != AnimationEndReason::Finished {
                    return;
                }
                if let Ok(mut callback) = on_dismiss.try_borrow_mut() {
                    if let Some(callback) = callback.as_mut() {
                        callback();
                    }
                }
            });
    }
}
