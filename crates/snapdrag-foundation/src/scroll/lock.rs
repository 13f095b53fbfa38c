//! Holds a nested container still along the axes a drag has claimed.
//!
//! The controller observes the container's content offset. While an axis is
//! locked, any write that moves the offset along it is immediately rewritten
//! back to the previous value. Writes issued by the controller itself
//! (`set_offset`, `scroll_to_edge`) run with locking suspended.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use snapdrag_ui_graphics::Point;

use super::container::{
    ContainerId, ContentOffsetChange, ContentOffsetObserver, ObserverId, ScrollContainer,
    ScrollEdge, ScrollableEdges,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LockingDirection: u8 {
        const VERTICAL = 1 << 0;
        const HORIZONTAL = 1 << 1;
    }
}

/// State shared with the container's observer list.
struct LockState {
    container: Weak<dyn ScrollContainer>,
    /// Emptied while the controller writes, so its own writes pass through.
    locking: Cell<LockingDirection>,
    warned_gone: Cell<bool>,
}

impl LockState {
    fn container(&self) -> Option<Rc<dyn ScrollContainer>> {
        let container = self.container.upgrade();
        if container.is_none() && !self.warned_gone.replace(true) {
            log::warn!("scroll container dropped while tracking; lock is now inert");
        }
        container
    }

    fn set_offset(&self, offset: Point) {
        let Some(container) = self.container() else {
            return;
        };
        let previous = self.locking.replace(LockingDirection::empty());
        container.set_content_offset(offset);
        self.locking.set(previous);
    }
}

impl ContentOffsetObserver for LockState {
    fn content_offset_changed(&self, change: ContentOffsetChange) {
        let locking = self.locking.get();
        if locking.is_empty() || change.old == change.new {
            return;
        }

        let mut fixed = change.new;
        if locking.contains(LockingDirection::VERTICAL) {
            fixed.y = change.old.y;
        }
        if locking.contains(LockingDirection::HORIZONTAL) {
            fixed.x = change.old.x;
        }
        if fixed != change.new {
            log::trace!(
                "reverting scroll ({}, {}) -> ({}, {})",
                change.new.x,
                change.new.y,
                fixed.x,
                fixed.y
            );
            self.set_offset(fixed);
        }
    }
}

/// Per-gesture lock over one scroll container.
///
/// Holds the container weakly; once it is gone every operation is a no-op.
/// The observer registration is removed by [`end_tracking`](Self::end_tracking)
/// or on drop, whichever comes first.
pub struct ScrollLockController {
    state: Rc<LockState>,
    container_id: ContainerId,
    observer: Cell<Option<ObserverId>>,
}

impl ScrollLockController {
    pub fn new(container: &Rc<dyn ScrollContainer>) -> Self {
        let state = Rc::new(LockState {
            container: Rc::downgrade(container),
            locking: Cell::new(LockingDirection::empty()),
            warned_gone: Cell::new(false),
        });
        let weak_state = Rc::downgrade(&state);
        let observer: Weak<dyn ContentOffsetObserver> = weak_state;
        let id = container.add_offset_observer(observer);
        log::debug!("tracking scroll container {:?}", container.id());
        Self {
            state,
            container_id: container.id(),
            observer: Cell::new(Some(id)),
        }
    }

    pub fn container_id(&self) -> ContainerId {
        self.container_id
    }

    pub fn is_alive(&self) -> bool {
        self.state.container.strong_count() > 0
    }

    pub fn locking_direction(&self) -> LockingDirection {
        self.state.locking.get()
    }

    pub fn lock_scrolling(&self, direction: LockingDirection) {
        let locking = self.state.locking.get();
        if !locking.contains(direction) {
            log::trace!("lock {direction:?}");
            self.state.locking.set(locking | direction);
        }
    }

    pub fn unlock_scrolling(&self, direction: LockingDirection) {
        let locking = self.state.locking.get();
        if locking.intersects(direction) {
            log::trace!("unlock {direction:?}");
            self.state.locking.set(locking - direction);
        }
    }

    pub fn current_offset(&self) -> Option<Point> {
        self.state
            .container()
            .map(|container| container.geometry().content_offset)
    }

    pub fn scrollable_edges(&self) -> Option<ScrollableEdges> {
        self.state
            .container()
            .map(|container| container.geometry().scrollable_edges())
    }

    /// Write the content offset, bypassing the lock.
    pub fn set_offset(&self, offset: Point) {
        self.state.set_offset(offset);
    }

    /// Move the content exactly to `edge`, bypassing the lock.
    pub fn scroll_to_edge(&self, edge: ScrollEdge) {
        let Some(container) = self.state.container() else {
            return;
        };
        let target = container.geometry().offset_at_edge(edge);
        drop(container);
        log::debug!("scrolling {:?} to {edge:?}", self.container_id);
        self.state.set_offset(target);
    }

    /// Unlock both axes and stop observing the container.
    pub fn end_tracking(&self) {
        self.state.locking.set(LockingDirection::empty());
        if let Some(id) = self.observer.take() {
            if let Some(container) = self.state.container.upgrade() {
                container.remove_offset_observer(id);
            }
            log::debug!("stopped tracking scroll container {:?}", self.container_id);
        }
    }
}

impl Drop for ScrollLockController {
    fn drop(&mut self) {
        self.end_tracking();
    }
}

impl std::fmt::Debug for ScrollLockController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLockController")
            .field("container", &self.container_id)
            .field("locking", &self.state.locking.get())
            .field("alive", &self.is_alive())
            .finish()
    }
}
