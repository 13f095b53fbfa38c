//! In-memory scroll view.
//!
//! Behaves like a platform scroll view as far as the engine can tell:
//! every offset write notifies observers synchronously, writes made from
//! inside an observer are applied and notified in turn.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use snapdrag_core::collections::map::HashMap;
use snapdrag_foundation::{
    ContainerId, ContentOffsetChange, ContentOffsetObserver, ObserverId, ScrollContainer,
    ScrollContainerLocator, ScrollGeometry,
};
use snapdrag_ui_graphics::{EdgeInsets, Point, Size};

pub struct SimulatedScrollView {
    id: ContainerId,
    geometry: Cell<ScrollGeometry>,
    observers: RefCell<HashMap<ObserverId, Weak<dyn ContentOffsetObserver>>>,
    next_observer: Cell<u64>,
    write_count: Cell<usize>,
}

impl SimulatedScrollView {
    pub fn new(id: u64, geometry: ScrollGeometry) -> Rc<Self> {
        Rc::new(Self {
            id: ContainerId(id),
            geometry: Cell::new(geometry),
            observers: RefCell::new(HashMap::default()),
            next_observer: Cell::new(1),
            write_count: Cell::new(0),
        })
    }

    /// Vertical list with `content_height` of content in a 320-wide viewport
    /// of `viewport_height`, scrolled to the top.
    pub fn vertical(id: u64, content_height: f32, viewport_height: f32) -> Rc<Self> {
        Self::new(
            id,
            ScrollGeometry {
                content_offset: Point::ZERO,
                content_size: Size::new(320.0, content_height),
                bounds_size: Size::new(320.0, viewport_height),
                adjusted_inset: EdgeInsets::default(),
            },
        )
    }

    pub fn as_container(self: &Rc<Self>) -> Rc<dyn ScrollContainer> {
        let container: Rc<dyn ScrollContainer> = self.clone();
        container
    }

    pub fn offset(&self) -> Point {
        self.geometry.get().content_offset
    }

    /// A user scroll: write the offset as the platform would.
    pub fn scroll_to(&self, offset: Point) {
        self.set_content_offset(offset);
    }

    pub fn scroll_by(&self, dx: f32, dy: f32) {
        let offset = self.offset();
        self.set_content_offset(Point::new(offset.x + dx, offset.y + dy));
    }

    /// Replace geometry without notifying, as a layout pass would.
    pub fn set_geometry(&self, geometry: ScrollGeometry) {
        self.geometry.set(geometry);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Number of offset writes, corrections included.
    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }

    fn notify(&self, change: ContentOffsetChange) {
        let mut observers: Vec<(ObserverId, Weak<dyn ContentOffsetObserver>)> = self
            .observers
            .borrow()
            .iter()
            .map(|(id, observer)| (*id, observer.clone()))
            .collect();
        observers.sort_by_key(|(id, _)| id.0);

        for (_, observer) in observers {
            if let Some(observer) = observer.upgrade() {
                observer.content_offset_changed(change);
            }
        }
    }
}

impl ScrollContainer for SimulatedScrollView {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn geometry(&self) -> ScrollGeometry {
        self.geometry.get()
    }

    fn set_content_offset(&self, offset: Point) {
        let mut geometry = self.geometry.get();
        let old = geometry.content_offset;
        geometry.content_offset = offset;
        self.geometry.set(geometry);
        self.write_count.set(self.write_count.get() + 1);
        log::trace!("scroll view {:?}: ({}, {}) -> ({}, {})", self.id, old.x, old.y, offset.x, offset.y);
        self.notify(ContentOffsetChange { old, new: offset });
    }

    fn add_offset_observer(&self, observer: Weak<dyn ContentOffsetObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer.get());
        self.next_observer.set(id.0 + 1);
        self.observers.borrow_mut().insert(id, observer);
        id
    }

    fn remove_offset_observer(&self, id: ObserverId) {
        self.observers.borrow_mut().remove(&id);
    }
}

/// Locator that finds `view` under every location for as long as it lives.
pub fn locator_for(view: &Rc<SimulatedScrollView>) -> Rc<dyn ScrollContainerLocator> {
    let weak = Rc::downgrade(view);
    Rc::new(move |_location: Point| -> Option<Rc<dyn ScrollContainer>> {
        weak.upgrade().map(|view| view.as_container())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(RefCell<Vec<ContentOffsetChange>>);

    impl ContentOffsetObserver for Recorder {
        fn content_offset_changed(&self, change: ContentOffsetChange) {
            self.0.borrow_mut().push(change);
        }
    }

    #[test]
    fn writes_notify_registered_observers() {
        let view = SimulatedScrollView::vertical(1, 1_000.0, 400.0);
        let recorder = Rc::new(Recorder(RefCell::new(Vec::new())));
        let weak_recorder = Rc::downgrade(&recorder);
        let weak: Weak<dyn ContentOffsetObserver> = weak_recorder;
        let id = view.add_offset_observer(weak);

        view.scroll_by(0.0, 25.0);
        assert_eq!(
            recorder.0.borrow().as_slice(),
            &[ContentOffsetChange {
                old: Point::ZERO,
                new: Point::new(0.0, 25.0)
            }]
        );

        view.remove_offset_observer(id);
        view.scroll_by(0.0, 25.0);
        assert_eq!(recorder.0.borrow().len(), 1);
        assert_eq!(view.observer_count(), 0);
    }

    #[test]
    fn locator_stops_finding_a_dropped_view() {
        let view = SimulatedScrollView::vertical(2, 1_000.0, 400.0);
        let locator = locator_for(&view);
        assert!(locator.container_at(Point::ZERO).is_some());
        drop(view);
        assert!(locator.container_at(Point::ZERO).is_none());
    }
}
