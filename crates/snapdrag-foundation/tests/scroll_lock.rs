use std::rc::Rc;

use snapdrag_foundation::{LockingDirection, ScrollEdge, ScrollLockController, ScrollableEdges};
use snapdrag_testing::SimulatedScrollView;
use snapdrag_ui_graphics::Point;

fn locked_view() -> (Rc<SimulatedScrollView>, ScrollLockController) {
    let view = SimulatedScrollView::vertical(1, 1_000.0, 400.0);
    view.scroll_to(Point::new(0.0, 100.0));
    let controller = ScrollLockController::new(&view.as_container());
    (view, controller)
}

#[test]
fn locked_axis_reverts_external_writes() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::VERTICAL);

    let writes = view.write_count();
    view.scroll_to(Point::new(0.0, 160.0));

    assert_eq!(view.offset(), Point::new(0.0, 100.0));
    assert_eq!(
        view.write_count(),
        writes + 2,
        "one external write and one correction"
    );
}

#[test]
fn unlocked_axis_passes_writes_through() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::HORIZONTAL);

    view.scroll_to(Point::new(0.0, 160.0));
    assert_eq!(view.offset(), Point::new(0.0, 160.0));

    controller.lock_scrolling(LockingDirection::VERTICAL);
    controller.unlock_scrolling(LockingDirection::all());
    assert!(controller.locking_direction().is_empty());

    let writes = view.write_count();
    view.scroll_to(Point::new(0.0, 10.0));
    assert_eq!(view.offset(), Point::new(0.0, 10.0));
    assert_eq!(view.write_count(), writes + 1);
}

#[test]
fn only_the_locked_component_is_reverted() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::VERTICAL);

    view.scroll_to(Point::new(40.0, 130.0));
    assert_eq!(view.offset(), Point::new(40.0, 100.0));
}

#[test]
fn redundant_notifications_are_not_corrected() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::VERTICAL);

    let writes = view.write_count();
    view.scroll_to(Point::new(0.0, 100.0));
    assert_eq!(view.write_count(), writes + 1);
    assert_eq!(view.offset(), Point::new(0.0, 100.0));
}

#[test]
fn repeated_external_writes_are_each_corrected() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::VERTICAL);

    for step in 1..=5 {
        view.scroll_by(0.0, 7.0 * step as f32);
        assert_eq!(view.offset(), Point::new(0.0, 100.0), "write {step}");
    }
}

#[test]
fn relocking_after_a_pass_through_reverts_the_next_write() {
    let (view, controller) = locked_view();

    controller.lock_scrolling(LockingDirection::HORIZONTAL);
    view.scroll_to(Point::new(0.0, 160.0));
    assert_eq!(view.offset(), Point::new(0.0, 160.0));

    controller.lock_scrolling(LockingDirection::VERTICAL);
    view.scroll_to(Point::new(0.0, 200.0));
    assert_eq!(view.offset(), Point::new(0.0, 160.0));

    controller.unlock_scrolling(LockingDirection::all());
    view.scroll_to(Point::new(0.0, 240.0));
    assert_eq!(view.offset(), Point::new(0.0, 240.0));

    controller.lock_scrolling(LockingDirection::VERTICAL);
    view.scroll_to(Point::new(0.0, 300.0));
    assert_eq!(view.offset(), Point::new(0.0, 240.0));
}

#[test]
fn own_writes_bypass_the_lock() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::VERTICAL);

    controller.set_offset(Point::new(0.0, 80.0));
    assert_eq!(view.offset(), Point::new(0.0, 80.0));
    assert_eq!(controller.locking_direction(), LockingDirection::VERTICAL);

    controller.scroll_to_edge(ScrollEdge::Bottom);
    assert_eq!(view.offset(), Point::new(0.0, 600.0));
    assert_eq!(controller.current_offset(), Some(Point::new(0.0, 600.0)));
    assert_eq!(controller.scrollable_edges(), Some(ScrollableEdges::TOP));

    controller.scroll_to_edge(ScrollEdge::Top);
    assert_eq!(view.offset(), Point::ZERO);
}

#[test]
fn end_tracking_unlocks_and_unsubscribes() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::all());
    assert_eq!(view.observer_count(), 1);

    controller.end_tracking();
    assert!(controller.locking_direction().is_empty());
    assert_eq!(view.observer_count(), 0);

    controller.end_tracking();
    assert_eq!(view.observer_count(), 0);
}

#[test]
fn dropping_the_controller_unsubscribes() {
    let (view, controller) = locked_view();
    assert_eq!(view.observer_count(), 1);
    drop(controller);
    assert_eq!(view.observer_count(), 0);
}

#[test]
fn dropped_container_makes_the_controller_inert() {
    let (view, controller) = locked_view();
    controller.lock_scrolling(LockingDirection::VERTICAL);
    assert!(controller.is_alive());

    drop(view);

    assert!(!controller.is_alive());
    assert_eq!(controller.current_offset(), None);
    assert_eq!(controller.scrollable_edges(), None);
    controller.scroll_to_edge(ScrollEdge::Top);
    controller.set_offset(Point::ZERO);
    controller.end_tracking();
}
