use std::cell::Cell;
use std::rc::Rc;

use snapdrag_core::Runtime;
use snapdrag_foundation::{Blanket, BlanketConfig, Detent, PointerSample};
use snapdrag_testing::{locator_for, pump_frames, pump_until_idle, DragScript, SimulatedScrollView};
use snapdrag_ui_graphics::{EdgeInsets, Point, Size};

struct Harness {
    runtime: Runtime,
    blanket: Blanket,
    dismissals: Rc<Cell<usize>>,
}

impl Harness {
    fn new() -> Self {
        let runtime = Runtime::new();
        let mut blanket =
            Blanket::new(BlanketConfig::default(), runtime.handle()).expect("valid config");
        blanket.set_maximum_size(Size::new(320.0, 500.0));
        blanket.set_content_size(Size::new(320.0, 200.0));
        blanket.set_safe_area_insets(EdgeInsets {
            bottom: 34.0,
            ..EdgeInsets::default()
        });

        let dismissals = Rc::new(Cell::new(0));
        {
            let dismissals = Rc::clone(&dismissals);
            blanket.set_on_dismiss(move || dismissals.set(dismissals.get() + 1));
        }
        Self {
            runtime,
            blanket,
            dismissals,
        }
    }

    fn presented() -> Self {
        let mut harness = Self::new();
        harness.blanket.present();
        harness.settle();
        harness
    }

    fn presented_over(view: &Rc<SimulatedScrollView>) -> Self {
        let mut harness = Self::new();
        harness.blanket = harness.blanket.with_locator(locator_for(view));
        harness.blanket.present();
        harness.settle();
        harness
    }

    fn feed(&mut self, samples: &[PointerSample]) {
        for sample in samples {
            self.blanket.handle_sample(sample);
        }
    }

    fn settle(&self) {
        pump_until_idle(&self.runtime.handle());
    }
}

#[test]
fn hidden_until_presented() {
    let harness = Harness::new();
    assert!(!harness.blanket.is_presented());
    assert_eq!(harness.blanket.hiding_offset(), 234.0);
    assert_eq!(harness.blanket.content_offset(), 234.0);

    let offsets: Vec<f32> = harness
        .blanket
        .detents()
        .expect("resolved")
        .iter()
        .map(|detent| detent.offset)
        .collect();
    assert_eq!(offsets, vec![200.0, 400.0, 500.0]);
}

#[test]
fn present_then_dismiss() {
    let mut harness = Harness::presented();
    assert!(harness.blanket.is_presented());
    assert_eq!(harness.blanket.content_offset(), 0.0);
    assert_eq!(harness.dismissals.get(), 0);

    harness.blanket.dismiss();
    assert!(!harness.blanket.is_presented());
    assert!(harness.blanket.is_animating());
    harness.settle();

    assert_eq!(harness.blanket.content_offset(), 234.0);
    assert_eq!(harness.dismissals.get(), 1);
}

#[test]
fn stretch_settles_on_the_nearest_detent() {
    let mut harness = Harness::presented();

    let script = DragScript::new(100.0, 10.0).moves(3, 0.0, -50.0);
    harness.feed(script.samples());
    assert_eq!(harness.blanket.custom_height(), Some(350.0));
    assert_eq!(harness.blanket.content_offset(), 0.0);

    harness.feed(&script.end_with_velocity(0.0, 0.0)[4..]);
    harness.settle();

    assert_eq!(harness.blanket.custom_height(), Some(400.0));
    assert_eq!(harness.blanket.content_offset(), 0.0);
    assert!(harness.blanket.is_presented());
}

#[test]
fn stretch_is_clamped_to_the_largest_detent() {
    let mut harness = Harness::presented();

    harness.feed(DragScript::new(100.0, 10.0).move_by(0.0, -400.0).samples());
    assert_eq!(harness.blanket.custom_height(), Some(500.0));
}

#[test]
fn short_pull_returns_to_rest() {
    let mut harness = Harness::presented();

    let script = DragScript::new(100.0, 10.0).move_by(0.0, 30.0);
    harness.feed(script.samples());
    assert_eq!(harness.blanket.custom_height(), None);
    assert_eq!(harness.blanket.content_offset(), 30.0);

    harness.feed(&script.end_with_velocity(0.0, 0.0)[2..]);
    harness.settle();

    assert_eq!(harness.blanket.content_offset(), 0.0);
    assert!(harness.blanket.is_presented());
    assert_eq!(harness.dismissals.get(), 0);
}

#[test]
fn long_pull_hides_the_sheet() {
    let mut harness = Harness::presented();

    harness.feed(
        &DragScript::new(100.0, 10.0)
            .moves(2, 0.0, 40.0)
            .end_with_velocity(0.0, 0.0),
    );
    assert!(!harness.blanket.is_presented());
    harness.settle();

    assert_eq!(harness.blanket.content_offset(), 234.0);
    assert_eq!(harness.dismissals.get(), 1);
}

#[test]
fn downward_flick_hides_the_sheet() {
    let mut harness = Harness::presented();

    harness.feed(
        &DragScript::new(100.0, 10.0)
            .move_by(0.0, 10.0)
            .end_with_velocity(0.0, 600.0),
    );
    harness.settle();

    assert!(!harness.blanket.is_presented());
    assert_eq!(harness.blanket.content_offset(), 234.0);
    assert_eq!(harness.dismissals.get(), 1);
}

#[test]
fn touch_handed_to_the_list_still_holds_the_sheet() {
    let list = SimulatedScrollView::vertical(1, 1_000.0, 400.0);
    list.scroll_to(Point::new(0.0, 600.0));
    let mut harness = Harness::presented_over(&list);

    // The list is at its bottom, so pushing up stretches the sheet.
    harness.feed(
        &DragScript::new(100.0, 300.0)
            .moves(3, 0.0, -50.0)
            .end_with_velocity(0.0, 0.0),
    );
    assert!(harness.blanket.is_animating());
    pump_frames(&harness.runtime.handle(), 3);
    let caught_at = harness.blanket.custom_height().expect("stretched");
    assert!(caught_at > 350.0 && caught_at < 400.0, "height {caught_at}");

    // Mid-list, the next touch scrolls the list and never reaches the sheet.
    list.scroll_to(Point::new(0.0, 300.0));
    harness.feed(DragScript::new(100.0, 300.0).move_by(0.0, -4.0).samples());
    assert!(!harness.blanket.is_animating());

    pump_frames(&harness.runtime.handle(), 20);
    assert_eq!(harness.blanket.custom_height(), Some(caught_at));
    assert_eq!(harness.blanket.content_offset(), 0.0);
}

#[test]
fn single_detent_pins_the_stretch() {
    let runtime = Runtime::new();
    let config = BlanketConfig::default().with_detents(&[Detent::CONTENT]);
    let mut blanket = Blanket::new(config, runtime.handle()).expect("valid");
    blanket.set_maximum_size(Size::new(320.0, 500.0));
    blanket.set_content_size(Size::new(320.0, 200.0));
    blanket.present();
    pump_until_idle(&runtime.handle());

    for sample in DragScript::new(0.0, 0.0).move_by(0.0, -30.0).samples() {
        blanket.handle_sample(sample);
    }
    assert_eq!(blanket.custom_height(), Some(200.0));
    assert_eq!(blanket.content_offset(), 0.0);
}
