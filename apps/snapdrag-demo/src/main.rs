//! Replays two scripted interactions against the engine and logs every
//! frame: a card swiped off screen, and a bottom sheet pulled down over a list.

use anyhow::Result;
use snapdrag_core::{MonotonicClock, Runtime};
use snapdrag_foundation::{
    Axes, Blanket, BlanketConfig, Boundary, SnapDraggable, SnapDraggingConfig,
    SnapDraggingHandler,
};
use snapdrag_testing::{locator_for, pump_frames, DragScript, SimulatedScrollView};
use snapdrag_ui_graphics::{EdgeInsets, Offset, Point, Size, Velocity};

const CARD: Size = Size {
    width: 320.0,
    height: 120.0,
};

fn swipe_to_dismiss(runtime: &Runtime) -> Result<()> {
    log::info!("--- swipe to dismiss ---");
    let handler = SnapDraggingHandler::new()
        .on_start_dragging(|| log::info!("card picked up"))
        .on_end_dragging(|velocity: &mut Velocity, offset: Offset, size: Size| {
            if velocity.dx > 50.0 || offset.width > size.width / 2.0 {
                Offset::new(size.width, 0.0)
            } else {
                Offset::ZERO
            }
        })
        .on_complete_animation(|| log::info!("card settled"));
    let config = SnapDraggingConfig::default()
        .with_axes(Axes::HORIZONTAL)
        .with_horizontal_boundary(Boundary::new(0.0, f32::INFINITY, 50.0)?);

    let mut card = SnapDraggable::new(config, handler, runtime.handle())?;
    card.set_content_size(CARD);
    card.set_on_update(|offset| log::info!("card at {:.1}", offset.width));

    // A leftward nudge is banded, then a flick to the right.
    let samples = DragScript::new(160.0, 60.0)
        .moves(3, -10.0, 0.0)
        .moves(6, 20.0, 0.0)
        .end_with_velocity(900.0, 0.0);
    for sample in &samples {
        card.handle_sample(sample);
    }

    let frames = pump_frames(&runtime.handle(), 600);
    log::info!(
        "card rests at {:?} after {frames} frames",
        card.current_offset()
    );
    Ok(())
}

fn sheet_over_list(runtime: &Runtime) -> Result<()> {
    log::info!("--- sheet over a list ---");
    let list = SimulatedScrollView::vertical(1, 1_200.0, 200.0);
    list.scroll_to(Point::new(0.0, 40.0));

    let mut sheet =
        Blanket::new(BlanketConfig::default(), runtime.handle())?.with_locator(locator_for(&list));
    sheet.set_maximum_size(Size::new(320.0, 600.0));
    sheet.set_content_size(Size::new(320.0, 200.0));
    sheet.set_safe_area_insets(EdgeInsets {
        bottom: 34.0,
        ..EdgeInsets::default()
    });
    sheet.set_on_dismiss(|| log::info!("sheet dismissed"));

    sheet.present();
    pump_frames(&runtime.handle(), 600);
    log::info!("sheet presented at offset {}", sheet.content_offset());

    // The list scrolls to its top first; after that the sheet follows the
    // finger downwards.
    let mut script = DragScript::new(160.0, 100.0);
    sheet.handle_sample(&script.samples()[0]);
    for _ in 0..8 {
        script = script.move_by(0.0, 10.0);
        if let Some(sample) = script.samples().last() {
            sheet.handle_sample(sample);
        }
        if list.offset().y > 0.0 {
            list.scroll_by(0.0, -10.0);
        }
        log::info!(
            "list at {:.1}, sheet offset {:.1}",
            list.offset().y,
            sheet.content_offset()
        );
    }
    for sample in script.end_with_velocity(0.0, 400.0).iter().skip(9) {
        sheet.handle_sample(sample);
    }

    let frames = pump_frames(&runtime.handle(), 600);
    log::info!(
        "sheet at {} after {frames} frames, presented: {}",
        sheet.content_offset(),
        sheet.is_presented()
    );
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let clock = MonotonicClock::new();
    let runtime = Runtime::new();
    swipe_to_dismiss(&runtime)?;
    sheet_over_list(&runtime)?;
    log::info!("replayed in {} ms of wall time", clock.uptime_millis());
    Ok(())
}
