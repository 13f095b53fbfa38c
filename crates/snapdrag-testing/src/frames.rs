//! Frame pumping at 60 FPS.

use snapdrag_core::{RuntimeHandle, FRAME_NANOS_60HZ};

/// Drain up to `frames` frames, continuing from the last drained frame time.
/// Stops early once nothing is scheduled. Returns the frames drained.
pub fn pump_frames(runtime: &RuntimeHandle, frames: usize) -> usize {
    let mut time = runtime.last_frame_nanos().unwrap_or(0);
    let mut drained = 0;
    while drained < frames && runtime.has_frame_callbacks() {
        time += FRAME_NANOS_60HZ;
        runtime.drain_frame_callbacks(time);
        drained += 1;
    }
    drained
}

/// Pump until every animation settles; 30 simulated seconds at most.
pub fn pump_until_idle(runtime: &RuntimeHandle) -> usize {
    pump_frames(runtime, 60 * 30)
}
