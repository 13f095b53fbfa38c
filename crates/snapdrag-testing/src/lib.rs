//! Testing utilities and harness for snapdrag
//!
//! Headless stand-ins for the collaborators a host normally provides: a
//! scroll view with observable content offset, scripted pointer input and
//! frame pumping.

pub mod drag_script;
pub mod frames;
pub mod scroll_view;

pub use drag_script::DragScript;
pub use frames::{pump_frames, pump_until_idle};
pub use scroll_view::{locator_for, SimulatedScrollView};

pub mod prelude {
    pub use crate::drag_script::DragScript;
    pub use crate::frames::{pump_frames, pump_until_idle};
    pub use crate::scroll_view::{locator_for, SimulatedScrollView};
}
