//! Pure math/data for snapdrag
//!
//! Geometry primitives shared by the gesture, scroll and animation crates.
//! Everything here is `Copy` and free of side effects.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{EdgeInsets, Offset, Point, Rect, Size, Velocity};
}
