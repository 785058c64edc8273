//! Marquee Core
//!
//! Foundational primitives shared by the marquee crates:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in widget-local coordinates
//! - **Surfaces**: opaque drawable handles that item slots hand to the delegate

pub mod geometry;
pub mod surface;

pub use geometry::{Point, Rect, Size};
pub use surface::{Surface, SurfaceId, SurfaceIdGenerator};
