//! Marquee Animation System
//!
//! Timing primitives for scrolling content.
//!
//! # Features
//!
//! - **Tick Scheduling**: cancellable periodic tasks in fixed-interval or
//!   per-frame mode, advanced explicitly by the host frame loop
//! - **Tweens**: fixed-duration eased transitions for discrete page moves
//! - **Easing**: the common platform easing curves

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{TaskId, Tick, TickMode, TickScheduler, Ticks};
pub use tween::Tween;
