//! Marquee Widget
//!
//! A delegate-driven scrolling marquee with slot recycling.
//!
//! # Architecture
//!
//! The widget is split into a few small pieces:
//!
//! 1. **Delegate**: the host implements [`MarqueeDelegate`] to supply the
//!    item count, per-item sizes and the content drawn into each slot.
//!
//! 2. **Slot Recycling**: only enough [`ItemSlot`]s to cover the viewport
//!    (plus one buffer) are ever alive. A slot that scrolls out is refilled
//!    with the next item and moved to the far end.
//!
//! 3. **Orchestration**: [`ScrollOrchestrator`] owns the slots, the scroll
//!    state and the periodic task, and moves between stopped, running and
//!    paused states.
//!
//! Two directions are supported:
//!
//! - `Up` pages fixed-height items one page per interval, or scrolls
//!   delegate-sized items continuously when dynamic height is enabled
//! - `Left` scrolls a continuous strip of delegate-sized items
//!
//! # Example
//!
//! ```ignore
//! use marquee_widget::prelude::*;
//!
//! let mut view = MarqueeView::with_bounds(Rect::new(0.0, 0.0, 320.0, 40.0), Direction::Up);
//! view.set_delegate(&feed);
//! view.reload_data();
//! view.start();
//!
//! // From the host frame loop
//! view.tick();
//! ```

pub mod config;
pub mod delegate;
pub mod error;
pub mod item;
pub mod layout;
pub mod orchestrator;
pub mod view;

pub use config::{Direction, MarqueeConfig};
pub use delegate::MarqueeDelegate;
pub use error::{ConfigError, MarqueeError};
pub use item::{ItemSlot, SlotId};
pub use layout::{Axis, ScrollMode};
pub use orchestrator::{ScrollOffset, ScrollOrchestrator, ScrollPhase, ScrollState, SharedDelegate};
pub use view::MarqueeView;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{Direction, MarqueeConfig};
    pub use crate::delegate::MarqueeDelegate;
    pub use crate::error::{ConfigError, MarqueeError};
    pub use crate::item::{ItemSlot, SlotId};
    pub use crate::orchestrator::{ScrollOffset, ScrollPhase, ScrollState};
    pub use crate::view::MarqueeView;
    pub use marquee_animation::Easing;
    pub use marquee_core::{Point, Rect, Size};
    pub use marquee_platform::TouchEvent;
}
