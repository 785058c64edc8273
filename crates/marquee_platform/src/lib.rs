//! Marquee Platform Boundary
//!
//! Types the host platform uses to feed input into a marquee widget.
//!
//! # Architecture
//!
//! - [`TouchEvent`] - raw touch events delivered by the platform
//! - [`TouchReceiver`] - tracks one gesture and simplifies it
//! - [`TouchResponder`] - implemented by whatever reacts to the gesture
//!
//! # Example
//!
//! ```ignore
//! use marquee_platform::*;
//!
//! let mut receiver = TouchReceiver::new();
//! // From the platform's touch callback
//! receiver.dispatch(&TouchEvent::Started { id: 1, x: 12.0, y: 8.0 }, &mut marquee)?;
//! receiver.dispatch(&TouchEvent::Ended { id: 1, x: 12.0, y: 8.0 }, &mut marquee)?;
//! ```

mod error;
mod input;
mod touch;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use input::TouchEvent;
pub use touch::{TouchReceiver, TouchResponder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::input::TouchEvent;
    pub use crate::touch::{TouchReceiver, TouchResponder};
}
