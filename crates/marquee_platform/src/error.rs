//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// Touch event carried a non-finite coordinate
    #[error("Invalid touch position ({x}, {y})")]
    InvalidTouchPosition { x: f32, y: f32 },

    /// Touch event for a gesture this receiver is not tracking
    #[error("Touch {0} is not being tracked")]
    UnknownTouch(u64),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
