//! Widget error types

use std::path::PathBuf;

use thiserror::Error;

/// Configuration faults detected when scrolling is started
///
/// These never escape the control API; the widget logs them once, stops
/// scrolling and exposes the fault through `MarqueeView::fault`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarqueeError {
    /// Leftward scrolling needs a width for every item
    #[error("delegate provides no item width; required when scrolling left")]
    MissingWidthHint,

    /// Upward scrolling with dynamic height needs a height for every item
    #[error("delegate provides no item height; required when scrolling up with dynamic height")]
    MissingHeightHint,
}

/// Errors loading a [`MarqueeConfig`](crate::MarqueeConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
