//! Marquee configuration
//!
//! Every field has a default, so a config file only lists what it changes:
//!
//! ```toml
//! direction = "left"
//! scroll_speed = 60.0
//! item_spacing = 12.0
//! touch_enabled = true
//! ```
//!
//! Fields that only apply to one direction are ignored by the other.

use std::fs;
use std::path::Path;
use std::time::Duration;

use marquee_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default time between page scrolls
pub const DEFAULT_SCROLL_INTERVAL: Duration = Duration::from_secs(4);
/// Default duration of one page transition
pub const DEFAULT_SCROLL_ANIMATION_DURATION: Duration = Duration::from_secs(1);
/// Default continuous scroll speed (points per second)
pub const DEFAULT_SCROLL_SPEED: f32 = 40.0;
/// Default gap between items when scrolling left
pub const DEFAULT_ITEM_SPACING: f32 = 20.0;

/// Scroll direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Pages move upward
    #[default]
    Up,
    /// A continuous strip moves leftward
    Left,
}

/// Marquee configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Scroll direction
    pub direction: Direction,
    /// Time between page scrolls (Up, fixed height)
    #[serde(with = "duration_secs")]
    pub scroll_interval: Duration,
    /// Duration of one page transition (Up, fixed height)
    #[serde(with = "duration_secs")]
    pub scroll_animation_duration: Duration,
    /// Easing of page transitions (Up, fixed height)
    pub scroll_easing: Easing,
    /// Take item heights from the delegate and scroll continuously (Up)
    pub use_dynamic_height: bool,
    /// Continuous speed in points per second (Left, and Up with dynamic height)
    pub scroll_speed: f32,
    /// Gap between items (Left)
    pub item_spacing: f32,
    /// Do not scroll when all content fits in the viewport
    pub stop_when_less_data: bool,
    /// Clip item drawing to the widget bounds
    pub clips_to_bounds: bool,
    /// Report taps on items to the delegate
    pub touch_enabled: bool,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Up,
            scroll_interval: DEFAULT_SCROLL_INTERVAL,
            scroll_animation_duration: DEFAULT_SCROLL_ANIMATION_DURATION,
            scroll_easing: Easing::EaseInOut,
            use_dynamic_height: false,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            item_spacing: DEFAULT_ITEM_SPACING,
            stop_when_less_data: false,
            clips_to_bounds: false,
            touch_enabled: false,
        }
    }
}

impl MarqueeConfig {
    /// Create a default config scrolling in `direction`
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: MarqueeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded marquee config from {}", path.display());
        Ok(config)
    }

    /// Check numeric fields are in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scroll_speed.is_finite() || self.scroll_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "scroll_speed",
                reason: format!("expected a finite value >= 0, got {}", self.scroll_speed),
            });
        }
        if !self.item_spacing.is_finite() || self.item_spacing < 0.0 {
            return Err(ConfigError::Invalid {
                field: "item_spacing",
                reason: format!("expected a finite value >= 0, got {}", self.item_spacing),
            });
        }
        if self.scroll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "scroll_interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Set the scroll direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the time between page scrolls
    pub fn scroll_interval(mut self, interval: Duration) -> Self {
        self.scroll_interval = interval;
        self
    }

    /// Set the page transition duration
    pub fn scroll_animation_duration(mut self, duration: Duration) -> Self {
        self.scroll_animation_duration = duration;
        self
    }

    /// Set the page transition easing
    pub fn scroll_easing(mut self, easing: Easing) -> Self {
        self.scroll_easing = easing;
        self
    }

    /// Enable delegate-provided item heights
    pub fn use_dynamic_height(mut self, enabled: bool) -> Self {
        self.use_dynamic_height = enabled;
        self
    }

    /// Set the continuous scroll speed
    pub fn scroll_speed(mut self, speed: f32) -> Self {
        self.scroll_speed = speed;
        self
    }

    /// Set the gap between items
    pub fn item_spacing(mut self, spacing: f32) -> Self {
        self.item_spacing = spacing;
        self
    }

    /// Stop scrolling when everything fits
    pub fn stop_when_less_data(mut self, enabled: bool) -> Self {
        self.stop_when_less_data = enabled;
        self
    }

    /// Clip items to the widget bounds
    pub fn clips_to_bounds(mut self, enabled: bool) -> Self {
        self.clips_to_bounds = enabled;
        self
    }

    /// Report item taps
    pub fn touch_enabled(mut self, enabled: bool) -> Self {
        self.touch_enabled = enabled;
        self
    }
}

/// Durations as floating point seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
