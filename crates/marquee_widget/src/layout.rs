//! Direction-specific layout math
//!
//! Pure geometry shared by the orchestrator. Nothing in here talks to the
//! delegate directly; sizes come in through closures so the orchestrator
//! decides when (and whether) the delegate is asked.
//!
//! Two motion modes exist:
//!
//! - **Paged** (Up, fixed height): `visible` equal pages fill the viewport
//!   height and the content steps up one page per interval.
//! - **Strip** (Left, or Up with dynamic height): items of individual extent
//!   are laid end to end along one axis and slide continuously.

use std::time::Duration;

use marquee_core::Rect;

use crate::config::{Direction, MarqueeConfig};

/// Axis along which a strip moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Extent of `rect` along this axis
    pub fn extent(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.width(),
            Axis::Vertical => rect.height(),
        }
    }

    /// Leading coordinate of `rect` along this axis
    pub fn position(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.x(),
            Axis::Vertical => rect.y(),
        }
    }

    /// Move `rect` by `delta` along this axis
    pub fn translate(self, rect: &Rect, delta: f32) -> Rect {
        match self {
            Axis::Horizontal => rect.offset(delta, 0.0),
            Axis::Vertical => rect.offset(0.0, delta),
        }
    }
}

/// Motion mode derived from the config
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollMode {
    /// Discrete pages moving up
    Paged,
    /// Continuous strip
    Strip { axis: Axis, spacing: f32 },
}

impl ScrollMode {
    pub fn for_config(config: &MarqueeConfig) -> Self {
        match config.direction {
            Direction::Left => ScrollMode::Strip {
                axis: Axis::Horizontal,
                spacing: sanitize_extent(config.item_spacing),
            },
            Direction::Up if config.use_dynamic_height => ScrollMode::Strip {
                axis: Axis::Vertical,
                spacing: 0.0,
            },
            Direction::Up => ScrollMode::Paged,
        }
    }
}

/// One item placed on a strip
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripItem {
    pub index: usize,
    pub position: f32,
    pub extent: f32,
}

/// Next logical index, wrapping at `count`
pub fn next_index(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (index + 1) % count
    }
}

/// Negative and non-finite sizes collapse to zero
pub fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Visible page count, never less than one
pub fn visible_pages(requested: Option<usize>) -> usize {
    requested.unwrap_or(1).max(1)
}

/// Height of one page
pub fn page_extent(viewport_height: f32, visible: usize) -> f32 {
    sanitize_extent(viewport_height) / visible.max(1) as f32
}

/// Live slots needed for paging: the visible pages plus one buffer
pub fn paged_slot_count(count: usize, visible: usize) -> usize {
    count.min(visible + 1)
}

/// Frame of the `k`-th page slot, shifted by the in-flight `offset`
pub fn paged_frame(bounds: &Rect, page: f32, k: usize, offset: f32) -> Rect {
    Rect::new(0.0, k as f32 * page + offset, bounds.width(), page)
}

/// Initial strip fill
///
/// Places items from `start` onward until one begins at or past the
/// viewport end (the buffer) or every item is placed. Stops early at an item
/// that takes up no room, since the strip can never reach the viewport end.
pub fn strip_fill<F>(
    viewport: f32,
    spacing: f32,
    count: usize,
    start: usize,
    mut extent_of: F,
) -> Vec<StripItem>
where
    F: FnMut(usize) -> f32,
{
    let mut items: Vec<StripItem> = Vec::new();
    let mut position = 0.0;
    let mut index = start;

    while items.len() < count {
        if items.last().is_some_and(|last| last.position >= viewport) {
            break;
        }
        let extent = sanitize_extent(extent_of(index));
        items.push(StripItem {
            index,
            position,
            extent,
        });
        if extent + spacing <= 0.0 {
            break;
        }
        position += extent + spacing;
        index = next_index(index, count);
    }
    items
}

/// Frame of a strip item
pub fn strip_frame(axis: Axis, bounds: &Rect, position: f32, extent: f32) -> Rect {
    match axis {
        Axis::Horizontal => Rect::new(position, 0.0, extent, bounds.height()),
        Axis::Vertical => Rect::new(0.0, position, bounds.width(), extent),
    }
}

/// Total footprint of a strip holding every item once
pub fn strip_content_extent<I>(extents: I, spacing: f32) -> f32
where
    I: IntoIterator<Item = f32>,
{
    let mut total = 0.0;
    let mut items = 0usize;
    for extent in extents {
        total += sanitize_extent(extent);
        items += 1;
    }
    if items > 1 {
        total += spacing * (items - 1) as f32;
    }
    total
}

/// Total footprint of `count` pages
pub fn paged_content_extent(count: usize, page: f32) -> f32 {
    count as f32 * page
}

/// Whether content already fits, so scrolling can be skipped
pub fn fits_viewport(content: f32, viewport: f32) -> bool {
    content <= viewport
}

/// Distance travelled in `dt` at `speed` points per second
pub fn frame_step(speed: f32, dt: Duration) -> f32 {
    sanitize_extent(speed) * dt.as_secs_f32()
}
