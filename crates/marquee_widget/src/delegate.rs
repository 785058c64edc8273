//! Delegate capability
//!
//! The delegate is the source of truth for marquee content. The widget asks
//! it for the item count and per-item sizes whenever it needs them and never
//! caches its answers beyond one reload.

use crate::item::ItemSlot;

/// Supplies content and sizing to a marquee
///
/// Only [`number_of_items`](Self::number_of_items),
/// [`create_item`](Self::create_item) and [`update_item`](Self::update_item)
/// are required. Sizing hints return `None` when the delegate does not
/// provide them; which hints are mandatory depends on the direction:
///
/// - `Left` requires [`item_width`](Self::item_width)
/// - `Up` with dynamic height requires [`item_height`](Self::item_height)
///
/// Callbacks run synchronously on the widget's thread and must not call
/// back into the widget's control methods.
pub trait MarqueeDelegate {
    /// Number of data items
    fn number_of_items(&self) -> usize;

    /// Build the content of a fresh (or cleared) slot
    fn create_item(&mut self, slot: &mut ItemSlot);

    /// Show data item `index` in `slot`
    fn update_item(&mut self, slot: &mut ItemSlot, index: usize);

    /// Items visible at once when paging up with fixed heights
    fn number_of_visible_items(&self) -> Option<usize> {
        None
    }

    /// Width of item `index` when scrolling left
    fn item_width(&self, _index: usize) -> Option<f32> {
        None
    }

    /// Height of item `index` when scrolling up with dynamic height
    fn item_height(&self, _index: usize) -> Option<f32> {
        None
    }

    /// Item `index` was tapped
    fn did_touch_item(&mut self, _index: usize) {}
}
