//! Item slots
//!
//! An [`ItemSlot`] is one reusable visual unit of the marquee. Slots are owned
//! by the scroll orchestrator, created lazily, filled by the delegate, and
//! recycled as content scrolls out of view.

use marquee_core::{Rect, Surface, SurfaceId};
use slotmap::new_key_type;

new_key_type! {
    /// Stable identity of a live slot
    ///
    /// Keys are never reused, so a slot destroyed on reload can not be
    /// mistaken for its replacement.
    pub struct SlotId;
}

/// A reusable container for one content item
#[derive(Debug)]
pub struct ItemSlot {
    id: SlotId,
    created: bool,
    frame: Rect,
    data_index: Option<usize>,
    surface: Surface,
}

impl ItemSlot {
    pub(crate) fn new(id: SlotId, surface: SurfaceId) -> Self {
        Self {
            id,
            created: false,
            frame: Rect::ZERO,
            data_index: None,
            surface: Surface::new(surface),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Whether the delegate has built this slot's content
    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn width(&self) -> f32 {
        self.frame.width()
    }

    pub fn height(&self) -> f32 {
        self.frame.height()
    }

    /// Position and size in widget coordinates
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Logical data index currently shown, if any
    pub fn data_index(&self) -> Option<usize> {
        self.data_index
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Reset for reuse: drops delegate content and marks the slot uncreated
    pub fn clear(&mut self) {
        self.surface.clear();
        self.created = false;
        self.data_index = None;
    }

    pub(crate) fn mark_created(&mut self) {
        self.created = true;
    }

    pub(crate) fn set_data_index(&mut self, index: usize) {
        self.data_index = Some(index);
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }
}
