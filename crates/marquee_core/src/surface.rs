//! Opaque drawable surfaces
//!
//! A [`Surface`] stands in for the platform view that backs one marquee item.
//! The widget never looks inside it: it only positions the surface and asks
//! the delegate to fill or refresh it. Delegates keep whatever they build for
//! an item (labels, image handles, platform view pointers) as typed content.

use std::any::Any;
use std::fmt;

/// Unique surface identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Generator for unique surface IDs
#[derive(Debug)]
pub struct SurfaceIdGenerator {
    next: u64,
}

impl Default for SurfaceIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next);
        self.next += 1;
        id
    }
}

/// Drawable handle owned by an item slot
pub struct Surface {
    id: SurfaceId,
    content: Option<Box<dyn Any>>,
}

impl Surface {
    pub fn new(id: SurfaceId) -> Self {
        Self { id, content: None }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Store delegate-built content, replacing anything stored before
    pub fn set_content<T: Any>(&mut self, content: T) {
        self.content = Some(Box::new(content));
    }

    /// Borrow the stored content if it has type `T`
    pub fn content<T: Any>(&self) -> Option<&T> {
        self.content.as_ref().and_then(|c| c.downcast_ref::<T>())
    }

    /// Mutably borrow the stored content if it has type `T`
    pub fn content_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.content.as_mut().and_then(|c| c.downcast_mut::<T>())
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Drop all stored content
    pub fn clear(&mut self) {
        self.content = None;
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ids = SurfaceIdGenerator::new();
        let a = ids.next();
        let b = ids.next();
        assert_ne!(a, b);
        assert_eq!(a, SurfaceId(1));
    }

    #[test]
    fn test_typed_content() {
        let mut surface = Surface::new(SurfaceId::new(7));
        assert!(!surface.has_content());

        surface.set_content(String::from("headline"));
        assert_eq!(surface.content::<String>().map(String::as_str), Some("headline"));
        assert!(surface.content::<u32>().is_none());

        if let Some(text) = surface.content_mut::<String>() {
            text.push('!');
        }
        assert_eq!(surface.content::<String>().map(String::as_str), Some("headline!"));

        surface.clear();
        assert!(!surface.has_content());
        assert_eq!(surface.id(), SurfaceId(7));
    }
}
