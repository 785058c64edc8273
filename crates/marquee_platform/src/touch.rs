//! Touch capture surface
//!
//! [`TouchReceiver`] sits over a widget and turns raw [`TouchEvent`]s into the
//! three calls a [`TouchResponder`] cares about. It keeps track of which touch
//! started the current gesture but makes no decision about what a touch means.

use marquee_core::Point;

use crate::error::{PlatformError, Result};
use crate::input::TouchEvent;

/// Receiver of simplified touch gestures
pub trait TouchResponder {
    /// A finger went down on the widget
    fn touches_began(&mut self);

    /// The finger lifted at `point` (widget coordinates)
    fn touches_ended_at(&mut self, point: Point);

    /// The system took the gesture away
    fn touches_cancelled(&mut self);
}

/// Single-gesture touch tracker
///
/// Only the first touch of a gesture is followed; additional fingers and
/// movement are ignored.
#[derive(Debug, Default)]
pub struct TouchReceiver {
    active: Option<u64>,
}

impl TouchReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture is in progress
    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Forget the current gesture without notifying anyone
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Forward one platform event to `responder`
    ///
    /// Events for touches other than the tracked one are rejected with
    /// [`PlatformError::UnknownTouch`]; a non-finite end position cancels the
    /// gesture and reports [`PlatformError::InvalidTouchPosition`].
    pub fn dispatch<R>(&mut self, event: &TouchEvent, responder: &mut R) -> Result<()>
    where
        R: TouchResponder + ?Sized,
    {
        match *event {
            TouchEvent::Started { id, .. } => {
                if self.active.is_some() {
                    tracing::trace!("TouchReceiver: ignoring extra touch {}", id);
                    return Ok(());
                }
                self.active = Some(id);
                responder.touches_began();
                Ok(())
            }
            TouchEvent::Moved { id, .. } => self.check_tracked(id),
            TouchEvent::Ended { id, x, y } => {
                self.check_tracked(id)?;
                self.active = None;

                if !x.is_finite() || !y.is_finite() {
                    responder.touches_cancelled();
                    return Err(PlatformError::InvalidTouchPosition { x, y });
                }
                responder.touches_ended_at(Point::new(x, y));
                Ok(())
            }
            TouchEvent::Cancelled { id } => {
                self.check_tracked(id)?;
                self.active = None;
                responder.touches_cancelled();
                Ok(())
            }
        }
    }

    fn check_tracked(&self, id: u64) -> Result<()> {
        match self.active {
            Some(active) if active == id => Ok(()),
            _ => Err(PlatformError::UnknownTouch(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Recorder {
        began: usize,
        ended: Vec<Point>,
        cancelled: usize,
    }

    impl TouchResponder for Recorder {
        fn touches_began(&mut self) {
            self.began += 1;
        }

        fn touches_ended_at(&mut self, point: Point) {
            self.ended.push(point);
        }

        fn touches_cancelled(&mut self) {
            self.cancelled += 1;
        }
    }

    #[test]
    fn test_tap_is_forwarded() {
        let mut receiver = TouchReceiver::new();
        let mut recorder = Recorder::default();

        receiver
            .dispatch(&TouchEvent::Started { id: 1, x: 5.0, y: 5.0 }, &mut recorder)
            .unwrap();
        assert!(receiver.is_tracking());
        receiver
            .dispatch(&TouchEvent::Moved { id: 1, x: 8.0, y: 5.0 }, &mut recorder)
            .unwrap();
        receiver
            .dispatch(&TouchEvent::Ended { id: 1, x: 9.0, y: 6.0 }, &mut recorder)
            .unwrap();

        assert_eq!(recorder.began, 1);
        assert_eq!(recorder.ended, vec![Point::new(9.0, 6.0)]);
        assert_eq!(recorder.cancelled, 0);
        assert!(!receiver.is_tracking());
    }

    #[test]
    fn test_second_finger_is_ignored() {
        let mut receiver = TouchReceiver::new();
        let mut recorder = Recorder::default();

        receiver
            .dispatch(&TouchEvent::Started { id: 1, x: 0.0, y: 0.0 }, &mut recorder)
            .unwrap();
        receiver
            .dispatch(&TouchEvent::Started { id: 2, x: 1.0, y: 1.0 }, &mut recorder)
            .unwrap();
        assert_eq!(recorder.began, 1);

        let err = receiver
            .dispatch(&TouchEvent::Ended { id: 2, x: 1.0, y: 1.0 }, &mut recorder)
            .unwrap_err();
        assert_eq!(err, PlatformError::UnknownTouch(2));
        assert!(recorder.ended.is_empty());
    }

    #[test]
    fn test_cancel_notifies_without_point() {
        let mut receiver = TouchReceiver::new();
        let mut recorder = Recorder::default();

        receiver
            .dispatch(&TouchEvent::Started { id: 4, x: 0.0, y: 0.0 }, &mut recorder)
            .unwrap();
        receiver
            .dispatch(&TouchEvent::Cancelled { id: 4 }, &mut recorder)
            .unwrap();

        assert_eq!(recorder.cancelled, 1);
        assert!(recorder.ended.is_empty());
        assert!(!receiver.is_tracking());
    }

    #[test]
    fn test_non_finite_end_cancels() {
        let mut receiver = TouchReceiver::new();
        let mut recorder = Recorder::default();

        receiver
            .dispatch(&TouchEvent::Started { id: 1, x: 0.0, y: 0.0 }, &mut recorder)
            .unwrap();
        let result = receiver.dispatch(
            &TouchEvent::Ended {
                id: 1,
                x: f32::NAN,
                y: 0.0,
            },
            &mut recorder,
        );

        assert!(matches!(
            result,
            Err(PlatformError::InvalidTouchPosition { .. })
        ));
        assert_eq!(recorder.cancelled, 1);
        assert!(!receiver.is_tracking());
    }
}
