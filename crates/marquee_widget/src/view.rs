//! Marquee view
//!
//! [`MarqueeView`] is the widget the host embeds. It bundles the scroll
//! orchestrator with the touch receiver and is the only type most callers
//! need.
//!
//! # Example
//!
//! ```ignore
//! use marquee_widget::prelude::*;
//!
//! let feed = Rc::new(RefCell::new(Headlines::new()));
//!
//! let mut view = MarqueeView::with_bounds(Rect::new(0.0, 0.0, 320.0, 40.0), Direction::Left);
//! view.set_delegate(&feed);
//! view.reload_data();
//! view.start();
//!
//! // Every frame
//! view.tick();
//! for slot in view.slots() {
//!     draw(slot.frame(), slot.surface());
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use marquee_core::{Point, Rect};
use marquee_platform::{TouchEvent, TouchReceiver, TouchResponder};

use crate::config::{Direction, MarqueeConfig};
use crate::delegate::MarqueeDelegate;
use crate::error::MarqueeError;
use crate::item::{ItemSlot, SlotId};
use crate::orchestrator::{ScrollOrchestrator, ScrollPhase, ScrollState, SharedDelegate};

/// A delegate-driven scrolling marquee
pub struct MarqueeView {
    orchestrator: ScrollOrchestrator,
    touch: TouchReceiver,
}

impl MarqueeView {
    /// Create a zero-sized marquee scrolling in `direction`
    pub fn new(direction: Direction) -> Self {
        Self::with_bounds(Rect::ZERO, direction)
    }

    /// Create a marquee occupying `bounds`
    pub fn with_bounds(bounds: Rect, direction: Direction) -> Self {
        Self::with_config(bounds, MarqueeConfig::new(direction))
    }

    /// Create a marquee from a full config
    pub fn with_config(bounds: Rect, config: MarqueeConfig) -> Self {
        Self {
            orchestrator: ScrollOrchestrator::new(config, bounds),
            touch: TouchReceiver::new(),
        }
    }

    // =========================================================================
    // Delegate and configuration
    // =========================================================================

    /// Register the content delegate
    ///
    /// The view keeps a weak reference; the caller owns the delegate.
    pub fn set_delegate<D>(&mut self, delegate: &Rc<RefCell<D>>)
    where
        D: MarqueeDelegate + 'static,
    {
        self.orchestrator.set_delegate(delegate);
    }

    pub fn set_shared_delegate(&mut self, delegate: &SharedDelegate) {
        self.orchestrator.set_shared_delegate(delegate);
    }

    pub fn config(&self) -> &MarqueeConfig {
        self.orchestrator.config()
    }

    /// Replace the whole config; layout changes apply on the next reload
    pub fn set_config(&mut self, config: MarqueeConfig) {
        *self.orchestrator.config_mut() = config;
        self.sync_touch();
    }

    pub fn direction(&self) -> Direction {
        self.config().direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.orchestrator.config_mut().direction = direction;
    }

    pub fn set_scroll_interval(&mut self, interval: Duration) {
        self.orchestrator.config_mut().scroll_interval = interval;
    }

    pub fn set_scroll_animation_duration(&mut self, duration: Duration) {
        self.orchestrator.config_mut().scroll_animation_duration = duration;
    }

    pub fn set_use_dynamic_height(&mut self, enabled: bool) {
        self.orchestrator.config_mut().use_dynamic_height = enabled;
    }

    pub fn set_scroll_speed(&mut self, speed: f32) {
        self.orchestrator.config_mut().scroll_speed = speed;
    }

    pub fn set_item_spacing(&mut self, spacing: f32) {
        self.orchestrator.config_mut().item_spacing = spacing;
    }

    pub fn set_stop_when_less_data(&mut self, enabled: bool) {
        self.orchestrator.config_mut().stop_when_less_data = enabled;
    }

    pub fn set_clips_to_bounds(&mut self, enabled: bool) {
        self.orchestrator.config_mut().clips_to_bounds = enabled;
    }

    /// Turn tap reporting on or off; applies immediately
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.orchestrator.config_mut().touch_enabled = enabled;
        self.sync_touch();
    }

    pub fn bounds(&self) -> Rect {
        self.orchestrator.bounds()
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.orchestrator.set_bounds(bounds);
    }

    // =========================================================================
    // Control
    // =========================================================================

    pub fn reload_data(&mut self) {
        self.orchestrator.reload_data();
    }

    pub fn start(&mut self) {
        self.orchestrator.start();
    }

    pub fn pause(&mut self) {
        self.orchestrator.pause();
    }

    /// Stop scrolling and release every slot
    pub fn teardown(&mut self) {
        self.touch.reset();
        self.orchestrator.teardown();
    }

    /// Advance the marquee by `dt`
    pub fn advance(&mut self, dt: Duration) {
        self.orchestrator.advance(dt);
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn tick(&mut self) {
        self.orchestrator.tick();
    }

    /// Feed one platform touch event
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        if !self.config().touch_enabled && !self.touch.is_tracking() {
            return;
        }
        if let Err(err) = self.touch.dispatch(event, &mut self.orchestrator) {
            tracing::debug!("Marquee: dropped touch event {:?}: {}", event, err);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> ScrollState {
        self.orchestrator.state()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.orchestrator.phase()
    }

    pub fn is_running(&self) -> bool {
        self.phase() == ScrollPhase::Running
    }

    /// Configuration fault that stopped scrolling, if any
    pub fn fault(&self) -> Option<&MarqueeError> {
        self.orchestrator.fault()
    }

    /// Live slots in display order
    pub fn slots(&self) -> impl Iterator<Item = &ItemSlot> + '_ {
        self.orchestrator.slots()
    }

    pub fn slot(&self, id: SlotId) -> Option<&ItemSlot> {
        self.orchestrator.slot(id)
    }

    pub fn slot_count(&self) -> usize {
        self.orchestrator.slot_count()
    }

    /// Slot under `point` (widget coordinates)
    pub fn slot_at(&self, point: Point) -> Option<&ItemSlot> {
        self.orchestrator.slot_at(point)
    }

    /// Rect to clip drawing to, in widget coordinates
    pub fn clip_rect(&self) -> Option<Rect> {
        self.config()
            .clips_to_bounds
            .then(|| Rect::from(self.bounds().size()))
    }

    /// Cancel a gesture that is in flight when touch gets disabled
    fn sync_touch(&mut self) {
        if !self.config().touch_enabled && self.touch.is_tracking() {
            self.touch.reset();
            self.orchestrator.touches_cancelled();
        }
    }
}

impl Drop for MarqueeView {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ticker {
        labels: Vec<&'static str>,
        taps: Vec<usize>,
    }

    impl MarqueeDelegate for Ticker {
        fn number_of_items(&self) -> usize {
            self.labels.len()
        }

        fn create_item(&mut self, slot: &mut ItemSlot) {
            slot.surface_mut().set_content("");
        }

        fn update_item(&mut self, slot: &mut ItemSlot, index: usize) {
            slot.surface_mut().set_content(self.labels[index]);
        }

        fn item_width(&self, index: usize) -> Option<f32> {
            Some(self.labels[index].len() as f32 * 10.0)
        }

        fn did_touch_item(&mut self, index: usize) {
            self.taps.push(index);
        }
    }

    fn ticker() -> Rc<RefCell<Ticker>> {
        Rc::new(RefCell::new(Ticker {
            labels: vec!["alpha", "beta", "gamma", "delta"],
            ..Default::default()
        }))
    }

    fn view(feed: &Rc<RefCell<Ticker>>) -> MarqueeView {
        let mut view = MarqueeView::with_bounds(Rect::new(0.0, 0.0, 120.0, 24.0), Direction::Left);
        view.set_touch_enabled(true);
        view.set_delegate(feed);
        view.reload_data();
        view
    }

    #[test]
    fn test_touch_events_report_taps() {
        let feed = ticker();
        let mut view = view(&feed);
        view.start();

        // "alpha" spans 0..50
        view.handle_touch(&TouchEvent::Started { id: 7, x: 10.0, y: 5.0 });
        assert_eq!(view.phase(), ScrollPhase::Paused);
        view.handle_touch(&TouchEvent::Moved { id: 7, x: 12.0, y: 5.0 });
        view.handle_touch(&TouchEvent::Ended { id: 7, x: 12.0, y: 5.0 });

        assert_eq!(feed.borrow().taps, vec![0]);
        assert!(view.is_running());
    }

    #[test]
    fn test_touch_ignored_when_disabled() {
        let feed = ticker();
        let mut view = view(&feed);
        view.set_touch_enabled(false);
        view.start();

        view.handle_touch(&TouchEvent::Started { id: 1, x: 10.0, y: 5.0 });
        view.handle_touch(&TouchEvent::Ended { id: 1, x: 10.0, y: 5.0 });
        assert!(feed.borrow().taps.is_empty());
        assert!(view.is_running());
    }

    #[test]
    fn test_disabling_touch_mid_gesture_resumes() {
        let feed = ticker();
        let mut view = view(&feed);
        view.start();

        view.handle_touch(&TouchEvent::Started { id: 1, x: 10.0, y: 5.0 });
        assert!(!view.is_running());
        view.set_touch_enabled(false);
        assert!(view.is_running());

        view.handle_touch(&TouchEvent::Ended { id: 1, x: 10.0, y: 5.0 });
        assert!(feed.borrow().taps.is_empty());
    }

    #[test]
    fn test_invalid_end_position_cancels() {
        let feed = ticker();
        let mut view = view(&feed);
        view.start();

        view.handle_touch(&TouchEvent::Started { id: 3, x: 10.0, y: 5.0 });
        view.handle_touch(&TouchEvent::Ended {
            id: 3,
            x: f32::NAN,
            y: 5.0,
        });
        assert!(feed.borrow().taps.is_empty());
        assert!(view.is_running());
    }

    #[test]
    fn test_clip_rect_follows_config() {
        let feed = ticker();
        let mut view = view(&feed);
        assert_eq!(view.clip_rect(), None);

        view.set_clips_to_bounds(true);
        view.set_bounds(Rect::new(30.0, 40.0, 120.0, 24.0));
        assert_eq!(view.clip_rect(), Some(Rect::new(0.0, 0.0, 120.0, 24.0)));
    }

    #[test]
    fn test_surfaces_carry_delegate_content() {
        let feed = ticker();
        let view = view(&feed);

        let labels: Vec<&str> = view
            .slots()
            .filter_map(|slot| slot.surface().content::<&'static str>().copied())
            .collect();
        // "alpha" 0..50, "beta" 70..110, "gamma" starts at 130 as the buffer
        assert_eq!(labels, vec!["alpha", "beta", "gamma"]);
        assert_eq!(view.slot_count(), 3);
    }

    #[test]
    fn test_drop_tears_down() {
        let feed = ticker();
        let mut view = view(&feed);
        view.start();
        assert!(view.is_running());
        drop(view);

        // The delegate outlives the view untouched
        assert_eq!(Rc::strong_count(&feed), 1);
        assert_eq!(Rc::weak_count(&feed), 0);
    }
}
