//! Scroll orchestration
//!
//! The [`ScrollOrchestrator`] owns the item slots, the scroll state and the
//! periodic task that drives them. It is the only thing that mutates slots.
//!
//! # State machine
//!
//! ```text
//! Stopped --start--> Running --pause--> Paused --start--> Running
//!    ^                  |                  |
//!    +---reload/teardown+------------------+
//! ```
//!
//! A reload of a running marquee lays the items out again and resumes.
//!
//! # Ticks
//!
//! - Paged (Up, fixed height): every `scroll_interval` one page slides up
//!   over `scroll_animation_duration`; the slot that left is refilled with
//!   the next item and moved to the bottom.
//! - Strip (Left, Up with dynamic height): every frame all slots move by
//!   `scroll_speed * dt`; a slot whose trailing edge passed the origin is
//!   refilled and moved to the far end.
//!
//! All work is synchronous on the caller's thread. A tick either applies
//! completely or is skipped before it mutates anything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use marquee_animation::{TaskId, TickMode, TickScheduler, Ticks, Tween};
use marquee_core::{Point, Rect, SurfaceIdGenerator};
use marquee_platform::TouchResponder;
use slotmap::SlotMap;

use crate::config::MarqueeConfig;
use crate::delegate::MarqueeDelegate;
use crate::error::MarqueeError;
use crate::item::{ItemSlot, SlotId};
use crate::layout::{self, Axis, ScrollMode};

/// Delegate shared with the widget
pub type SharedDelegate = Rc<RefCell<dyn MarqueeDelegate>>;

type WeakDelegate = Weak<RefCell<dyn MarqueeDelegate>>;

/// Lifecycle phase of the marquee
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollPhase {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// How far the content has scrolled since the last reload
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollOffset {
    /// Distance travelled by a continuous strip
    Pixels(f32),
    /// Pages completed by a paged marquee
    Pages(u64),
}

/// Snapshot of the scroll state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Logical index of the leading item
    pub index: usize,
    pub offset: ScrollOffset,
    pub phase: ScrollPhase,
}

/// Drives slot recycling, timing and transitions
pub struct ScrollOrchestrator {
    config: MarqueeConfig,
    bounds: Rect,
    delegate: Option<WeakDelegate>,

    slots: SlotMap<SlotId, ItemSlot>,
    /// Display order, leading slot first
    order: Vec<SlotId>,
    surfaces: SurfaceIdGenerator,

    scheduler: TickScheduler,
    task: Option<TaskId>,
    phase: ScrollPhase,

    /// Mode captured at the last layout
    mode: ScrollMode,
    /// Item count at the last layout
    item_count: usize,
    /// Visible window at the last layout: page count (or live slots) and
    /// viewport extent
    window: (usize, f32),
    page: f32,
    page_offset: f32,
    transition: Option<Tween>,

    index: usize,
    travelled: f32,
    pages: u64,

    can_scroll: bool,
    laid_out: bool,
    touch_suspended: bool,
    fault: Option<MarqueeError>,
    fault_reported: bool,
}

impl ScrollOrchestrator {
    pub fn new(config: MarqueeConfig, bounds: Rect) -> Self {
        let mode = ScrollMode::for_config(&config);
        Self {
            config,
            bounds,
            delegate: None,
            slots: SlotMap::with_key(),
            order: Vec::new(),
            surfaces: SurfaceIdGenerator::new(),
            scheduler: TickScheduler::new(),
            task: None,
            phase: ScrollPhase::Stopped,
            mode,
            item_count: 0,
            window: (0, 0.0),
            page: 0.0,
            page_offset: 0.0,
            transition: None,
            index: 0,
            travelled: 0.0,
            pages: 0,
            can_scroll: false,
            laid_out: false,
            touch_suspended: false,
            fault: None,
            fault_reported: false,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    /// Mutable config; layout-affecting changes apply on the next reload
    pub fn config_mut(&mut self) -> &mut MarqueeConfig {
        &mut self.config
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Resize the widget; applies on the next reload
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Register the delegate without taking ownership of it
    pub fn set_delegate<D>(&mut self, delegate: &Rc<RefCell<D>>)
    where
        D: MarqueeDelegate + 'static,
    {
        let shared: SharedDelegate = delegate.clone();
        self.set_shared_delegate(&shared);
    }

    /// Register an already type-erased delegate
    pub fn set_shared_delegate(&mut self, delegate: &SharedDelegate) {
        self.delegate = Some(Rc::downgrade(delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    fn delegate(&self) -> Option<SharedDelegate> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Discard all slots, re-query the delegate and lay out from index 0
    ///
    /// A running (or touch-suspended) marquee resumes afterwards; a paused
    /// one ends up stopped.
    pub fn reload_data(&mut self) {
        let resume = self.phase == ScrollPhase::Running || self.touch_suspended;
        self.cancel_task();
        self.phase = ScrollPhase::Stopped;
        self.touch_suspended = false;

        self.layout_items();

        if resume {
            self.start();
        }
    }

    /// Start or resume scrolling
    ///
    /// Idempotent while running. Does nothing while a configuration fault
    /// is pending; the fault is logged the first time.
    pub fn start(&mut self) {
        if self.phase == ScrollPhase::Running {
            return;
        }
        if !self.laid_out {
            self.layout_items();
        }

        if let Some(fault) = &self.fault {
            if !self.fault_reported {
                tracing::error!("Marquee: {}; scrolling disabled until reload", fault);
                self.fault_reported = true;
            }
            return;
        }
        if !self.can_scroll {
            tracing::debug!(
                "Marquee: nothing to scroll ({} items, stop_when_less_data={})",
                self.item_count,
                self.config.stop_when_less_data
            );
            return;
        }

        let mode = match self.mode {
            ScrollMode::Paged => TickMode::Interval(self.config.scroll_interval),
            ScrollMode::Strip { .. } => TickMode::Frame,
        };
        self.task = Some(self.scheduler.schedule(mode));
        self.scheduler.reset_clock();
        self.touch_suspended = false;
        self.set_phase(ScrollPhase::Running);
    }

    /// Halt scrolling, keeping the current index and offset
    pub fn pause(&mut self) {
        self.touch_suspended = false;
        if self.phase != ScrollPhase::Running {
            return;
        }
        self.cancel_task();
        self.set_phase(ScrollPhase::Paused);
    }

    /// Cancel the task and destroy every slot
    pub fn teardown(&mut self) {
        self.cancel_task();
        self.destroy_slots();
        self.transition = None;
        self.page_offset = 0.0;
        self.item_count = 0;
        self.can_scroll = false;
        self.laid_out = false;
        self.touch_suspended = false;
        self.set_phase(ScrollPhase::Stopped);
    }

    /// Advance time by `dt`, running whatever is due
    pub fn advance(&mut self, dt: Duration) {
        let ticks = self.scheduler.advance(dt);
        self.run(dt, ticks);
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn tick(&mut self) {
        let dt = self.scheduler.frame_delta();
        self.advance(dt);
    }

    fn run(&mut self, dt: Duration, ticks: Ticks) {
        if self.phase != ScrollPhase::Running {
            return;
        }
        if self.transition.is_some() {
            self.step_transition(dt);
        }
        for tick in ticks {
            if self.phase != ScrollPhase::Running {
                break;
            }
            if Some(tick.task) == self.task {
                self.on_tick(tick.dt);
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> ScrollState {
        let offset = match self.mode {
            ScrollMode::Paged => ScrollOffset::Pages(self.pages),
            ScrollMode::Strip { .. } => ScrollOffset::Pixels(self.travelled),
        };
        ScrollState {
            index: self.index,
            offset,
            phase: self.phase,
        }
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Pending configuration fault, if any
    pub fn fault(&self) -> Option<&MarqueeError> {
        self.fault.as_ref()
    }

    /// Motion mode of the current layout
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// Item count captured at the last layout
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of live slots
    pub fn slot_count(&self) -> usize {
        self.order.len()
    }

    /// Live slots in display order
    pub fn slots(&self) -> impl Iterator<Item = &ItemSlot> + '_ {
        self.order.iter().filter_map(|id| self.slots.get(*id))
    }

    pub fn slot(&self, id: SlotId) -> Option<&ItemSlot> {
        self.slots.get(id)
    }

    /// Slot under `point` (widget coordinates)
    pub fn slot_at(&self, point: Point) -> Option<&ItemSlot> {
        if self.config.clips_to_bounds && !Rect::from(self.bounds.size()).contains(point) {
            return None;
        }
        self.slots()
            .find(|slot| slot.data_index().is_some() && slot.frame().contains(point))
    }

    /// Whether a periodic task is scheduled
    pub fn is_scheduled(&self) -> bool {
        self.task.is_some_and(|task| self.scheduler.is_scheduled(task))
    }

    /// Number of periodic tasks alive in the scheduler
    pub fn scheduled_task_count(&self) -> usize {
        self.scheduler.task_count()
    }

    /// Whether a page transition is in flight
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether motion is held by an active touch
    pub fn is_touch_suspended(&self) -> bool {
        self.touch_suspended
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn layout_items(&mut self) {
        self.transition = None;
        self.page_offset = 0.0;
        self.index = 0;
        self.travelled = 0.0;
        self.pages = 0;
        self.fault = None;
        self.fault_reported = false;
        self.can_scroll = false;
        self.laid_out = true;
        self.mode = ScrollMode::for_config(&self.config);

        let Some(shared) = self.delegate() else {
            tracing::debug!("Marquee: no delegate, nothing to lay out");
            self.drop_slots();
            return;
        };
        let Ok(mut delegate) = shared.try_borrow_mut() else {
            tracing::warn!("Marquee: delegate is busy during reload, laying out nothing");
            self.drop_slots();
            return;
        };

        let count = delegate.number_of_items();
        let bounds = self.bounds;
        let mut plan: Vec<(usize, Rect)> = Vec::new();
        let content;
        let viewport;
        let visible;

        match self.mode {
            ScrollMode::Paged => {
                visible = layout::visible_pages(delegate.number_of_visible_items());
                self.page = layout::page_extent(bounds.height(), visible);
                let slots = layout::paged_slot_count(count, visible);
                for k in 0..slots {
                    plan.push((k, layout::paged_frame(&bounds, self.page, k, 0.0)));
                }
                content = layout::paged_content_extent(count, self.page);
                viewport = bounds.height();
            }
            ScrollMode::Strip { axis, spacing } => {
                viewport = axis.extent(&bounds);
                let mut missing = false;
                let items = layout::strip_fill(viewport, spacing, count, 0, |index| {
                    extent_hint(&*delegate, axis, index).unwrap_or_else(|| {
                        missing = true;
                        0.0
                    })
                });
                content = layout::strip_content_extent(
                    (0..count).map(|index| extent_hint(&*delegate, axis, index).unwrap_or(0.0)),
                    spacing,
                );

                visible = if missing { 0 } else { items.len() };
                if missing {
                    self.fault = Some(missing_hint(axis));
                } else {
                    plan.extend(items.iter().map(|item| {
                        (
                            item.index,
                            layout::strip_frame(axis, &bounds, item.position, item.extent),
                        )
                    }));
                }
            }
        }

        let window = (visible, viewport);
        let reuse =
            self.item_count == count && self.window == window && self.order.len() == plan.len();
        if !reuse {
            self.destroy_slots();
        }
        self.item_count = count;
        self.window = window;

        for (k, (index, frame)) in plan.into_iter().enumerate() {
            let id = if reuse {
                self.order[k]
            } else {
                self.create_slot()
            };
            let slot = &mut self.slots[id];
            slot.clear();
            slot.set_frame(frame);
            populate(slot, index, &mut *delegate);
        }

        let fits = layout::fits_viewport(content, viewport);
        self.can_scroll =
            count > 0 && self.fault.is_none() && !(self.config.stop_when_less_data && fits);

        tracing::debug!(
            "Marquee: laid out {} slot(s) for {} item(s) ({:?}, reused={}, can_scroll={})",
            self.order.len(),
            count,
            self.mode,
            reuse,
            self.can_scroll
        );
    }

    fn create_slot(&mut self) -> SlotId {
        let surface = self.surfaces.next();
        let id = self
            .slots
            .insert_with_key(|id| ItemSlot::new(id, surface));
        self.order.push(id);
        id
    }

    fn destroy_slots(&mut self) {
        for id in self.order.drain(..) {
            if let Some(mut slot) = self.slots.remove(id) {
                slot.clear();
            }
        }
        self.slots.clear();
    }

    fn drop_slots(&mut self) {
        self.destroy_slots();
        self.item_count = 0;
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    fn on_tick(&mut self, dt: Duration) {
        let Some(shared) = self.delegate() else {
            tracing::warn!("Marquee: delegate dropped, clearing content");
            self.drop_content();
            return;
        };
        let Ok(mut delegate) = shared.try_borrow_mut() else {
            tracing::warn!("Marquee: delegate is busy, skipping tick");
            return;
        };

        let count = delegate.number_of_items();
        if count == 0 {
            tracing::warn!("Marquee: delegate reports no items, clearing content");
            drop(delegate);
            self.drop_content();
            return;
        }

        match self.mode {
            ScrollMode::Paged => self.begin_page(count, &mut *delegate),
            ScrollMode::Strip { axis, spacing } => {
                self.scroll_strip(axis, spacing, count, dt, &mut *delegate)
            }
        }

        if self.fault.is_some() {
            self.cancel_task();
            self.set_phase(ScrollPhase::Stopped);
        }
    }

    fn begin_page(&mut self, count: usize, delegate: &mut dyn MarqueeDelegate) {
        if self.transition.is_some() {
            self.complete_page(count, delegate);
        }
        if self.order.is_empty() {
            return;
        }

        let mut tween = Tween::new(0.0, -self.page, self.config.scroll_animation_duration)
            .with_easing(self.config.scroll_easing);
        self.page_offset = tween.step(Duration::ZERO);
        if tween.is_finished() {
            self.complete_page(count, delegate);
        } else {
            self.transition = Some(tween);
            self.apply_page_frames();
        }
        tracing::trace!("Marquee: page {} started", self.pages + 1);
    }

    fn step_transition(&mut self, dt: Duration) {
        let Some(mut tween) = self.transition else {
            return;
        };
        let Some(shared) = self.delegate() else {
            tracing::warn!("Marquee: delegate dropped, clearing content");
            self.drop_content();
            return;
        };
        let Ok(mut delegate) = shared.try_borrow_mut() else {
            tracing::warn!("Marquee: delegate is busy, holding transition");
            return;
        };

        self.page_offset = tween.step(dt);
        if tween.is_finished() {
            let count = delegate.number_of_items().max(1);
            self.complete_page(count, &mut *delegate);
        } else {
            self.transition = Some(tween);
            self.apply_page_frames();
        }
    }

    /// Rotate the leading page slot to the bottom with the next item
    fn complete_page(&mut self, count: usize, delegate: &mut dyn MarqueeDelegate) {
        self.transition = None;
        self.page_offset = 0.0;

        if !self.order.is_empty() {
            self.order.rotate_left(1);
            self.index = layout::next_index(self.index, count);
            let recycled_index = (self.index + self.order.len() - 1) % count;
            if let Some(last) = self.order.last().copied() {
                populate(&mut self.slots[last], recycled_index, delegate);
            }
            self.pages += 1;
        }
        self.apply_page_frames();
    }

    fn apply_page_frames(&mut self) {
        for (k, id) in self.order.iter().enumerate() {
            if let Some(slot) = self.slots.get_mut(*id) {
                slot.set_frame(layout::paged_frame(
                    &self.bounds,
                    self.page,
                    k,
                    self.page_offset,
                ));
            }
        }
    }

    fn scroll_strip(
        &mut self,
        axis: Axis,
        spacing: f32,
        count: usize,
        dt: Duration,
        delegate: &mut dyn MarqueeDelegate,
    ) {
        let step = layout::frame_step(self.config.scroll_speed, dt);
        if step <= 0.0 || self.order.is_empty() {
            return;
        }

        for id in &self.order {
            if let Some(slot) = self.slots.get_mut(*id) {
                slot.set_frame(axis.translate(&slot.frame(), -step));
            }
        }
        self.travelled += step;

        let viewport = axis.extent(&self.bounds);

        // Leading slots that fully left the viewport go to the far end
        let mut recycled = 0;
        while recycled < self.order.len() {
            let leading = self.order[0];
            let frame = self.slots[leading].frame();
            if axis.position(&frame) + axis.extent(&frame) > 0.0 {
                break;
            }

            let (tail, index) = self.strip_tail(axis, spacing, count);
            let extent = self.strip_extent(axis, index, delegate);
            self.order.rotate_left(1);

            let slot = &mut self.slots[leading];
            slot.set_frame(layout::strip_frame(
                axis,
                &self.bounds,
                tail.max(viewport),
                extent,
            ));
            populate(slot, index, delegate);
            recycled += 1;
        }

        // Keep one buffer slot past the viewport end while unused items remain
        while self.order.len() < count {
            let entered = self
                .order
                .last()
                .and_then(|id| self.slots.get(*id))
                .is_some_and(|last| axis.position(&last.frame()) < viewport);
            if !entered {
                break;
            }
            let (tail, index) = self.strip_tail(axis, spacing, count);
            let extent = self.strip_extent(axis, index, delegate);
            let id = self.create_slot();
            let slot = &mut self.slots[id];
            slot.set_frame(layout::strip_frame(axis, &self.bounds, tail, extent));
            populate(slot, index, delegate);
            if extent + spacing <= 0.0 {
                break;
            }
        }

        if let Some(leading) = self.order.first().and_then(|id| self.slots.get(*id)) {
            self.index = leading.data_index().unwrap_or(0);
        }
        if recycled > 0 {
            tracing::trace!("Marquee: recycled {} slot(s), leading index {}", recycled, self.index);
        }
    }

    /// Position just past the last slot, and the index that follows it
    fn strip_tail(&self, axis: Axis, spacing: f32, count: usize) -> (f32, usize) {
        match self.order.last().and_then(|id| self.slots.get(*id)) {
            Some(last) => {
                let frame = last.frame();
                let tail = axis.position(&frame) + axis.extent(&frame) + spacing;
                let index = layout::next_index(last.data_index().unwrap_or(0), count);
                (tail, index)
            }
            None => (0.0, self.index),
        }
    }

    fn strip_extent(&mut self, axis: Axis, index: usize, delegate: &dyn MarqueeDelegate) -> f32 {
        match extent_hint(delegate, axis, index) {
            Some(extent) => layout::sanitize_extent(extent),
            None => {
                self.raise_fault(missing_hint(axis));
                0.0
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn raise_fault(&mut self, fault: MarqueeError) {
        if self.fault.is_none() {
            tracing::error!("Marquee: {}; scrolling disabled until reload", fault);
            self.fault = Some(fault);
            self.fault_reported = true;
        }
    }

    fn drop_content(&mut self) {
        self.cancel_task();
        self.drop_slots();
        self.transition = None;
        self.page_offset = 0.0;
        self.can_scroll = false;
        self.touch_suspended = false;
        self.set_phase(ScrollPhase::Stopped);
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            self.scheduler.cancel(task);
        }
    }

    fn set_phase(&mut self, phase: ScrollPhase) {
        if self.phase != phase {
            tracing::debug!("Marquee: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn resume_after_touch(&mut self) {
        if self.touch_suspended {
            self.touch_suspended = false;
            self.start();
        }
    }
}

impl Drop for ScrollOrchestrator {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl TouchResponder for ScrollOrchestrator {
    fn touches_began(&mut self) {
        if !self.config.touch_enabled || self.phase != ScrollPhase::Running {
            return;
        }
        self.cancel_task();
        self.set_phase(ScrollPhase::Paused);
        self.touch_suspended = true;
    }

    fn touches_ended_at(&mut self, point: Point) {
        let tapped = if self.config.touch_enabled {
            self.slot_at(point).and_then(ItemSlot::data_index)
        } else {
            None
        };
        self.resume_after_touch();

        let Some(index) = tapped else {
            return;
        };
        let Some(shared) = self.delegate() else {
            return;
        };
        match shared.try_borrow_mut() {
            Ok(mut delegate) => {
                tracing::debug!("Marquee: item {} tapped", index);
                delegate.did_touch_item(index);
            }
            Err(_) => tracing::warn!("Marquee: delegate is busy, dropping tap on {}", index),
        };
    }

    fn touches_cancelled(&mut self) {
        self.resume_after_touch();
    }
}

/// Create-or-update sequence for one slot
fn populate(slot: &mut ItemSlot, index: usize, delegate: &mut dyn MarqueeDelegate) {
    if !slot.is_created() {
        delegate.create_item(slot);
        slot.mark_created();
    }
    slot.set_data_index(index);
    delegate.update_item(slot, index);
}

fn extent_hint(delegate: &dyn MarqueeDelegate, axis: Axis, index: usize) -> Option<f32> {
    match axis {
        Axis::Horizontal => delegate.item_width(index),
        Axis::Vertical => delegate.item_height(index),
    }
}

fn missing_hint(axis: Axis) -> MarqueeError {
    match axis {
        Axis::Horizontal => MarqueeError::MissingWidthHint,
        Axis::Vertical => MarqueeError::MissingHeightHint,
    }
}
