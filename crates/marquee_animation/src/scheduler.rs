//! Periodic tick scheduling
//!
//! Owns the cancellable periodic tasks that drive a marquee. The scheduler
//! never spawns threads or sleeps: the host advances it from its frame loop,
//! and every due task is reported back as a [`Tick`] for the caller to run
//! on the same thread.
//!
//! Two task modes exist:
//! - [`TickMode::Interval`] - discrete ticks, e.g. one page every 4 seconds
//! - [`TickMode::Frame`] - one tick per advanced frame, for continuous motion

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a scheduled periodic task
    pub struct TaskId;
}

/// How a periodic task fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickMode {
    /// Fire once each time the accumulated time reaches the interval
    Interval(Duration),
    /// Fire on every advanced frame
    Frame,
}

/// A due task reported by [`TickScheduler::advance`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub task: TaskId,
    /// Time covered by this tick (frame delta, or the elapsed interval)
    pub dt: Duration,
}

/// Ticks fired by a single advance; one widget rarely has more than one task
pub type Ticks = SmallVec<[Tick; 2]>;

#[derive(Debug)]
struct PeriodicTask {
    mode: TickMode,
    accumulated: Duration,
    fire_count: u64,
}

/// Scheduler for cancellable periodic tasks
///
/// ```ignore
/// let mut scheduler = TickScheduler::new();
/// let task = scheduler.schedule(TickMode::Interval(Duration::from_secs(4)));
///
/// // In the frame loop
/// for tick in scheduler.advance(frame_dt) {
///     if tick.task == task {
///         // scroll one page
///     }
/// }
/// ```
#[derive(Debug)]
pub struct TickScheduler {
    tasks: SlotMap<TaskId, PeriodicTask>,
    last_frame: Instant,
    frame_count: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            last_frame: Instant::now(),
            frame_count: 0,
        }
    }

    /// Register a periodic task; it first fires on a later advance
    pub fn schedule(&mut self, mode: TickMode) -> TaskId {
        let id = self.tasks.insert(PeriodicTask {
            mode,
            accumulated: Duration::ZERO,
            fire_count: 0,
        });
        tracing::debug!("TickScheduler: scheduled {:?} as {:?}", mode, id);
        id
    }

    /// Cancel a task immediately
    ///
    /// Returns false if the task was not scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let removed = self.tasks.remove(id).is_some();
        if removed {
            tracing::debug!("TickScheduler: cancelled {:?}", id);
        }
        removed
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Mode of a scheduled task
    pub fn mode(&self, id: TaskId) -> Option<TickMode> {
        self.tasks.get(id).map(|t| t.mode)
    }

    /// How many times a task has fired
    pub fn fire_count(&self, id: TaskId) -> Option<u64> {
        self.tasks.get(id).map(|t| t.fire_count)
    }

    /// Get the number of scheduled tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Advance time by `dt` and collect the tasks that are due
    ///
    /// An interval task fires at most once per advance; any surplus time is
    /// kept below one interval so a long stall never causes a burst.
    pub fn advance(&mut self, dt: Duration) -> Ticks {
        self.frame_count += 1;
        let mut due = Ticks::new();

        for (id, task) in self.tasks.iter_mut() {
            match task.mode {
                TickMode::Frame => {
                    task.fire_count += 1;
                    due.push(Tick { task: id, dt });
                }
                TickMode::Interval(interval) => {
                    task.accumulated += dt;
                    if task.accumulated < interval {
                        continue;
                    }

                    let elapsed = task.accumulated;
                    task.accumulated = remainder(elapsed - interval, interval);
                    task.fire_count += 1;
                    due.push(Tick {
                        task: id,
                        dt: elapsed,
                    });
                }
            }
        }

        if !due.is_empty() {
            tracing::trace!("TickScheduler: {} task(s) due", due.len());
        }
        due
    }

    /// Wall-clock time since the previous measurement
    pub fn frame_delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        dt
    }

    /// Advance by the wall-clock time since the previous call
    pub fn tick(&mut self) -> Ticks {
        let dt = self.frame_delta();
        self.advance(dt)
    }

    /// Restart wall-clock measurement from now
    ///
    /// Call after the host stops ticking for a while so the next `tick()`
    /// does not report the whole gap as one frame.
    pub fn reset_clock(&mut self) {
        self.last_frame = Instant::now();
    }
}

fn remainder(surplus: Duration, interval: Duration) -> Duration {
    let interval_ns = interval.as_nanos();
    if interval_ns == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((surplus.as_nanos() % interval_ns) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_interval_fires_when_due() {
        let mut scheduler = TickScheduler::new();
        let task = scheduler.schedule(TickMode::Interval(ms(100)));

        assert!(scheduler.advance(ms(60)).is_empty());
        let ticks = scheduler.advance(ms(60));
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].task, task);
        assert_eq!(ticks[0].dt, ms(120));

        // 20ms surplus carried over
        assert!(scheduler.advance(ms(70)).is_empty());
        assert_eq!(scheduler.advance(ms(10)).len(), 1);
        assert_eq!(scheduler.fire_count(task), Some(2));
    }

    #[test]
    fn test_long_stall_fires_once() {
        let mut scheduler = TickScheduler::new();
        let task = scheduler.schedule(TickMode::Interval(ms(100)));

        assert_eq!(scheduler.advance(ms(1050)).len(), 1);
        // 50ms remainder kept
        assert!(scheduler.advance(ms(40)).is_empty());
        assert_eq!(scheduler.advance(ms(10)).len(), 1);
        assert_eq!(scheduler.fire_count(task), Some(2));
    }

    #[test]
    fn test_frame_fires_every_advance() {
        let mut scheduler = TickScheduler::new();
        let task = scheduler.schedule(TickMode::Frame);

        for _ in 0..3 {
            let ticks = scheduler.advance(ms(16));
            assert_eq!(ticks.as_slice(), &[Tick { task, dt: ms(16) }]);
        }
        assert_eq!(scheduler.frame_count(), 3);
        assert_eq!(scheduler.mode(task), Some(TickMode::Frame));
    }

    #[test]
    fn test_cancel_is_immediate() {
        let mut scheduler = TickScheduler::new();
        let task = scheduler.schedule(TickMode::Interval(ms(50)));
        scheduler.advance(ms(49));

        assert!(scheduler.cancel(task));
        assert!(!scheduler.is_scheduled(task));
        assert!(scheduler.advance(ms(10)).is_empty());
        assert!(!scheduler.cancel(task));
    }

    #[test]
    fn test_rescheduling_gives_new_handle() {
        let mut scheduler = TickScheduler::new();
        let first = scheduler.schedule(TickMode::Frame);
        scheduler.cancel(first);
        let second = scheduler.schedule(TickMode::Frame);

        assert_ne!(first, second);
        assert_eq!(scheduler.task_count(), 1);

        scheduler.cancel(second);
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn test_zero_interval_fires_every_advance() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(TickMode::Interval(Duration::ZERO));
        assert_eq!(scheduler.advance(ms(1)).len(), 1);
        assert_eq!(scheduler.advance(ms(1)).len(), 1);
    }
}
