//! Cooperative timer scheduler.
//!
//! Every periodic or one-shot job on the frame (button sampling, coin
//! polling, dispensing windows, effects, display pushes) is a task in this
//! table.  The host loop calls [`Timers::tick`] as often as it can; due tasks
//! are handed to a [`TaskHandler`] one after the other, each running to
//! completion.  There is no preemption and no internal concurrency.
//!
//! ```text
//!   host loop ──tick(now)──▶ ┌──────────────────────────────┐
//!                            │ Timers                       │
//!                            │  collect due (next_fire<=now)│
//!                            │  order: most overdue first,  │
//!                            │         then registration    │
//!                            └──────────────┬───────────────┘
//!                                           ▼
//!                            TaskHandler::on_task(id, kind, &mut Timers)
//!                                           │  may register / cancel /
//!                                           │  re-time any task
//!                                           ▼
//!                            advance: next_fire += interval (absolute)
//!                                     or drop when repeats run out
//! ```
//!
//! Tasks carry a typed payload `K` instead of a callback pointer, so a task
//! that re-registers itself with flipped parameters is just a new entry
//! with a different `K` value.

use heapless::Vec;
use log::trace;

use crate::error::SchedulerError;

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// Default task table capacity (stack-allocated).
pub const MAX_TASKS: usize = 12;

/// Deadlines further than half the `u32` range in the past are treated as
/// being in the future.  Keeps comparisons correct across the 49-day wrap.
const HALF_RANGE: u32 = 1 << 31;

/// Stable handle to a registered task.  Never reused while the scheduler
/// lives (modulo `u32` wrap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

/// How many times a task fires before it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Forever,
    Times(u32),
}

impl Repeat {
    pub const ONCE: Self = Self::Times(1);
}

#[derive(Debug, Clone, Copy)]
struct TimerTask<K> {
    id: TaskId,
    kind: K,
    interval_ms: u32,
    remaining: Repeat,
    next_fire_ms: u32,
}

/// Receives due tasks from [`Timers::tick`].
///
/// The scheduler passes itself back so a callback can register follow-up
/// tasks, cancel others, or change its own interval.
pub trait TaskHandler<K, const N: usize> {
    fn on_task(&mut self, id: TaskId, kind: K, timers: &mut Timers<K, N>);
}

/// `true` once `now` has reached `deadline`, wrap-safe.
pub fn reached(now_ms: u32, deadline_ms: u32) -> bool {
    now_ms.wrapping_sub(deadline_ms) < HALF_RANGE
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

pub struct Timers<K, const N: usize = MAX_TASKS> {
    /// Live tasks in registration order.
    tasks: Vec<TimerTask<K>, N>,
    next_id: u32,
    /// Time of the last tick; registrations are relative to it.
    now_ms: u32,
}

impl<K: Copy + core::fmt::Debug, const N: usize> Timers<K, N> {
    pub const fn new(now_ms: u32) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
            now_ms,
        }
    }

    /// Time of the most recent [`tick`](Self::tick) (or construction).
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Register a task.  It first fires `initial_delay_ms` after the
    /// current time, then every `interval_ms` until `repeat` runs out.
    pub fn register(
        &mut self,
        kind: K,
        interval_ms: u32,
        repeat: Repeat,
        initial_delay_ms: u32,
    ) -> Result<TaskId, SchedulerError> {
        match repeat {
            Repeat::Times(0) => return Err(SchedulerError::ZeroRepeat),
            Repeat::Times(1) => {}
            _ if interval_ms == 0 => return Err(SchedulerError::ZeroInterval),
            _ => {}
        }

        let id = TaskId(self.next_id);
        let task = TimerTask {
            id,
            kind,
            interval_ms,
            remaining: repeat,
            next_fire_ms: self.now_ms.wrapping_add(initial_delay_ms),
        };
        self.tasks
            .push(task)
            .map_err(|_| SchedulerError::TableFull)?;
        self.next_id = self.next_id.wrapping_add(1);

        trace!(
            "Timers: {:?} registered as {:?} (every {}ms, {:?}, first at {})",
            kind, id, interval_ms, repeat, task.next_fire_ms
        );
        Ok(id)
    }

    /// Periodic task, first firing one interval from now.
    pub fn every(&mut self, kind: K, interval_ms: u32) -> Result<TaskId, SchedulerError> {
        self.register(kind, interval_ms, Repeat::Forever, interval_ms)
    }

    /// One-shot task.
    pub fn after(&mut self, kind: K, delay_ms: u32) -> Result<TaskId, SchedulerError> {
        self.register(kind, delay_ms, Repeat::ONCE, delay_ms)
    }

    /// Remove a task.  Returns `false` if it was already gone.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.tasks.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Change the interval applied at the task's next reschedule.  Called
    /// from inside the task's own callback, the new period takes effect for
    /// the very next firing.
    pub fn set_interval(&mut self, id: TaskId, interval_ms: u32) -> bool {
        if interval_ms == 0 {
            return false;
        }
        match self.position(id) {
            Some(idx) => {
                self.tasks[idx].interval_ms = interval_ms;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    pub fn kind(&self, id: TaskId) -> Option<K> {
        self.position(id).map(|idx| self.tasks[idx].kind)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest pending deadline, if any task is registered.
    pub fn next_due(&self) -> Option<u32> {
        self.tasks
            .iter()
            .map(|t| t.next_fire_ms)
            .min_by_key(|&at| {
                // Overdue deadlines sort first, then by distance ahead.
                let ahead = at.wrapping_sub(self.now_ms);
                if ahead >= HALF_RANGE { (0, at.wrapping_sub(self.now_ms)) } else { (1, ahead) }
            })
    }

    /// Fire every task whose deadline has been reached.  Returns how many
    /// callbacks ran.
    ///
    /// Each due task fires at most once per call; a tick arriving several
    /// intervals late catches up over the following ticks because the next
    /// deadline is computed from the previous deadline, not from `now`.
    pub fn tick(&mut self, now_ms: u32, handler: &mut impl TaskHandler<K, N>) -> usize {
        self.now_ms = now_ms;

        // (lateness, registration slot, id, payload)
        let mut due: Vec<(u32, usize, TaskId, K), N> = Vec::new();
        for (slot, task) in self.tasks.iter().enumerate() {
            if reached(now_ms, task.next_fire_ms) {
                // Capacity equals the task table, so this cannot overflow.
                let _ = due.push((
                    now_ms.wrapping_sub(task.next_fire_ms),
                    slot,
                    task.id,
                    task.kind,
                ));
            }
        }
        due.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut fired = 0;
        for &(_, _, id, kind) in &due {
            // An earlier callback in this tick may have cancelled it.
            if !self.contains(id) {
                continue;
            }
            handler.on_task(id, kind, self);
            fired += 1;
            self.advance(id);
        }
        fired
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Reschedule or retire a task after it fired.
    fn advance(&mut self, id: TaskId) {
        let Some(idx) = self.position(id) else {
            return; // cancelled itself
        };
        let task = &mut self.tasks[idx];
        match task.remaining {
            Repeat::Times(n) if n <= 1 => {
                trace!("Timers: {:?} exhausted", task.id);
                self.tasks.remove(idx);
            }
            Repeat::Times(n) => {
                task.remaining = Repeat::Times(n - 1);
                task.next_fire_ms = task.next_fire_ms.wrapping_add(task.interval_ms);
            }
            Repeat::Forever => {
                task.next_fire_ms = task.next_fire_ms.wrapping_add(task.interval_ms);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
