//! Virtual-time task queue.
//!
//! The page host never sleeps. Timers and animation frames are queued with a
//! due time on a millisecond clock that only moves when the host advances it
//! ([`Page::advance`](crate::page::Page::advance)). Tasks run earliest-due
//! first; tasks due at the same instant run in the order they were scheduled.

use crate::page::Page;
use std::fmt;

/// Interval between animation frames (~60 fps).
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Default cap on tasks executed by a single advance.
pub const DEFAULT_STEP_LIMIT: usize = 100_000;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce(&mut Page)>;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct ScheduledTask {
    id: TimerId,
    due_at: u64,
    order: u64,
    task: Task,
}

pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_order: u64,
    queue: Vec<ScheduledTask>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            next_order: 0,
            queue: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Queue `task` to run `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;
        self.queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            task,
        });
        id
    }

    /// Drop a queued task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the next task, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.iter().map(|t| t.due_at).min()
    }

    /// Remove and return the next task due at or before `limit` (any task
    /// when `limit` is `None`), with its due time.
    pub(crate) fn pop_due(&mut self, limit: Option<u64>) -> Option<(u64, Task)> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| limit.is_none_or(|l| t.due_at <= l))
            .min_by_key(|(_, t)| (t.due_at, t.order))
            .map(|(i, _)| i)?;
        let task = self.queue.swap_remove(index);
        Some((task.due_at, task.task))
    }

    /// Move the clock forward. The clock never goes backwards.
    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Task {
        Box::new(|_: &mut Page| {})
    }

    #[test]
    fn pops_in_due_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(50, noop());
        scheduler.schedule(10, noop());
        scheduler.schedule(10, noop());
        let order: Vec<u64> = std::iter::from_fn(|| scheduler.pop_due(None).map(|(due, _)| due))
            .collect();
        assert_eq!(order, vec![10, 10, 50]);
    }

    #[test]
    fn ties_run_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(5, noop());
        let second = scheduler.schedule(5, noop());
        assert!(first < second);
        // Remove `first` by popping; the remaining task must be `second`.
        scheduler.pop_due(None);
        assert!(!scheduler.cancel(first));
        assert!(scheduler.cancel(second));
    }

    #[test]
    fn pop_due_respects_limit() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, noop());
        assert!(scheduler.pop_due(Some(99)).is_none());
        assert!(scheduler.pop_due(Some(100)).is_some());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn cancel_removes_task() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(10, noop());
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut scheduler = Scheduler::new();
        scheduler.set_now(40);
        scheduler.set_now(10);
        assert_eq!(scheduler.now(), 40);
        scheduler.schedule(5, noop());
        assert_eq!(scheduler.next_due(), Some(45));
    }
}
