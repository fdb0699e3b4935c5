//! Cancellable periodic tick tasks.
//!
//! The controller owns exactly one [`Scheduler`] and at most one live
//! [`TickHandle`]. Cancelling is synchronous: once `cancel` returns, the
//! task never fires again.

use std::time::Duration;

/// Identity of a scheduled repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        TickHandle(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Start a task that fires every `period` until cancelled.
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle;
    /// Stop a task. Unknown or already-cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug, Clone)]
struct ManualTask {
    handle: TickHandle,
    period: Duration,
    until_next: Duration,
}

/// Scheduler driven by explicit [`advance`](ManualScheduler::advance) calls.
///
/// Used for tests and offline rendering, where time is logical. It does not
/// call back into anything; the driver asks how many ticks fell due and
/// delivers them itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    tasks: Vec<ManualTask>,
    scheduled_total: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move logical time forward by `dt` and return how many ticks came due.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let mut due = 0;
        for task in self.tasks.iter_mut() {
            let mut remaining = dt;
            while remaining >= task.until_next {
                remaining -= task.until_next;
                task.until_next = task.period;
                due += 1;
            }
            task.until_next -= remaining;
        }
        due
    }

    /// Tasks currently scheduled.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// How many tasks were ever scheduled.
    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        self.scheduled_total += 1;
        let handle = TickHandle(self.next_id);
        // A zero period would make advance() spin forever.
        let period = period.max(Duration::from_millis(1));
        self.tasks.push(ManualTask {
            handle,
            period,
            until_next: period,
        });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.tasks.retain(|t| t.handle != handle);
    }
}
