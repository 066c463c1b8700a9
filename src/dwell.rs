//! Cancelable one-shot deferred tasks.
//!
//! A [`DwellTimer`] holds at most one pending task. Scheduling replaces the
//! pending task, and each schedule hands out a fresh [`TaskHandle`] so a
//! caller holding an old handle cannot cancel a newer task.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct PendingTask<T> {
    handle: TaskHandle,
    target: T,
    timer: Timer,
}

/// Single-slot deferred task driven by explicit time advances.
#[derive(Debug, Clone)]
pub struct DwellTimer<T> {
    next_handle: u64,
    pending: Option<PendingTask<T>>,
}

impl<T> Default for DwellTimer<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            pending: None,
        }
    }
}

impl<T> DwellTimer<T> {
    /// Creates an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `target` to fire after `duration`, dropping any pending task.
    pub fn schedule(&mut self, target: T, duration: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending = Some(PendingTask {
            handle,
            target,
            timer: Timer::new(duration, TimerMode::Once),
        });
        handle
    }

    /// Drops the pending task, if any. Returns its target.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|task| task.target)
    }

    /// Cancels the task only if `handle` still names it.
    pub fn cancel_handle(&mut self, handle: TaskHandle) -> bool {
        if self
            .pending
            .as_ref()
            .is_some_and(|task| task.handle == handle)
        {
            self.pending = None;
            return true;
        }
        false
    }

    /// Advances time. Yields the target once, on the advance that reaches the
    /// deadline; the task is then gone.
    pub fn advance(&mut self, delta: Duration) -> Option<T> {
        let task = self.pending.as_mut()?;
        if !task.timer.tick(delta).just_finished() {
            return None;
        }
        self.pending.take().map(|task| task.target)
    }

    /// Target of the pending task.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|task| &task.target)
    }

    /// Time left before the pending task fires.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(|task| task.timer.remaining())
    }
}
