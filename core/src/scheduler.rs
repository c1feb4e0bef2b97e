//! Tick Scheduler
//!
//! One call to [`Scheduler::tick`] advances every task's animation lifecycle
//! and fires due deadline notifications. The report says whether another
//! tick is needed; when nothing is animating and no deadline is open the
//! surface stops ticking until the next state-changing key press.
//!
//! # Tick Steps
//!
//! ```text
//! 1. Deleting        elapsed >= delete  ─► removed from the store
//! 2. CheckAnimating  elapsed >= check   ─► Idle
//! 3. open deadline   now > due_at, !notified ─► notify once, notified = true
//! 4. more_ticks  =  any animation still in flight || any open deadline
//! ```

use tracing::{debug, warn};

use crate::animation::{AnimationState, AnimationTimings};
use crate::clock::Moment;
use crate::notifier::{Notifier, ALERT_TITLE};
use crate::store::TaskStore;
use crate::task::TaskId;

/// What one tick changed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tasks whose delete animation finished; they are gone from the store
    pub removed: Vec<TaskId>,
    /// Tasks whose check-off animation finished
    pub finished_checks: Vec<TaskId>,
    /// Tasks whose deadline notification fired this tick
    pub notified: Vec<TaskId>,
    /// Whether another tick should be scheduled
    pub more_ticks: bool,
}

impl TickReport {
    /// Whether the store changed in a way that must be persisted
    #[must_use]
    pub fn needs_save(&self) -> bool {
        !self.removed.is_empty() || !self.notified.is_empty()
    }
}

/// Advances animations and deadlines
#[derive(Clone, Copy, Debug, Default)]
pub struct Scheduler {
    timings: AnimationTimings,
}

impl Scheduler {
    /// Scheduler with the given animation timings
    #[must_use]
    pub fn new(timings: AnimationTimings) -> Self {
        Self { timings }
    }

    /// The timings in use
    #[must_use]
    pub fn timings(&self) -> &AnimationTimings {
        &self.timings
    }

    /// Run one tick at `now`
    pub fn tick(&self, store: &mut TaskStore, now: Moment, notifier: &dyn Notifier) -> TickReport {
        let mut report = TickReport {
            removed: store.remove_finished_deletions(&self.timings, now.instant),
            ..TickReport::default()
        };
        if !report.removed.is_empty() {
            debug!(count = report.removed.len(), "Deleted tasks retired");
        }

        for task in store.tasks_mut() {
            match task.animation {
                AnimationState::Deleting { .. } => {
                    report.more_ticks = true;
                    continue;
                }
                AnimationState::CheckAnimating { .. } => {
                    if self.timings.is_finished(&task.animation, now.instant) {
                        task.animation = AnimationState::Idle;
                        report.finished_checks.push(task.id);
                    } else {
                        report.more_ticks = true;
                    }
                }
                AnimationState::Idle => {}
            }

            if task.has_open_deadline() {
                report.more_ticks = true;
                if task.needs_notification(now.wall) {
                    if let Err(e) = notifier.deliver(ALERT_TITLE, &task.title) {
                        warn!(task_id = %task.id, error = %e, "Deadline notification failed");
                    }
                    task.notified = true;
                    report.notified.push(task.id);
                    debug!(task_id = %task.id, "Deadline notification sent");
                }
            }
        }

        report
    }

    /// Whether the store has anything that needs ticking
    ///
    /// Used to arm the first tick at startup, when loaded tasks may already
    /// carry deadlines.
    #[must_use]
    pub fn has_pending_work(&self, store: &TaskStore) -> bool {
        store
            .tasks()
            .iter()
            .any(|task| !task.animation.is_idle() || task.has_open_deadline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectId;
    use crate::notifier::RecordingNotifier;
    use crate::task::Task;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn store_with(tasks: Vec<Task>) -> TaskStore {
        let mut store = TaskStore::new();
        for task in tasks {
            store.push(task);
        }
        store
    }

    #[test]
    fn test_idle_store_needs_no_ticks() {
        let mut store = store_with(vec![Task::new(TaskId(1), "a"), Task::new(TaskId(2), "b").completed()]);
        let notifier = RecordingNotifier::new();
        let scheduler = Scheduler::default();

        let report = scheduler.tick(&mut store, Moment::now(), &notifier);
        assert_eq!(report, TickReport::default());
        assert!(!scheduler.has_pending_work(&store));
    }

    #[test]
    fn test_check_animation_settles() {
        let now = Moment::now();
        let mut task = Task::new(TaskId(1), "a").completed();
        task.animation = AnimationState::CheckAnimating {
            effect: EffectId::Rainbow,
            started_at: now.instant,
        };
        let mut store = store_with(vec![task]);
        let scheduler = Scheduler::default();
        let notifier = RecordingNotifier::new();

        let early = scheduler.tick(&mut store, now.after(Duration::from_millis(100)), &notifier);
        assert!(early.more_ticks);
        assert!(early.finished_checks.is_empty());

        let done = scheduler.tick(&mut store, now.after(scheduler.timings().check), &notifier);
        assert_eq!(done.finished_checks, vec![TaskId(1)]);
        assert!(!done.more_ticks);
        assert!(store.tasks()[0].animation.is_idle());
    }

    #[test]
    fn test_deleting_task_with_deadline_is_not_notified() {
        let now = Moment::now();
        let mut task = Task::new(TaskId(1), "a").due(now.wall - chrono::Duration::seconds(5));
        task.animation = AnimationState::Deleting { started_at: now.instant };
        let mut store = store_with(vec![task]);
        let notifier = RecordingNotifier::new();

        let report = Scheduler::default().tick(&mut store, now, &notifier);
        assert!(report.more_ticks);
        assert_eq!(notifier.count(), 0);
    }

    #[test]
    fn test_failed_notification_still_marks_notified() {
        let now = Moment::now();
        let task = Task::new(TaskId(1), "a").due(now.wall - chrono::Duration::seconds(1));
        let mut store = store_with(vec![task]);
        let notifier = RecordingNotifier::failing();

        let report = Scheduler::default().tick(&mut store, now, &notifier);
        assert_eq!(report.notified, vec![TaskId(1)]);
        assert!(report.needs_save());
        assert!(store.tasks()[0].notified);

        Scheduler::default().tick(&mut store, now.after(Duration::from_secs(1)), &notifier);
        assert_eq!(notifier.count(), 1);
    }

    #[test]
    fn test_open_deadline_keeps_ticking() {
        let now = Moment::now();
        let task = Task::new(TaskId(1), "a").due(now.wall + chrono::Duration::minutes(10));
        let mut store = store_with(vec![task]);
        let scheduler = Scheduler::default();

        assert!(scheduler.has_pending_work(&store));
        let report = scheduler.tick(&mut store, now, &RecordingNotifier::new());
        assert!(report.more_ticks);
        assert!(report.notified.is_empty());
    }
}
