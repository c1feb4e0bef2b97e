//! Task Store
//!
//! The ordered task collection plus the preferences persisted alongside it.
//! The store is owned by the session and mutated only from the event loop.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::animation::AnimationTimings;
use crate::persistence::Snapshot;
use crate::task::{Task, TaskId};

/// List ordering preference
///
/// Serialized as the integers `0`, `1`, `2` for compatibility with existing
/// task files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SortMode {
    /// Creation order
    #[default]
    Off,
    /// Pending tasks first
    IncompleteFirst,
    /// Completed tasks first
    CompleteFirst,
}

impl SortMode {
    /// The next mode in the cycle Off → `IncompleteFirst` → `CompleteFirst` → Off
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::IncompleteFirst,
            Self::IncompleteFirst => Self::CompleteFirst,
            Self::CompleteFirst => Self::Off,
        }
    }

    /// Short label for the status line
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::IncompleteFirst => "Todo",
            Self::CompleteFirst => "Done",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<SortMode> for u8 {
    fn from(mode: SortMode) -> Self {
        match mode {
            SortMode::Off => 0,
            SortMode::IncompleteFirst => 1,
            SortMode::CompleteFirst => 2,
        }
    }
}

impl TryFrom<u8> for SortMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::IncompleteFirst),
            2 => Ok(Self::CompleteFirst),
            other => Err(format!("unknown sort mode {other}")),
        }
    }
}

/// Ordered tasks and list preferences
#[derive(Clone, Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    sort_mode: SortMode,
    theme_index: usize,
    last_id: i64,
}

impl TaskStore {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded snapshot
    ///
    /// Records without an id get a fresh one; the result is sorted with the
    /// snapshot's sort mode.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot, now: DateTime<Utc>) -> Self {
        let mut store = Self {
            tasks: Vec::with_capacity(snapshot.tasks.len()),
            sort_mode: snapshot.sort_mode,
            theme_index: snapshot.theme_index,
            last_id: snapshot.tasks.iter().map(|t| t.id.0).max().unwrap_or(0),
        };

        for mut task in snapshot.tasks {
            if task.id == TaskId::UNASSIGNED {
                task.id = store.allocate_id(now);
            }
            store.tasks.push(task);
        }
        store.apply_sort();
        store
    }

    /// Persistable view of the store, excluding tasks mid-deletion
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            theme_index: self.theme_index,
            sort_mode: self.sort_mode,
            tasks: self
                .tasks
                .iter()
                .filter(|t| !t.animation.is_deleting())
                .cloned()
                .collect(),
        }
    }

    /// Allocate a new identifier
    ///
    /// Ids are wall-clock nanoseconds, bumped past the last allocation so
    /// they stay strictly increasing even if the clock stalls or steps back.
    pub fn allocate_id(&mut self, now: DateTime<Utc>) -> TaskId {
        let candidate = now.timestamp_nanos_opt().unwrap_or(i64::MAX);
        let id = candidate.max(self.last_id.saturating_add(1));
        self.last_id = id;
        TaskId(id)
    }

    /// Append a new task and return its id
    pub fn create(&mut self, title: impl Into<String>, now: DateTime<Utc>) -> TaskId {
        let id = self.allocate_id(now);
        self.tasks.push(Task::new(id, title));
        id
    }

    /// Append an existing task record
    pub fn push(&mut self, task: Task) {
        self.last_id = self.last_id.max(task.id.0);
        self.tasks.push(task);
    }

    /// All tasks in display order
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Mutable access to all tasks
    pub fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    /// Number of tasks (including ones mid-deletion)
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task at a list position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Mutable task at a list position
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    /// Find a task by id
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Find a task by id, mutably
    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// List position of a task
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Remove every task matching `predicate`, returning the removed ids
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Task) -> bool) -> Vec<TaskId> {
        let mut removed = Vec::new();
        self.tasks.retain(|task| {
            if predicate(task) {
                removed.push(task.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Drop tasks whose delete animation has run its full length
    pub fn remove_finished_deletions(
        &mut self,
        timings: &AnimationTimings,
        now: Instant,
    ) -> Vec<TaskId> {
        self.remove_where(|task| {
            task.animation.is_deleting() && timings.is_finished(&task.animation, now)
        })
    }

    /// Current sort mode
    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Advance the sort mode and re-order
    pub fn cycle_sort(&mut self) -> SortMode {
        self.sort_mode = self.sort_mode.next();
        self.apply_sort();
        self.sort_mode
    }

    /// Active theme index
    #[must_use]
    pub fn theme_index(&self) -> usize {
        self.theme_index
    }

    /// Set the theme index directly
    pub fn set_theme_index(&mut self, index: usize) {
        self.theme_index = index;
    }

    /// Advance to the next of `theme_count` themes
    pub fn cycle_theme(&mut self, theme_count: usize) -> usize {
        self.theme_index = (self.theme_index + 1) % theme_count.max(1);
        self.theme_index
    }

    /// Re-order by the current sort mode
    ///
    /// Stable, with creation id as the secondary key, so applying it twice
    /// is the same as applying it once.
    pub fn apply_sort(&mut self) {
        let mode = self.sort_mode;
        self.tasks.sort_by(|a, b| {
            let primary = match mode {
                SortMode::Off => std::cmp::Ordering::Equal,
                // false < true, so pending sorts first
                SortMode::IncompleteFirst => a.done.cmp(&b.done),
                SortMode::CompleteFirst => b.done.cmp(&a.done),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });
    }
}
