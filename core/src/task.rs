//! Task Records
//!
//! A task is a short title with a completion flag and an optional deadline.
//! The persisted fields serialize with the same JSON keys the task file has
//! always used (`id`, `title`, `done`, `dueAt`, `notified`); the animation
//! state is runtime-only and never written.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::animation::AnimationState;

/// Task identifier
///
/// Identifiers are assigned once at creation, never reused, and order tasks
/// by creation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    /// Zero marks a record whose id was never assigned
    pub const UNASSIGNED: Self = Self(0);

    /// Get the raw value
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A to-do item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    #[serde(default)]
    pub id: TaskId,
    /// Free-form title
    pub title: String,
    /// Completion flag
    #[serde(default)]
    pub done: bool,
    /// Optional deadline
    #[serde(
        default,
        deserialize_with = "deserialize_due_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_at: Option<DateTime<Utc>>,
    /// Whether the deadline notification has fired
    #[serde(default)]
    pub notified: bool,
    /// Transient animation state
    #[serde(skip)]
    pub animation: AnimationState,
}

impl Task {
    /// Create an idle, pending task
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
            due_at: None,
            notified: false,
            animation: AnimationState::Idle,
        }
    }

    /// Builder: mark as completed
    #[must_use]
    pub fn completed(mut self) -> Self {
        self.done = true;
        self
    }

    /// Builder: set a deadline
    #[must_use]
    pub fn due(mut self, at: DateTime<Utc>) -> Self {
        self.due_at = Some(at);
        self
    }

    /// Whether the deadline still matters: set and not completed
    #[must_use]
    pub fn has_open_deadline(&self) -> bool {
        !self.done && self.due_at.is_some()
    }

    /// Whether the deadline has passed without a notification yet
    #[must_use]
    pub fn needs_notification(&self, now: DateTime<Utc>) -> bool {
        self.has_open_deadline() && !self.notified && self.due_at.is_some_and(|due| now > due)
    }

    /// Set a new deadline and re-arm its notification
    pub fn set_deadline(&mut self, at: DateTime<Utc>) {
        self.due_at = Some(at);
        self.notified = false;
    }

    /// Remove the deadline; `notified` is left as is
    pub fn clear_deadline(&mut self) {
        self.due_at = None;
    }
}

/// Accepts RFC 3339 timestamps, `null`, and the `0001-01-01T00:00:00Z`
/// zero time that older task files use for "no deadline".
fn deserialize_due_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(raw.filter(|at| at.year() > 1))
}
