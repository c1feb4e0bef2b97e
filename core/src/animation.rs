//! Per-Task Animation State
//!
//! Each task is in exactly one of three animation states. Making this a
//! single enum (rather than a set of flags) means a task can never be both
//! check-animating and deleting.
//!
//! ```text
//!            toggle on                    elapsed >= check
//!   Idle ─────────────────► CheckAnimating ─────────────────► Idle
//!    │   ◄───────────────── (toggle off: cancel, no frames)
//!    │
//!    │ delete          elapsed >= delete
//!    └───────► Deleting ──────────────────► (removed from the store)
//! ```

use std::time::{Duration, Instant};

use crate::effects::{EffectClock, EffectId};

/// Default length of the check-off animation
pub const CHECK_ANIMATION: Duration = Duration::from_millis(290);

/// Default length of the delete animation
pub const DELETE_ANIMATION: Duration = Duration::from_millis(200);

/// Default tick rate while anything is animating or counting down
pub const DEFAULT_FPS: u32 = 60;

/// Animation state of a single task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationState {
    /// Rendered statically
    #[default]
    Idle,
    /// Playing a check-off effect
    CheckAnimating {
        /// The effect being played
        effect: EffectId,
        /// When the effect started
        started_at: Instant,
    },
    /// Playing the delete animation; removed from the store when it ends
    Deleting {
        /// When the deletion was requested
        started_at: Instant,
    },
}

impl AnimationState {
    /// Whether the task is idle
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a check-off effect is playing
    #[must_use]
    pub fn is_check_animating(&self) -> bool {
        matches!(self, Self::CheckAnimating { .. })
    }

    /// Whether the task is being deleted
    #[must_use]
    pub fn is_deleting(&self) -> bool {
        matches!(self, Self::Deleting { .. })
    }

    /// When the current animation started, if any
    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        match self {
            Self::Idle => None,
            Self::CheckAnimating { started_at, .. } | Self::Deleting { started_at } => {
                Some(*started_at)
            }
        }
    }

    /// The active check-off effect, if any
    #[must_use]
    pub fn effect(&self) -> Option<EffectId> {
        match self {
            Self::CheckAnimating { effect, .. } => Some(*effect),
            _ => None,
        }
    }
}

/// Animation durations and tick cadence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationTimings {
    /// Length of the check-off animation
    pub check: Duration,
    /// Length of the delete animation
    pub delete: Duration,
    /// Interval between ticks
    pub frame_interval: Duration,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            check: CHECK_ANIMATION,
            delete: DELETE_ANIMATION,
            frame_interval: Self::interval_for_fps(DEFAULT_FPS),
        }
    }
}

impl AnimationTimings {
    /// Tick interval for a frame rate (zero is treated as one frame per second)
    #[must_use]
    pub fn interval_for_fps(fps: u32) -> Duration {
        Duration::from_secs(1) / fps.max(1)
    }

    /// Whether the animation in `state` has run its full length at `now`
    #[must_use]
    pub fn is_finished(&self, state: &AnimationState, now: Instant) -> bool {
        match state {
            AnimationState::Idle => true,
            AnimationState::CheckAnimating { started_at, .. } => {
                now.saturating_duration_since(*started_at) >= self.check
            }
            AnimationState::Deleting { started_at } => {
                now.saturating_duration_since(*started_at) >= self.delete
            }
        }
    }

    /// Effect clock for the animation in `state`, if one is playing
    #[must_use]
    pub fn clock(&self, state: &AnimationState, now: Instant) -> Option<EffectClock> {
        match state {
            AnimationState::Idle => None,
            AnimationState::CheckAnimating { started_at, .. } => Some(EffectClock::new(
                now.saturating_duration_since(*started_at),
                self.check,
            )),
            AnimationState::Deleting { started_at } => Some(EffectClock::new(
                now.saturating_duration_since(*started_at),
                self.delete,
            )),
        }
    }
}
