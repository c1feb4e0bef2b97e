//! Ticklist Core - Headless Task List Engine
//!
//! This crate holds everything about ticklist that is not terminal I/O:
//! the task store, the per-task animation lifecycle, the tick scheduler that
//! drives it, the library of text effects, and the interaction state machine
//! that turns key presses into mutations. A terminal surface (the `ticklist`
//! binary) feeds it keys and ticks and renders what it exposes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Terminal Surface (tui)                   │
//! │   crossterm EventStream ──► KeyInput      tick timer ──┐     │
//! └───────────────────────────────┬───────────────────────┼──────┘
//!                                 │                       │
//! ┌───────────────────────────────┼───────────────────────┼──────┐
//! │                        TICKLIST CORE                  │      │
//! │  ┌────────────────────────────┴──────────┐  ┌─────────┴────┐ │
//! │  │   Session (interaction state machine) │─►│  Scheduler   │ │
//! │  └──────┬──────────────┬─────────────────┘  └──────┬───────┘ │
//! │         │              │                           │         │
//! │  ┌──────┴─────┐  ┌─────┴──────┐  ┌──────────┐  ┌───┴──────┐  │
//! │  │ TaskStore  │  │ EffectPick │  │ Storage  │  │ Notifier │  │
//! │  └────────────┘  └────────────┘  └──────────┘  └──────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Per-task animation state and timing constants
//! - [`clock`]: Paired monotonic/wall-clock instants
//! - [`config`]: TOML + environment configuration
//! - [`duration`]: Deadline expression parsing and countdown formatting
//! - [`effects`]: The 30 text-transform effects and the effect picker
//! - [`interaction`]: Input modes, key commands, and the [`Session`]
//! - [`notifier`]: Deadline notification delivery
//! - [`persistence`]: Loading and saving the task file
//! - [`scheduler`]: The self-terminating tick loop
//! - [`store`]: Ordered task collection, preferences, and sorting
//! - [`task`]: Task records and identifiers
//!
//! # No Terminal Dependencies
//!
//! This crate does not depend on ratatui or crossterm. Effects produce
//! [`effects::Glyph`] sequences colored from an explicit
//! [`effects::Palette`]; surfaces map them to their own styling.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod clock;
pub mod config;
pub mod duration;
pub mod effects;
pub mod interaction;
pub mod notifier;
pub mod persistence;
pub mod scheduler;
pub mod store;
pub mod task;

// Re-exports for convenience
pub use animation::{AnimationState, AnimationTimings};
pub use clock::Moment;
pub use config::{
    default_config_path, load_config, ConfigError, ConfigOverrides, ConfigSource, TicklistConfig,
};
pub use duration::{format_remaining, parse_duration, DurationParseError};
pub use effects::{EffectId, EffectKind, EffectPicker, Glyph, GlyphStyle, Palette, Rgb};
pub use interaction::{Command, KeyInput, Mode, Reaction, Session, TextBuffer};
pub use notifier::{CommandNotifier, LogNotifier, Notifier, NotifyError, RecordingNotifier};
pub use persistence::{JsonFileStorage, MemoryStorage, Snapshot, Storage, StorageError};
pub use scheduler::{Scheduler, TickReport};
pub use store::{SortMode, TaskStore};
pub use task::{Task, TaskId};
