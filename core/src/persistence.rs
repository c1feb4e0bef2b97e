//! Task File Persistence
//!
//! The whole store is written after every mutation (write-through, full
//! overwrite) and read once at startup. The on-disk format is pretty JSON:
//!
//! ```json
//! {
//!   "themeIndex": 0,
//!   "sortMode": 1,
//!   "tasks": [
//!     { "id": 1730000000000000000, "title": "water plants", "done": false,
//!       "dueAt": "2026-10-19T18:00:00Z", "notified": false }
//!   ]
//! }
//! ```
//!
//! A missing or unreadable file is never fatal: the caller falls back to
//! [`onboarding_snapshot`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::SortMode;
use crate::task::{Task, TaskId};

/// Errors from reading or writing the task file
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist yet
    #[error("No task file at {path}")]
    NotFound {
        /// The path that was attempted
        path: PathBuf,
    },

    /// Reading or writing failed
    #[error("I/O error on task file {path}: {source}")]
    Io {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The file is not valid task JSON
    #[error("Corrupt task file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Everything that is persisted
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Active theme index
    #[serde(default)]
    pub theme_index: usize,
    /// List ordering
    #[serde(default)]
    pub sort_mode: SortMode,
    /// Tasks in display order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Where snapshots are loaded from and saved to
pub trait Storage: Send {
    /// Load the last saved snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was saved yet or the data is unreadable.
    fn load(&self) -> Result<Snapshot, StorageError>;

    /// Overwrite the saved snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the data could not be written.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

/// Load a snapshot, falling back to onboarding content on any failure
pub fn load_or_onboard(storage: &dyn Storage, theme_count: usize) -> Snapshot {
    match storage.load() {
        Ok(mut snapshot) => {
            if snapshot.theme_index >= theme_count.max(1) {
                debug!(theme_index = snapshot.theme_index, "Theme index out of range, resetting");
                snapshot.theme_index = 0;
            }
            snapshot
        }
        Err(StorageError::NotFound { path }) => {
            debug!(path = %path.display(), "No task file yet, starting with onboarding tasks");
            onboarding_snapshot()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load tasks, starting with onboarding tasks");
            onboarding_snapshot()
        }
    }
}

/// The hint tasks shown on first run
#[must_use]
pub fn onboarding_snapshot() -> Snapshot {
    const HINTS: [(&str, bool); 7] = [
        ("Press 'n' to add a new task", false),
        ("Press 'e' to edit the selected task", false),
        ("Press 'd' to delete a task", false),
        ("Press 'space' to check/uncheck", true),
        ("Press '@' to set a timer notification", false),
        ("Press 's' to cycle sort modes", false),
        ("Press 't' to change the color theme", false),
    ];

    let tasks = HINTS
        .iter()
        .zip(1..)
        .map(|(&(title, done), id)| {
            let task = Task::new(TaskId(id), title);
            if done {
                task.completed()
            } else {
                task
            }
        })
        .collect();

    Snapshot {
        theme_index: 0,
        sort_mode: SortMode::Off,
        tasks,
    }
}

// ============================================================================
// JSON file storage
// ============================================================================

/// Pretty-printed JSON file on disk
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound {
                path: self.path.clone(),
            }
        } else {
            StorageError::Io {
                path: self.path.clone(),
                source,
            }
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Snapshot, StorageError> {
        let bytes = fs::read(&self.path).map_err(|e| self.io_error(e))?;
        let snapshot = serde_json::from_slice(&bytes)?;
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), tasks = snapshot.tasks.len(), "Saved tasks");
        Ok(())
    }
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Keeps the last saved snapshot in memory; counts saves
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Option<Snapshot>>,
    saves: Mutex<usize>,
    fail_saves: bool,
}

impl MemoryStorage {
    /// Empty storage (loading reports "not found")
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with a snapshot
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Storage whose saves always fail
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// The most recently saved snapshot
    #[must_use]
    pub fn last_saved(&self) -> Option<Snapshot> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of successful saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Snapshot, StorageError> {
        self.last_saved().ok_or_else(|| StorageError::NotFound {
            path: PathBuf::from("<memory>"),
        })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "save rejected"),
            });
        }
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(snapshot.clone());
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

/// Shared storage handles save through to the inner storage
impl<S: Storage + Sync> Storage for std::sync::Arc<S> {
    fn load(&self) -> Result<Snapshot, StorageError> {
        self.as_ref().load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.as_ref().save(snapshot)
    }
}
