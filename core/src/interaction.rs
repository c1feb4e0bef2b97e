//! Interaction State Machine
//!
//! The [`Session`] owns the task store and turns surface-agnostic key
//! presses into mutations. It is the only thing that mutates tasks; the
//! surface feeds it [`KeyInput`]s and ticks and renders from its accessors.
//!
//! # Modes
//!
//! ```text
//!                 n                      Enter (non-empty) ─► append task
//!   ┌──────┐ ───────────► Creating ───── Esc / Enter (empty) ─► no change
//!   │      │      e
//!   │Browse│ ───────────► Editing ────── Enter (non-empty) ─► rename
//!   │      │      @
//!   └──────┘ ───────────► SettingDeadline ─ Enter ─► set or clear deadline
//!       ▲                        │
//!       └────────────────────────┘   every text-entry mode returns to Browse
//! ```
//!
//! Every mutation is written through to storage immediately. Storage and
//! notifier failures are logged and never interrupt the session.

use std::fmt;

use tracing::{debug, info, warn};

use crate::animation::{AnimationState, AnimationTimings};
use crate::clock::Moment;
use crate::duration::parse_duration;
use crate::effects::EffectPicker;
use crate::notifier::Notifier;
use crate::persistence::{load_or_onboard, Storage};
use crate::scheduler::{Scheduler, TickReport};
use crate::store::TaskStore;
use crate::task::{Task, TaskId};

/// Longest title or deadline expression the input line accepts
pub const MAX_INPUT_CHARS: usize = 256;

// ============================================================================
// Keys and commands
// ============================================================================

/// A key press, independent of any terminal library
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character
    Char(char),
    /// Enter / Return
    Enter,
    /// Escape
    Esc,
    /// Backspace
    Backspace,
    /// Forward delete
    Delete,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Ctrl-C
    Interrupt,
}

/// A browse-mode command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move the selection up
    Up,
    /// Move the selection down
    Down,
    /// Start creating a task
    New,
    /// Start editing the selected task's title
    Edit,
    /// Delete the selected task
    Delete,
    /// Toggle the selected task's completion
    ToggleComplete,
    /// Start entering a deadline for the selected task
    SetDeadline,
    /// Advance the sort mode
    CycleSort,
    /// Advance the color theme
    CycleTheme,
    /// Save and exit
    Quit,
}

impl Command {
    /// The browse-mode command bound to a key
    #[must_use]
    pub fn from_key(key: KeyInput) -> Option<Self> {
        match key {
            KeyInput::Up | KeyInput::Char('k') => Some(Self::Up),
            KeyInput::Down | KeyInput::Char('j') => Some(Self::Down),
            KeyInput::Char('n') => Some(Self::New),
            KeyInput::Char('e') => Some(Self::Edit),
            KeyInput::Char('d') => Some(Self::Delete),
            KeyInput::Enter | KeyInput::Char(' ') => Some(Self::ToggleComplete),
            KeyInput::Char('@') => Some(Self::SetDeadline),
            KeyInput::Char('s') => Some(Self::CycleSort),
            KeyInput::Char('t') => Some(Self::CycleTheme),
            KeyInput::Interrupt | KeyInput::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the list
    #[default]
    Browse,
    /// Typing the title of a new task
    Creating,
    /// Typing a replacement title
    Editing {
        /// The task being renamed
        target: TaskId,
    },
    /// Typing a deadline expression
    SettingDeadline {
        /// The task receiving the deadline
        target: TaskId,
    },
}

impl Mode {
    /// Whether keys go to the text buffer
    #[must_use]
    pub fn is_text_entry(self) -> bool {
        !matches!(self, Self::Browse)
    }

    /// The task a text-entry mode applies to
    #[must_use]
    pub fn target(self) -> Option<TaskId> {
        match self {
            Self::Editing { target } | Self::SettingDeadline { target } => Some(target),
            Self::Browse | Self::Creating => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browse => write!(f, "browse"),
            Self::Creating => write!(f, "creating"),
            Self::Editing { .. } => write!(f, "editing"),
            Self::SettingDeadline { .. } => write!(f, "setting-deadline"),
        }
    }
}

// ============================================================================
// TextBuffer
// ============================================================================

/// Single-line edit buffer indexed by character, not byte
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl TextBuffer {
    /// An empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text` (truncated to the limit) with the cursor at the end
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().take(MAX_INPUT_CHARS).collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    /// Current contents
    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in characters
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Text before and after the cursor
    #[must_use]
    pub fn split_at_cursor(&self) -> (String, String) {
        (
            self.chars[..self.cursor].iter().collect(),
            self.chars[self.cursor..].iter().collect(),
        )
    }

    /// Insert at the cursor; returns false when full
    pub fn insert(&mut self, ch: char) -> bool {
        if self.chars.len() >= MAX_INPUT_CHARS {
            return false;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    /// Move the cursor one character left
    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right
    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    /// Move the cursor to the start
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end
    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Empty the buffer
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Apply an editing key; returns false for keys that are not edits
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(ch) if !ch.is_control() => {
                self.insert(ch);
            }
            KeyInput::Backspace => self.backspace(),
            KeyInput::Delete => self.delete(),
            KeyInput::Left => self.left(),
            KeyInput::Right => self.right(),
            KeyInput::Home => self.home(),
            KeyInput::End => self.end(),
            _ => return false,
        }
        true
    }
}

// ============================================================================
// Session
// ============================================================================

/// What the surface should do after a key press
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Something is animating or counting down; make sure a tick is armed
    pub wants_tick: bool,
    /// The user asked to exit
    pub quit: bool,
}

/// The interactive task list
pub struct Session {
    store: TaskStore,
    mode: Mode,
    cursor: usize,
    cursor_before_create: usize,
    input: TextBuffer,
    picker: EffectPicker,
    scheduler: Scheduler,
    storage: Box<dyn Storage>,
    notifier: Box<dyn Notifier>,
    theme_count: usize,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("cursor", &self.cursor)
            .field("tasks", &self.store.len())
            .field("theme_count", &self.theme_count)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A session over an already-built store
    #[must_use]
    pub fn new(store: TaskStore, storage: Box<dyn Storage>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            store,
            mode: Mode::Browse,
            cursor: 0,
            cursor_before_create: 0,
            input: TextBuffer::new(),
            picker: EffectPicker::new(),
            scheduler: Scheduler::default(),
            storage,
            notifier,
            theme_count: 1,
        }
    }

    /// Load the store from `storage` (falling back to onboarding tasks)
    #[must_use]
    pub fn load(
        storage: Box<dyn Storage>,
        notifier: Box<dyn Notifier>,
        theme_count: usize,
        now: Moment,
    ) -> Self {
        let snapshot = load_or_onboard(storage.as_ref(), theme_count);
        let store = TaskStore::from_snapshot(snapshot, now.wall);
        info!(tasks = store.len(), sort = %store.sort_mode(), "Tasks loaded");
        Self::new(store, storage, notifier).with_theme_count(theme_count)
    }

    /// Builder: animation timings
    #[must_use]
    pub fn with_timings(mut self, timings: AnimationTimings) -> Self {
        self.scheduler = Scheduler::new(timings);
        self
    }

    /// Builder: number of available themes
    #[must_use]
    pub fn with_theme_count(mut self, theme_count: usize) -> Self {
        self.theme_count = theme_count.max(1);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The task store
    #[must_use]
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Current input mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Selected row; equals the task count while creating
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The text being entered
    #[must_use]
    pub fn input(&self) -> &TextBuffer {
        &self.input
    }

    /// The selected task, if any
    #[must_use]
    pub fn selected(&self) -> Option<&Task> {
        self.store.get(self.cursor)
    }

    /// Animation timings in use
    #[must_use]
    pub fn timings(&self) -> &AnimationTimings {
        self.scheduler.timings()
    }

    /// Active theme index
    #[must_use]
    pub fn theme_index(&self) -> usize {
        self.store.theme_index()
    }

    /// Whether anything needs ticking
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.scheduler.has_pending_work(&self.store)
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Process one key press
    pub fn handle_key(&mut self, key: KeyInput, now: Moment) -> Reaction {
        let quit = if self.mode.is_text_entry() {
            self.handle_text_key(key, now)
        } else {
            Command::from_key(key).is_some_and(|command| self.execute(command, now))
        };

        Reaction {
            wants_tick: !quit && self.needs_tick(),
            quit,
        }
    }

    /// Advance animations and deadlines
    pub fn tick(&mut self, now: Moment) -> TickReport {
        let report = self.scheduler.tick(&mut self.store, now, self.notifier.as_ref());
        if !report.removed.is_empty() {
            self.sync_cursor();
        }
        if report.needs_save() {
            self.persist();
        }
        report
    }

    /// Run a browse-mode command; returns true on quit
    pub fn execute(&mut self, command: Command, now: Moment) -> bool {
        match command {
            Command::Up => self.cursor = self.cursor.saturating_sub(1),
            Command::Down => {
                if self.cursor + 1 < self.store.len() {
                    self.cursor += 1;
                }
            }
            Command::New => {
                self.cursor_before_create = self.cursor;
                self.cursor = self.store.len();
                self.input.clear();
                self.mode = Mode::Creating;
            }
            Command::Edit => {
                let selected = self.selected_live().map(|t| (t.id, t.title.clone()));
                if let Some((target, title)) = selected {
                    self.input = TextBuffer::with_text(&title);
                    self.mode = Mode::Editing { target };
                }
            }
            Command::SetDeadline => {
                if let Some(task) = self.selected_live() {
                    let target = task.id;
                    self.input.clear();
                    self.mode = Mode::SettingDeadline { target };
                }
            }
            Command::Delete => self.delete_selected(now),
            Command::ToggleComplete => self.toggle_selected(now),
            Command::CycleSort => {
                let mode = self.follow_selection(TaskStore::cycle_sort);
                debug!(sort = %mode, "Sort mode changed");
                self.persist();
            }
            Command::CycleTheme => {
                let theme = self.store.cycle_theme(self.theme_count);
                debug!(theme, "Theme changed");
                self.persist();
            }
            Command::Quit => {
                self.persist();
                info!("Quit requested");
                return true;
            }
        }
        false
    }

    fn handle_text_key(&mut self, key: KeyInput, now: Moment) -> bool {
        match key {
            KeyInput::Enter => self.commit(now),
            KeyInput::Esc => self.cancel(),
            KeyInput::Interrupt => {
                self.cancel();
                self.persist();
                info!("Quit requested");
                return true;
            }
            other => {
                self.input.apply(other);
            }
        }
        false
    }

    fn commit(&mut self, now: Moment) {
        let text = self.input.text();
        match self.mode {
            Mode::Browse => {}
            Mode::Creating => {
                if text.is_empty() {
                    self.cancel();
                    return;
                }
                let id = self.store.create(text, now.wall);
                self.store.apply_sort();
                self.cursor = self.store.position(id).unwrap_or(0);
                debug!(task_id = %id, "Task created");
            }
            Mode::Editing { target } => {
                if text.is_empty() {
                    self.cancel();
                    return;
                }
                if let Some(task) = self.store.find_mut(target) {
                    task.title = text;
                    debug!(task_id = %target, "Task renamed");
                }
            }
            Mode::SettingDeadline { target } => {
                if let Some(task) = self.store.find_mut(target) {
                    match parse_duration(&text) {
                        Ok(delta) => {
                            let due = now
                                .wall
                                .checked_add_signed(delta)
                                .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
                            task.set_deadline(due);
                            debug!(task_id = %target, due = %due, "Deadline set");
                        }
                        Err(e) => {
                            task.clear_deadline();
                            debug!(task_id = %target, reason = %e, "Deadline cleared");
                        }
                    }
                }
            }
        }

        self.input.clear();
        self.mode = Mode::Browse;
        self.sync_cursor();
        self.persist();
    }

    fn cancel(&mut self) {
        if self.mode == Mode::Creating {
            self.cursor = self.cursor_before_create;
        }
        self.input.clear();
        self.mode = Mode::Browse;
        self.sync_cursor();
    }

    fn toggle_selected(&mut self, now: Moment) {
        let Some(task) = self.store.get_mut(self.cursor) else {
            return;
        };
        if task.animation.is_deleting() {
            return;
        }

        task.done = !task.done;
        if task.done {
            let effect = self.picker.pick(&mut rand::thread_rng());
            task.animation = AnimationState::CheckAnimating {
                effect,
                started_at: now.instant,
            };
            debug!(task_id = %task.id, effect = %effect, "Task checked");
        } else {
            task.animation = AnimationState::Idle;
            debug!(task_id = %task.id, "Task unchecked");
        }

        self.follow_selection(TaskStore::apply_sort);
        self.persist();
    }

    fn delete_selected(&mut self, now: Moment) {
        let Some(task) = self.store.get_mut(self.cursor) else {
            return;
        };
        if task.animation.is_deleting() {
            return;
        }
        task.animation = AnimationState::Deleting {
            started_at: now.instant,
        };
        debug!(task_id = %task.id, "Task deletion started");
    }

    /// The selected task unless it is on its way out
    fn selected_live(&self) -> Option<&Task> {
        self.selected().filter(|t| !t.animation.is_deleting())
    }

    /// Run a re-ordering operation, keeping the same task selected
    fn follow_selection<T>(&mut self, reorder: impl FnOnce(&mut TaskStore) -> T) -> T {
        let selected = self.selected().map(|t| t.id);
        let result = reorder(&mut self.store);
        if let Some(position) = selected.and_then(|id| self.store.position(id)) {
            self.cursor = position;
        }
        result
    }

    /// Keep the cursor on a valid row for the current mode
    fn sync_cursor(&mut self) {
        if let Some(position) = self.mode.target().and_then(|id| self.store.position(id)) {
            self.cursor = position;
        } else if self.mode == Mode::Creating {
            self.cursor = self.store.len();
        } else if self.cursor >= self.store.len() {
            self.cursor = self.store.len().saturating_sub(1);
        }
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.store.snapshot()) {
            warn!(error = %e, "Failed to save tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keymap() {
        assert_eq!(Command::from_key(KeyInput::Char('k')), Some(Command::Up));
        assert_eq!(Command::from_key(KeyInput::Down), Some(Command::Down));
        assert_eq!(Command::from_key(KeyInput::Char(' ')), Some(Command::ToggleComplete));
        assert_eq!(Command::from_key(KeyInput::Enter), Some(Command::ToggleComplete));
        assert_eq!(Command::from_key(KeyInput::Char('@')), Some(Command::SetDeadline));
        assert_eq!(Command::from_key(KeyInput::Interrupt), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyInput::Char('x')), None);
        assert_eq!(Command::from_key(KeyInput::Esc), None);
    }

    #[test]
    fn test_buffer_edits_by_character() {
        let mut buffer = TextBuffer::with_text("héllo");
        assert_eq!(buffer.cursor(), 5);

        buffer.left();
        buffer.left();
        buffer.backspace();
        assert_eq!(buffer.text(), "hélo");

        buffer.home();
        buffer.delete();
        buffer.insert('J');
        assert_eq!(buffer.text(), "Jélo");
        assert_eq!(buffer.split_at_cursor(), ("J".to_string(), "élo".to_string()));

        buffer.end();
        buffer.right();
        assert_eq!(buffer.cursor(), 4);
    }

    #[test]
    fn test_buffer_limit() {
        let mut buffer = TextBuffer::with_text(&"x".repeat(300));
        assert_eq!(buffer.len(), MAX_INPUT_CHARS);
        assert!(!buffer.insert('y'));
    }

    #[test]
    fn test_buffer_ignores_non_edit_keys() {
        let mut buffer = TextBuffer::new();
        assert!(!buffer.apply(KeyInput::Up));
        assert!(!buffer.apply(KeyInput::Enter));
        assert!(buffer.apply(KeyInput::Char('a')));
        assert!(buffer.apply(KeyInput::Char('\u{7}')));
        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn test_mode_target() {
        assert_eq!(Mode::Browse.target(), None);
        assert_eq!(Mode::Editing { target: TaskId(4) }.target(), Some(TaskId(4)));
        assert!(Mode::Creating.is_text_entry());
        assert!(!Mode::Browse.is_text_entry());
    }
}
