//! Deadline Notifications
//!
//! A [`Notifier`] delivers one desktop notification per deadline crossing.
//! Delivery is fire-and-forget: the scheduler marks the task notified whether
//! or not delivery succeeded, so a broken notifier can never cause a retry
//! storm.

use std::process::{Command, Stdio};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, info};

/// Title used for every deadline notification
pub const ALERT_TITLE: &str = "Todo Alert!";

/// Errors from delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No notification command is configured or known for this platform
    #[error("No notification command available")]
    Unavailable,

    /// The notification command could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Delivers a notification with a title and a body
pub trait Notifier: Send {
    /// Deliver a notification without waiting for it to be shown
    ///
    /// # Errors
    ///
    /// Returns an error if delivery could not be started.
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

// ============================================================================
// CommandNotifier
// ============================================================================

/// Spawns an external command per notification
///
/// The configured argv may contain the placeholders `{title}` and `{body}`;
/// if neither appears, title and body are appended as two arguments.
#[derive(Clone, Debug)]
pub struct CommandNotifier {
    argv: Vec<String>,
}

impl CommandNotifier {
    /// Use an explicit command line
    #[must_use]
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// The platform's usual notification command, if there is one
    #[must_use]
    pub fn platform_default() -> Option<Self> {
        // Title and body travel as arguments, never as script or option text
        let argv: &[&str] = if cfg!(target_os = "macos") {
            &[
                "osascript",
                "-e",
                "on run argv",
                "-e",
                "display notification (item 2 of argv) with title (item 1 of argv)",
                "-e",
                "end run",
                "{title}",
                "{body}",
            ]
        } else if cfg!(unix) {
            &["notify-send", "--", "{title}", "{body}"]
        } else {
            return None;
        };
        Some(Self::new(argv.iter().map(ToString::to_string).collect()))
    }

    /// The command line with placeholders substituted
    ///
    /// Substitution is a single pass, so placeholder text inside a title or
    /// body is left alone.
    #[must_use]
    pub fn command_line(&self, title: &str, body: &str) -> Vec<String> {
        let templated = self
            .argv
            .iter()
            .any(|arg| arg.contains(TITLE_PLACEHOLDER) || arg.contains(BODY_PLACEHOLDER));

        let mut line: Vec<String> = self
            .argv
            .iter()
            .map(|arg| substitute(arg, title, body))
            .collect();
        if !templated {
            line.push(title.to_string());
            line.push(body.to_string());
        }
        line
    }
}

const TITLE_PLACEHOLDER: &str = "{title}";
const BODY_PLACEHOLDER: &str = "{body}";

fn substitute(arg: &str, title: &str, body: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(TITLE_PLACEHOLDER) {
            out.push_str(title);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(BODY_PLACEHOLDER) {
            out.push_str(body);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

impl Notifier for CommandNotifier {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if self.argv.is_empty() {
            return Err(NotifyError::Unavailable);
        }
        let line = self.command_line(title, body);
        let (program, args) = line.split_first().ok_or(NotifyError::Unavailable)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| NotifyError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Reap the child off the event loop
        std::thread::spawn(move || {
            let _ = child.wait();
        });

        debug!(program = %program, "Notification command spawned");
        Ok(())
    }
}

// ============================================================================
// LogNotifier
// ============================================================================

/// Writes notifications to the log instead of the desktop
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(title, body, "Notification");
        Ok(())
    }
}

// ============================================================================
// RecordingNotifier
// ============================================================================

/// Records every delivery; useful in tests
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    /// A notifier that accepts every delivery
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records deliveries and then reports failure
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// All `(title, body)` pairs delivered so far
    #[must_use]
    pub fn delivered(&self) -> Vec<(String, String)> {
        self.delivered.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of deliveries so far
    #[must_use]
    pub fn count(&self) -> usize {
        self.delivered.lock().map(|d| d.len()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push((title.to_string(), body.to_string()));
        }
        if self.fail {
            Err(NotifyError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl<N: Notifier + Sync> Notifier for std::sync::Arc<N> {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.as_ref().deliver(title, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders_are_substituted() {
        let notifier = CommandNotifier::new(vec![
            "notify-send".into(),
            "--app-name=ticklist".into(),
            "{title}".into(),
            "{body}".into(),
        ]);
        assert_eq!(
            notifier.command_line("Todo Alert!", "water plants"),
            vec!["notify-send", "--app-name=ticklist", "Todo Alert!", "water plants"]
        );
    }

    #[test]
    fn test_platform_default_passes_text_as_arguments() {
        let Some(notifier) = CommandNotifier::platform_default() else {
            return;
        };
        let body = "buy \"good\" milk\" & do shell script \"touch /tmp/x\" & \"";
        let line = notifier.command_line(ALERT_TITLE, body);

        // The text arrives verbatim as the last two arguments
        assert_eq!(line[line.len() - 2], ALERT_TITLE);
        assert_eq!(line[line.len() - 1], body);
        // and never inside the program's own arguments
        assert!(line[..line.len() - 2].iter().all(|arg| !arg.contains("shell script")));
    }

    #[test]
    fn test_option_like_title_follows_separator() {
        let notifier = CommandNotifier::new(vec![
            "notify-send".into(),
            "--".into(),
            "{title}".into(),
            "{body}".into(),
        ]);
        assert_eq!(
            notifier.command_line("-u critical", "x"),
            vec!["notify-send", "--", "-u critical", "x"]
        );
    }

    #[test]
    fn test_placeholders_in_text_are_not_expanded() {
        let notifier = CommandNotifier::new(vec!["n".into(), "{title}: {body}".into()]);
        assert_eq!(
            notifier.command_line("{body}", "b {title} {x"),
            vec!["n", "{body}: b {title} {x"]
        );
    }

    #[test]
    fn test_plain_argv_gets_title_and_body_appended() {
        let notifier = CommandNotifier::new(vec!["my-notifier".into()]);
        assert_eq!(
            notifier.command_line("t", "b"),
            vec!["my-notifier", "t", "b"]
        );
    }

    #[test]
    fn test_empty_argv_is_unavailable() {
        let notifier = CommandNotifier::new(Vec::new());
        let err = notifier.deliver("t", "b").unwrap_err();
        assert!(matches!(err, NotifyError::Unavailable));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let notifier = CommandNotifier::new(vec!["/nonexistent/ticklist-notify".into()]);
        let err = notifier.deliver("t", "b").unwrap_err();
        assert!(matches!(err, NotifyError::Spawn { .. }));
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.deliver(ALERT_TITLE, "ship it").unwrap();
        assert_eq!(
            notifier.delivered(),
            vec![("Todo Alert!".to_string(), "ship it".to_string())]
        );

        let failing = RecordingNotifier::failing();
        assert!(failing.deliver(ALERT_TITLE, "x").is_err());
        assert_eq!(failing.count(), 1);
    }
}
