//! Key Translation
//!
//! Maps crossterm key events onto the terminal-agnostic [`KeyInput`] the
//! session understands. Release and repeat events are dropped, as are keys
//! with no binding in any mode.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use ticklist_core::KeyInput;

/// Translate a crossterm key event
#[must_use]
pub fn translate(key: KeyEvent) -> Option<KeyInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyInput::Interrupt),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(ch) => Some(KeyInput::Char(ch)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        _ => None,
    }
}
