//! Layering and efficiency rules
//!
//! **Policy**: The engine (`core`) never touches the terminal, nothing sleeps
//! in production code, and production code propagates errors instead of
//! unwrapping.

use architectural_enforcement::{assert_clean, scan};

#[test]
fn test_core_has_no_terminal_dependencies() {
    let violations = scan(&["core/src"], |code| {
        code.contains("ratatui::") || code.contains("crossterm::")
    });
    assert_clean("core must stay terminal-agnostic", &violations);
}

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = std::fs::read_to_string(
        architectural_enforcement::workspace_root()
            .join("core")
            .join("Cargo.toml"),
    )
    .unwrap();
    for forbidden in ["ratatui", "crossterm"] {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(forbidden)),
            "core/Cargo.toml depends on {forbidden}"
        );
    }
}

#[test]
fn test_no_sleep_in_production_code() {
    let violations = scan(&["core/src", "tui/src"], |code| {
        code.contains("::sleep(") || code.contains(".sleep(")
    });
    assert_clean(
        "sleep in production code; arm the tick deadline instead",
        &violations,
    );
}

#[test]
fn test_no_unwrap_in_production_code() {
    let violations = scan(&["core/src", "tui/src"], |code| {
        code.contains(".unwrap()") || code.contains(".expect(")
    });
    assert_clean("unwrap/expect in production code", &violations);
}
