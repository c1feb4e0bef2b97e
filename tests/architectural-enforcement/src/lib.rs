//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The engine crate stays free of terminal libraries
//! - No sleep() calls in production code; timing is driven by the tick deadline
//! - No unwrap()/expect() outside test code
//!
//! The helpers below scan workspace sources; the rules live under `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this package
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// One offending source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The trimmed source line
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Every `.rs` file under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    if !root.exists() {
        return Vec::new();
    }
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Lines of production code: comments stripped, and everything from the
/// first `#[cfg(test)]` on dropped
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
        .collect()
}

/// Scan production code under `dirs` for lines matching `is_violation`
pub fn scan(dirs: &[&str], is_violation: impl Fn(&str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    for dir in dirs {
        for path in rust_files(dir) {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            for (line, code) in production_lines(&content) {
                if is_violation(code) {
                    violations.push(Violation {
                        path: path.clone(),
                        line,
                        text: code.trim().to_string(),
                    });
                }
            }
        }
    }
    violations
}

/// Panic with a readable report if any violations were found
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s): {rule}", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let source = "fn a() {} // note\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }\n";
        let lines = production_lines(source);
        assert_eq!(lines, vec![(1, "fn a() {} ")]);
    }

    #[test]
    fn test_workspace_root_contains_members() {
        assert!(workspace_root().join("core").join("Cargo.toml").exists());
        assert!(!rust_files("core/src").is_empty());
    }
}
