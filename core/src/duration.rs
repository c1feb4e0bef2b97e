//! Deadline Expressions
//!
//! Deadlines are typed as relative durations: `10m`, `1h2s`, `1.5h`,
//! `90s`, `-5m`. The grammar is a sequence of `<decimal><unit>` groups with
//! an optional leading sign:
//!
//! ```text
//! duration := [+-]? ( "0" | group+ )
//! group    := digits? ( "." digits? )? unit      (at least one digit)
//! unit     := "ns" | "us" | "µs" | "μs" | "ms" | "s" | "m" | "h"
//! ```
//!
//! Zero and negative durations are valid and mean "already due".

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Why a deadline expression could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    /// Nothing was entered
    #[error("Empty duration")]
    Empty,

    /// The text does not follow the grammar
    #[error("Invalid duration {0:?}")]
    Invalid(String),

    /// A number was not followed by a unit
    #[error("Missing unit in duration {0:?}")]
    MissingUnit(String),

    /// A unit was not recognised
    #[error("Unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The offending unit
        unit: String,
        /// The full input
        input: String,
    },

    /// The value does not fit in 64-bit nanoseconds
    #[error("Duration {0:?} is out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u64> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        _ => return None,
    })
}

/// Parse a deadline expression into a signed duration
///
/// # Errors
///
/// Returns [`DurationParseError`] if the input is empty, malformed, uses an
/// unknown unit, or overflows.
pub fn parse_duration(input: &str) -> Result<chrono::Duration, DurationParseError> {
    let invalid = || DurationParseError::Invalid(input.to_string());

    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(chrono::Duration::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        // Integer part
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after) = rest.split_at(int_len);
        rest = after;

        // Fraction part
        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_digits = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        // Unit: everything up to the next digit or dot
        let unit_len = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map_or(rest.len(), |(i, _)| i);
        let (unit, after) = rest.split_at(unit_len);
        rest = after;
        if unit.is_empty() {
            return Err(DurationParseError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationParseError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let overflow = || DurationParseError::Overflow(input.to_string());
        let whole: u64 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| overflow())?
        };
        let mut value = whole.checked_mul(scale).ok_or_else(overflow)?;
        if !frac_digits.is_empty() {
            value = value
                .checked_add(fraction_nanos(frac_digits, scale))
                .ok_or_else(overflow)?;
        }
        total = total.checked_add(value).ok_or_else(overflow)?;
    }

    let nanos = i64::try_from(total).map_err(|_| DurationParseError::Overflow(input.to_string()))?;
    let nanos = if negative { -nanos } else { nanos };
    Ok(chrono::Duration::nanoseconds(nanos))
}

/// `0.<digits>` of `scale` nanoseconds, truncated
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn fraction_nanos(digits: &str, scale: u64) -> u64 {
    // Digits past nanosecond precision of an hour cannot matter
    let digits = &digits[..digits.len().min(18)];
    let numerator: u64 = digits.parse().unwrap_or(0);
    let denominator = 10f64.powi(i32::try_from(digits.len()).unwrap_or(18));
    (numerator as f64 * (scale as f64 / denominator)) as u64
}

/// Compact countdown text: `1h2m3s`, `4m5s`, or `6s`
///
/// The remaining time is rounded to the nearest second (halves round up).
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let mut secs = remaining.as_secs();
    if remaining.subsec_nanos() >= 500_000_000 {
        secs += 1;
    }

    let hours = secs / 3_600;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
