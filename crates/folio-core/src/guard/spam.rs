//! Local spam heuristics for the contact form.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

/// Reported form-render times further ahead of the server than this are
/// treated as forged.
const MAX_CLOCK_SKEW_SECS: i64 = 10;

/// The hidden form field is filled in.
pub fn is_honeypot_triggered(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Whether a form was submitted faster than a person could fill it in.
///
/// `submitted_at_ms` is the client-reported render time in milliseconds since
/// the epoch. A `None` or non-positive `min_delay` disables the check.
pub fn is_submission_too_fast(
    submitted_at_ms: i64,
    now: DateTime<Utc>,
    min_delay: Option<Duration>,
) -> bool {
    let Some(min_delay) = min_delay.filter(|d| *d > Duration::zero()) else {
        return false;
    };

    if submitted_at_ms <= 0 {
        return true;
    }
    let Some(submitted_at) = DateTime::<Utc>::from_timestamp_millis(submitted_at_ms) else {
        return true;
    };

    if submitted_at > now + Duration::seconds(MAX_CLOCK_SKEW_SECS) {
        return true;
    }

    now - submitted_at < min_delay
}

/// Lowercase, trim and collapse whitespace runs to a single space.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Hex SHA-256 fingerprint of a message, insensitive to case and whitespace.
pub fn build_message_content_hash(email: &str, subject: &str, content: &str) -> String {
    let normalized = format!(
        "{}|{}|{}",
        email.trim().to_lowercase(),
        normalize_text(subject),
        normalize_text(content)
    );
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
