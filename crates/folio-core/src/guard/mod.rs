//! Abuse protection for the two public-facing write paths: admin login and
//! the contact form.
//!
//! All state is in memory and per process. Every tracker operation takes
//! `now` explicitly; [`AbuseGuard`] reads it once per request from its
//! [`Clock`](crate::clock::Clock).

pub mod captcha;
pub mod login;
pub mod protection;
pub mod rate_limit;
pub mod spam;

pub use captcha::{CaptchaError, CaptchaVerifier, TurnstileVerifier, VERIFY_TIMEOUT};
pub use login::LoginAttemptTracker;
pub use protection::{AbuseGuard, Submission, SubmissionRejection};
pub use rate_limit::IpRateLimiter;
pub use spam::{
    build_message_content_hash, is_honeypot_triggered, is_submission_too_fast, normalize_text,
};

use chrono::{DateTime, Duration, Utc};

/// Upper bound for every configured guard duration.
pub const MAX_GUARD_DURATION: Duration = Duration::days(3650);

/// Key used when a request carries no usable client address.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Trim a client identity; blank values map to [`UNKNOWN_IDENTITY`].
pub fn normalize_identity(identity: &str) -> String {
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        UNKNOWN_IDENTITY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `minutes` as a duration, capped at [`MAX_GUARD_DURATION`]. Values too large
/// to represent are capped as well.
pub fn capped_minutes(minutes: i64) -> Duration {
    Duration::try_minutes(minutes)
        .unwrap_or(MAX_GUARD_DURATION)
        .min(MAX_GUARD_DURATION)
}

/// Same as [`capped_minutes`] for hours.
pub fn capped_hours(hours: i64) -> Duration {
    Duration::try_hours(hours)
        .unwrap_or(MAX_GUARD_DURATION)
        .min(MAX_GUARD_DURATION)
}

/// Same as [`capped_minutes`] for seconds.
pub fn capped_seconds(seconds: i64) -> Duration {
    Duration::try_seconds(seconds)
        .unwrap_or(MAX_GUARD_DURATION)
        .min(MAX_GUARD_DURATION)
}

/// `at + by`, saturating at the latest representable instant.
pub(crate) fn saturating_add(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `at - by`, saturating at the earliest representable instant.
pub(crate) fn saturating_sub(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_sub_signed(by).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
