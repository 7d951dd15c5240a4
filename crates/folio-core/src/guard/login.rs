use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::config::GuardConfig;

use super::{
    MAX_GUARD_DURATION, capped_minutes, normalize_identity, saturating_add, saturating_sub,
};

/// Records untouched for this long are dropped, blocked or not.
const STALE_AFTER_HOURS: i64 = 72;

const DEFAULT_BLOCK_MINUTES: i64 = 15;
const DEFAULT_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Default, Clone)]
struct LoginAttemptRecord {
    failed_count: u32,
    last_failed_at: Option<DateTime<Utc>>,
    blocked_until: Option<DateTime<Utc>>,
    last_seen_at: Option<DateTime<Utc>>,
}

impl LoginAttemptRecord {
    fn block_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.blocked_until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }
}

/// In-memory brute-force protection for the admin login.
///
/// Counts consecutive failures per client identity and blocks the identity
/// for `block_duration` once `max_attempts` failures land within
/// `attempt_window` of each other. State lives only in this process.
pub struct LoginAttemptTracker {
    max_attempts: u32,
    block_duration: Duration,
    attempt_window: Duration,
    attempts: Mutex<HashMap<String, LoginAttemptRecord>>,
}

impl LoginAttemptTracker {
    /// Create a tracker. Non-positive durations fall back to 15 minutes,
    /// durations are capped at [`MAX_GUARD_DURATION`] and `max_attempts` is
    /// at least 1.
    pub fn new(max_attempts: i64, block_duration: Duration, attempt_window: Duration) -> Self {
        let block_duration = if block_duration > Duration::zero() {
            block_duration.min(MAX_GUARD_DURATION)
        } else {
            Duration::minutes(DEFAULT_BLOCK_MINUTES)
        };
        let attempt_window = if attempt_window > Duration::zero() {
            attempt_window.min(MAX_GUARD_DURATION)
        } else {
            Duration::minutes(DEFAULT_WINDOW_MINUTES)
        };

        Self {
            max_attempts: max_attempts.clamp(1, u32::MAX as i64) as u32,
            block_duration,
            attempt_window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(
            config.login_max_attempts,
            capped_minutes(config.login_block_minutes),
            capped_minutes(config.login_attempt_window_minutes),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn block_duration(&self) -> Duration {
        self.block_duration
    }

    /// Remaining block time for `identity`, or `None` when it may try again.
    ///
    /// Never touches the failure count.
    pub fn check_blocked(&self, identity: &str, now: DateTime<Utc>) -> Option<Duration> {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        Self::cleanup_locked(&mut map, now);

        let record = map.get_mut(&normalize_identity(identity))?;
        let remaining = record.block_remaining(now)?;
        record.last_seen_at = Some(now);
        Some(remaining)
    }

    /// Count a failed login.
    ///
    /// Returns the time the identity is now blocked for: the remaining time if
    /// it was already blocked, the full block duration if this failure tripped
    /// the threshold, `None` otherwise.
    pub fn record_failure(&self, identity: &str, now: DateTime<Utc>) -> Option<Duration> {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        Self::cleanup_locked(&mut map, now);

        let record = map.entry(normalize_identity(identity)).or_default();

        if let Some(remaining) = record.block_remaining(now) {
            record.last_seen_at = Some(now);
            return Some(remaining);
        }

        if let Some(last) = record.last_failed_at {
            if now - last > self.attempt_window {
                record.failed_count = 0;
            }
        }

        record.failed_count += 1;
        record.last_failed_at = Some(now);
        record.last_seen_at = Some(now);

        if record.failed_count >= self.max_attempts {
            record.blocked_until = Some(saturating_add(now, self.block_duration));
            record.failed_count = 0;
            return Some(self.block_duration);
        }

        None
    }

    /// Forget everything about `identity` after a successful login.
    pub fn record_success(&self, identity: &str) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&normalize_identity(identity));
    }

    /// Number of identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.attempts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    fn cleanup_locked(map: &mut HashMap<String, LoginAttemptRecord>, now: DateTime<Utc>) {
        let stale_before = saturating_sub(now, Duration::hours(STALE_AFTER_HOURS));
        map.retain(|_, record| record.last_seen_at.is_some_and(|seen| seen >= stale_before));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn tracker(max: i64) -> LoginAttemptTracker {
        LoginAttemptTracker::new(max, Duration::minutes(15), Duration::minutes(15))
    }

    #[test]
    fn test_blocks_after_max_attempts() {
        let t = tracker(3);
        assert_eq!(t.record_failure("1.2.3.4", t0()), None);
        assert_eq!(t.record_failure("1.2.3.4", t0() + Duration::seconds(1)), None);
        assert_eq!(
            t.record_failure("1.2.3.4", t0() + Duration::seconds(2)),
            Some(Duration::minutes(15))
        );

        let remaining = t.check_blocked("1.2.3.4", t0() + Duration::seconds(2));
        assert_eq!(remaining, Some(Duration::minutes(15)));
    }

    #[test]
    fn test_failure_while_blocked_does_not_extend_block() {
        let t = tracker(1);
        assert!(t.record_failure("ip", t0()).is_some());

        let later = t0() + Duration::minutes(5);
        assert_eq!(t.record_failure("ip", later), Some(Duration::minutes(10)));
        assert_eq!(t.check_blocked("ip", later), Some(Duration::minutes(10)));
    }

    #[test]
    fn test_block_expires() {
        let t = tracker(1);
        t.record_failure("ip", t0());
        assert!(t.check_blocked("ip", t0() + Duration::minutes(15)).is_none());
    }

    #[test]
    fn test_count_resets_after_block() {
        let t = tracker(2);
        t.record_failure("ip", t0());
        assert!(t.record_failure("ip", t0()).is_some());

        // Block over: a single new failure must not re-trip it.
        let after = t0() + Duration::minutes(16);
        assert_eq!(t.record_failure("ip", after), None);
        assert!(t.check_blocked("ip", after).is_none());
    }

    #[test]
    fn test_failures_outside_window_do_not_combine() {
        let t = tracker(2);
        assert_eq!(t.record_failure("ip", t0()), None);
        let later = t0() + Duration::minutes(15) + Duration::seconds(1);
        assert_eq!(t.record_failure("ip", later), None);
        assert!(t.check_blocked("ip", later).is_none());
    }

    #[test]
    fn test_failure_exactly_at_window_edge_still_counts() {
        let t = tracker(2);
        t.record_failure("ip", t0());
        assert!(t.record_failure("ip", t0() + Duration::minutes(15)).is_some());
    }

    #[test]
    fn test_success_clears_history() {
        let t = tracker(3);
        t.record_failure("ip", t0());
        t.record_failure("ip", t0());
        t.record_success("ip");
        assert_eq!(t.tracked(), 0);

        assert_eq!(t.record_failure("ip", t0()), None);
        assert_eq!(t.record_failure("ip", t0()), None);
        assert!(t.record_failure("ip", t0()).is_some());
    }

    #[test]
    fn test_check_does_not_create_records() {
        let t = tracker(3);
        assert!(t.check_blocked("ip", t0()).is_none());
        assert_eq!(t.tracked(), 0);
    }

    #[test]
    fn test_stale_records_are_collected() {
        let t = tracker(1);
        t.record_failure("old", t0());
        t.record_failure("new", t0() + Duration::hours(72));
        assert_eq!(t.tracked(), 2);

        t.check_blocked("new", t0() + Duration::hours(72) + Duration::seconds(1));
        assert_eq!(t.tracked(), 1);
    }

    #[test]
    fn test_blank_identity_shares_unknown_bucket() {
        let t = tracker(2);
        t.record_failure("", t0());
        assert!(t.record_failure("  ", t0()).is_some());
        assert!(t.check_blocked("unknown", t0()).is_some());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let t = LoginAttemptTracker::new(0, Duration::zero(), Duration::minutes(-5));
        assert_eq!(t.max_attempts(), 1);
        assert_eq!(t.block_duration(), Duration::minutes(15));
    }

    #[test]
    fn test_huge_block_duration_is_capped() {
        let t = LoginAttemptTracker::new(
            1,
            Duration::minutes(150_000_000_000),
            Duration::minutes(15),
        );
        assert_eq!(t.block_duration(), MAX_GUARD_DURATION);
        assert_eq!(t.record_failure("1.2.3.4", t0()), Some(MAX_GUARD_DURATION));
        assert_eq!(t.check_blocked("1.2.3.4", t0()), Some(MAX_GUARD_DURATION));
    }

    #[test]
    fn test_block_near_end_of_time_saturates() {
        let t = tracker(1);
        let late = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        assert!(t.record_failure("ip", late).is_some());
        assert!(t.check_blocked("ip", late).is_some());
    }

    #[test]
    fn test_from_config_caps_unrepresentable_minutes() {
        let config = GuardConfig {
            login_block_minutes: i64::MAX,
            login_attempt_window_minutes: i64::MAX,
            ..GuardConfig::default()
        };
        let t = LoginAttemptTracker::from_config(&config);
        assert_eq!(t.block_duration(), MAX_GUARD_DURATION);
    }
}
