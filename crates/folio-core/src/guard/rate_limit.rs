use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::GuardConfig;

use super::{MAX_GUARD_DURATION, capped_minutes, normalize_identity, saturating_sub};

/// Entries untouched for this long are dropped.
const STALE_AFTER_HOURS: i64 = 48;

const DEFAULT_WINDOW_MINUTES: i64 = 10;
const DEFAULT_MAX_IN_WINDOW: u32 = 3;
const DEFAULT_MAX_PER_DAY: u32 = 20;

#[derive(Debug)]
struct IpRateEntry {
    recent: VecDeque<DateTime<Utc>>,
    day_key: NaiveDate,
    day_count: u32,
    last_seen: DateTime<Utc>,
}

/// In-memory per-client rate limiter with a sliding window and a UTC daily cap.
///
/// Only admitted requests are counted; a denied call leaves both counters
/// untouched.
pub struct IpRateLimiter {
    window: Duration,
    max_in_window: u32,
    max_per_day: u32,
    entries: Mutex<HashMap<String, IpRateEntry>>,
}

impl IpRateLimiter {
    /// Create a limiter. Non-positive values fall back to 10 minutes,
    /// 3 per window and 20 per day. The window is capped at
    /// [`MAX_GUARD_DURATION`].
    pub fn new(window: Duration, max_in_window: i64, max_per_day: i64) -> Self {
        Self {
            window: if window > Duration::zero() {
                window.min(MAX_GUARD_DURATION)
            } else {
                Duration::minutes(DEFAULT_WINDOW_MINUTES)
            },
            max_in_window: positive_or(max_in_window, DEFAULT_MAX_IN_WINDOW),
            max_per_day: positive_or(max_per_day, DEFAULT_MAX_PER_DAY),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(
            capped_minutes(config.contact_window_minutes),
            config.contact_max_per_window,
            config.contact_max_per_day,
        )
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or deny one request from `identity` at `now`.
    pub fn allow(&self, identity: &str, now: DateTime<Utc>) -> bool {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let stale_before = saturating_sub(now, Duration::hours(STALE_AFTER_HOURS));
        map.retain(|_, entry| entry.last_seen >= stale_before);

        let today = now.date_naive();
        let entry = map
            .entry(normalize_identity(identity))
            .or_insert_with(|| IpRateEntry {
                recent: VecDeque::new(),
                day_key: today,
                day_count: 0,
                last_seen: now,
            });

        let cutoff = saturating_sub(now, self.window);
        while entry.recent.front().is_some_and(|ts| *ts < cutoff) {
            entry.recent.pop_front();
        }

        if entry.day_key != today {
            entry.day_key = today;
            entry.day_count = 0;
        }

        entry.last_seen = now;

        if entry.recent.len() >= self.max_in_window as usize || entry.day_count >= self.max_per_day {
            return false;
        }

        entry.recent.push_back(now);
        entry.day_count += 1;
        true
    }

    /// Number of identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

fn positive_or(value: i64, default: u32) -> u32 {
    if value > 0 {
        value.min(u32::MAX as i64) as u32
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fourth_request_in_window_is_denied() {
        let limiter = IpRateLimiter::new(Duration::minutes(10), 3, 20);
        for i in 0..3 {
            assert!(limiter.allow("10.0.0.1", t0() + Duration::seconds(i * 10)));
        }
        assert!(!limiter.allow("10.0.0.1", t0() + Duration::seconds(40)));
    }

    #[test]
    fn test_window_slides() {
        let limiter = IpRateLimiter::new(Duration::minutes(10), 2, 20);
        assert!(limiter.allow("ip", t0()));
        assert!(limiter.allow("ip", t0() + Duration::minutes(5)));
        assert!(!limiter.allow("ip", t0() + Duration::minutes(9)));

        // First request is now exactly `window` old and still counts.
        assert!(!limiter.allow("ip", t0() + Duration::minutes(10)));
        assert!(limiter.allow("ip", t0() + Duration::minutes(10) + Duration::seconds(1)));
    }

    #[test]
    fn test_denied_calls_do_not_count() {
        let limiter = IpRateLimiter::new(Duration::minutes(10), 1, 20);
        assert!(limiter.allow("ip", t0()));
        for i in 1..50 {
            assert!(!limiter.allow("ip", t0() + Duration::seconds(i)));
        }
        assert!(limiter.allow("ip", t0() + Duration::minutes(10) + Duration::seconds(1)));
    }

    #[test]
    fn test_daily_cap() {
        let limiter = IpRateLimiter::new(Duration::minutes(1), 100, 2);
        let morning = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        assert!(limiter.allow("ip", morning));
        assert!(limiter.allow("ip", morning + Duration::hours(1)));
        assert!(!limiter.allow("ip", morning + Duration::hours(2)));

        let next_day = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 1).unwrap();
        assert!(limiter.allow("ip", next_day));
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = IpRateLimiter::new(Duration::minutes(10), 1, 20);
        assert!(limiter.allow("a", t0()));
        assert!(limiter.allow("b", t0()));
        assert!(!limiter.allow("a", t0()));

        assert!(limiter.allow(" ", t0()));
        assert!(!limiter.allow("unknown", t0()));
        assert_eq!(limiter.tracked(), 3);
    }

    #[test]
    fn test_stale_entries_are_collected() {
        let limiter = IpRateLimiter::new(Duration::minutes(10), 3, 20);
        limiter.allow("old", t0());
        limiter.allow("new", t0() + Duration::hours(49));
        assert_eq!(limiter.tracked(), 1);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let limiter = IpRateLimiter::new(Duration::zero(), 0, -1);
        assert_eq!(limiter.window(), Duration::minutes(10));
        for _ in 0..3 {
            assert!(limiter.allow("ip", t0()));
        }
        assert!(!limiter.allow("ip", t0()));
    }

    #[test]
    fn test_huge_window_is_capped() {
        let limiter = IpRateLimiter::new(Duration::minutes(150_000_000_000), 3, 20);
        assert_eq!(limiter.window(), MAX_GUARD_DURATION);
        assert!(limiter.allow("ip", t0()));
    }

    #[test]
    fn test_window_near_start_of_time_saturates() {
        let limiter = IpRateLimiter::new(Duration::minutes(10), 3, 20);
        let early = DateTime::<Utc>::MIN_UTC + Duration::minutes(1);
        assert!(limiter.allow("ip", early));
    }

    #[test]
    fn test_from_config_caps_unrepresentable_minutes() {
        let config = GuardConfig {
            contact_window_minutes: i64::MAX,
            ..GuardConfig::default()
        };
        let limiter = IpRateLimiter::from_config(&config);
        assert_eq!(limiter.window(), MAX_GUARD_DURATION);
        assert!(limiter.allow("ip", t0()));
    }
}
