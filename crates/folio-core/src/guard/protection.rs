use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::clock::{Clock, SystemClock};
use crate::config::GuardConfig;
use crate::error::FolioError;

use super::captcha::{CaptchaError, CaptchaVerifier, TurnstileVerifier};
use super::login::LoginAttemptTracker;
use super::rate_limit::IpRateLimiter;
use super::spam::{build_message_content_hash, is_honeypot_triggered, is_submission_too_fast};
use super::{capped_hours, capped_seconds};

const DEFAULT_DUPLICATE_WINDOW_HOURS: i64 = 24;

/// The abuse-relevant parts of a contact form submission.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub email: &'a str,
    pub subject: &'a str,
    pub content: &'a str,
    /// Hidden form field; humans leave it empty.
    pub honeypot: &'a str,
    /// Client-reported form render time, ms since the epoch.
    pub submitted_at_ms: i64,
    pub captcha_token: &'a str,
}

/// Why a contact submission was turned away.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionRejection {
    #[error("honeypot field was filled in")]
    Honeypot,

    #[error("form submitted too quickly")]
    TooFast,

    #[error("too many messages from this client")]
    RateLimited,

    #[error(transparent)]
    Captcha(#[from] CaptchaError),

    #[error("duplicate message")]
    Duplicate,
}

impl SubmissionRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            SubmissionRejection::Honeypot => "honeypot",
            SubmissionRejection::TooFast => "too_fast",
            SubmissionRejection::RateLimited => "rate_limited",
            SubmissionRejection::Captcha(_) => "captcha",
            SubmissionRejection::Duplicate => "duplicate",
        }
    }

    /// Bot-detection rejections that may be answered as if they succeeded.
    pub fn is_maskable(&self) -> bool {
        matches!(
            self,
            SubmissionRejection::Honeypot | SubmissionRejection::TooFast
        )
    }
}

impl From<SubmissionRejection> for FolioError {
    fn from(rejection: SubmissionRejection) -> Self {
        match rejection {
            SubmissionRejection::Honeypot | SubmissionRejection::TooFast => {
                FolioError::BadRequest("Message rejected".to_string())
            }
            SubmissionRejection::RateLimited => FolioError::TooManyRequests {
                message: "Too many messages".to_string(),
                retry_after_secs: None,
            },
            SubmissionRejection::Captcha(_) => {
                FolioError::BadRequest("Captcha verification failed".to_string())
            }
            SubmissionRejection::Duplicate => FolioError::Conflict("Duplicate message".to_string()),
        }
    }
}

/// Shared abuse-protection state, one instance per process.
///
/// Holds the login tracker, the contact rate limiter and the CAPTCHA
/// verifier, and runs the contact screening pipeline in a fixed order:
/// honeypot, timing, rate limit, CAPTCHA. Duplicate detection happens in the
/// message store using [`fingerprint`](Self::fingerprint) and
/// [`duplicate_window`](Self::duplicate_window).
pub struct AbuseGuard {
    clock: Arc<dyn Clock>,
    login: LoginAttemptTracker,
    messages: IpRateLimiter,
    captcha: Arc<dyn CaptchaVerifier>,
    min_submit_delay: Option<Duration>,
    duplicate_window: Duration,
}

impl AbuseGuard {
    /// Guard on the system clock, verifying tokens with Turnstile.
    pub fn new(config: &GuardConfig) -> Result<Self, CaptchaError> {
        let captcha = Arc::new(TurnstileVerifier::from_config(config)?);
        Ok(Self::with_clock(config, Arc::new(SystemClock), captcha))
    }

    pub fn with_clock(
        config: &GuardConfig,
        clock: Arc<dyn Clock>,
        captcha: Arc<dyn CaptchaVerifier>,
    ) -> Self {
        let min_submit_delay = (config.contact_min_submit_secs > 0)
            .then(|| capped_seconds(config.contact_min_submit_secs));
        let duplicate_window = if config.contact_duplicate_window_hours > 0 {
            capped_hours(config.contact_duplicate_window_hours)
        } else {
            Duration::hours(DEFAULT_DUPLICATE_WINDOW_HOURS)
        };

        Self {
            clock,
            login: LoginAttemptTracker::from_config(config),
            messages: IpRateLimiter::from_config(config),
            captcha,
            min_submit_delay,
            duplicate_window,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn duplicate_window(&self) -> Duration {
        self.duplicate_window
    }

    pub fn fingerprint(&self, submission: &Submission<'_>) -> String {
        build_message_content_hash(submission.email, submission.subject, submission.content)
    }

    pub fn login_tracker(&self) -> &LoginAttemptTracker {
        &self.login
    }

    pub fn rate_limiter(&self) -> &IpRateLimiter {
        &self.messages
    }

    // ═══ Admin login ═══

    /// Remaining block time if `identity` may not attempt a login right now.
    pub fn login_blocked(&self, identity: &str) -> Option<Duration> {
        self.login.check_blocked(identity, self.now())
    }

    /// Count a failed login; returns the block time if the identity is now
    /// blocked.
    pub fn login_failed(&self, identity: &str) -> Option<Duration> {
        let blocked = self.login.record_failure(identity, self.now());
        if let Some(duration) = blocked {
            tracing::warn!(
                identity,
                block_secs = duration.num_seconds(),
                "admin login blocked after repeated failures"
            );
        }
        blocked
    }

    pub fn login_succeeded(&self, identity: &str) {
        self.login.record_success(identity);
    }

    // ═══ Contact form ═══

    /// Run the pre-persistence checks for a contact submission.
    ///
    /// Returns the content fingerprint the store should use for duplicate
    /// detection. No lock is held while the CAPTCHA call is in flight.
    pub async fn screen_submission(
        &self,
        submission: &Submission<'_>,
        identity: &str,
    ) -> Result<String, SubmissionRejection> {
        let result = self.run_checks(submission, identity).await;
        if let Err(rejection) = &result {
            match rejection {
                SubmissionRejection::Captcha(err) => tracing::warn!(
                    identity,
                    reason = rejection.reason(),
                    kind = err.kind(),
                    error = %err,
                    "contact submission rejected"
                ),
                _ => tracing::info!(
                    identity,
                    reason = rejection.reason(),
                    "contact submission rejected"
                ),
            }
        }
        result
    }

    async fn run_checks(
        &self,
        submission: &Submission<'_>,
        identity: &str,
    ) -> Result<String, SubmissionRejection> {
        if is_honeypot_triggered(submission.honeypot) {
            return Err(SubmissionRejection::Honeypot);
        }

        let now = self.now();
        if is_submission_too_fast(submission.submitted_at_ms, now, self.min_submit_delay) {
            return Err(SubmissionRejection::TooFast);
        }

        if !self.messages.allow(identity, now) {
            return Err(SubmissionRejection::RateLimited);
        }

        self.captcha
            .verify(submission.captcha_token, identity)
            .await?;

        Ok(self.fingerprint(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::guard::MAX_GUARD_DURATION;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingVerifier {
        calls: AtomicUsize,
        accept: bool,
    }

    #[async_trait]
    impl CaptchaVerifier for CountingVerifier {
        async fn verify(&self, _token: &str, _identity: &str) -> Result<(), CaptchaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(())
            } else {
                Err(CaptchaError::Rejected {
                    codes: "invalid-input-response".to_string(),
                })
            }
        }
    }

    fn no_captcha() -> Arc<dyn CaptchaVerifier> {
        Arc::new(TurnstileVerifier::new(None, "http://127.0.0.1:9/unused").unwrap())
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn guard(accept: bool) -> (AbuseGuard, Arc<ManualClock>, Arc<CountingVerifier>) {
        let clock = Arc::new(ManualClock::new(start()));
        let verifier = Arc::new(CountingVerifier {
            calls: AtomicUsize::new(0),
            accept,
        });
        let guard =
            AbuseGuard::with_clock(&GuardConfig::default(), clock.clone(), verifier.clone());
        (guard, clock, verifier)
    }

    fn submission(honeypot: &str, submitted_at_ms: i64) -> Submission<'_> {
        Submission {
            email: "jane@example.com",
            subject: "Hello",
            content: "I would like to talk about a project.",
            honeypot,
            submitted_at_ms,
            captcha_token: "token",
        }
    }

    fn rendered_secs_ago(secs: i64) -> i64 {
        (start() - Duration::seconds(secs)).timestamp_millis()
    }

    #[tokio::test]
    async fn test_clean_submission_returns_fingerprint() {
        let (guard, _, verifier) = guard(true);
        let sub = submission("", rendered_secs_ago(30));
        let fingerprint = guard.screen_submission(&sub, "1.1.1.1").await.unwrap();
        assert_eq!(fingerprint, guard.fingerprint(&sub));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_honeypot_short_circuits_everything() {
        let (guard, _, verifier) = guard(true);
        let err = guard
            .screen_submission(&submission("bot", 0), "1.1.1.1")
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionRejection::Honeypot));
        assert!(err.is_maskable());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(guard.rate_limiter().tracked(), 0);
    }

    #[tokio::test]
    async fn test_too_fast_does_not_consume_rate_limit() {
        let (guard, _, _) = guard(true);
        let err = guard
            .screen_submission(&submission("", rendered_secs_ago(1)), "1.1.1.1")
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionRejection::TooFast));
        assert_eq!(guard.rate_limiter().tracked(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_before_captcha() {
        let (guard, clock, verifier) = guard(true);
        for _ in 0..3 {
            let sub = submission("", rendered_secs_ago(30));
            guard.screen_submission(&sub, "1.1.1.1").await.unwrap();
            clock.advance(Duration::seconds(10));
        }
        let err = guard
            .screen_submission(&submission("", rendered_secs_ago(30)), "1.1.1.1")
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionRejection::RateLimited));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_captcha_failure_is_reported() {
        let (guard, _, _) = guard(false);
        let err = guard
            .screen_submission(&submission("", rendered_secs_ago(30)), "1.1.1.1")
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "captcha");
        assert!(!err.is_maskable());
    }

    #[test]
    fn test_login_flow_uses_clock() {
        let config = GuardConfig {
            login_max_attempts: 3,
            ..GuardConfig::default()
        };
        let clock = Arc::new(ManualClock::new(start()));
        let guard = AbuseGuard::with_clock(&config, clock.clone(), no_captcha());

        assert!(guard.login_failed("ip").is_none());
        assert!(guard.login_failed("ip").is_none());
        assert_eq!(guard.login_failed("ip"), Some(Duration::minutes(15)));

        clock.advance(Duration::minutes(14));
        assert_eq!(guard.login_blocked("ip"), Some(Duration::minutes(1)));

        clock.advance(Duration::minutes(1));
        assert!(guard.login_blocked("ip").is_none());
    }

    #[test]
    fn test_disabled_timing_and_default_window() {
        let config = GuardConfig {
            contact_min_submit_secs: 0,
            contact_duplicate_window_hours: -3,
            ..GuardConfig::default()
        };
        let guard = AbuseGuard::new(&config).unwrap();
        assert!(guard.min_submit_delay.is_none());
        assert_eq!(guard.duplicate_window(), Duration::hours(24));
    }

    #[tokio::test]
    async fn test_huge_config_values_are_capped() {
        let config = GuardConfig {
            login_block_minutes: i64::MAX,
            contact_window_minutes: i64::MAX,
            contact_min_submit_secs: i64::MAX,
            contact_duplicate_window_hours: i64::MAX,
            ..GuardConfig::default()
        };
        let clock = Arc::new(ManualClock::new(start()));
        let guard = AbuseGuard::with_clock(&config, clock, no_captcha());

        assert_eq!(guard.duplicate_window(), MAX_GUARD_DURATION);
        assert_eq!(guard.min_submit_delay, Some(MAX_GUARD_DURATION));
        for _ in 0..4 {
            guard.login_failed("ip");
        }
        assert_eq!(guard.login_failed("ip"), Some(MAX_GUARD_DURATION));

        let err = guard
            .screen_submission(&submission("", rendered_secs_ago(30)), "ip")
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionRejection::TooFast));
    }

    #[test]
    fn test_rejection_maps_to_http_errors() {
        use axum::http::StatusCode;
        let limited: FolioError = SubmissionRejection::RateLimited.into();
        assert_eq!(limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        let dup: FolioError = SubmissionRejection::Duplicate.into();
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);
        let captcha: FolioError = SubmissionRejection::Captcha(CaptchaError::MissingToken).into();
        assert_eq!(captcha.status_code(), StatusCode::BAD_REQUEST);
    }
}
