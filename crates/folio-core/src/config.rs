use serde::Deserialize;

/// Cloudflare Turnstile verification endpoint.
pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Origins allowed when neither `ALLOWED_ORIGINS` nor `FRONTEND_URL` is set.
const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://folio.db, postgres://...)
    pub database_url: String,

    /// JWT signing secret
    pub jwt_secret: String,

    /// Admin token lifetime in minutes (default: 60)
    pub jwt_expiry_minutes: u64,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 8080)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Login name of the single admin account
    pub admin_user: String,

    /// Plaintext admin password; hashed once when the app starts
    pub admin_password: Option<String>,

    /// Pre-computed argon2 hash of the admin password (wins over `admin_password`)
    pub admin_password_hash: Option<String>,

    /// CORS origins, normalized and de-duplicated
    pub allowed_origins: Vec<String>,

    /// Take the client identity from `X-Forwarded-For` / `X-Real-IP`
    pub trust_proxy_headers: bool,

    /// Directory for resume and profile picture files (default: ./uploads)
    pub upload_dir: String,

    /// Max upload file size in bytes (default: 10MB)
    pub max_upload_size: u64,

    /// Abuse-protection settings
    pub guard: GuardConfig,
}

/// Settings for admin login throttling and contact-form spam protection.
///
/// Numeric values are kept as configured; the guard components clamp
/// non-positive values back to their defaults when they are built.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    /// Consecutive failed logins before a client is blocked (default: 5)
    pub login_max_attempts: i64,

    /// How long a blocked client stays blocked (default: 15)
    pub login_block_minutes: i64,

    /// Failures further apart than this do not accumulate (default: 15)
    pub login_attempt_window_minutes: i64,

    /// Sliding window for contact submissions (default: 10)
    pub contact_window_minutes: i64,

    /// Messages admitted per client inside the window (default: 3)
    pub contact_max_per_window: i64,

    /// Messages admitted per client per UTC day (default: 20)
    pub contact_max_per_day: i64,

    /// Minimum form fill time; zero or negative disables the check (default: 3)
    pub contact_min_submit_secs: i64,

    /// Identical messages inside this window are rejected (default: 24)
    pub contact_duplicate_window_hours: i64,

    /// Answer honeypot and timing rejections as if the message was accepted
    pub mask_spam_rejections: bool,

    /// Turnstile secret; `None` disables captcha verification
    pub turnstile_secret: Option<String>,

    /// Turnstile verification endpoint
    pub turnstile_verify_url: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            login_max_attempts: 5,
            login_block_minutes: 15,
            login_attempt_window_minutes: 15,
            contact_window_minutes: 10,
            contact_max_per_window: 3,
            contact_max_per_day: 20,
            contact_min_submit_secs: 3,
            contact_duplicate_window_hours: 24,
            mask_spam_rejections: true,
            turnstile_secret: None,
            turnstile_verify_url: TURNSTILE_VERIFY_URL.to_string(),
        }
    }
}

impl GuardConfig {
    /// Load guard settings from environment variables.
    pub fn from_env() -> Self {
        let defaults = GuardConfig::default();

        GuardConfig {
            login_max_attempts: env_i64("ADMIN_LOGIN_MAX_ATTEMPTS", defaults.login_max_attempts),
            login_block_minutes: env_i64("ADMIN_LOGIN_BLOCK_MINUTES", defaults.login_block_minutes),
            login_attempt_window_minutes: env_i64(
                "ADMIN_LOGIN_ATTEMPT_WINDOW_MINUTES",
                defaults.login_attempt_window_minutes,
            ),
            contact_window_minutes: env_i64(
                "CONTACT_RATE_LIMIT_WINDOW_MINUTES",
                defaults.contact_window_minutes,
            ),
            contact_max_per_window: env_i64(
                "CONTACT_RATE_LIMIT_MAX_PER_WINDOW",
                defaults.contact_max_per_window,
            ),
            contact_max_per_day: env_i64(
                "CONTACT_RATE_LIMIT_MAX_PER_DAY",
                defaults.contact_max_per_day,
            ),
            contact_min_submit_secs: env_i64(
                "CONTACT_MIN_SUBMIT_SECONDS",
                defaults.contact_min_submit_secs,
            ),
            contact_duplicate_window_hours: env_i64(
                "CONTACT_DUPLICATE_WINDOW_HOURS",
                defaults.contact_duplicate_window_hours,
            ),
            mask_spam_rejections: std::env::var("CONTACT_MASK_SPAM_REJECTIONS")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.mask_spam_rejections),
            turnstile_secret: non_empty_env("TURNSTILE_SECRET_KEY"),
            turnstile_verify_url: non_empty_env("TURNSTILE_VERIFY_URL")
                .unwrap_or(defaults.turnstile_verify_url),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        let mut origins = parse_origins(&std::env::var("ALLOWED_ORIGINS").unwrap_or_default());
        if let Ok(frontend) = std::env::var("FRONTEND_URL") {
            origins.extend(normalize_origin(&frontend));
        }
        let allowed_origins = if origins.is_empty() {
            DEV_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            unique(origins)
        };

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://folio.db?mode=rwc".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "folio-dev-secret-change-me".to_string()),
            jwt_expiry_minutes: std::env::var("JWT_EXPIRY_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .or_else(|_| std::env::var("PORT"))
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            admin_user: std::env::var("ADMIN_USER").unwrap_or_default(),
            admin_password: non_empty_env("ADMIN_PASSWORD"),
            admin_password_hash: non_empty_env("ADMIN_PASSWORD_HASH"),
            allowed_origins,
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB
                .parse()
                .unwrap_or(10_485_760),
            guard: GuardConfig::from_env(),
        })
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Normalize a single CORS origin.
///
/// Trims whitespace and trailing slashes and defaults the scheme to
/// `https://`. `*` is kept as is; blank input yields `None`.
pub fn normalize_origin(origin: &str) -> Option<String> {
    let trimmed = origin.trim();
    if trimmed.is_empty() {
        return None;
    }

    let no_trailing_slash = trimmed.trim_end_matches('/');
    if no_trailing_slash == "*" {
        return Some(no_trailing_slash.to_string());
    }
    if no_trailing_slash.starts_with("http://") || no_trailing_slash.starts_with("https://") {
        return Some(no_trailing_slash.to_string());
    }
    Some(format!("https://{}", no_trailing_slash))
}

/// Parse a comma-separated origin list.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_origin).collect()
}

fn unique(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
