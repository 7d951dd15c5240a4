use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GuardConfig;

/// Hard limit for one verification round trip.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(6);

/// Why a CAPTCHA token was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    #[error("captcha token is missing")]
    MissingToken,

    #[error("captcha verification request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("captcha verification response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("captcha rejected: {codes}")]
    Rejected { codes: String },

    #[error("captcha HTTP client could not be built: {0}")]
    Client(#[source] reqwest::Error),
}

impl CaptchaError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CaptchaError::MissingToken => "missing_token",
            CaptchaError::Transport(_) => "transport",
            CaptchaError::Decode(_) => "decode",
            CaptchaError::Rejected { .. } => "rejected",
            CaptchaError::Client(_) => "client",
        }
    }
}

/// Verifies a client-supplied CAPTCHA token.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, client_identity: &str) -> Result<(), CaptchaError>;
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile `siteverify` client.
///
/// Without a secret every token is accepted and no request is made, which is
/// how local development runs.
pub struct TurnstileVerifier {
    secret: Option<String>,
    verify_url: String,
    client: reqwest::Client,
}

impl TurnstileVerifier {
    /// Verifier with the standard [`VERIFY_TIMEOUT`].
    pub fn new(secret: Option<String>, verify_url: impl Into<String>) -> Result<Self, CaptchaError> {
        Self::with_timeout(secret, verify_url, VERIFY_TIMEOUT)
    }

    /// Verifier whose round trips, response body included, are cut off after
    /// `timeout`.
    pub fn with_timeout(
        secret: Option<String>,
        verify_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CaptchaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CaptchaError::Client)?;

        Ok(Self {
            secret: secret.filter(|s| !s.trim().is_empty()),
            verify_url: verify_url.into(),
            client,
        })
    }

    pub fn from_config(config: &GuardConfig) -> Result<Self, CaptchaError> {
        Self::new(
            config.turnstile_secret.clone(),
            config.turnstile_verify_url.clone(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, client_identity: &str) -> Result<(), CaptchaError> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };

        let token = token.trim();
        if token.is_empty() {
            return Err(CaptchaError::MissingToken);
        }

        let mut form = vec![("secret", secret), ("response", token)];
        let remote_ip = client_identity.trim();
        if !remote_ip.is_empty() && remote_ip != super::UNKNOWN_IDENTITY {
            form.push(("remoteip", remote_ip));
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(CaptchaError::Transport)?;

        let body: SiteVerifyResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CaptchaError::Transport(e)
            } else {
                CaptchaError::Decode(e)
            }
        })?;

        if !body.success {
            let codes = if body.error_codes.is_empty() {
                "none".to_string()
            } else {
                body.error_codes.join(",")
            };
            return Err(CaptchaError::Rejected { codes });
        }

        Ok(())
    }
}
