use crate::config::Config;
use crate::error::FolioError;

use super::password::{hash_password, verify_password};

/// Fixed ID of the single admin account.
pub const ADMIN_ID: &str = "admin-1";

/// Display name returned by the profile endpoint.
pub const ADMIN_NAME: &str = "Portfolio Admin";

/// The configured admin login, with the password kept only as an argon2 hash.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    user: String,
    password_hash: Option<String>,
}

impl AdminCredentials {
    /// Build from config. A plaintext `ADMIN_PASSWORD` is hashed here, once;
    /// `ADMIN_PASSWORD_HASH` wins when both are set.
    pub fn from_config(config: &Config) -> Result<Self, FolioError> {
        let password_hash = match (&config.admin_password_hash, &config.admin_password) {
            (Some(hash), _) => Some(hash.clone()),
            (None, Some(plain)) => Some(hash_password(plain)?),
            (None, None) => None,
        };

        let user = config.admin_user.trim().to_string();
        if user.is_empty() || password_hash.is_none() {
            tracing::warn!("admin credentials are not configured; admin login is disabled");
        }

        Ok(Self {
            user,
            password_hash,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn is_configured(&self) -> bool {
        !self.user.is_empty() && self.password_hash.is_some()
    }

    /// Whether `user`/`password` match. Always false when unconfigured.
    pub fn verify(&self, user: &str, password: &str) -> Result<bool, FolioError> {
        let Some(hash) = self.password_hash.as_deref() else {
            return Ok(false);
        };
        if self.user.is_empty() {
            return Ok(false);
        }

        // Hash check runs even on a wrong user name.
        let password_ok = verify_password(password, hash)?;
        Ok(password_ok && user.trim() == self.user)
    }
}
