//! Application Configuration

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordScheme;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// Default session TTL (one week)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 7 * 3600);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session TTL
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Rotate the token on every authenticated request (except logout)
    ///
    /// Bounds the blast radius of a leaked cookie at the cost of a token
    /// valid at request-start being invalid by request-end.
    pub rotate_sessions: bool,
    /// Route excluded from rotation, since it invalidates the session itself
    pub logout_path: String,
    /// Password hashing scheme for this deployment
    pub password_scheme: PasswordScheme,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
            session_ttl: DEFAULT_SESSION_TTL,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            rotate_sessions: false,
            logout_path: "/logout".to_string(),
            password_scheme: PasswordScheme::default(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Build from environment variables
    ///
    /// `SESSION_TTL_SECS`, `SESSION_ROTATE` (`1`/`true`),
    /// `COOKIE_SECURE` (`0`/`false` to disable), `PASSWORD_SCHEME`
    /// (`argon2id` | `sha256`). Unset variables keep the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ttl) = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.session_ttl = Duration::from_secs(ttl);
        }
        if let Ok(rotate) = std::env::var("SESSION_ROTATE") {
            config.rotate_sessions = matches!(rotate.as_str(), "1" | "true");
        }
        if let Ok(secure) = std::env::var("COOKIE_SECURE") {
            config.cookie_secure = !matches!(secure.as_str(), "0" | "false");
        }
        if let Some(scheme) = std::env::var("PASSWORD_SCHEME")
            .ok()
            .and_then(|s| PasswordScheme::from_config(&s))
        {
            config.password_scheme = scheme;
        }

        config
    }

    /// Cookie settings for the session token
    ///
    /// HTTP-only, path `/`, Max-Age matching the session TTL.
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }
}
