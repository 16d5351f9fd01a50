use serde::Deserialize;
use time::Duration;

/// Upper bound for either token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

impl JwtConfig {
    /// Access token lifetime, also the session cookie max-age.
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes.clamp(0, MAX_TOKEN_TTL_MINUTES))
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::minutes(self.refresh_ttl_minutes.clamp(0, MAX_TOKEN_TTL_MINUTES))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Adds the `Secure` attribute to the session cookie.
    pub cookie_secure: bool,
}

fn ttl_minutes(raw: Option<String>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|v| v.clamp(1, MAX_TOKEN_TTL_MINUTES))
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealtrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealtrack-users".into()),
            // a week, same lifetime as the session cookie
            ttl_minutes: ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok(), 60 * 24 * 7),
            refresh_ttl_minutes: ttl_minutes(
                std::env::var("JWT_REFRESH_TTL_MINUTES").ok(),
                60 * 24 * 14,
            ),
        };
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Ok(Self {
            database_url,
            jwt,
            cookie_secure,
        })
    }
}
