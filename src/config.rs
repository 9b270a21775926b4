use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestConfig {
    /// Trailing window within which previously suggested meals are
    /// excluded from the candidate pool.
    pub recent_window_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub suggest: SuggestConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealwise".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealwise-users".into()),
        };
        let suggest = SuggestConfig {
            recent_window_days: std::env::var("SUGGEST_RECENT_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        Ok(Self {
            database_url,
            jwt,
            suggest,
        })
    }
}
