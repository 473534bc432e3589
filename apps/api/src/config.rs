use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Everything is optional: without `DATABASE_URL` the API runs on the seeded
/// in-memory store, and without `GEMINI_API_KEY` the AI endpoints degrade.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let port: u16 = parse_env("JOBBOARD_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("JOBBOARD_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("JOBBOARD_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_optional_env_is_absent() {
        std::env::set_var("JOBBOARD_TEST_BLANK_KEY", "  ");
        assert!(optional_env("JOBBOARD_TEST_BLANK_KEY").is_none());
    }
}
