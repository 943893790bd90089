use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use scrape_jobs::extractors::{DEFAULT_USER_AGENT, DEFAULT_VALIDATION_TIMEOUT_MS};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Pre-flight reachability timeout in milliseconds
    pub validation_timeout_ms: u64,
    pub scraper_user_agent: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            validation_timeout_ms: env::var("VALIDATION_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_VALIDATION_TIMEOUT_MS.to_string())
                .parse()
                .context("VALIDATION_TIMEOUT_MS must be a number of milliseconds")?,
            scraper_user_agent: env::var("SCRAPER_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Socket address string to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            validation_timeout_ms: 5_000,
            scraper_user_agent: "test".to_string(),
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
