use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Base URL of the forward-geocoding service. Listings keep their
    /// default coordinates when unset.
    pub geocoder_url: Option<String>,
    /// Enables the AI endpoints when present.
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // .env is a development convenience
        let _ = dotenv();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "roost".to_string()),
            geocoder_url: optional("GEOCODER_URL"),
            openai_api_key: optional("OPENAI_API_KEY"),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}

/// Unset and empty are treated the same so a blank line in `.env` does not
/// switch an optional integration on.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
