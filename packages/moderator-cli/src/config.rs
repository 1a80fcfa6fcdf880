use anyhow::Result;
use dotenvy::dotenv;
use std::env;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the glossary API.
    pub api_url: String,
    /// Bearer token from a previous `whatisdev login`, if any.
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_url: env::var("GLOSSARY_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string()),
            token: env::var("GLOSSARY_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }
}
