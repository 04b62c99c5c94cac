use anyhow::{anyhow, Context};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub api_base: String,
    pub publishable_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub session_file: PathBuf,
    pub stripe: StripeConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_base_url = var("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:5000".into())
            .trim_end_matches('/')
            .to_string();

        let http_timeout = Duration::from_secs(
            var("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let session_file = match var("SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir()
                .context("No config directory on this platform; set SESSION_FILE")?
                .join("staybook")
                .join("session.json"),
        };

        let stripe = StripeConfig {
            api_base: var("STRIPE_API_BASE").unwrap_or_else(|| "https://api.stripe.com".into()),
            publishable_key: var("STRIPE_PUBLISHABLE_KEY").filter(|key| !key.is_empty()),
        };

        Ok(Self { api_base_url, http_timeout, session_file, stripe })
    }

    /// Only payment needs the processor key
    pub fn stripe_key(&self) -> anyhow::Result<&str> {
        self.stripe
            .publishable_key
            .as_deref()
            .ok_or_else(|| anyhow!("STRIPE_PUBLISHABLE_KEY must be set to pay"))
    }
}
