use anyhow::Context;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base URL of the web frontend, used in notification links
    pub frontend_url: String,
    /// Transactional mail endpoint; notifications are only logged when unset
    pub mail_api_url: Option<String>,
    pub mail_api_token: Option<String>,
    pub mail_from: String,
    /// Fixed seed for reproducible codes and draws
    pub random_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a valid port number")?,
            Err(_) => 8080,
        };

        let random_seed = env::var("RANDOM_SEED")
            .ok()
            .map(|seed| seed.parse())
            .transpose()
            .context("RANDOM_SEED must be an unsigned integer")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            mail_api_url: env::var("MAIL_API_URL").ok().filter(|url| !url.is_empty()),
            mail_api_token: env::var("MAIL_API_TOKEN").ok().filter(|t| !t.is_empty()),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@secret-santa.local".to_string()),
            random_seed,
        })
    }

    /// Check if a mail API is configured
    pub fn mail_enabled(&self) -> bool {
        self.mail_api_url.is_some()
    }
}
