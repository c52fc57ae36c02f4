//! Mail adapters
//!
//! `ConfiguredMailSender` picks the HTTP client when a mail API is configured
//! and falls back to logging otherwise.

pub mod http_sender;
pub mod logging_sender;

use async_trait::async_trait;

pub use http_sender::HttpMailSender;
pub use logging_sender::LoggingMailSender;

use crate::config::Config;
use crate::domain::ports::{MailMessage, MailSender};
use crate::error::NotificationError;

/// Mail sender selected at startup
pub enum ConfiguredMailSender {
    Http(HttpMailSender),
    Logging(LoggingMailSender),
}

impl ConfiguredMailSender {
    pub fn from_config(config: &Config) -> Self {
        match &config.mail_api_url {
            Some(url) => {
                tracing::info!(url = %url, "Sending notifications through mail API");
                Self::Http(HttpMailSender::new(
                    url.clone(),
                    config.mail_api_token.clone(),
                    config.mail_from.clone(),
                ))
            }
            None => {
                tracing::warn!("MAIL_API_URL not set, notifications will only be logged");
                Self::Logging(LoggingMailSender)
            }
        }
    }
}

#[async_trait]
impl MailSender for ConfiguredMailSender {
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError> {
        match self {
            Self::Http(sender) => sender.send(message).await,
            Self::Logging(sender) => sender.send(message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mail_api_url: Option<&str>) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            mail_api_url: mail_api_url.map(str::to_string),
            mail_api_token: None,
            mail_from: "santa@example.com".to_string(),
            random_seed: None,
        }
    }

    #[test]
    fn falls_back_to_logging_without_api_url() {
        let sender = ConfiguredMailSender::from_config(&config(None));
        assert!(matches!(sender, ConfiguredMailSender::Logging(_)));
    }

    #[test]
    fn uses_http_when_api_url_is_set() {
        let sender = ConfiguredMailSender::from_config(&config(Some("https://mail.example.com")));
        assert!(matches!(sender, ConfiguredMailSender::Http(_)));
    }

    #[tokio::test]
    async fn logging_sender_always_succeeds() {
        let sender = ConfiguredMailSender::from_config(&config(None));
        let message = MailMessage {
            to: "ana@example.com".to_string(),
            subject: "Hi".to_string(),
            body: "Body".to_string(),
        };
        assert!(sender.send(&message).await.is_ok());
    }
}
