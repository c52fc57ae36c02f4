//! HTTP mail API client
//!
//! Posts each message as JSON to a transactional mail endpoint:
//! `{"from", "to", "subject", "text"}` with an optional bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::ports::{MailMessage, MailSender};
use crate::error::NotificationError;

/// Sends mail through an HTTP API
pub struct HttpMailSender {
    http: Client,
    api_url: String,
    token: Option<String>,
    from: String,
}

impl HttpMailSender {
    pub fn new(api_url: String, token: Option<String>, from: String) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            from,
        }
    }

    fn payload<'a>(&'a self, message: &'a MailMessage) -> SendMailRequest<'a> {
        SendMailRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError> {
        let mut request = self.http.post(&self.api_url).json(&self.payload(message));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!(to = %message.to, "Mail accepted by API");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(NotificationError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
