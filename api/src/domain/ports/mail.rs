//! Mail transport port
//!
//! Delivers a single plain-text email. Whether anything actually leaves the
//! process is decided by the adapter chosen at startup.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NotificationError;

/// A plain-text email addressed to one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Port trait for sending mail
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send one message; failures are reported, never retried here
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError>;
}
