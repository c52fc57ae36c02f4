//! Mail sender that only writes to the log
//!
//! Used when no mail API is configured, e.g. in local development.

use async_trait::async_trait;

use crate::domain::ports::{MailMessage, MailSender};
use crate::error::NotificationError;

pub struct LoggingMailSender;

#[async_trait]
impl MailSender for LoggingMailSender {
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mail API not configured, logging message instead"
        );
        tracing::debug!(body = %message.body, "Suppressed mail body");
        Ok(())
    }
}
