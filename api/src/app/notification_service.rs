//! Notification service
//!
//! Tells each giver who they drew. Delivery problems are logged and counted
//! per participant; they never abort the batch or touch the assignments.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::entities::{Draw, Participant};
use crate::domain::ports::{DrawRepository, MailMessage, MailSender};
use crate::error::NotificationError;

/// Outcome of a notification batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSummary {
    pub sent: usize,
    pub failed: usize,
    /// Participants without an assignment
    pub skipped: usize,
}

/// Service for delivering assignment emails
pub struct NotificationService<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    draws: Arc<DR>,
    mailer: Arc<MS>,
    frontend_url: String,
}

impl<DR, MS> NotificationService<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    pub fn new(draws: Arc<DR>, mailer: Arc<MS>, frontend_url: String) -> Self {
        Self {
            draws,
            mailer,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send one giver their assignment and record the delivery
    pub async fn send_assignment(
        &self,
        draw: &Draw,
        giver: &Participant,
        receiver: &Participant,
    ) -> Result<(), NotificationError> {
        tracing::info!(draw = %draw.code, to = %giver.email, "Sending assignment notification");

        let message = assignment_message(draw, giver, receiver, &self.frontend_url);
        self.mailer.send(&message).await?;

        // Delivery already happened; a bookkeeping failure is not a send failure
        if let Err(e) = self
            .draws
            .mark_notification_sent(&giver.id, Utc::now())
            .await
        {
            tracing::warn!(error = %e, participant_id = %giver.id, "Failed to record notification delivery");
        }

        Ok(())
    }

    /// Notify every participant that has an assignment
    pub async fn send_all_assignments(&self, draw: &Draw) -> NotificationSummary {
        tracing::info!(draw = %draw.code, "Sending all assignments");

        let mut summary = NotificationSummary::default();

        for giver in &draw.participants {
            let Some(receiver) = draw.receiver_of(giver) else {
                tracing::warn!(
                    participant = %giver.email,
                    "Participant has no assignment, skipping notification"
                );
                summary.skipped += 1;
                continue;
            };

            match self.send_assignment(draw, giver, receiver).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    tracing::error!(error = %e, to = %giver.email, "Failed to send notification");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            draw = %draw.code,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            "Notification summary"
        );
        summary
    }
}

/// Build the email telling `giver` whom to gift
pub fn assignment_message(
    draw: &Draw,
    giver: &Participant,
    receiver: &Participant,
    frontend_url: &str,
) -> MailMessage {
    let mut body = format!(
        "Hello {}!\n\nYour Secret Santa assignment for '{}' is ready!\n\n\
         You are the Secret Santa for: {}\nEmail: {}\n",
        giver.name, draw.name, receiver.name, receiver.email
    );

    if let Some(budget) = draw.budget_limit {
        body.push_str(&format!("Budget limit: ${}\n", budget));
    }

    if let Some(date) = draw.draw_date {
        body.push_str(&format!("Event date: {}\n", date.format("%B %d, %Y")));
    }

    if let Some(description) = draw.description.as_deref().filter(|d| !d.is_empty()) {
        body.push_str(&format!("\nDetails: {}\n", description));
    }

    body.push_str(&format!(
        "\nRemember to keep it a secret!\n\n\
         View your assignment online: {}/draw/{}?email={}\n\n\
         Happy gifting!\n- Secret Santa Team",
        frontend_url,
        draw.code,
        urlencoding::encode(&giver.email)
    ));

    MailMessage {
        to: giver.email.clone(),
        subject: format!("Your Secret Santa Assignment - {}", draw.name),
        body,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::entities::Budget;
    use crate::test_utils::{drawn_draw, pending_draw, InMemoryDrawRepository, MockMailSender};

    fn create_service(
        repo: InMemoryDrawRepository,
        mailer: MockMailSender,
    ) -> NotificationService<InMemoryDrawRepository, MockMailSender> {
        NotificationService::new(
            Arc::new(repo),
            Arc::new(mailer),
            "https://santa.example.com/".to_string(),
        )
    }

    #[test]
    fn message_includes_receiver_and_link() {
        let draw = drawn_draw(&["Ana", "Ben", "Cleo"]);
        let (giver, receiver) = draw.assignments()[0];

        let message = assignment_message(&draw, giver, receiver, "https://santa.example.com");

        assert_eq!(message.to, giver.email);
        assert_eq!(
            message.subject,
            format!("Your Secret Santa Assignment - {}", draw.name)
        );
        assert!(message.body.contains(&format!("Hello {}!", giver.name)));
        assert!(message
            .body
            .contains(&format!("You are the Secret Santa for: {}", receiver.name)));
        assert!(message.body.contains(&format!(
            "https://santa.example.com/draw/{}?email={}",
            draw.code,
            urlencoding::encode(&giver.email)
        )));
        assert!(!message.body.contains("Budget limit"));
        assert!(!message.body.contains("Event date"));
    }

    #[test]
    fn message_includes_optional_details() {
        let mut draw = drawn_draw(&["Ana", "Ben", "Cleo"]);
        draw.budget_limit = Budget::from_cents(2550);
        draw.draw_date = Some(Utc.with_ymd_and_hms(2026, 12, 24, 18, 0, 0).unwrap());
        draw.description = Some("Bring wrapping paper".to_string());
        let (giver, receiver) = draw.assignments()[0];

        let message = assignment_message(&draw, giver, receiver, "https://santa.example.com");

        assert!(message.body.contains("Budget limit: $25.50"));
        assert!(message.body.contains("Event date: December 24, 2026"));
        assert!(message.body.contains("Details: Bring wrapping paper"));
    }

    #[tokio::test]
    async fn send_all_notifies_every_giver() {
        let draw = drawn_draw(&["Ana", "Ben", "Cleo", "Dev"]);
        let repo = InMemoryDrawRepository::new().with_draw(draw.clone());
        let mailer = MockMailSender::new();
        let service = create_service(repo.clone(), mailer.clone());

        let summary = service.send_all_assignments(&draw).await;

        assert_eq!(
            summary,
            NotificationSummary {
                sent: 4,
                failed: 0,
                skipped: 0
            }
        );
        assert_eq!(mailer.sent().len(), 4);

        let stored = repo.get(&draw.code).unwrap();
        assert!(stored.participants.iter().all(|p| p.notification_sent));
        assert!(stored
            .participants
            .iter()
            .all(|p| p.notification_sent_at.is_some()));
    }

    #[tokio::test]
    async fn failures_are_counted_not_propagated() {
        let draw = drawn_draw(&["Ana", "Ben", "Cleo"]);
        let failing_email = draw.participants[1].email.clone();
        let repo = InMemoryDrawRepository::new().with_draw(draw.clone());
        let mailer = MockMailSender::new().failing_for(&failing_email);
        let service = create_service(repo.clone(), mailer.clone());

        let summary = service.send_all_assignments(&draw).await;

        assert_eq!(summary.sent, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(mailer.sent().len(), 2);

        let stored = repo.get(&draw.code).unwrap();
        let failed = stored.participant_by_email(&failing_email).unwrap();
        assert!(!failed.notification_sent);
    }

    #[tokio::test]
    async fn participants_without_assignment_are_skipped() {
        let draw = pending_draw(&["Ana", "Ben", "Cleo"]);
        let mailer = MockMailSender::new();
        let service = create_service(
            InMemoryDrawRepository::new().with_draw(draw.clone()),
            mailer.clone(),
        );

        let summary = service.send_all_assignments(&draw).await;

        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.sent, 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn send_assignment_reports_transport_error() {
        let draw = drawn_draw(&["Ana", "Ben", "Cleo"]);
        let (giver, receiver) = draw.assignments()[0];
        let service = create_service(
            InMemoryDrawRepository::new().with_draw(draw.clone()),
            MockMailSender::failing(),
        );

        let result = service.send_assignment(&draw, giver, receiver).await;

        assert!(matches!(result, Err(NotificationError::Api { .. })));
    }
}
