//! Draw service
//!
//! Owns the draw lifecycle: creation with a fresh code, one-shot execution
//! (`Pending -> Drawn`), assignment lookup and re-notification.

use std::sync::Arc;

use super::code_generator::{self, DEFAULT_MAX_ATTEMPTS};
use super::draw_algorithm::perform_draw;
use super::notification_service::{NotificationService, NotificationSummary};
use super::random::RandomSource;
use crate::domain::entities::{Draw, DrawSummary, NewDraw, ParticipantId, MIN_PARTICIPANTS};
use crate::domain::ports::{DrawRepository, MailSender};
use crate::error::{AppError, DomainError};

/// Result of executing a draw
#[derive(Debug, Clone)]
pub struct DrawExecution {
    pub draw: Draw,
    pub notifications: NotificationSummary,
}

/// A participant's resolved assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub draw_name: String,
    pub giver_name: String,
    pub giver_email: String,
    pub receiver_name: String,
    pub receiver_email: String,
}

/// Outcome of looking up an assignment. Only an unknown draw is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentLookup {
    /// The draw exists but has not been executed
    NotDrawnYet { draw_name: String },
    /// No participant with that email, or they have no receiver
    NotFound,
    Assigned(Assignment),
}

impl AssignmentLookup {
    /// Human-readable message for the participant
    pub fn message(&self) -> String {
        match self {
            AssignmentLookup::NotDrawnYet { .. } => "The draw has not been executed yet. \
                 Please wait for the organizer to perform the draw."
                .to_string(),
            AssignmentLookup::NotFound => {
                "No assignment found. Please check your email or draw code.".to_string()
            }
            AssignmentLookup::Assigned(a) => {
                format!("You are the Secret Santa for {}!", a.receiver_name)
            }
        }
    }
}

/// Service for managing draws
pub struct DrawService<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    draws: Arc<DR>,
    notifications: NotificationService<DR, MS>,
    rng: RandomSource,
}

impl<DR, MS> DrawService<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    pub fn new(
        draws: Arc<DR>,
        notifications: NotificationService<DR, MS>,
        rng: RandomSource,
    ) -> Self {
        Self {
            draws,
            notifications,
            rng,
        }
    }

    /// Create a pending draw with its participants
    ///
    /// Requires at least three participants with distinct emails (compared
    /// case-insensitively). A unique code is allocated before anything is
    /// persisted.
    pub async fn create(&self, new_draw: NewDraw) -> Result<Draw, AppError> {
        tracing::info!("Creating new draw: {}", new_draw.name);

        if new_draw.participants.len() < MIN_PARTICIPANTS {
            return Err(DomainError::InsufficientParticipants {
                found: new_draw.participants.len(),
            }
            .into());
        }

        if let Some(email) = new_draw.duplicate_email() {
            return Err(DomainError::DuplicateParticipant(email.to_string()).into());
        }

        let draws = self.draws.clone();
        let code = code_generator::generate_unique(
            &self.rng,
            move |candidate| {
                let draws = draws.clone();
                async move { draws.exists_by_code(&candidate).await }
            },
            DEFAULT_MAX_ATTEMPTS,
        )
        .await?;
        tracing::debug!("Generated unique code: {}", code);

        let draw = self.draws.create(&code, &new_draw).await?;
        tracing::info!(code = %draw.code, participants = draw.participants.len(), "Draw created");

        Ok(draw)
    }

    /// Get a draw header by code
    pub async fn get_draw(&self, code: &str) -> Result<DrawSummary, AppError> {
        tracing::debug!("Fetching draw by code: {}", code);

        self.draws
            .find_by_code(code)
            .await?
            .ok_or_else(|| draw_not_found(code))
    }

    /// Get a draw with its participants
    pub async fn get_draw_detail(&self, code: &str) -> Result<Draw, AppError> {
        tracing::debug!("Fetching draw details by code: {}", code);
        self.load(code).await
    }

    /// Run the draw: assign every participant a receiver and notify them.
    ///
    /// The assignment is authoritative once persisted. Notification
    /// failures are reported in the summary but never roll it back.
    pub async fn execute(&self, code: &str) -> Result<DrawExecution, AppError> {
        tracing::info!("Executing draw for code: {}", code);

        let draw = self.load(code).await?;

        if !draw.status.accepts_execution() {
            return Err(DomainError::AlreadyExecuted(draw.code).into());
        }

        if draw.participants.len() < MIN_PARTICIPANTS {
            return Err(DomainError::InsufficientParticipants {
                found: draw.participants.len(),
            }
            .into());
        }

        let ids: Vec<ParticipantId> = draw.participants.iter().map(|p| p.id).collect();
        let assignments: Vec<(ParticipantId, ParticipantId)> = self
            .rng
            .with(|rng| perform_draw(&ids, rng))?
            .into_iter()
            .collect();

        let drawn = self.draws.apply_assignments(&draw.id, &assignments).await?;
        for (giver, receiver) in drawn.assignments() {
            tracing::debug!("Assigned: {} -> {}", giver.email, receiver.email);
        }

        let notifications = self.notifications.send_all_assignments(&drawn).await;

        tracing::info!("Draw executed successfully for code: {}", code);
        Ok(DrawExecution {
            draw: drawn,
            notifications,
        })
    }

    /// Look up whom the participant with `email` must gift
    pub async fn get_assignment(
        &self,
        code: &str,
        email: &str,
    ) -> Result<AssignmentLookup, AppError> {
        tracing::debug!("Fetching assignment for code: {}", code);

        let draw = self.load(code).await?;

        if draw.is_pending() {
            return Ok(AssignmentLookup::NotDrawnYet {
                draw_name: draw.name,
            });
        }

        let Some(giver) = draw.participant_by_email(email) else {
            return Ok(AssignmentLookup::NotFound);
        };
        let Some(receiver) = draw.receiver_of(giver) else {
            tracing::warn!(code = %draw.code, participant_id = %giver.id, "Drawn participant has no receiver");
            return Ok(AssignmentLookup::NotFound);
        };

        Ok(AssignmentLookup::Assigned(Assignment {
            draw_name: draw.name.clone(),
            giver_name: giver.name.clone(),
            giver_email: giver.email.clone(),
            receiver_name: receiver.name.clone(),
            receiver_email: receiver.email.clone(),
        }))
    }

    /// Send every participant their existing assignment again
    pub async fn resend_notifications(&self, code: &str) -> Result<NotificationSummary, AppError> {
        tracing::info!("Resending notifications for draw: {}", code);

        let draw = self.load(code).await?;

        if draw.is_pending() {
            return Err(DomainError::InvalidState(
                "Cannot resend notifications for a draw that hasn't been executed".to_string(),
            )
            .into());
        }

        Ok(self.notifications.send_all_assignments(&draw).await)
    }

    async fn load(&self, code: &str) -> Result<Draw, AppError> {
        self.draws
            .find_by_code_with_participants(code)
            .await?
            .ok_or_else(|| draw_not_found(code))
    }
}

fn draw_not_found(code: &str) -> AppError {
    AppError::Domain(DomainError::NotFound(format!(
        "Draw not found with code: {}",
        code
    )))
}
