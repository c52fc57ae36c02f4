//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Draw, DrawId, DrawStatus, DrawSummary, NewDraw, Participant, ParticipantId,
};
use crate::domain::ports::{DrawRepository, MailMessage, MailSender};
use crate::error::{DomainError, NotificationError};

// ============================================================================
// In-Memory Draw Repository
// ============================================================================

/// Draws keyed by code. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryDrawRepository {
    draws: Arc<RwLock<HashMap<String, Draw>>>,
    all_codes_taken: bool,
}

impl InMemoryDrawRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a draw for testing
    pub fn with_draw(self, draw: Draw) -> Self {
        self.draws.write().unwrap().insert(draw.code.clone(), draw);
        self
    }

    /// Report every candidate code as already in use
    pub fn with_all_codes_taken(mut self) -> Self {
        self.all_codes_taken = true;
        self
    }

    /// Snapshot of a stored draw
    pub fn get(&self, code: &str) -> Option<Draw> {
        self.draws.read().unwrap().get(code).cloned()
    }

    pub fn len(&self) -> usize {
        self.draws.read().unwrap().len()
    }
}

#[async_trait]
impl DrawRepository for InMemoryDrawRepository {
    async fn exists_by_code(&self, code: &str) -> Result<bool, DomainError> {
        Ok(self.all_codes_taken || self.draws.read().unwrap().contains_key(code))
    }

    async fn create(&self, code: &str, new_draw: &NewDraw) -> Result<Draw, DomainError> {
        let mut draws = self.draws.write().unwrap();
        if draws.contains_key(code) {
            return Err(DomainError::Database(format!(
                "duplicate key value violates unique constraint: code {}",
                code
            )));
        }

        let now = Utc::now();
        let id = DrawId::new();
        let draw = Draw {
            id,
            code: code.to_string(),
            name: new_draw.name.clone(),
            description: new_draw.description.clone(),
            draw_date: new_draw.draw_date,
            budget_limit: new_draw.budget_limit,
            status: DrawStatus::Pending,
            participants: new_draw
                .participants
                .iter()
                .map(|p| Participant {
                    id: ParticipantId::new(),
                    draw_id: id,
                    name: p.name.clone(),
                    email: p.email.clone(),
                    phone: p.phone.clone(),
                    assigned_to: None,
                    notification_sent: false,
                    notification_sent_at: None,
                    created_at: now,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };

        draws.insert(draw.code.clone(), draw.clone());
        Ok(draw)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<DrawSummary>, DomainError> {
        Ok(self.draws.read().unwrap().get(code).map(Draw::summary))
    }

    async fn find_by_code_with_participants(
        &self,
        code: &str,
    ) -> Result<Option<Draw>, DomainError> {
        Ok(self.draws.read().unwrap().get(code).cloned())
    }

    async fn apply_assignments(
        &self,
        id: &DrawId,
        assignments: &[(ParticipantId, ParticipantId)],
    ) -> Result<Draw, DomainError> {
        // One write lock covers the status check and every write
        let mut draws = self.draws.write().unwrap();
        let draw = draws
            .values_mut()
            .find(|d| d.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Draw {} not found", id)))?;

        if !draw.status.accepts_execution() {
            return Err(DomainError::AlreadyExecuted(draw.code.clone()));
        }

        let links: HashMap<ParticipantId, ParticipantId> = assignments.iter().copied().collect();
        for participant in &mut draw.participants {
            participant.assigned_to = links.get(&participant.id).copied();
        }
        draw.status = DrawStatus::Drawn;
        draw.updated_at = Utc::now();

        Ok(draw.clone())
    }

    async fn mark_notification_sent(
        &self,
        id: &ParticipantId,
        sent_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut draws = self.draws.write().unwrap();
        let participant = draws
            .values_mut()
            .flat_map(|d| d.participants.iter_mut())
            .find(|p| p.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Participant {} not found", id)))?;

        participant.notification_sent = true;
        participant.notification_sent_at = Some(sent_at);
        Ok(())
    }
}

// ============================================================================
// Mock Mail Sender
// ============================================================================

/// Records every delivered message; can be told to fail
#[derive(Clone, Default)]
pub struct MockMailSender {
    sent: Arc<RwLock<Vec<MailMessage>>>,
    fail_all: bool,
    fail_for: Vec<String>,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Fail only messages addressed to `email`
    pub fn failing_for(mut self, email: &str) -> Self {
        self.fail_for.push(email.to_lowercase());
        self
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError> {
        if self.fail_all || self.fail_for.contains(&message.to.to_lowercase()) {
            return Err(NotificationError::Api {
                status: 503,
                message: "mail service unavailable".to_string(),
            });
        }

        self.sent.write().unwrap().push(message.clone());
        Ok(())
    }
}
