//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Draw, DrawId, DrawSummary, NewDraw, ParticipantId};
use crate::error::DomainError;

/// Repository for Draw aggregates (a draw and the participants it owns)
#[async_trait]
pub trait DrawRepository: Send + Sync {
    /// Check whether any draw already uses this code
    async fn exists_by_code(&self, code: &str) -> Result<bool, DomainError>;

    /// Persist a new pending draw and its participants under the given code
    async fn create(&self, code: &str, draw: &NewDraw) -> Result<Draw, DomainError>;

    /// Find a draw header by code
    async fn find_by_code(&self, code: &str) -> Result<Option<DrawSummary>, DomainError>;

    /// Find a draw by code with all of its participants loaded
    async fn find_by_code_with_participants(&self, code: &str)
        -> Result<Option<Draw>, DomainError>;

    /// Record every giver -> receiver link and move the draw to `Drawn`.
    ///
    /// Applied as one unit: implementations must serialize concurrent calls
    /// for the same draw and fail with `AlreadyExecuted` if the draw is no
    /// longer pending when the write happens. Readers never observe a
    /// partially assigned draw.
    async fn apply_assignments(
        &self,
        id: &DrawId,
        assignments: &[(ParticipantId, ParticipantId)],
    ) -> Result<Draw, DomainError>;

    /// Flag a participant's assignment email as delivered
    async fn mark_notification_sent(
        &self,
        id: &ParticipantId,
        sent_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
