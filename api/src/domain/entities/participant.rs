//! Participant domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::draw::DrawId;

/// Unique identifier for a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ParticipantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One member of a draw
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    /// Owning draw (lookup key only)
    pub draw_id: DrawId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Sibling this participant gifts; set once when the draw executes
    pub assigned_to: Option<ParticipantId>,
    pub notification_sent: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Canonical form used wherever emails are compared: trimmed, full Unicode lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Participant {
    pub fn has_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }
}

/// Data needed to register a participant
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl NewParticipant {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        }
    }
}
