//! Draw domain entity
//!
//! A draw is one gift-exchange event. It owns its participants and moves
//! through `Pending -> Drawn` exactly once.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::participant::{normalize_email, NewParticipant, Participant, ParticipantId};

/// Smallest group a draw can be created or executed with
pub const MIN_PARTICIPANTS: usize = 3;

/// Unique identifier for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawId(pub Uuid);

impl DrawId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DrawId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DrawId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DrawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Draw lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStatus {
    /// Created, waiting for the organizer to run it
    Pending,
    /// Assignments made
    Drawn,
    /// Reserved; nothing transitions here yet
    Completed,
}

impl DrawStatus {
    /// Only a pending draw may be executed
    pub fn accepts_execution(&self) -> bool {
        matches!(self, DrawStatus::Pending)
    }
}

impl std::fmt::Display for DrawStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawStatus::Pending => write!(f, "pending"),
            DrawStatus::Drawn => write!(f, "drawn"),
            DrawStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for DrawStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DrawStatus::Pending),
            "drawn" => Ok(DrawStatus::Drawn),
            "completed" => Ok(DrawStatus::Completed),
            _ => Err(format!("Unknown draw status: {}", s)),
        }
    }
}

/// Positive monetary limit, stored in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Budget(i64);

impl Budget {
    /// Largest accepted amount: 8 integer digits, 2 decimals
    const MAX_CENTS: i64 = 99_999_999_99;

    pub fn from_cents(cents: i64) -> Option<Self> {
        (cents > 0 && cents <= Self::MAX_CENTS).then_some(Self(cents))
    }

    /// Parse a decimal amount such as `25` or `12.5`. Rejects zero, negatives
    /// and more than two decimal places.
    pub fn from_amount(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let scaled = amount * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-6 {
            return None;
        }
        Self::from_cents(cents as i64)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A gift-exchange draw together with the participants it owns
#[derive(Debug, Clone)]
pub struct Draw {
    pub id: DrawId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub draw_date: Option<DateTime<Utc>>,
    pub budget_limit: Option<Budget>,
    pub status: DrawStatus,
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draw {
    pub fn is_pending(&self) -> bool {
        self.status == DrawStatus::Pending
    }

    /// Look up a participant by id within this draw
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == *id)
    }

    /// Look up a participant by email, ignoring case
    pub fn participant_by_email(&self, email: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.has_email(email))
    }

    /// The receiver a participant must gift, if assigned
    pub fn receiver_of(&self, giver: &Participant) -> Option<&Participant> {
        giver.assigned_to.and_then(|id| self.participant(&id))
    }

    /// Every (giver, receiver) pair currently recorded
    pub fn assignments(&self) -> Vec<(&Participant, &Participant)> {
        self.participants
            .iter()
            .filter_map(|giver| self.receiver_of(giver).map(|receiver| (giver, receiver)))
            .collect()
    }

    pub fn summary(&self) -> DrawSummary {
        DrawSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            draw_date: self.draw_date,
            budget_limit: self.budget_limit,
            status: self.status,
            participant_count: self.participants.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Draw header without its participants
#[derive(Debug, Clone)]
pub struct DrawSummary {
    pub id: DrawId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub draw_date: Option<DateTime<Utc>>,
    pub budget_limit: Option<Budget>,
    pub status: DrawStatus,
    pub participant_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new draw (the code is allocated by the service)
#[derive(Debug, Clone)]
pub struct NewDraw {
    pub name: String,
    pub description: Option<String>,
    pub draw_date: Option<DateTime<Utc>>,
    pub budget_limit: Option<Budget>,
    pub participants: Vec<NewParticipant>,
}

impl NewDraw {
    /// First email that appears twice, compared case-insensitively
    pub fn duplicate_email(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.participants
            .iter()
            .find(|p| !seen.insert(normalize_email(&p.email)))
            .map(|p| p.email.as_str())
    }
}
