//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Participant emails are derived from names: `Ana` -> `ana@example.com`.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{
    Draw, DrawId, DrawStatus, NewDraw, NewParticipant, Participant, ParticipantId,
};

fn email_for(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase().replace(' ', "."))
}

/// Draw creation data for the given participant names
pub fn new_draw(names: &[&str]) -> NewDraw {
    NewDraw {
        name: "Office Party".to_string(),
        description: None,
        draw_date: None,
        budget_limit: None,
        participants: names
            .iter()
            .map(|name| NewParticipant::new(name, &email_for(name)))
            .collect(),
    }
}

/// A stored, pending draw with a unique code
pub fn pending_draw(names: &[&str]) -> Draw {
    let id = DrawId::new();
    let now = Utc::now();
    Draw {
        id,
        code: Uuid::new_v4().simple().to_string()[..6].to_string(),
        name: "Office Party".to_string(),
        description: None,
        draw_date: None,
        budget_limit: None,
        status: DrawStatus::Pending,
        participants: names
            .iter()
            .map(|name| Participant {
                id: ParticipantId::new(),
                draw_id: id,
                name: name.to_string(),
                email: email_for(name),
                phone: None,
                assigned_to: None,
                notification_sent: false,
                notification_sent_at: None,
                created_at: now,
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

/// A drawn draw where each participant gifts the next one in `names`
pub fn drawn_draw(names: &[&str]) -> Draw {
    let mut draw = pending_draw(names);
    let ids: Vec<ParticipantId> = draw.participants.iter().map(|p| p.id).collect();
    let n = ids.len();
    for (i, participant) in draw.participants.iter_mut().enumerate() {
        participant.assigned_to = Some(ids[(i + 1) % n]);
    }
    draw.status = DrawStatus::Drawn;
    draw
}
