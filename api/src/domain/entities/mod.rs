//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod draw;
pub mod participant;

pub use draw::{Budget, Draw, DrawId, DrawStatus, DrawSummary, NewDraw, MIN_PARTICIPANTS};
pub use participant::{NewParticipant, Participant, ParticipantId};
