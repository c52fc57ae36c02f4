//! Domain layer
//!
//! Draws, participants and the ports the application needs from the outside.
//! - `entities`: Draw, participant and budget types
//! - `ports`: Storage and mail traits

pub mod entities;
pub mod ports;
