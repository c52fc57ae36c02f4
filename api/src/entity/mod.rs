//! SeaORM entities
//!
//! Table models for PostgreSQL. Adapters convert these into domain entities.

pub mod draws;
pub mod participants;
