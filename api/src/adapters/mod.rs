//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mail;
pub mod postgres;

pub use mail::ConfiguredMailSender;
pub use postgres::PostgresDrawRepository;
