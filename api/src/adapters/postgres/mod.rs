//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod draw_repo;


pub use draw_repo::PostgresDrawRepository;
