//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod code_generator;
pub mod draw_algorithm;
pub mod draw_service;
pub mod notification_service;
pub mod random;

pub use draw_service::{Assignment, AssignmentLookup, DrawExecution, DrawService};
pub use notification_service::{NotificationService, NotificationSummary};
pub use random::RandomSource;
