//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The fakes are plain in-memory structs rather than generated mocks so that
//! tests can inspect stored draws and delivered mail directly.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
