//! Unified error types for the Secret Santa API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `NotificationError`: Mail transport errors (per participant, never fatal)
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::MIN_PARTICIPANTS;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("At least {} participants are required for a secret santa draw (got {found})", MIN_PARTICIPANTS)]
    InsufficientParticipants { found: usize },

    #[error("Participant with email {0} already exists in this draw")]
    DuplicateParticipant(String),

    #[error("Draw with code {0} has already been executed")]
    AlreadyExecuted(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Failed to generate unique code after {attempts} attempts")]
    ExhaustedAttempts { attempts: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Mail transport errors
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mail API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(e @ DomainError::InsufficientParticipants { .. }) => (
                StatusCode::BAD_REQUEST,
                "Insufficient participants",
                Some(e.to_string()),
            ),
            AppError::Domain(e @ DomainError::DuplicateParticipant(_)) => (
                StatusCode::CONFLICT,
                "Duplicate participant",
                Some(e.to_string()),
            ),
            AppError::Domain(e @ DomainError::AlreadyExecuted(_)) => {
                (StatusCode::CONFLICT, "Already executed", Some(e.to_string()))
            }
            AppError::Domain(DomainError::InvalidState(msg)) => {
                (StatusCode::BAD_REQUEST, "Invalid state", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(e @ DomainError::ExhaustedAttempts { .. }) => {
                tracing::error!("Code generation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
