//! Draw handlers
//!
//! Endpoints for creating, executing and querying draws.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{AssignmentLookup, NotificationSummary};
use crate::domain::entities::{Budget, Draw, DrawSummary, NewDraw, NewParticipant, Participant};
use crate::domain::ports::{DrawRepository, MailSender};
use crate::error::AppError;
use crate::AppState;

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_EMAIL_LEN: usize = 255;
const MAX_PHONE_LEN: usize = 50;

/// Request body for creating a draw
#[derive(Debug, Deserialize)]
pub struct CreateDrawRequest {
    pub name: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp; must be in the future
    pub draw_date: Option<DateTime<Utc>>,
    /// Amount in currency units, at most two decimals
    pub budget_limit: Option<f64>,
    pub participants: Vec<ParticipantRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl CreateDrawRequest {
    /// Check field formats and convert into domain data.
    ///
    /// Participant count and duplicate emails are checked by the service.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewDraw, AppError> {
        let name = self.name.trim().to_string();
        if name.chars().count() < 3 || name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::BadRequest(
                "Draw name must be between 3 and 255 characters".to_string(),
            ));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(AppError::BadRequest(
                "Description cannot exceed 1000 characters".to_string(),
            ));
        }

        if self.draw_date.is_some_and(|date| date <= now) {
            return Err(AppError::BadRequest(
                "Draw date must be in the future".to_string(),
            ));
        }

        let budget_limit = match self.budget_limit {
            Some(amount) if amount <= 0.0 => {
                return Err(AppError::BadRequest(
                    "Budget limit must be greater than 0".to_string(),
                ))
            }
            Some(amount) => Some(Budget::from_amount(amount).ok_or_else(|| {
                AppError::BadRequest(
                    "Budget limit must have at most 8 integer digits and 2 decimals".to_string(),
                )
            })?),
            None => None,
        };

        let participants = self
            .participants
            .into_iter()
            .map(ParticipantRequest::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewDraw {
            name,
            description,
            draw_date: self.draw_date,
            budget_limit,
            participants,
        })
    }
}

impl ParticipantRequest {
    fn validate(self) -> Result<NewParticipant, AppError> {
        let name = self.name.trim().to_string();
        if name.chars().count() < 2 || name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::BadRequest(
                "Participant name must be between 2 and 255 characters".to_string(),
            ));
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::BadRequest(
                "Participant email is required".to_string(),
            ));
        }
        if email.chars().count() > MAX_EMAIL_LEN || !looks_like_email(&email) {
            return Err(AppError::BadRequest(format!(
                "Invalid participant email: {}",
                email
            )));
        }

        let phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if phone
            .as_ref()
            .is_some_and(|p| p.chars().count() > MAX_PHONE_LEN)
        {
            return Err(AppError::BadRequest(
                "Phone number cannot exceed 50 characters".to_string(),
            ));
        }

        Ok(NewParticipant { name, email, phone })
    }
}

/// `local@domain` with no whitespace
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Draw header as returned by the API
#[derive(Debug, Serialize)]
pub struct DrawResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub draw_date: Option<String>,
    pub budget_limit: Option<f64>,
    pub status: String,
    pub participant_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DrawSummary> for DrawResponse {
    fn from(draw: DrawSummary) -> Self {
        Self {
            id: draw.id.to_string(),
            code: draw.code,
            name: draw.name,
            description: draw.description,
            draw_date: draw.draw_date.map(|d| d.to_rfc3339()),
            budget_limit: draw.budget_limit.map(|b| b.amount()),
            status: draw.status.to_string(),
            participant_count: draw.participant_count,
            created_at: draw.created_at.to_rfc3339(),
            updated_at: draw.updated_at.to_rfc3339(),
        }
    }
}

/// Participant as returned by the API. Assignments are never exposed here.
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notification_sent: bool,
    pub notification_sent_at: Option<String>,
    pub created_at: String,
}

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            notification_sent: p.notification_sent,
            notification_sent_at: p.notification_sent_at.map(|d| d.to_rfc3339()),
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrawDetailResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub draw_date: Option<String>,
    pub budget_limit: Option<f64>,
    pub status: String,
    pub participants: Vec<ParticipantResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Draw> for DrawDetailResponse {
    fn from(draw: Draw) -> Self {
        Self {
            id: draw.id.to_string(),
            participants: draw.participants.iter().map(ParticipantResponse::from).collect(),
            code: draw.code,
            name: draw.name,
            description: draw.description,
            draw_date: draw.draw_date.map(|d| d.to_rfc3339()),
            budget_limit: draw.budget_limit.map(|b| b.amount()),
            status: draw.status.to_string(),
            created_at: draw.created_at.to_rfc3339(),
            updated_at: draw.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExecuteDrawResponse {
    #[serde(flatten)]
    pub draw: DrawResponse,
    pub notifications: NotificationSummary,
}

/// Query parameters for assignment lookup
#[derive(Debug, Deserialize)]
pub struct AssignmentQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub draw_name: Option<String>,
    pub giver_name: Option<String>,
    pub giver_email: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_email: Option<String>,
    pub message: String,
}

impl From<AssignmentLookup> for AssignmentResponse {
    fn from(lookup: AssignmentLookup) -> Self {
        let message = lookup.message();
        match lookup {
            AssignmentLookup::NotDrawnYet { draw_name } => Self {
                draw_name: Some(draw_name),
                giver_name: None,
                giver_email: None,
                receiver_name: None,
                receiver_email: None,
                message,
            },
            AssignmentLookup::NotFound => Self {
                draw_name: None,
                giver_name: None,
                giver_email: None,
                receiver_name: None,
                receiver_email: None,
                message,
            },
            AssignmentLookup::Assigned(a) => Self {
                draw_name: Some(a.draw_name),
                giver_name: Some(a.giver_name),
                giver_email: Some(a.giver_email),
                receiver_name: Some(a.receiver_name),
                receiver_email: Some(a.receiver_email),
                message,
            },
        }
    }
}

/// POST /api/v1/draws
///
/// Create a pending draw with at least three participants.
pub async fn create_draw<DR, MS>(
    State(state): State<AppState<DR, MS>>,
    Json(request): Json<CreateDrawRequest>,
) -> Result<(StatusCode, Json<DrawResponse>), AppError>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    let new_draw = request.validate(Utc::now())?;
    let draw = state.draw_service.create(new_draw).await?;
    tracing::info!("Draw created successfully with code: {}", draw.code);

    Ok((StatusCode::CREATED, Json(draw.summary().into())))
}

/// GET /api/v1/draws/:code
pub async fn get_draw<DR, MS>(
    State(state): State<AppState<DR, MS>>,
    Path(code): Path<String>,
) -> Result<Json<DrawResponse>, AppError>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    let draw = state.draw_service.get_draw(&code).await?;
    Ok(Json(draw.into()))
}

/// GET /api/v1/draws/:code/details
///
/// Draw with its participants, without revealing assignments.
pub async fn get_draw_details<DR, MS>(
    State(state): State<AppState<DR, MS>>,
    Path(code): Path<String>,
) -> Result<Json<DrawDetailResponse>, AppError>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    let draw = state.draw_service.get_draw_detail(&code).await?;
    Ok(Json(draw.into()))
}

/// POST /api/v1/draws/:code/execute
///
/// Assign every participant a receiver and email the results.
pub async fn execute_draw<DR, MS>(
    State(state): State<AppState<DR, MS>>,
    Path(code): Path<String>,
) -> Result<Json<ExecuteDrawResponse>, AppError>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    let execution = state.draw_service.execute(&code).await?;
    tracing::info!("Draw executed successfully: {}", code);

    Ok(Json(ExecuteDrawResponse {
        draw: execution.draw.summary().into(),
        notifications: execution.notifications,
    }))
}

/// GET /api/v1/draws/:code/assignment?email=
///
/// Only an unknown draw is an error; other outcomes are described in `message`.
pub async fn get_assignment<DR, MS>(
    State(state): State<AppState<DR, MS>>,
    Path(code): Path<String>,
    Query(query): Query<AssignmentQuery>,
) -> Result<Json<AssignmentResponse>, AppError>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    let lookup = state
        .draw_service
        .get_assignment(&code, query.email.trim())
        .await?;
    Ok(Json(lookup.into()))
}

/// POST /api/v1/draws/:code/resend-notifications
pub async fn resend_notifications<DR, MS>(
    State(state): State<AppState<DR, MS>>,
    Path(code): Path<String>,
) -> Result<Json<NotificationSummary>, AppError>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    let summary = state.draw_service.resend_notifications(&code).await?;
    tracing::info!("Notifications resent for draw {}: {:?}", code, summary);
    Ok(Json(summary))
}

/// Routes open to any caller, relative to `/api/v1/draws`
pub fn routes<DR, MS>() -> Router<AppState<DR, MS>>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    Router::new()
        .route("/:code", get(get_draw::<DR, MS>))
        .route("/:code/details", get(get_draw_details::<DR, MS>))
        .route("/:code/execute", post(execute_draw::<DR, MS>))
        .route(
            "/:code/resend-notifications",
            post(resend_notifications::<DR, MS>),
        )
}

/// Routes that should sit behind the rate limiter (creation, code guessing)
pub fn guarded_routes<DR, MS>() -> Router<AppState<DR, MS>>
where
    DR: DrawRepository + 'static,
    MS: MailSender + 'static,
{
    Router::new()
        .route("/", post(create_draw::<DR, MS>))
        .route("/:code/assignment", get(get_assignment::<DR, MS>))
}
