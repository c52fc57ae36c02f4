//! Secret Santa API Server
//!
//! Creates gift-exchange draws, assigns every participant a receiver in a
//! single cycle and emails each giver their result.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ConfiguredMailSender, PostgresDrawRepository};
use app::{DrawService, NotificationService, RandomSource};
use config::Config;
use domain::ports::{DrawRepository, MailSender};

/// Application state shared across all handlers
pub struct AppState<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    pub draw_service: Arc<DrawService<DR, MS>>,
}

impl<DR, MS> AppState<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    pub fn new(draw_service: DrawService<DR, MS>) -> Self {
        Self {
            draw_service: Arc::new(draw_service),
        }
    }
}

// Derived Clone would require DR: Clone and MS: Clone
impl<DR, MS> Clone for AppState<DR, MS>
where
    DR: DrawRepository,
    MS: MailSender,
{
    fn clone(&self) -> Self {
        Self {
            draw_service: self.draw_service.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,secret_santa_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Secret Santa API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let draw_repo = Arc::new(PostgresDrawRepository::new(db));
    let mailer = Arc::new(ConfiguredMailSender::from_config(&config));
    if !config.mail_enabled() {
        tracing::info!("Assignment emails will be written to the log only");
    }

    if config.random_seed.is_some() {
        tracing::warn!("RANDOM_SEED is set; codes and draws are reproducible");
    }

    // Create application services
    let notification_service =
        NotificationService::new(draw_repo.clone(), mailer, config.frontend_url.clone());
    let draw_service = DrawService::new(
        draw_repo,
        notification_service,
        RandomSource::new(config.random_seed),
    );

    let state = AppState::new(draw_service);

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    // Rate-limited routes (creation, assignment lookup by guessable code)
    let draw_routes = handlers::draw_routes().merge(handlers::guarded_draw_routes().layer(
        GovernorLayer {
            config: governor_config,
        },
    ));

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1/draws", draw_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
