// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Dashboard Server
//!
//! Fetches the athlete's activities and nearby segments from Strava at
//! startup, then serves the dashboard and its JSON endpoints.

use anyhow::Context;
use strava_dashboard::{
    config::Config,
    error::AppError,
    services::{PhotoService, StravaClient, StravaService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Strava Dashboard");

    let strava = StravaService::new(
        StravaClient::from_config(&config),
        config.strava_refresh_token.clone(),
    );

    // Authenticate before anything else; bad credentials abort startup
    strava
        .access_token()
        .await
        .map_err(|e| startup_failure("token exchange", e))?;

    let activities = strava
        .fetch_all_activities()
        .await
        .map_err(|e| startup_failure("activity fetch", e))?;

    let segments = strava
        .explore_segments(
            &config.segment_bounds,
            Some(config.segment_activity_type.as_str()),
        )
        .await
        .map_err(|e| startup_failure("segment explore", e))?;

    let photos = PhotoService::new(&config.photo_cache_path);
    tracing::info!(
        activities = activities.len(),
        segments = segments.len(),
        photo_cache = %photos.path().display(),
        "Startup data loaded"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        strava,
        photos,
        activities,
        segments,
        fetched_at: chrono::Utc::now(),
    });

    // Build router
    let app = strava_dashboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Log a fatal startup error and turn it into the process exit error.
fn startup_failure(stage: &'static str, err: AppError) -> anyhow::Error {
    tracing::error!(
        stage,
        error = %err,
        retryable = err.is_retryable(),
        "Startup failed"
    );
    anyhow::anyhow!("{} failed: {}", stage, err)
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strava_dashboard=debug,info")),
        )
        .with(format)
        .init();
}
