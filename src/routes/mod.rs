// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod api;
pub mod dashboard;

use crate::error::{AppError, Result};
use crate::models::{Activity, DateRange};
use crate::services::stats::resolve_date_range;
use crate::time_utils::parse_query_date;
use crate::AppState;
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Date range query parameters shared by the page and the JSON endpoints.
///
/// Each endpoint takes the range explicitly; the page forwards its own
/// parameters to the map requests it makes.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    /// Resolve against the activity collection; absent bounds default to the
    /// earliest/latest activity.
    pub fn resolve(&self, activities: &[Activity]) -> Result<DateRange> {
        let start = parse_bound("start_date", self.start_date.as_deref())?;
        let end = parse_bound("end_date", self.end_date.as_deref())?;
        let range = resolve_date_range(activities, start, end);

        if range.start > range.end {
            return Err(AppError::BadRequest(format!(
                "start_date {} is after end_date {}",
                range.start, range.end
            )));
        }
        Ok(range)
    }
}

/// Empty values (an untouched form field) count as absent.
fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_query_date(value).map(Some).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid '{}' parameter: {}", name, value))
        }),
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_check))
        .merge(dashboard::routes())
        .merge(api::routes())
        .nest_service("/static", static_files)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
