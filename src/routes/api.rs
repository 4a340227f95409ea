// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes backing the dashboard map and tables.

use crate::error::Result;
use crate::models::{Activity, PhotoEntry, Segment};
use crate::routes::dashboard::{dashboard_stats, DashboardStats};
use crate::routes::DateRangeQuery;
use crate::services::stats::activities_in_range;
use crate::services::tracks::build_track_collection;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use geojson::FeatureCollection;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/all_activities", get(get_all_activities))
        .route("/api/stats", get(get_stats))
        .route("/api/tracks", get(get_tracks))
        .route("/api/segments", get(get_segments))
        .route("/api/segments/{id}", get(get_segment))
        .route("/api/photos", get(get_photos))
}

// ─── Activities ──────────────────────────────────────────────

/// Raw activities whose start day falls in the requested range.
async fn get_all_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<Vec<Activity>>> {
    let range = params.resolve(&state.activities)?;
    let activities = activities_in_range(&state.activities, &range)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(activities))
}

/// The dashboard's numbers as JSON.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<DashboardStats>> {
    let range = params.resolve(&state.activities)?;
    Ok(Json(dashboard_stats(&state.activities, &range)))
}

/// Routes of the activities in range as a GeoJSON feature collection.
async fn get_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<FeatureCollection>> {
    let range = params.resolve(&state.activities)?;
    let in_range = activities_in_range(&state.activities, &range);
    let collection = build_track_collection(in_range);

    tracing::debug!(tracks = collection.features.len(), "Built track collection");
    Ok(Json(collection))
}

// ─── Segments ────────────────────────────────────────────────

/// Segments found by explore at startup.
async fn get_segments(State(state): State<Arc<AppState>>) -> Json<Vec<Segment>> {
    Json(state.segments.clone())
}

/// Segment detail with the athlete's personal record.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SegmentReport {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    /// Meters
    pub distance: f64,
    pub average_grade: f64,
    /// PR elapsed time in seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub pr_elapsed_time: Option<u64>,
    pub pr_speed_kmh: Option<f64>,
    /// Overall KOM/QOM time as formatted by Strava
    pub overall: Option<String>,
}

async fn get_segment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<SegmentReport>> {
    let detail = state.strava.get_segment(id).await?;

    Ok(Json(SegmentReport {
        id: detail.id,
        pr_elapsed_time: detail.pr_elapsed_time(),
        pr_speed_kmh: detail.pr_speed_kmh(),
        overall: detail.xoms.as_ref().and_then(|x| x.overall.clone()),
        name: detail.name,
        distance: detail.distance,
        average_grade: detail.average_grade,
    }))
}

// ─── Photos ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PhotosResponse {
    pub count: usize,
    pub photos: Vec<PhotoEntry>,
}

/// Run an enrichment pass over all activities and return the cache.
async fn get_photos(State(state): State<Arc<AppState>>) -> Result<Json<PhotosResponse>> {
    let photos = state.photos.enrich(&state.strava, &state.activities).await?;
    Ok(Json(PhotosResponse {
        count: photos.len(),
        photos,
    }))
}
