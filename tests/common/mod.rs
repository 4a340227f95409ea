// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{Duration, Utc};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strava_dashboard::config::Config;
use strava_dashboard::models::{Activity, Segment};
use strava_dashboard::routes::create_router;
use strava_dashboard::services::{PhotoService, StravaClient, StravaService};
use strava_dashboard::AppState;

/// Example polyline from Google's encoding documentation.
#[allow(dead_code)]
pub const TEST_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

static NEXT_PATH: AtomicUsize = AtomicUsize::new(0);

/// A photo cache path unique to this test process and call.
#[allow(dead_code)]
pub fn temp_cache_path(name: &str) -> PathBuf {
    let n = NEXT_PATH.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "strava-dashboard-test-{}-{}-{}.csv",
        std::process::id(),
        name,
        n
    ))
}

/// Four activities, newest first, as Strava lists them.
#[allow(dead_code)]
pub fn fixture_activities() -> Vec<Activity> {
    serde_json::from_value(json!([
        {
            "id": 101,
            "name": "Morning Commute",
            "type": "Ride",
            "sport_type": "Ride",
            "start_date": "2024-03-10T15:00:00Z",
            "start_date_local": "2024-03-10T08:00:00Z",
            "commute": true,
            "distance": 10000.0,
            "total_elevation_gain": 100.0,
            "average_speed": 6.0,
            "max_speed": 12.0,
            "average_heartrate": 140.0,
            "moving_time": 1800,
            "kudos_count": 2,
            "total_photo_count": 1,
            "map": { "summary_polyline": TEST_POLYLINE }
        },
        {
            "id": 102,
            "name": "Evening Run",
            "type": "Run",
            "sport_type": "Run",
            "start_date": "2024-02-15T02:00:00Z",
            "start_date_local": "2024-02-14T18:00:00Z",
            "distance": 5000.0,
            "total_elevation_gain": 30.0,
            "average_speed": 3.0,
            "max_speed": 4.0,
            "average_heartrate": 150.0,
            "moving_time": 1667,
            "kudos_count": 3,
            "map": { "summary_polyline": TEST_POLYLINE }
        },
        {
            "id": 103,
            "name": "Zwift Climb",
            "type": "VirtualRide",
            "sport_type": "VirtualRide",
            "start_date": "2024-01-05T12:00:00Z",
            "trainer": true,
            "distance": 20000.0,
            "average_speed": 8.0,
            "average_watts": 210.0,
            "moving_time": 2500,
            "kudos_count": 1,
            "total_photo_count": 2,
            "map": { "summary_polyline": null }
        },
        {
            "id": 104,
            "name": "Powder Day",
            "type": "AlpineSki",
            "sport_type": "AlpineSki",
            "start_date": "2023-12-20T17:00:00Z",
            "start_date_local": "2023-12-20T10:00:00Z",
            "distance": 30000.0,
            "total_elevation_gain": 2000.0,
            "average_speed": 5.0,
            "max_speed": 20.0,
            "moving_time": 6000,
            "kudos_count": 5,
            "map": { "summary_polyline": TEST_POLYLINE }
        }
    ]))
    .expect("fixture activities deserialize")
}

#[allow(dead_code)]
pub fn fixture_segments() -> Vec<Segment> {
    serde_json::from_value(json!([
        {
            "id": 229781,
            "name": "Hawk Hill",
            "climb_category": 1,
            "climb_category_desc": "4",
            "avg_grade": 5.7,
            "start_latlng": [37.8331, -122.4834],
            "end_latlng": [37.8280, -122.4981],
            "elev_difference": 152.8,
            "distance": 2684.82,
            "points": "_p~iF~ps|U_ulLnnqC"
        }
    ]))
    .expect("fixture segments deserialize")
}

/// Create a test app with offline dependencies.
///
/// Strava points at a closed local port, so any handler that reaches the
/// network fails fast with a network error.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let client = StravaClient::from_config(&config);
    build_app(config, client, fixture_activities())
}

/// Create a test app whose Strava calls go to `server_url` (a mock server).
#[allow(dead_code)]
pub fn create_test_app_with_strava(
    server_url: &str,
    activities: Vec<Activity>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        strava_api_url: server_url.to_string(),
        strava_oauth_url: format!("{}/oauth/token", server_url),
        ..Config::default()
    };
    let client = StravaClient::from_config(&config);
    build_app(config, client, activities)
}

/// A service with a valid cached token, so no token exchange happens.
#[allow(dead_code)]
pub fn authenticated_service(client: StravaClient) -> StravaService {
    StravaService::with_access_token(
        client,
        "test_refresh_token".to_string(),
        "test_access_token".to_string(),
        Utc::now() + Duration::hours(6),
    )
}

#[allow(dead_code)]
fn build_app(
    mut config: Config,
    client: StravaClient,
    activities: Vec<Activity>,
) -> (axum::Router, Arc<AppState>) {
    let cache_path = temp_cache_path("app");
    config.photo_cache_path = cache_path.to_string_lossy().into_owned();

    let state = Arc::new(AppState {
        strava: authenticated_service(client),
        photos: PhotoService::new(cache_path),
        activities,
        segments: fixture_segments(),
        fetched_at: Utc::now(),
        config,
    });

    (create_router(state.clone()), state)
}
