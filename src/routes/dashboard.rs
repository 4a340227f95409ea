// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The HTML dashboard page.

use crate::error::{AppError, Result};
use crate::models::stats::{CategoryStats, LifetimeStats, MostRecent};
use crate::models::{Activity, DateRange};
use crate::routes::DateRangeQuery;
use crate::services::stats::{
    compute_category_stats, compute_lifetime_stats, count_uncategorized, most_recent,
};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// One block of the dashboard: which activities it covers.
pub struct Section {
    pub title: &'static str,
    pub coarse_type: &'static str,
    pub sport_subtype: Option<&'static str>,
    pub commute: bool,
}

const fn section(
    title: &'static str,
    coarse_type: &'static str,
    sport_subtype: Option<&'static str>,
    commute: bool,
) -> Section {
    Section {
        title,
        coarse_type,
        sport_subtype,
        commute,
    }
}

/// Sections in display order.
pub const SECTIONS: &[Section] = &[
    section("Rides", "Ride", None, false),
    section("Commutes", "Ride", None, true),
    section("Mountain Bike Rides", "Ride", Some("MountainBikeRide"), false),
    section("Virtual Rides", "VirtualRide", None, false),
    section("Runs", "Run", None, false),
    section("Virtual Runs", "VirtualRun", None, false),
    section("Hikes", "Hike", None, false),
    section("Swims", "Swim", None, false),
    section("Alpine Skiing", "AlpineSki", None, false),
    section("Nordic Skiing", "NordicSki", None, false),
];

/// Everything the dashboard shows for one date range.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub range: DateRange,
    pub lifetime: LifetimeStats,
    pub most_recent: Option<MostRecent>,
    pub categories: Vec<SectionStats>,
    pub uncategorized: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct SectionStats {
    pub title: &'static str,
    pub stats: CategoryStats,
}

pub fn dashboard_stats(activities: &[Activity], range: &DateRange) -> DashboardStats {
    let categories = SECTIONS
        .iter()
        .map(|s| SectionStats {
            title: s.title,
            stats: compute_category_stats(
                activities,
                range,
                s.coarse_type,
                s.sport_subtype,
                s.commute,
            ),
        })
        .collect();

    DashboardStats {
        range: *range,
        lifetime: compute_lifetime_stats(activities, range),
        most_recent: most_recent(activities),
        categories,
        uncategorized: count_uncategorized(activities),
    }
}

// ─── Template ────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    heading: String,
    /// Empty when the bound is open
    start_date: String,
    end_date: String,
    /// Query string forwarded to the map endpoints
    range_query: String,
    fetched_at: String,
    lifetime: Vec<(&'static str, String)>,
    most_recent: Option<MostRecentView>,
    sections: Vec<SectionView>,
    uncategorized: Vec<(String, usize)>,
}

struct MostRecentView {
    date: String,
    name: String,
    activity_type: String,
    distance: String,
}

struct SectionView {
    title: &'static str,
    rows: Vec<(&'static str, String)>,
}

impl DashboardTemplate {
    fn new(stats: DashboardStats, fetched_at: String) -> Self {
        let lifetime = &stats.lifetime;
        let lifetime_rows = vec![
            ("Kudos", lifetime.kudos.to_string()),
            ("Distance", format!("{:.1} km", lifetime.distance_km)),
            (
                "Around the Earth",
                format!("{:.2} times", lifetime.earth_circumferences),
            ),
            ("Elevation", format!("{:.0} m", lifetime.elevation_m)),
            (
                "Up Everest",
                format!("{:.2} times", lifetime.everest_heights),
            ),
            (
                "Heartbeats (estimate)",
                format!("{:.0}", lifetime.heart_beats_estimate),
            ),
            (
                "Blood Pumped (estimate)",
                format!("{:.0} L", lifetime.blood_pumped_l),
            ),
        ];

        let start_date = input_value(stats.range.start);
        let end_date = input_value(stats.range.end);

        let heading = match (start_date.is_empty(), end_date.is_empty()) {
            (true, true) => "No activities".to_string(),
            (false, true) => format!("From {}", start_date),
            (true, false) => format!("Until {}", end_date),
            (false, false) => format!("{} to {}", start_date, end_date),
        };

        let range_query = [("start_date", &start_date), ("end_date", &end_date)]
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        Self {
            heading,
            range_query,
            start_date,
            end_date,
            fetched_at,
            lifetime: lifetime_rows,
            most_recent: stats.most_recent.map(|r| MostRecentView {
                date: r.date.to_string(),
                name: r.name,
                activity_type: r.activity_type,
                distance: format!("{:.1} km", r.distance_km),
            }),
            sections: stats
                .categories
                .iter()
                .map(|c| SectionView {
                    title: c.title,
                    rows: c.stats.rows(),
                })
                .collect(),
            uncategorized: stats.uncategorized.into_iter().collect(),
        }
    }
}

/// Date input value; the open bounds of an empty collection render blank.
fn input_value(day: NaiveDate) -> String {
    if day == NaiveDate::MIN || day == NaiveDate::MAX {
        String::new()
    } else {
        day.to_string()
    }
}

/// Render the dashboard for the requested (or full) date range.
async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Html<String>> {
    let range = params.resolve(&state.activities)?;
    tracing::debug!(start = %range.start, end = %range.end, "Rendering dashboard");

    let stats = dashboard_stats(&state.activities, &range);
    let template = DashboardTemplate::new(stats, format_utc_rfc3339(state.fetched_at));

    let body = template
        .render()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Template render failed: {}", e)))?;
    Ok(Html(body))
}
