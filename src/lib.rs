// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava Dashboard: lifetime and per-sport statistics from Strava
//!
//! This crate fetches the athlete's activities and nearby segments once at
//! startup and serves an HTML dashboard plus JSON endpoints for the map.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use chrono::{DateTime, Utc};
use config::Config;
use models::{Activity, Segment};
use services::{PhotoService, StravaService};

/// Shared application state, built once in `main`.
///
/// `activities` and `segments` are read-only after startup.
pub struct AppState {
    pub config: Config,
    pub strava: StravaService,
    pub photos: PhotoService,
    /// All activities, newest first (Strava's order)
    pub activities: Vec<Activity>,
    pub segments: Vec<Segment>,
    /// When activities and segments were fetched
    pub fetched_at: DateTime<Utc>,
}
