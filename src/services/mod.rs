// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod photos;
pub mod stats;
pub mod strava;
pub mod tracks;

pub use photos::PhotoService;
pub use strava::{StravaClient, StravaService};
