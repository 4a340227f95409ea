// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava segment models and the explore bounding box.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Geographic bounding box for segment explore: south, west, north, east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Value for the `bounds` query parameter.
    pub fn to_query_param(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords: Vec<f64> = s
            .split(',')
            .map(|c| c.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("invalid coordinate in bounds '{}': {}", s, e))?;

        match coords.as_slice() {
            &[south, west, north, east] => {
                if south > north {
                    return Err(format!("south {} is above north {}", south, north));
                }
                Ok(Self {
                    south,
                    west,
                    north,
                    east,
                })
            }
            _ => Err(format!(
                "expected 4 coordinates in bounds, got {}",
                coords.len()
            )),
        }
    }
}

/// Segment explore response; only the nested list is kept.
#[derive(Debug, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A route segment found by explore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Segment {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub climb_category: u8,
    #[serde(default)]
    pub climb_category_desc: String,
    /// Average grade in percent
    #[serde(default)]
    pub avg_grade: f64,
    #[serde(default)]
    pub start_latlng: Vec<f64>,
    #[serde(default)]
    pub end_latlng: Vec<f64>,
    /// Meters
    #[serde(default)]
    pub elev_difference: f64,
    /// Meters
    #[serde(default)]
    pub distance: f64,
    /// Encoded polyline
    #[serde(default)]
    pub points: String,
}

/// Detailed segment with the athlete's personal record.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentDetail {
    pub id: u64,
    pub name: String,
    pub distance: f64,
    #[serde(default)]
    pub average_grade: f64,
    #[serde(default)]
    pub athlete_segment_stats: Option<AthleteSegmentStats>,
    #[serde(default)]
    pub xoms: Option<Xoms>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AthleteSegmentStats {
    /// Seconds; null when the athlete has never ridden it
    pub pr_elapsed_time: Option<u64>,
    #[serde(default)]
    pub effort_count: u32,
}

/// KOM/QOM leaderboard times (already formatted by Strava).
#[derive(Debug, Clone, Deserialize)]
pub struct Xoms {
    pub kom: Option<String>,
    pub qom: Option<String>,
    pub overall: Option<String>,
}

impl SegmentDetail {
    pub fn pr_elapsed_time(&self) -> Option<u64> {
        self.athlete_segment_stats
            .as_ref()
            .and_then(|s| s.pr_elapsed_time)
            .filter(|&t| t > 0)
    }

    /// Average speed of the personal record in km/h.
    pub fn pr_speed_kmh(&self) -> Option<f64> {
        self.pr_elapsed_time()
            .map(|secs| self.distance / secs as f64 * 3.6)
    }
}
