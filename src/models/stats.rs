//! Aggregate statistics shapes for the dashboard.
//!
//! These are recomputed on every request from the in-memory activity list
//! and never persisted. Computation lives in `services::stats`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Activity;

/// Inclusive range of activity start days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range spanning the earliest and latest start day in `activities`.
    ///
    /// An empty collection gets an unbounded range.
    pub fn covering(activities: &[Activity]) -> Self {
        let mut days = activities.iter().map(Activity::start_day);
        let Some(first) = days.next() else {
            return Self::new(NaiveDate::MIN, NaiveDate::MAX);
        };
        let (start, end) = days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Self::new(start, end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Recognised sport categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ride,
    MountainBikeRide,
    VirtualRide,
    Run,
    VirtualRun,
    Hike,
    Swim,
    AlpineSki,
    NordicSki,
}

/// Which fields a category's statistics carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsShape {
    Wheeled,
    Foot { with_power: bool },
    Swim,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Ride,
        Category::MountainBikeRide,
        Category::VirtualRide,
        Category::Run,
        Category::VirtualRun,
        Category::Hike,
        Category::Swim,
        Category::AlpineSki,
        Category::NordicSki,
    ];

    pub fn from_sport_type(sport_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == sport_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ride => "Ride",
            Category::MountainBikeRide => "MountainBikeRide",
            Category::VirtualRide => "VirtualRide",
            Category::Run => "Run",
            Category::VirtualRun => "VirtualRun",
            Category::Hike => "Hike",
            Category::Swim => "Swim",
            Category::AlpineSki => "AlpineSki",
            Category::NordicSki => "NordicSki",
        }
    }

    pub fn shape(&self) -> StatsShape {
        match self {
            Category::Run | Category::VirtualRun => StatsShape::Foot { with_power: true },
            Category::Hike => StatsShape::Foot { with_power: false },
            Category::Swim => StatsShape::Swim,
            Category::Ride
            | Category::MountainBikeRide
            | Category::VirtualRide
            | Category::AlpineSki
            | Category::NordicSki => StatsShape::Wheeled,
        }
    }
}

impl StatsShape {
    /// Shape for a sport type string; unrecognised sports report like rides.
    pub fn for_sport_type(sport_type: &str) -> Self {
        Category::from_sport_type(sport_type)
            .map(|c| c.shape())
            .unwrap_or(StatsShape::Wheeled)
    }
}

/// All-time (within range) totals for the header of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LifetimeStats {
    pub kudos: u64,
    /// Estimate only: average heart rate times moving time, summed.
    pub heart_beats_estimate: f64,
    pub distance_km: f64,
    pub elevation_m: f64,
    /// Estimate derived from `heart_beats_estimate` at 70 mL per beat.
    pub blood_pumped_l: f64,
    pub earth_circumferences: f64,
    pub everest_heights: f64,
}

/// Statistics for cycling and snow sports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WheeledStats {
    pub count: usize,
    pub total_distance_km: f64,
    pub total_elevation_m: f64,
    pub max_speed_kmh: f64,
    pub avg_speed_kmh: f64,
    pub avg_power_w: f64,
    pub avg_distance_km: f64,
    pub avg_elevation_m: f64,
    pub avg_heartrate_bpm: f64,
}

/// Statistics for running and hiking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootStats {
    pub count: usize,
    pub total_distance_km: f64,
    pub total_elevation_m: f64,
    /// Display-only `m:s` per kilometer
    pub avg_pace_per_km: String,
    /// Only reported for running
    pub avg_power_w: Option<f64>,
    pub avg_distance_km: f64,
    pub avg_elevation_m: f64,
    pub avg_heartrate_bpm: f64,
}

/// Statistics for swimming.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwimStats {
    pub count: usize,
    pub total_distance_km: f64,
    /// Display-only `m:s` per 100 meters
    pub avg_pace_per_100m: String,
    pub avg_distance_km: f64,
    pub avg_heartrate_bpm: f64,
}

/// Per-category statistics, shaped by the kind of sport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CategoryStats {
    Wheeled(WheeledStats),
    Foot(FootStats),
    Swim(SwimStats),
}

impl CategoryStats {
    pub fn count(&self) -> usize {
        match self {
            CategoryStats::Wheeled(s) => s.count,
            CategoryStats::Foot(s) => s.count,
            CategoryStats::Swim(s) => s.count,
        }
    }

    pub fn total_distance_km(&self) -> f64 {
        match self {
            CategoryStats::Wheeled(s) => s.total_distance_km,
            CategoryStats::Foot(s) => s.total_distance_km,
            CategoryStats::Swim(s) => s.total_distance_km,
        }
    }

    /// Label/value pairs for display, values rounded to one decimal.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        match self {
            CategoryStats::Wheeled(s) => vec![
                ("Total", s.count.to_string()),
                ("Total Distance", format!("{:.1} km", s.total_distance_km)),
                ("Total Elevation", format!("{:.1} m", s.total_elevation_m)),
                ("Max Speed", format!("{:.1} km/h", s.max_speed_kmh)),
                ("Avg Speed", format!("{:.1} km/h", s.avg_speed_kmh)),
                ("Avg Power", format!("{:.1} W", s.avg_power_w)),
                ("Avg Distance", format!("{:.1} km", s.avg_distance_km)),
                ("Avg Elevation", format!("{:.1} m", s.avg_elevation_m)),
                ("Avg Heart Rate", format!("{:.1} bpm", s.avg_heartrate_bpm)),
            ],
            CategoryStats::Foot(s) => {
                let mut rows = vec![
                    ("Total", s.count.to_string()),
                    ("Total Distance", format!("{:.1} km", s.total_distance_km)),
                    ("Total Elevation", format!("{:.1} m", s.total_elevation_m)),
                    ("Avg Pace", format!("{} /km", s.avg_pace_per_km)),
                ];
                if let Some(power) = s.avg_power_w {
                    rows.push(("Avg Power", format!("{:.1} W", power)));
                }
                rows.extend([
                    ("Avg Distance", format!("{:.1} km", s.avg_distance_km)),
                    ("Avg Elevation", format!("{:.1} m", s.avg_elevation_m)),
                    ("Avg Heart Rate", format!("{:.1} bpm", s.avg_heartrate_bpm)),
                ]);
                rows
            }
            CategoryStats::Swim(s) => vec![
                ("Total", s.count.to_string()),
                ("Total Distance", format!("{:.1} km", s.total_distance_km)),
                ("Avg Pace", format!("{} /100m", s.avg_pace_per_100m)),
                ("Avg Distance", format!("{:.1} km", s.avg_distance_km)),
                ("Avg Heart Rate", format!("{:.1} bpm", s.avg_heartrate_bpm)),
            ],
        }
    }
}

/// The newest activity overall, ignoring any date filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostRecent {
    pub date: NaiveDate,
    pub name: String,
    pub activity_type: String,
    pub distance_km: f64,
}
