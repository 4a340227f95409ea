// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregation engine for the dashboard.
//!
//! Every statistic goes through [`Aggregate`] or [`safe`], so an empty
//! selection (no activities of a type, or a date range with nothing in it)
//! reports zeros instead of NaN or infinity.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::stats::{
    Category, CategoryStats, DateRange, FootStats, LifetimeStats, MostRecent, StatsShape,
    SwimStats, WheeledStats,
};
use crate::models::Activity;

const EARTH_CIRCUMFERENCE_KM: f64 = 40_075.0;
const EVEREST_HEIGHT_M: f64 = 8_848.0;
/// Stroke volume assumed for the blood estimate (liters per beat).
const LITERS_PER_BEAT: f64 = 0.07;
const MPS_TO_KMH: f64 = 3.6;

/// Replace NaN and infinities with zero.
pub fn safe(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sum, mean and max over a set of values, all zero when the set is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregate {
    sum: f64,
    max: f64,
    count: usize,
}

impl Aggregate {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        // Sum in sorted order so the result does not depend on fetch order.
        values.sort_by(f64::total_cmp);

        Self {
            sum: values.iter().sum(),
            max: values.last().copied().unwrap_or(0.0),
            count: values.len(),
        }
    }

    pub fn sum(&self) -> f64 {
        safe(self.sum)
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        safe(self.sum / self.count as f64)
    }

    pub fn max(&self) -> f64 {
        safe(self.max)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Activities whose start day falls inside `range`, in collection order.
pub fn activities_in_range<'a>(activities: &'a [Activity], range: &DateRange) -> Vec<&'a Activity> {
    activities
        .iter()
        .filter(|a| range.contains(a.start_day()))
        .collect()
}

/// Fill in missing bounds from the earliest/latest activity.
pub fn resolve_date_range(
    activities: &[Activity],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> DateRange {
    let covering = DateRange::covering(activities);
    DateRange::new(
        start.unwrap_or(covering.start),
        end.unwrap_or(covering.end),
    )
}

/// Lifetime totals over the activities in `range`.
pub fn compute_lifetime_stats(activities: &[Activity], range: &DateRange) -> LifetimeStats {
    let selected = activities_in_range(activities, range);

    let kudos = selected.iter().map(|a| u64::from(a.kudos_count)).sum();
    let heart_beats =
        Aggregate::from_values(selected.iter().map(|a| heart_beats_estimate(a))).sum();
    let distance_km =
        Aggregate::from_values(selected.iter().map(|a| a.distance)).sum() / 1000.0;
    let elevation_m = Aggregate::from_values(selected.iter().map(|a| a.total_elevation_gain)).sum();

    LifetimeStats {
        kudos,
        heart_beats_estimate: heart_beats,
        distance_km,
        elevation_m,
        blood_pumped_l: safe(heart_beats * LITERS_PER_BEAT),
        earth_circumferences: safe(distance_km / EARTH_CIRCUMFERENCE_KM),
        everest_heights: safe(elevation_m / EVEREST_HEIGHT_M),
    }
}

/// Heartbeat proxy for one activity: average bpm times moving time in
/// seconds. An estimate only; it is not a measured beat count.
fn heart_beats_estimate(activity: &Activity) -> f64 {
    activity
        .average_heartrate
        .map(|bpm| bpm * activity.moving_time as f64)
        .unwrap_or(0.0)
}

/// Statistics for one category within `range`.
///
/// Matches `coarse_type` and `sport_subtype` exactly (the subtype defaults to
/// the coarse type) and the commute flag. The returned shape follows the
/// sport being reported.
pub fn compute_category_stats(
    activities: &[Activity],
    range: &DateRange,
    coarse_type: &str,
    sport_subtype: Option<&str>,
    commute: bool,
) -> CategoryStats {
    let sport = sport_subtype.unwrap_or(coarse_type);
    let selected: Vec<&Activity> = activities_in_range(activities, range)
        .into_iter()
        .filter(|a| a.activity_type == coarse_type && a.sport_type == sport && a.commute == commute)
        .collect();

    let count = selected.len();
    let distance = Aggregate::from_values(selected.iter().map(|a| a.distance));
    let elevation = Aggregate::from_values(selected.iter().map(|a| a.total_elevation_gain));
    let speed = Aggregate::from_values(selected.iter().map(|a| a.average_speed));
    let max_speed = Aggregate::from_values(selected.iter().map(|a| a.max_speed));
    let power = Aggregate::from_values(selected.iter().filter_map(|a| a.average_watts));
    let heartrate = Aggregate::from_values(selected.iter().filter_map(|a| a.average_heartrate));

    match StatsShape::for_sport_type(sport) {
        StatsShape::Wheeled => CategoryStats::Wheeled(WheeledStats {
            count,
            total_distance_km: distance.sum() / 1000.0,
            total_elevation_m: elevation.sum(),
            max_speed_kmh: max_speed.max() * MPS_TO_KMH,
            avg_speed_kmh: speed.mean() * MPS_TO_KMH,
            avg_power_w: power.mean(),
            avg_distance_km: distance.mean() / 1000.0,
            avg_elevation_m: elevation.mean(),
            avg_heartrate_bpm: heartrate.mean(),
        }),
        StatsShape::Foot { with_power } => CategoryStats::Foot(FootStats {
            count,
            total_distance_km: distance.sum() / 1000.0,
            total_elevation_m: elevation.sum(),
            avg_pace_per_km: format_pace(minutes_per(1000.0, speed.mean())),
            avg_power_w: with_power.then(|| power.mean()),
            avg_distance_km: distance.mean() / 1000.0,
            avg_elevation_m: elevation.mean(),
            avg_heartrate_bpm: heartrate.mean(),
        }),
        StatsShape::Swim => CategoryStats::Swim(SwimStats {
            count,
            total_distance_km: distance.sum() / 1000.0,
            avg_pace_per_100m: format_pace(minutes_per(100.0, speed.mean())),
            avg_distance_km: distance.mean() / 1000.0,
            avg_heartrate_bpm: heartrate.mean(),
        }),
    }
}

/// Minutes needed to cover `meters` at `speed_mps`; zero speed gives zero.
fn minutes_per(meters: f64, speed_mps: f64) -> f64 {
    safe(meters / (speed_mps * 60.0))
}

/// Render decimal minutes as `m:s` (seconds truncated, not zero padded).
///
/// Display only; never parse the result back.
pub fn format_pace(minutes: f64) -> String {
    let minutes = safe(minutes).max(0.0);
    let whole = minutes.trunc();
    let seconds = ((minutes - whole) * 60.0).floor();
    format!("{}:{}", whole as u64, seconds as u64)
}

/// Count activities per sport type for sports outside the known categories.
pub fn count_uncategorized(activities: &[Activity]) -> BTreeMap<String, usize> {
    activities
        .iter()
        .filter(|a| Category::from_sport_type(&a.sport_type).is_none())
        .fold(BTreeMap::new(), |mut counts, a| {
            *counts.entry(a.sport_type.clone()).or_insert(0) += 1;
            counts
        })
}

/// Summary of the first (newest) activity in fetch order.
pub fn most_recent(activities: &[Activity]) -> Option<MostRecent> {
    activities.first().map(|a| MostRecent {
        date: a.start_day(),
        name: a.name.clone(),
        activity_type: a.activity_type.clone(),
        distance_km: safe(a.distance / 1000.0),
    })
}
