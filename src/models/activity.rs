// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model, as returned by the activity listing endpoint.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One exercise session fetched from Strava.
///
/// Field names follow the Strava API so the JSON endpoints hand the map
/// client the same shape Strava produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Strava activity ID
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Coarse type (Ride, Run, Hike, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Fine-grained sport type (MountainBikeRide, TrailRun, etc.)
    pub sport_type: String,
    /// Start time in UTC
    pub start_date: DateTime<Utc>,
    /// Start time in the athlete's local timezone (Strava marks it with `Z`)
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,
    #[serde(default)]
    pub commute: bool,
    /// Indoor trainer activity
    #[serde(default)]
    pub trainer: bool,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Average speed in m/s
    #[serde(default)]
    pub average_speed: f64,
    /// Max speed in m/s
    #[serde(default)]
    pub max_speed: f64,
    /// Average power in watts (absent without a power source)
    #[serde(default)]
    pub average_watts: Option<f64>,
    /// Average heart rate in bpm (absent without a monitor)
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
    #[serde(default)]
    pub kudos_count: u32,
    #[serde(default)]
    pub total_photo_count: u32,
    #[serde(default)]
    pub map: ActivityMap,
}

/// Activity map data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityMap {
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

impl Activity {
    /// Calendar day the activity started on, in the athlete's local time.
    pub fn start_day(&self) -> NaiveDate {
        self.start_date_local
            .unwrap_or(self.start_date)
            .date_naive()
    }

    /// Virtual and trainer sessions have no meaningful photos or route.
    pub fn is_virtual(&self) -> bool {
        self.trainer || self.sport_type.starts_with("Virtual")
    }
}

/// Detailed activity response, used only for its primary photo.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub photos: Option<ActivityPhotos>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityPhotos {
    #[serde(default)]
    pub primary: Option<PrimaryPhoto>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryPhoto {
    /// Photo URLs keyed by pixel size ("100", "600", ...)
    #[serde(default)]
    pub urls: std::collections::HashMap<String, String>,
}

impl ActivityDetail {
    /// URL of the largest available size of the primary photo.
    pub fn primary_photo_url(&self) -> Option<&str> {
        let urls = &self.photos.as_ref()?.primary.as_ref()?.urls;
        urls.iter()
            .max_by_key(|(size, _)| size.parse::<u32>().unwrap_or(0))
            .map(|(_, url)| url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_strava_summary() {
        let json = r#"{
            "id": 154504250376,
            "name": "Morning Ride",
            "type": "Ride",
            "sport_type": "MountainBikeRide",
            "start_date": "2024-06-01T14:05:00Z",
            "start_date_local": "2024-06-01T08:05:00Z",
            "commute": false,
            "trainer": false,
            "distance": 28099.2,
            "total_elevation_gain": 516.0,
            "average_speed": 6.1,
            "max_speed": 14.2,
            "moving_time": 4207,
            "kudos_count": 12,
            "total_photo_count": 2,
            "map": { "id": "a1", "summary_polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" }
        }"#;

        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.activity_type, "Ride");
        assert_eq!(activity.sport_type, "MountainBikeRide");
        assert_eq!(activity.average_watts, None);
        assert_eq!(activity.start_day().to_string(), "2024-06-01");
        assert!(activity.map.summary_polyline.is_some());
        assert!(!activity.is_virtual());
    }

    #[test]
    fn test_start_day_uses_local_time() {
        let json = r#"{
            "id": 1, "name": "Late Run", "type": "Run", "sport_type": "Run",
            "start_date": "2024-06-02T04:30:00Z",
            "start_date_local": "2024-06-01T22:30:00Z"
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.start_day().to_string(), "2024-06-01");
    }

    #[test]
    fn test_primary_photo_picks_largest() {
        let json = r#"{
            "id": 7, "name": "Lake loop",
            "photos": { "count": 1, "primary": { "urls": {
                "100": "https://example.com/small.jpg",
                "600": "https://example.com/large.jpg"
            } } }
        }"#;
        let detail: ActivityDetail = serde_json::from_str(json).unwrap();
        assert_eq!(
            detail.primary_photo_url(),
            Some("https://example.com/large.jpg")
        );
    }

    #[test]
    fn test_detail_without_photos() {
        let detail: ActivityDetail =
            serde_json::from_str(r#"{ "id": 7, "name": "Indoor" }"#).unwrap();
        assert_eq!(detail.primary_photo_url(), None);
    }
}
