// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map overlay: activity routes as GeoJSON.

use geo::{BoundingRect, LineString, Rect};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::models::Activity;

/// Line colour used for an activity type on the map.
pub fn track_color(activity_type: &str) -> &'static str {
    match activity_type {
        "Ride" => "green",
        "Run" => "red",
        "AlpineSki" => "blue",
        "NordicSki" => "#77C3EC",
        "Hike" => "brown",
        _ => "black",
    }
}

/// Decode a Strava summary polyline (precision 5) into lng/lat coordinates.
pub fn decode_track(encoded: &str) -> Result<LineString<f64>, TrackError> {
    polyline::decode_polyline(encoded, 5).map_err(|e| TrackError::Polyline(e.to_string()))
}

/// Build a feature collection of activity routes.
///
/// Activities without a route (indoor, manual entries) are skipped, as are
/// polylines that fail to decode. The collection's bbox covers every route.
pub fn build_track_collection<'a, I>(activities: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut features = Vec::new();
    let mut bounds: Option<Rect<f64>> = None;

    for activity in activities {
        let Some(encoded) = activity.map.summary_polyline.as_deref() else {
            continue;
        };
        if encoded.is_empty() {
            continue;
        }

        let line = match decode_track(encoded) {
            Ok(line) if line.0.len() >= 2 => line,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(activity_id = activity.id, error = %e, "Skipping undecodable route");
                continue;
            }
        };

        if let Some(rect) = line.bounding_rect() {
            bounds = Some(match bounds {
                Some(b) => merge_rects(b, rect),
                None => rect,
            });
        }

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&line))),
            id: Some(geojson::feature::Id::Number(activity.id.into())),
            properties: Some(track_properties(activity)),
            foreign_members: None,
        });
    }

    FeatureCollection {
        bbox: bounds.map(|b| vec![b.min().x, b.min().y, b.max().x, b.max().y]),
        features,
        foreign_members: None,
    }
}

fn track_properties(activity: &Activity) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), activity.name.clone().into());
    properties.insert("type".to_string(), activity.activity_type.clone().into());
    properties.insert(
        "distance_km".to_string(),
        round2(activity.distance / 1000.0).into(),
    );
    properties.insert(
        "speed_kmh".to_string(),
        round2(activity.average_speed * 3.6).into(),
    );
    properties.insert(
        "elevation_m".to_string(),
        activity.total_elevation_gain.into(),
    );
    properties.insert(
        "color".to_string(),
        track_color(&activity.activity_type).into(),
    );
    properties
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn merge_rects(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

/// Errors from route decoding.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Failed to decode polyline: {0}")]
    Polyline(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityMap;

    // Example polyline from Google's encoding documentation.
    const POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn make_activity(id: u64, activity_type: &str, polyline: Option<&str>) -> Activity {
        Activity {
            id,
            name: format!("Route {}", id),
            activity_type: activity_type.to_string(),
            sport_type: activity_type.to_string(),
            start_date: "2024-05-01T08:00:00Z".parse().unwrap(),
            start_date_local: None,
            commute: false,
            trainer: false,
            distance: 12340.0,
            total_elevation_gain: 150.0,
            average_speed: 5.0,
            max_speed: 8.0,
            average_watts: None,
            average_heartrate: None,
            moving_time: 2400,
            kudos_count: 0,
            total_photo_count: 0,
            map: ActivityMap {
                summary_polyline: polyline.map(String::from),
            },
        }
    }

    #[test]
    fn test_decode_track() {
        let line = decode_track(POLYLINE).unwrap();
        assert_eq!(line.0.len(), 3);
        // geo uses x = longitude, y = latitude
        assert!((line.0[0].x - -120.2).abs() < 1e-9);
        assert!((line.0[0].y - 38.5).abs() < 1e-9);
    }

    #[test]
    fn test_collection_skips_routeless_activities() {
        let activities = vec![
            make_activity(1, "Ride", Some(POLYLINE)),
            make_activity(2, "VirtualRide", None),
            make_activity(3, "Run", Some("")),
        ];

        let collection = build_track_collection(&activities);

        assert_eq!(collection.features.len(), 1);
        let props = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(props["color"], "green");
        assert_eq!(props["distance_km"], 12.34);
        assert_eq!(props["speed_kmh"], 18.0);
    }

    #[test]
    fn test_collection_bbox_covers_routes() {
        let activities = vec![make_activity(1, "Hike", Some(POLYLINE))];

        let collection = build_track_collection(&activities);
        let bbox = collection.bbox.unwrap();

        // [min lng, min lat, max lng, max lat]
        assert!((bbox[0] - -126.453).abs() < 1e-9);
        assert!((bbox[1] - 38.5).abs() < 1e-9);
        assert!((bbox[2] - -120.2).abs() < 1e-9);
        assert!((bbox[3] - 43.252).abs() < 1e-9);
    }

    #[test]
    fn test_track_colors() {
        assert_eq!(track_color("NordicSki"), "#77C3EC");
        assert_eq!(track_color("Swim"), "black");
    }
}
