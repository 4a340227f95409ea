// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo enrichment against a mock Strava and a temporary CSV cache.

use mockito::{Server, ServerGuard};
use serde_json::json;
use strava_dashboard::models::{Activity, PhotoEntry};
use strava_dashboard::services::photos::PhotoCache;
use strava_dashboard::services::{PhotoService, StravaClient};

mod common;

fn service_for(server: &ServerGuard) -> strava_dashboard::services::StravaService {
    common::authenticated_service(StravaClient::with_urls(
        server.url(),
        format!("{}/oauth/token", server.url()),
        "id".to_string(),
        "secret".to_string(),
    ))
}

fn photo_activity(id: u64, name: &str) -> Activity {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "type": "Hike",
        "sport_type": "Hike",
        "start_date": "2024-06-01T16:00:00Z",
        "distance": 8000.0,
        "total_photo_count": 1
    }))
    .unwrap()
}

fn detail_body(id: u64, name: &str, url: &str) -> String {
    json!({
        "id": id,
        "name": name,
        "photos": {
            "count": 1,
            "primary": { "urls": { "100": format!("{}?s=100", url), "600": url } }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_enrichment_requests_only_uncached_activities() {
    let mut server = Server::new_async().await;
    let cache_path = common::temp_cache_path("enrich");

    // Cache already holds activity A
    let mut cache = PhotoCache::default();
    cache.insert(PhotoEntry {
        photo_url: "https://img.example/a.jpg".to_string(),
        activity_id: 1,
        activity_name: "Ridge Trail".to_string(),
    });
    cache.save(&cache_path).unwrap();

    let a = server
        .mock("GET", "/activities/1")
        .expect(0)
        .create_async()
        .await;
    let b = server
        .mock("GET", "/activities/2")
        .match_header("authorization", "Bearer test_access_token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(detail_body(2, "Lake Loop", "https://img.example/b.jpg"))
        .expect(1)
        .create_async()
        .await;

    let activities = vec![photo_activity(2, "Lake Loop"), photo_activity(1, "Ridge Trail")];
    let photos = PhotoService::new(&cache_path);
    let entries = photos.enrich(&service_for(&server), &activities).await.unwrap();

    a.assert_async().await;
    b.assert_async().await;

    assert_eq!(entries.len(), 2);
    let on_disk = PhotoCache::load(&cache_path).unwrap();
    std::fs::remove_file(&cache_path).ok();

    assert_eq!(on_disk.len(), 2);
    let ids = on_disk.cached_activity_ids();
    assert!(ids.contains(&1));
    assert!(ids.contains(&2));
}

#[tokio::test]
async fn test_enrichment_picks_largest_photo() {
    let mut server = Server::new_async().await;
    let cache_path = common::temp_cache_path("largest");

    let _mock = server
        .mock("GET", "/activities/5")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(detail_body(5, "Summit", "https://img.example/summit.jpg"))
        .create_async()
        .await;

    let photos = PhotoService::new(&cache_path);
    let entries = photos
        .enrich(&service_for(&server), &[photo_activity(5, "Summit")])
        .await
        .unwrap();
    std::fs::remove_file(&cache_path).ok();

    assert_eq!(
        entries,
        vec![PhotoEntry {
            photo_url: "https://img.example/summit.jpg".to_string(),
            activity_id: 5,
            activity_name: "Summit".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_enrichment_without_pending_work_leaves_file_alone() {
    let server = Server::new_async().await;
    let cache_path = common::temp_cache_path("idle");

    let photos = PhotoService::new(&cache_path);
    let entries = photos
        .enrich(&service_for(&server), &common::fixture_activities()[1..])
        .await
        .unwrap();

    assert!(entries.is_empty());
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn test_corrupt_cache_is_treated_as_empty() {
    let mut server = Server::new_async().await;
    let cache_path = common::temp_cache_path("corrupt");
    std::fs::write(
        &cache_path,
        "photo_url,activity_id,activity_name\nhttps://img.example/x.jpg,oops,Broken\n",
    )
    .unwrap();

    let mock = server
        .mock("GET", "/activities/9")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(detail_body(9, "Fresh", "https://img.example/fresh.jpg"))
        .expect(1)
        .create_async()
        .await;

    let photos = PhotoService::new(&cache_path);
    let entries = photos
        .enrich(&service_for(&server), &[photo_activity(9, "Fresh")])
        .await
        .unwrap();

    mock.assert_async().await;
    let on_disk = PhotoCache::load(&cache_path).unwrap();
    std::fs::remove_file(&cache_path).ok();

    assert_eq!(entries.len(), 1);
    assert_eq!(on_disk.len(), 1);
}

#[tokio::test]
async fn test_failed_request_keeps_existing_cache() {
    let mut server = Server::new_async().await;
    let cache_path = common::temp_cache_path("failure");

    let mut cache = PhotoCache::default();
    cache.insert(PhotoEntry {
        photo_url: "https://img.example/a.jpg".to_string(),
        activity_id: 1,
        activity_name: "Ridge Trail".to_string(),
    });
    cache.save(&cache_path).unwrap();

    let _mock = server
        .mock("GET", "/activities/2")
        .with_status(429)
        .create_async()
        .await;

    let photos = PhotoService::new(&cache_path);
    let result = photos
        .enrich(
            &service_for(&server),
            &[photo_activity(1, "Ridge Trail"), photo_activity(2, "Lake Loop")],
        )
        .await;

    let on_disk = PhotoCache::load(&cache_path).unwrap();
    std::fs::remove_file(&cache_path).ok();

    assert!(result.unwrap_err().is_retryable());
    assert_eq!(on_disk.len(), 1);
}

#[tokio::test]
async fn test_activity_without_primary_photo_is_requested_once() {
    let mut server = Server::new_async().await;
    let cache_path = common::temp_cache_path("photoless");

    let mock = server
        .mock("GET", "/activities/4")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": 4, "name": "Foggy Loop", "photos": { "count": 1 } }).to_string())
        .expect(1)
        .create_async()
        .await;

    let strava = service_for(&server);
    let activities = vec![photo_activity(4, "Foggy Loop")];
    let photos = PhotoService::new(&cache_path);

    let first = photos.enrich(&strava, &activities).await.unwrap();
    let second = photos.enrich(&strava, &activities).await.unwrap();
    std::fs::remove_file(&cache_path).ok();

    mock.assert_async().await;
    assert!(first.is_empty());
    assert!(second.is_empty());
}
