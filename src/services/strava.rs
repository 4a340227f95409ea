// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the dashboard's single athlete.
//!
//! Handles:
//! - Refresh-token exchange for a bearer token
//! - Paginated activity listing
//! - Segment explore and segment detail
//! - Activity detail (for photos)
//!
//! Calls are issued one at a time and never retried; failures are classified
//! into [`AppError`] kinds so callers can tell auth, transport and parse
//! problems apart.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Activity, ActivityDetail, BoundingBox, Segment, SegmentDetail};
use crate::models::segment::ExploreResponse;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Activities requested per page (Strava's maximum).
pub const ACTIVITIES_PER_PAGE: u32 = 200;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_urls(
            "https://www.strava.com/api/v3".to_string(),
            "https://www.strava.com/oauth/token".to_string(),
            client_id,
            client_secret,
        )
    }

    /// Create a client against non-default endpoints (tests, proxies).
    pub fn with_urls(
        base_url: String,
        oauth_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            oauth_url,
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_urls(
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        )
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// Any non-success status, or a response without `access_token`, is an
    /// authentication failure.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken, AppError> {
        let response = self
            .http
            .post(&self.oauth_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token refresh failed");
            return Err(AppError::Authentication(format!(
                "token refresh returned {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read token response: {}", e)))?;
        let parsed: TokenRefreshResponse = serde_json::from_slice(&body)
            .map_err(|e| AppError::Authentication(format!("unparseable token response: {}", e)))?;

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("token response missing access_token".to_string())
            })?;

        // Strava tokens last six hours; assume the minimum margin if unspecified.
        let expires_at = parsed
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS * 2));

        Ok(AccessToken {
            access_token,
            refresh_token: parsed.refresh_token,
            expires_at,
        })
    }

    /// List one page of the athlete's activities, newest first.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);
        self.get_json(
            &url,
            access_token,
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    /// Fetch every activity, page by page, until Strava returns an empty page.
    ///
    /// Pages are disjoint, so concatenating them keeps Strava's newest-first
    /// order without duplicates.
    pub async fn fetch_all_activities(&self, access_token: &str) -> Result<Vec<Activity>, AppError> {
        let mut activities = Vec::new();
        let mut page = 1;

        loop {
            let batch = self
                .list_activities(access_token, page, ACTIVITIES_PER_PAGE)
                .await?;
            if batch.is_empty() {
                break;
            }

            tracing::debug!(page, count = batch.len(), "Fetched activity page");
            activities.extend(batch);
            page += 1;
        }

        tracing::info!(
            count = activities.len(),
            pages = page - 1,
            "Fetched all activities"
        );
        Ok(activities)
    }

    /// Find segments inside a bounding box.
    pub async fn explore_segments(
        &self,
        access_token: &str,
        bounds: &BoundingBox,
        activity_type: Option<&str>,
    ) -> Result<Vec<Segment>, AppError> {
        let url = format!("{}/segments/explore", self.base_url);

        let mut query = vec![("bounds", bounds.to_query_param())];
        if let Some(activity_type) = activity_type {
            query.push(("activity_type", activity_type.to_string()));
        }

        let response: ExploreResponse = self.get_json(&url, access_token, &query).await?;
        tracing::info!(count = response.segments.len(), bounds = %bounds, "Explored segments");
        Ok(response.segments)
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ActivityDetail, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// Get a detailed segment (with the athlete's PR) by ID.
    pub async fn get_segment(
        &self,
        access_token: &str,
        segment_id: u64,
    ) -> Result<SegmentDetail, AppError> {
        let url = format!("{}/segments/{}", self.base_url, segment_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => {
                    tracing::warn!("Strava rate limit hit (429)");
                    AppError::RateLimited
                }
                401 | 403 => AppError::Authentication(format!("HTTP {}: {}", status, body)),
                404 => AppError::NotFound(format!("Strava resource: {}", body)),
                500..=599 => AppError::Network(format!("HTTP {}: {}", status, body)),
                _ => AppError::StravaApi(format!("HTTP {}: {}", status, body)),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| AppError::MalformedResponse(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
struct TokenRefreshResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}

/// A bearer token and when it stops working.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    /// Strava may rotate the refresh token on exchange
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - client plus token lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Cached access token with expiry information.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

struct TokenState {
    refresh_token: String,
    cached: Option<CachedToken>,
}

/// High-level Strava service that owns the bearer token.
///
/// The token is obtained once at startup and refreshed in place when it is
/// within five minutes of expiring. The mutex serialises refreshes so a burst
/// of requests triggers at most one exchange.
pub struct StravaService {
    client: StravaClient,
    token: Mutex<TokenState>,
}

impl StravaService {
    pub fn new(client: StravaClient, refresh_token: String) -> Self {
        Self {
            client,
            token: Mutex::new(TokenState {
                refresh_token,
                cached: None,
            }),
        }
    }

    /// Service seeded with an already valid access token.
    pub fn with_access_token(
        client: StravaClient,
        refresh_token: String,
        access_token: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            client,
            token: Mutex::new(TokenState {
                refresh_token,
                cached: Some(CachedToken {
                    access_token,
                    expires_at,
                }),
            }),
        }
    }

    /// Get a valid (non-expiring) access token, refreshing if needed.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let mut state = self.token.lock().await;
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        if let Some(cached) = &state.cached {
            if Utc::now() + margin < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        tracing::info!("Requesting Strava access token");
        let token = self.client.refresh_token(&state.refresh_token).await?;

        if let Some(rotated) = token.refresh_token {
            if rotated != state.refresh_token {
                tracing::info!("Strava rotated the refresh token");
                state.refresh_token = rotated;
            }
        }

        state.cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: token.expires_at,
        });

        tracing::info!(expires_at = %token.expires_at, "Access token cached");
        Ok(token.access_token)
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    pub async fn fetch_all_activities(&self) -> Result<Vec<Activity>, AppError> {
        let access_token = self.access_token().await?;
        self.client.fetch_all_activities(&access_token).await
    }

    pub async fn explore_segments(
        &self,
        bounds: &BoundingBox,
        activity_type: Option<&str>,
    ) -> Result<Vec<Segment>, AppError> {
        let access_token = self.access_token().await?;
        self.client
            .explore_segments(&access_token, bounds, activity_type)
            .await
    }

    pub async fn get_activity(&self, activity_id: u64) -> Result<ActivityDetail, AppError> {
        let access_token = self.access_token().await?;
        self.client.get_activity(&access_token, activity_id).await
    }

    pub async fn get_segment(&self, segment_id: u64) -> Result<SegmentDetail, AppError> {
        let access_token = self.access_token().await?;
        self.client.get_segment(&access_token, segment_id).await
    }
}
