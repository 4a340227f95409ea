// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo enrichment backed by a CSV cache.
//!
//! Activity listings only report how many photos an activity has. Getting a
//! URL takes one detail request per activity, so results are cached on disk
//! and an activity already present in the cache is never requested again.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Activity, PhotoEntry};
use crate::services::StravaService;

/// In-memory view of the photo cache, keyed by photo URL.
#[derive(Debug, Default, Clone)]
pub struct PhotoCache {
    entries: BTreeMap<String, PhotoEntry>,
}

impl PhotoCache {
    /// Load the cache from a CSV file. A missing file is an empty cache.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, PhotoCacheError> {
        let file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(PhotoCacheError::Io(e)),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut cache = Self::default();
        for row in reader.deserialize::<PhotoEntry>() {
            cache.insert(row?);
        }
        Ok(cache)
    }

    /// Replace the CSV file with the current contents.
    ///
    /// Rows go to a sibling temporary file which is renamed over `path` only
    /// after it has been flushed, so a failed write leaves the old cache.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), PhotoCacheError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = staging_path(path);
        if let Err(e) = self.write_rows(&tmp) {
            std::fs::remove_file(&tmp).ok();
            return Err(e);
        }
        std::fs::rename(&tmp, path).map_err(|e| {
            std::fs::remove_file(&tmp).ok();
            PhotoCacheError::Io(e)
        })
    }

    fn write_rows(&self, path: &Path) -> std::result::Result<(), PhotoCacheError> {
        let mut writer = csv::Writer::from_path(path)?;
        for entry in self.entries.values() {
            writer.serialize(entry)?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| PhotoCacheError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }

    /// Insert an entry; returns false if the URL was already cached.
    pub fn insert(&mut self, entry: PhotoEntry) -> bool {
        if self.entries.contains_key(&entry.photo_url) {
            return false;
        }
        self.entries.insert(entry.photo_url.clone(), entry);
        true
    }

    /// IDs of all activities with at least one cached photo.
    pub fn cached_activity_ids(&self) -> HashSet<u64> {
        self.entries.values().map(|e| e.activity_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<PhotoEntry> {
        self.entries.into_values().collect()
    }
}

/// `photos.csv` is staged as `photos.csv.tmp` in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Activities that still need a detail request: not cached, with photos,
/// and not virtual.
pub fn select_for_enrichment<'a>(
    activities: &'a [Activity],
    cached_ids: &HashSet<u64>,
) -> Vec<&'a Activity> {
    activities
        .iter()
        .filter(|a| !cached_ids.contains(&a.id))
        .filter(|a| a.total_photo_count >= 1)
        .filter(|a| !a.is_virtual())
        .collect()
}

/// Runs enrichment passes against one cache file.
pub struct PhotoService {
    path: PathBuf,
    /// Locked for a whole pass so two passes never race on the cache file.
    /// The set holds activities whose detail had no primary photo; later
    /// passes in this process skip them.
    pass_state: Mutex<HashSet<u64>>,
}

impl PhotoService {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            pass_state: Mutex::new(HashSet::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch photos for uncached activities and persist the merged cache.
    ///
    /// Detail requests run sequentially. The cache is written once, after
    /// every request has succeeded; a failure part way through leaves the
    /// file as it was.
    pub async fn enrich(
        &self,
        strava: &StravaService,
        activities: &[Activity],
    ) -> Result<Vec<PhotoEntry>> {
        let mut photoless = self.pass_state.lock().await;

        let mut cache = match PhotoCache::load(&self.path) {
            Ok(cache) => cache,
            Err(e) => {
                let err = AppError::CacheCorrupt(e.to_string());
                tracing::warn!(
                    error = %err,
                    path = %self.path.display(),
                    "Ignoring unreadable photo cache"
                );
                PhotoCache::default()
            }
        };

        let mut checked_ids = cache.cached_activity_ids();
        checked_ids.extend(photoless.iter().copied());
        let pending = select_for_enrichment(activities, &checked_ids);
        tracing::info!(
            pending = pending.len(),
            cached = cache.len(),
            "Starting photo enrichment pass"
        );

        if pending.is_empty() {
            return Ok(cache.into_entries());
        }

        for activity in pending {
            let detail = strava.get_activity(activity.id).await?;
            match detail.primary_photo_url() {
                Some(url) => {
                    cache.insert(PhotoEntry {
                        photo_url: url.to_string(),
                        activity_id: activity.id,
                        activity_name: detail.name.clone(),
                    });
                }
                None => {
                    tracing::info!(activity_id = activity.id, "Activity has no primary photo");
                    photoless.insert(activity.id);
                }
            }
        }

        cache.save(&self.path).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to write photo cache {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::info!(cached = cache.len(), "Photo cache updated");

        Ok(cache.into_entries())
    }
}

/// Errors from reading or writing the photo cache.
#[derive(Debug, thiserror::Error)]
pub enum PhotoCacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
