use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Facility, Need};
use crate::services::cache::{CacheKey, SnapshotCache};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Errors that can occur while reading the facility directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Postgres(#[from] Arc<PostgresError>),

    #[error("Seed file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static directory contents, loaded from a JSON seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub needs: Vec<Need>,
}

impl SeedData {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let seed: SeedData = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded seed directory from {} ({} facilities, {} needs)",
            path.as_ref().display(),
            seed.facilities.len(),
            seed.needs.len()
        );

        Ok(seed)
    }
}

/// Where directory records come from
pub enum DirectorySource {
    Postgres(Arc<PostgresClient>),
    Seed {
        facilities: Arc<Vec<Facility>>,
        needs: Arc<Vec<Need>>,
    },
}

/// Snapshot reader over the facility directory and need store
pub struct FacilityDirectory {
    source: DirectorySource,
    facilities: SnapshotCache<Facility>,
    needs: SnapshotCache<Need>,
}

impl FacilityDirectory {
    pub fn new(source: DirectorySource, capacity: u64, ttl_secs: u64) -> Self {
        Self {
            source,
            facilities: SnapshotCache::new(capacity, ttl_secs),
            needs: SnapshotCache::new(capacity, ttl_secs),
        }
    }

    /// Directory backed by in-memory seed data
    pub fn from_seed(seed: SeedData) -> Self {
        let source = DirectorySource::Seed {
            facilities: Arc::new(seed.facilities),
            needs: Arc::new(seed.needs),
        };
        Self::new(source, 4, 60)
    }

    /// Current facility snapshot
    pub async fn facilities(&self) -> Result<Arc<Vec<Facility>>, DirectoryError> {
        match &self.source {
            DirectorySource::Seed { facilities, .. } => Ok(Arc::clone(facilities)),
            DirectorySource::Postgres(client) => Ok(self
                .facilities
                .get_or_load(CacheKey::facilities(), client.fetch_facilities())
                .await?),
        }
    }

    /// Current need snapshot, every status included
    pub async fn needs(&self) -> Result<Arc<Vec<Need>>, DirectoryError> {
        match &self.source {
            DirectorySource::Seed { needs, .. } => Ok(Arc::clone(needs)),
            DirectorySource::Postgres(client) => Ok(self
                .needs
                .get_or_load(CacheKey::needs(), client.fetch_needs())
                .await?),
        }
    }

    pub async fn health_check(&self) -> bool {
        match &self.source {
            DirectorySource::Seed { .. } => true,
            DirectorySource::Postgres(client) => match client.health_check().await {
                Ok(healthy) => healthy,
                Err(e) => {
                    tracing::warn!("Directory health check failed: {}", e);
                    false
                }
            },
        }
    }
}
