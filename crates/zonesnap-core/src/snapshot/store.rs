//! Timestamp-keyed snapshot persistence
//!
//! ## Layout
//!
//! ```text
//! {timestamp}/zones.json            zone list, VPCs attached for private zones
//! {timestamp}/{zoneName}json        record sets of one zone
//! {timestamp}/health-checks.json    health checks, tags attached
//! latest_backup_timestamp           body = timestamp of the last complete backup
//! ```
//!
//! Zone names carry the provider's trailing `.`, hence no separator before
//! `json` in the per-zone key.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{HealthCheck, HostedZone, ResourceRecordSet, Snapshot, Timestamp};
use crate::traits::BlobStore;

/// Key of the latest-backup pointer object
pub const LATEST_POINTER_KEY: &str = "latest_backup_timestamp";

pub fn zones_key(timestamp: Timestamp) -> String {
    format!("{}/zones.json", timestamp)
}

pub fn zone_records_key(timestamp: Timestamp, zone_name: &str) -> String {
    format!("{}/{}json", timestamp, zone_name)
}

pub fn health_checks_key(timestamp: Timestamp) -> String {
    format!("{}/health-checks.json", timestamp)
}

/// Names shared by more than one zone, e.g. split-horizon public/private pairs
///
/// Such zones share one record object, so only the last one written survives.
pub fn duplicate_zone_names(zones: &[HostedZone]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for zone in zones {
        let name = zone.name.as_str();
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }

    duplicates
}

/// Reads and writes snapshots in a [`BlobStore`]
///
/// A snapshot is several independently written objects. The pointer is
/// written last, so it only ever names a snapshot whose objects all exist;
/// a failed backup can leave an orphaned prefix that nothing references.
#[derive(Clone)]
pub struct SnapshotStore {
    blobs: Arc<dyn BlobStore>,
}

impl SnapshotStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Persist `snapshot` under `timestamp` and move the latest pointer to it
    pub async fn put_snapshot(&self, timestamp: Timestamp, snapshot: &Snapshot) -> Result<()> {
        for name in duplicate_zone_names(&snapshot.zones) {
            warn!(
                "Several zones are named {}; only the last one's record sets are kept in {}",
                name,
                zone_records_key(timestamp, name)
            );
        }

        self.put_json(&zones_key(timestamp), &snapshot.zones).await?;

        for zone in &snapshot.zones {
            let records = snapshot.records_for(&zone.id);
            self.put_json(&zone_records_key(timestamp, &zone.name), records)
                .await?;
            debug!("Stored {} record set(s) for zone {}", records.len(), zone.name);
        }

        self.put_json(&health_checks_key(timestamp), &snapshot.health_checks)
            .await?;

        self.blobs
            .put(LATEST_POINTER_KEY, timestamp.to_string().into_bytes())
            .await?;

        info!(
            "Snapshot {} stored in {} store",
            timestamp,
            self.blobs.store_name()
        );
        Ok(())
    }

    pub async fn get_zones(&self, timestamp: Timestamp) -> Result<Vec<HostedZone>> {
        self.get_json(&zones_key(timestamp)).await
    }

    pub async fn get_zone_records(
        &self,
        timestamp: Timestamp,
        zone_name: &str,
    ) -> Result<Vec<ResourceRecordSet>> {
        self.get_json(&zone_records_key(timestamp, zone_name)).await
    }

    pub async fn get_health_checks(&self, timestamp: Timestamp) -> Result<Vec<HealthCheck>> {
        self.get_json(&health_checks_key(timestamp)).await
    }

    /// Timestamp of the most recent complete backup
    pub async fn get_latest_timestamp(&self) -> Result<Timestamp> {
        let body = self.blobs.get(LATEST_POINTER_KEY).await?;
        let text = String::from_utf8(body).map_err(|e| {
            Error::storage(format!("{} is not valid UTF-8: {}", LATEST_POINTER_KEY, e))
        })?;

        text.parse()
    }

    /// Read every object of the snapshot at `timestamp`
    pub async fn load_snapshot(&self, timestamp: Timestamp) -> Result<Snapshot> {
        let zones = self.get_zones(timestamp).await?;

        let mut records = BTreeMap::new();
        for zone in &zones {
            let sets = self.get_zone_records(timestamp, &zone.name).await?;
            records.insert(zone.id.clone(), sets);
        }

        let health_checks = self.get_health_checks(timestamp).await?;

        Ok(Snapshot {
            zones,
            records,
            health_checks,
        })
    }

    async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let body = serde_json::to_vec(value)?;
        self.blobs.put(key, body).await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let body = self.blobs.get(key).await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::storage(format!("Malformed snapshot object {}: {}", key, e)))
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("blobs", &self.blobs.store_name())
            .finish()
    }
}
