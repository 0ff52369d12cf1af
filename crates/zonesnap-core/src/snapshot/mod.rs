//! Backup path: provider → [`SnapshotBuilder`] → [`SnapshotStore`]

pub mod builder;
pub mod store;

pub use builder::SnapshotBuilder;
pub use store::{
    LATEST_POINTER_KEY, SnapshotStore, duplicate_zone_names, health_checks_key, zone_records_key,
    zones_key,
};

use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::model::Timestamp;
use crate::traits::DnsProvider;

/// Outcome of a backup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSummary {
    pub timestamp: Timestamp,
    pub zones: usize,
    pub record_sets: usize,
    pub health_checks: usize,
}

impl fmt::Display for BackupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Success: {}: Zones: {} HealthChecks: {}",
            self.timestamp, self.zones, self.health_checks
        )
    }
}

/// Takes point-in-time backups of a provider into a snapshot store
pub struct BackupService {
    provider: Arc<dyn DnsProvider>,
    store: SnapshotStore,
}

impl BackupService {
    pub fn new(provider: Arc<dyn DnsProvider>, store: SnapshotStore) -> Self {
        Self { provider, store }
    }

    /// Back up under the current time
    pub async fn run(&self) -> Result<BackupSummary> {
        self.run_at(Timestamp::now()).await
    }

    /// Back up under `timestamp`
    ///
    /// The latest pointer only moves once every object is written; on any
    /// failure it still names the previous backup.
    pub async fn run_at(&self, timestamp: Timestamp) -> Result<BackupSummary> {
        info!(
            "Starting backup {} from {}",
            timestamp,
            self.provider.provider_name()
        );

        let snapshot = SnapshotBuilder::new(self.provider.as_ref()).build().await?;
        self.store.put_snapshot(timestamp, &snapshot).await?;

        Ok(BackupSummary {
            timestamp,
            zones: snapshot.zones.len(),
            record_sets: snapshot.record_count(),
            health_checks: snapshot.health_checks.len(),
        })
    }
}
