//! Reconciliation-based restore
//!
//! The reconciler brings live provider state toward a stored snapshot:
//!
//! ```text
//! SnapshotStore ──load──▶ Reconciler ◀──list── DnsProvider
//!                              │
//!                              └──create / UPSERT / add tags──▶ DnsProvider
//! ```
//!
//! ## Rules
//!
//! 1. Never delete: live resources absent from the snapshot are left alone
//! 2. Never duplicate: compare before mutating
//!    - record sets are compared structurally (every field)
//!    - health checks are compared by Id only
//! 3. Dry run computes exactly the same deltas and skips every mutation
//!
//! ## Failure Policy
//!
//! Storage failures (missing pointer, missing snapshot objects) abort the
//! run. Provider failures affecting a single zone or health check are
//! logged and that resource is skipped.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::model::{HealthCheck, HostedZone, ResourceRecordSet, Timestamp, same_zone_name};
use crate::snapshot::{SnapshotBuilder, SnapshotStore};
use crate::traits::{DnsProvider, ZoneCreation};

/// Comment attached to every restore change batch
pub const RESTORE_CHANGE_COMMENT: &str = "Restored by zonesnap";

/// What to restore
///
/// Deserializes from the trigger payload:
///
/// ```json
/// {"from": "2024-01-01T00:00:00Z", "ids": ["/hostedzone/Z1"], "names": ["example.com."], "dryrun": true}
/// ```
///
/// `null` fields and a blank `from` count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRequest {
    /// Backup to restore; the latest one when absent
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<Timestamp>,

    /// Zone Ids to exclude
    #[serde(default, deserialize_with = "null_as_default")]
    pub ids: Vec<String>,

    /// Zone names to exclude (trailing `.` optional)
    #[serde(default, deserialize_with = "null_as_default")]
    pub names: Vec<String>,

    /// Compute deltas without applying them
    #[serde(default, deserialize_with = "null_as_default")]
    pub dryrun: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => text
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl RestoreRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_backup(mut self, timestamp: Timestamp) -> Self {
        self.from = Some(timestamp);
        self
    }

    pub fn exclude_id(mut self, zone_id: impl Into<String>) -> Self {
        self.ids.push(zone_id.into());
        self
    }

    pub fn exclude_name(mut self, zone_name: impl Into<String>) -> Self {
        self.names.push(zone_name.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dryrun = dry_run;
        self
    }
}

/// Outcome of a restore run
///
/// In dry-run mode the counts are candidate changes, otherwise applied ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreSummary {
    pub timestamp: Timestamp,
    /// Zones whose record delta was non-empty
    pub zones_restored: usize,
    /// Health checks missing live
    pub health_checks_restored: usize,
    pub dry_run: bool,
}

impl RestoreSummary {
    pub fn is_empty(&self) -> bool {
        self.zones_restored == 0 && self.health_checks_restored == 0
    }
}

impl fmt::Display for RestoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            f.write_str("[dry-run] ")?;
        }

        if self.is_empty() {
            return f.write_str("No zones or health checks needed to be restored");
        }

        let mut stats = Vec::new();
        if self.zones_restored > 0 {
            stats.push(format!("Zones: {}", self.zones_restored));
        }
        if self.health_checks_restored > 0 {
            stats.push(format!("Health checks: {}", self.health_checks_restored));
        }

        write!(f, "Restored from {} {}", self.timestamp, stats.join(" "))
    }
}

/// Drop zones matching either exclusion list
///
/// `ids` and `names` are independent: a zone is dropped when its Id is in
/// `ids` or its name is in `names`.
pub fn filter_zones(zones: Vec<HostedZone>, ids: &[String], names: &[String]) -> Vec<HostedZone> {
    zones
        .into_iter()
        .filter(|zone| !ids.iter().any(|id| *id == zone.id))
        .filter(|zone| !names.iter().any(|name| same_zone_name(name, &zone.name)))
        .collect()
}

/// Backed-up record sets with no structurally equal live counterpart
pub fn record_updates<'a>(
    backup: &'a [ResourceRecordSet],
    live: &[ResourceRecordSet],
) -> Vec<&'a ResourceRecordSet> {
    backup.iter().filter(|set| !live.contains(set)).collect()
}

/// Backed-up health checks whose Id is not live
pub fn health_check_inserts<'a>(
    backup: &'a [HealthCheck],
    live: &[HealthCheck],
) -> Vec<&'a HealthCheck> {
    let live_ids: HashSet<&str> = live.iter().map(|check| check.id.as_str()).collect();
    backup
        .iter()
        .filter(|check| !live_ids.contains(check.id.as_str()))
        .collect()
}

/// Where a backed-up zone's records go
enum ZoneTarget {
    /// Zone exists live (found by Id or just created)
    Live(HostedZone),
    /// Zone is missing and would be created (dry run only)
    Pending,
}

/// Restores snapshots into a provider
///
/// Concurrent restores against the same provider are not safe against each
/// other; callers must serialize them.
pub struct Reconciler {
    provider: Arc<dyn DnsProvider>,
    store: SnapshotStore,
}

impl Reconciler {
    pub fn new(provider: Arc<dyn DnsProvider>, store: SnapshotStore) -> Self {
        Self { provider, store }
    }

    /// Restore the backup selected by `request`
    pub async fn restore(&self, request: &RestoreRequest) -> Result<RestoreSummary> {
        let timestamp = match request.from {
            Some(timestamp) => timestamp,
            None => self.store.get_latest_timestamp().await?,
        };

        let zones = self.store.get_zones(timestamp).await?;
        let candidates = zones.len();
        let zones = filter_zones(zones, &request.ids, &request.names);

        info!(
            "Using backup taken at {} ({} of {} zone(s) selected){}",
            timestamp,
            zones.len(),
            candidates,
            if request.dryrun { " [DRY-RUN]" } else { "" }
        );

        let run_started = Timestamp::now();
        let zones_restored = self
            .restore_zones(timestamp, run_started, &zones, request.dryrun)
            .await?;
        let health_checks_restored = self
            .restore_health_checks(timestamp, run_started, request.dryrun)
            .await?;

        Ok(RestoreSummary {
            timestamp,
            zones_restored,
            health_checks_restored,
            dry_run: request.dryrun,
        })
    }

    /// Reconcile the record sets of each zone; returns how many zones had a delta
    ///
    /// `run_started` seeds the caller references of any zones created.
    pub async fn restore_zones(
        &self,
        timestamp: Timestamp,
        run_started: Timestamp,
        zones: &[HostedZone],
        dry_run: bool,
    ) -> Result<usize> {
        let mut restored = 0;

        for zone in zones {
            // Read the backup first: a missing object aborts before any mutation
            let backups = self.store.get_zone_records(timestamp, &zone.name).await?;

            let Some(target) = self.resolve_zone(zone, run_started, dry_run).await else {
                continue;
            };

            let current = match &target {
                ZoneTarget::Live(live) => {
                    match SnapshotBuilder::new(self.provider.as_ref())
                        .collect_record_sets(&live.id)
                        .await
                    {
                        Ok(sets) => sets,
                        Err(e) => {
                            error!("Failed to list record sets of zone {}: {}", zone.name, e);
                            continue;
                        }
                    }
                }
                ZoneTarget::Pending => Vec::new(),
            };

            let updates = record_updates(&backups, &current);
            if updates.is_empty() {
                debug!("Zone {} matches backup {}", zone.name, timestamp);
                continue;
            }

            match target {
                ZoneTarget::Live(live) if !dry_run => {
                    let batch: Vec<ResourceRecordSet> = updates.into_iter().cloned().collect();
                    if let Err(e) = self
                        .provider
                        .upsert_record_sets(&live.id, RESTORE_CHANGE_COMMENT, &batch)
                        .await
                    {
                        error!("Failed to restore record sets of zone {}: {}", zone.name, e);
                        continue;
                    }
                    info!(
                        "Restored zone {} from {} ({} record set(s))",
                        zone.name,
                        timestamp,
                        batch.len()
                    );
                }
                _ => {
                    info!(
                        "[DRY-RUN] Would restore {} record set(s) in zone {}",
                        updates.len(),
                        zone.name
                    );
                }
            }

            restored += 1;
        }

        Ok(restored)
    }

    /// Find the live counterpart of a backed-up zone, creating it if missing
    ///
    /// Returns `None` when the zone must be skipped.
    async fn resolve_zone(
        &self,
        zone: &HostedZone,
        run_started: Timestamp,
        dry_run: bool,
    ) -> Option<ZoneTarget> {
        match self.provider.get_zone(&zone.id).await {
            Ok(lookup) if lookup.zone.matches_identity(zone) => Some(ZoneTarget::Live(lookup.zone)),
            Ok(lookup) => {
                warn!(
                    "Live zone {} is {} (private: {}) but backup has {} (private: {}), skipping",
                    zone.id,
                    lookup.zone.name,
                    lookup.zone.is_private(),
                    zone.name,
                    zone.is_private()
                );
                None
            }
            Err(e) if e.is_resource_not_found() => {
                if dry_run {
                    info!("[DRY-RUN] Would create zone {} ({})", zone.name, zone.id);
                    return Some(ZoneTarget::Pending);
                }

                match self.create_zone(zone, run_started).await {
                    Ok(created) => Some(ZoneTarget::Live(created)),
                    Err(e) => {
                        error!("Failed to recreate zone {}: {}", zone.name, e);
                        None
                    }
                }
            }
            Err(e) => {
                error!("Failed to look up zone {}: {}", zone.id, e);
                None
            }
        }
    }

    /// Recreate a zone with the backed-up name and config
    ///
    /// Private zones are attached to the first backed-up VPC only.
    async fn create_zone(&self, zone: &HostedZone, run_started: Timestamp) -> Result<HostedZone> {
        let request = ZoneCreation {
            name: zone.name.clone(),
            config: zone.config.clone(),
            vpc: if zone.is_private() {
                zone.vpcs.first().cloned()
            } else {
                None
            },
            caller_reference: run_started.caller_reference(&zone.id),
        };

        let created = self.provider.create_zone(&request).await?;
        info!("Restored the zone {} as {}", zone.id, created.id);
        Ok(created)
    }

    /// Recreate health checks missing live; returns how many were (or would be) created
    pub async fn restore_health_checks(
        &self,
        timestamp: Timestamp,
        run_started: Timestamp,
        dry_run: bool,
    ) -> Result<usize> {
        let backups = self.store.get_health_checks(timestamp).await?;
        let current = SnapshotBuilder::new(self.provider.as_ref())
            .collect_health_checks()
            .await?;

        let inserts = health_check_inserts(&backups, &current);
        let mut restored = 0;

        for check in inserts {
            if dry_run {
                info!("[DRY-RUN] Would restore health check {}", check.id);
                restored += 1;
                continue;
            }

            let caller_reference = run_started.caller_reference(&check.id);
            let created = match self
                .provider
                .create_health_check(&caller_reference, &check.health_check_config)
                .await
            {
                Ok(created) => created,
                Err(e) => {
                    error!("Failed to restore health check {}: {}", check.id, e);
                    continue;
                }
            };

            if !check.tags.is_empty() {
                if let Err(e) = self
                    .provider
                    .add_health_check_tags(&created.id, &check.tags)
                    .await
                {
                    error!(
                        "Restored health check {} as {} but failed to tag it: {}",
                        check.id, created.id, e
                    );
                }
            }

            info!(
                "Restored health check {} as {} from {}",
                check.id, created.id, timestamp
            );
            restored += 1;
        }

        Ok(restored)
    }
}
