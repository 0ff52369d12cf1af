//! Assembles a [`Snapshot`] from live provider state
//!
//! Any failed call aborts the whole build: a snapshot is only useful if it
//! is self-consistent, so no partial result is ever returned.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{HealthCheck, HostedZone, ResourceRecordSet, Snapshot};
use crate::paginator::paginate;
use crate::traits::{HealthCheckLister, RecordLister, ZoneLister};

/// Read-only view of a provider that builds snapshots
///
/// Generic over the provider so it works with both concrete providers and
/// `dyn DnsProvider`.
pub struct SnapshotBuilder<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P> SnapshotBuilder<'a, P>
where
    P: ZoneLister + RecordLister + HealthCheckLister + ?Sized,
{
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Capture zones, their record sets, and tagged health checks
    pub async fn build(&self) -> Result<Snapshot> {
        let zones = self.collect_zones().await?;

        let mut records = BTreeMap::new();
        for zone in &zones {
            let sets = self.collect_record_sets(&zone.id).await?;
            debug!("Zone {} has {} record set(s)", zone.name, sets.len());
            records.insert(zone.id.clone(), sets);
        }

        let health_checks = self.collect_tagged_health_checks().await?;

        info!(
            "Captured {} zone(s), {} record set(s), {} health check(s)",
            zones.len(),
            records.values().map(Vec::len).sum::<usize>(),
            health_checks.len()
        );

        Ok(Snapshot {
            zones,
            records,
            health_checks,
        })
    }

    /// All hosted zones; private zones get their VPC associations attached
    pub async fn collect_zones(&self) -> Result<Vec<HostedZone>> {
        let provider = self.provider;
        let mut zones = paginate("hosted zones", move |cursor| provider.list_zones(cursor)).await?;

        for zone in zones.iter_mut().filter(|zone| zone.is_private()) {
            let lookup = provider.get_zone(&zone.id).await?;
            zone.vpcs = lookup.vpcs;
        }

        Ok(zones)
    }

    /// All record sets of one zone, in provider order
    pub async fn collect_record_sets(&self, zone_id: &str) -> Result<Vec<ResourceRecordSet>> {
        let provider = self.provider;
        paginate("record sets", move |cursor| {
            provider.list_record_sets(zone_id, cursor)
        })
        .await
    }

    /// All health checks, without tags
    pub async fn collect_health_checks(&self) -> Result<Vec<HealthCheck>> {
        let provider = self.provider;
        paginate("health checks", move |marker| {
            provider.list_health_checks(marker)
        })
        .await
    }

    /// All health checks with their tag sets attached
    pub async fn collect_tagged_health_checks(&self) -> Result<Vec<HealthCheck>> {
        let mut health_checks = self.collect_health_checks().await?;

        for check in health_checks.iter_mut() {
            check.tags = self.provider.list_health_check_tags(&check.id).await?;
        }

        Ok(health_checks)
    }
}
