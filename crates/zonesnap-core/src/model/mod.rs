//! Snapshot data model
//!
//! - [`HostedZone`]: DNS namespace, with VPC associations when private
//! - [`ResourceRecordSet`]: records of one zone, compared structurally
//! - [`HealthCheck`]: endpoint monitor with its tags
//! - [`Snapshot`]: the three collections captured by one backup run

pub mod health_check;
pub mod record;
pub mod timestamp;
pub mod zone;

pub use health_check::{AlarmIdentifier, HealthCheck, HealthCheckConfig, Tags};
pub use record::{AliasTarget, GeoLocation, ResourceRecord, ResourceRecordSet};
pub use timestamp::{CallerReference, TIMESTAMP_FORMAT, Timestamp};
pub use zone::{HostedZone, Vpc, ZoneConfig, same_zone_name};

use std::collections::BTreeMap;

/// Complete captured state of the provider at one point in time
///
/// Immutable once written: later backups supersede it under a new
/// timestamp, nothing ever rewrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Hosted zones, with VPCs attached for private zones
    pub zones: Vec<HostedZone>,

    /// Record sets keyed by zone Id, in provider page order
    pub records: BTreeMap<String, Vec<ResourceRecordSet>>,

    /// Health checks, with tags attached
    pub health_checks: Vec<HealthCheck>,
}

impl Snapshot {
    /// Record sets captured for the given zone
    pub fn records_for(&self, zone_id: &str) -> &[ResourceRecordSet] {
        self.records.get(zone_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of record sets across all zones
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}
