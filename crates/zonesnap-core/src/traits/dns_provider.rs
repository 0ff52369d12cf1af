// # DNS Provider Capabilities
//
// Narrow interfaces over the hosted-zone provider API. Components take only
// the capabilities they need, so tests can substitute in-memory fakes.
//
// ## Implementations
//
// - Route 53: `zonesnap-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesnap_core::paginator::paginate;
//
// let zones = paginate("hosted zones", |cursor| provider.list_zones(cursor)).await?;
// ```

use async_trait::async_trait;

use crate::model::{
    CallerReference, HealthCheck, HealthCheckConfig, HostedZone, ResourceRecordSet, Tags, Vpc,
    ZoneConfig,
};
use crate::paginator::Page;
use crate::Result;

/// Continuation token of a hosted-zone listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneCursor {
    pub dns_name: String,
    pub hosted_zone_id: String,
}

/// Continuation token of a record-set listing
///
/// `identifier` is only set when the next record set carries a set
/// identifier (weighted, latency, failover... routing).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordCursor {
    pub name: String,
    pub record_type: String,
    pub identifier: Option<String>,
}

/// Result of a single-zone lookup
#[derive(Debug, Clone)]
pub struct ZoneLookup {
    pub zone: HostedZone,
    pub vpcs: Vec<Vpc>,
}

/// Parameters of a zone creation request
#[derive(Debug, Clone)]
pub struct ZoneCreation {
    pub name: String,
    pub config: ZoneConfig,
    /// Initial VPC association, required for private zones
    pub vpc: Option<Vpc>,
    pub caller_reference: CallerReference,
}

/// Listing and lookup of hosted zones
#[async_trait]
pub trait ZoneLister: Send + Sync {
    /// Fetch one page of hosted zones, starting at `cursor` (first page when `None`)
    async fn list_zones(&self, cursor: Option<ZoneCursor>) -> Result<Page<HostedZone, ZoneCursor>>;

    /// Look up a single zone with its VPC associations
    ///
    /// # Returns
    ///
    /// - `Err(Error::ResourceNotFound)`: the provider has no zone with this Id
    /// - `Err(_)`: any other failure
    async fn get_zone(&self, zone_id: &str) -> Result<ZoneLookup>;
}

/// Listing of the record sets in a zone
#[async_trait]
pub trait RecordLister: Send + Sync {
    async fn list_record_sets(
        &self,
        zone_id: &str,
        cursor: Option<RecordCursor>,
    ) -> Result<Page<ResourceRecordSet, RecordCursor>>;
}

/// Listing of health checks and their tags
#[async_trait]
pub trait HealthCheckLister: Send + Sync {
    /// Fetch one page of health checks, starting at `marker`
    async fn list_health_checks(&self, marker: Option<String>) -> Result<Page<HealthCheck, String>>;

    async fn list_health_check_tags(&self, health_check_id: &str) -> Result<Tags>;
}

/// Mutations on zones and record sets
///
/// Nothing here deletes: restores only add or overwrite.
#[async_trait]
pub trait ZoneWriter: Send + Sync {
    async fn create_zone(&self, request: &ZoneCreation) -> Result<HostedZone>;

    /// Submit `record_sets` as a single change batch of `UPSERT` changes
    async fn upsert_record_sets(
        &self,
        zone_id: &str,
        comment: &str,
        record_sets: &[ResourceRecordSet],
    ) -> Result<()>;
}

/// Mutations on health checks
#[async_trait]
pub trait HealthCheckWriter: Send + Sync {
    /// Create a health check; the provider assigns a new Id
    async fn create_health_check(
        &self,
        caller_reference: &CallerReference,
        config: &HealthCheckConfig,
    ) -> Result<HealthCheck>;

    async fn add_health_check_tags(&self, health_check_id: &str, tags: &Tags) -> Result<()>;
}

/// A full hosted-zone provider
///
/// # Trust Level: Untrusted
///
/// Providers perform single-shot API calls and return success or failure.
/// They do not retry, cache, or decide whether a change is needed: the
/// reconciler compares before it mutates.
pub trait DnsProvider:
    ZoneLister + RecordLister + HealthCheckLister + ZoneWriter + HealthCheckWriter
{
    /// A static string identifying the provider (e.g. "route53")
    fn provider_name(&self) -> &'static str;
}
