// # Route 53 Provider
//
// Amazon Route 53 implementation of the zonesnap provider capabilities.
//
// ## Behaviour
//
// - One API call per trait method: pagination is driven by the caller
// - Errors are propagated, never retried (the SDK's own retry policy applies)
// - No state kept between calls
// - No deletes: record changes are submitted as `UPSERT` only
//
// ## API Reference
//
// - ListHostedZonesByName / GetHostedZone / CreateHostedZone
// - ListResourceRecordSets / ChangeResourceRecordSets
// - ListHealthChecks / CreateHealthCheck
// - ListTagsForResource / ChangeTagsForResource (resource type `healthcheck`)

pub mod convert;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types::{Change, ChangeAction, ChangeBatch, RrType, TagResourceType};
use tracing::debug;
use zonesnap_core::model::{
    CallerReference, HealthCheck, HealthCheckConfig, HostedZone, ResourceRecordSet, Tags,
};
use zonesnap_core::paginator::Page;
use zonesnap_core::traits::{
    DnsProvider, HealthCheckLister, HealthCheckWriter, RecordCursor, RecordLister, ZoneCreation,
    ZoneCursor, ZoneLister, ZoneLookup, ZoneWriter,
};
use zonesnap_core::{Error, Result};

use crate::convert::{
    bare_id, health_check_config_to_sdk, health_check_from_sdk, record_set_from_sdk,
    record_set_to_sdk, tags_from_sdk, tags_to_sdk, vpc_from_sdk, vpc_to_sdk, zone_config_to_sdk,
    zone_from_sdk,
};

/// Provider name used in errors and logs
pub const PROVIDER_NAME: &str = "route53";

/// Map an SDK failure to a provider error, keeping the full error chain
fn api_error<E, R>(operation: &str, err: SdkError<E, R>) -> Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let code = err
        .as_service_error()
        .and_then(|service| service.code())
        .unwrap_or("Unknown")
        .to_string();

    Error::provider(
        PROVIDER_NAME,
        format!("{} failed ({}): {}", operation, code, DisplayErrorContext(err)),
    )
}

/// Route 53 provider
///
/// Route 53 is a global service: the region of the SDK configuration only
/// selects the signing region.
#[derive(Debug, Clone)]
pub struct Route53Provider {
    client: Client,
}

impl Route53Provider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a provider from a loaded AWS configuration
    pub fn from_conf(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl ZoneLister for Route53Provider {
    async fn list_zones(&self, cursor: Option<ZoneCursor>) -> Result<Page<HostedZone, ZoneCursor>> {
        let (dns_name, hosted_zone_id) = match cursor {
            Some(cursor) => (Some(cursor.dns_name), Some(cursor.hosted_zone_id)),
            None => (None, None),
        };

        let output = self
            .client
            .list_hosted_zones_by_name()
            .set_dns_name(dns_name)
            .set_hosted_zone_id(hosted_zone_id)
            .send()
            .await
            .map_err(|e| api_error("ListHostedZonesByName", e))?;

        let zones: Vec<HostedZone> = output.hosted_zones().iter().map(zone_from_sdk).collect();
        debug!("ListHostedZonesByName returned {} zone(s)", zones.len());

        if !output.is_truncated() {
            return Ok(Page::last(zones));
        }

        // A truncated page without both cursor halves is reported to the paginator
        let next = match (output.next_dns_name(), output.next_hosted_zone_id()) {
            (Some(dns_name), Some(hosted_zone_id)) => Some(ZoneCursor {
                dns_name: dns_name.to_string(),
                hosted_zone_id: hosted_zone_id.to_string(),
            }),
            _ => None,
        };

        Ok(Page {
            items: zones,
            is_truncated: true,
            next,
        })
    }

    async fn get_zone(&self, zone_id: &str) -> Result<ZoneLookup> {
        let output = match self
            .client
            .get_hosted_zone()
            .id(bare_id(zone_id))
            .send()
            .await
        {
            Ok(output) => output,
            Err(e)
                if e.as_service_error()
                    .is_some_and(|service| service.is_no_such_hosted_zone()) =>
            {
                return Err(Error::resource_not_found(format!(
                    "No hosted zone with Id {}",
                    zone_id
                )));
            }
            Err(e) => return Err(api_error("GetHostedZone", e)),
        };

        let zone: Option<&aws_sdk_route53::types::HostedZone> = output.hosted_zone().into();
        let zone = zone.ok_or_else(|| {
            Error::provider(
                PROVIDER_NAME,
                format!("GetHostedZone returned no zone for {}", zone_id),
            )
        })?;

        Ok(ZoneLookup {
            zone: zone_from_sdk(zone),
            vpcs: output.vpcs().iter().map(vpc_from_sdk).collect(),
        })
    }
}

#[async_trait]
impl RecordLister for Route53Provider {
    async fn list_record_sets(
        &self,
        zone_id: &str,
        cursor: Option<RecordCursor>,
    ) -> Result<Page<ResourceRecordSet, RecordCursor>> {
        let mut request = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(bare_id(zone_id));

        if let Some(cursor) = cursor {
            request = request
                .start_record_name(cursor.name)
                .start_record_type(RrType::from(cursor.record_type.as_str()))
                .set_start_record_identifier(cursor.identifier);
        }

        let output = match request.send().await {
            Ok(output) => output,
            Err(e)
                if e.as_service_error()
                    .is_some_and(|service| service.is_no_such_hosted_zone()) =>
            {
                return Err(Error::resource_not_found(format!(
                    "No hosted zone with Id {}",
                    zone_id
                )));
            }
            Err(e) => return Err(api_error("ListResourceRecordSets", e)),
        };

        let sets: Vec<ResourceRecordSet> = output
            .resource_record_sets()
            .iter()
            .map(record_set_from_sdk)
            .collect();
        debug!(
            "ListResourceRecordSets returned {} record set(s) for {}",
            sets.len(),
            zone_id
        );

        if !output.is_truncated() {
            return Ok(Page::last(sets));
        }

        let next = match (output.next_record_name(), output.next_record_type()) {
            (Some(name), Some(record_type)) => Some(RecordCursor {
                name: name.to_string(),
                record_type: record_type.as_str().to_string(),
                identifier: output.next_record_identifier().map(str::to_string),
            }),
            _ => None,
        };

        Ok(Page {
            items: sets,
            is_truncated: true,
            next,
        })
    }
}

#[async_trait]
impl HealthCheckLister for Route53Provider {
    async fn list_health_checks(&self, marker: Option<String>) -> Result<Page<HealthCheck, String>> {
        let output = self
            .client
            .list_health_checks()
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| api_error("ListHealthChecks", e))?;

        let checks = output
            .health_checks()
            .iter()
            .map(health_check_from_sdk)
            .collect::<Result<Vec<_>>>()?;

        if !output.is_truncated() {
            return Ok(Page::last(checks));
        }

        Ok(Page {
            items: checks,
            is_truncated: true,
            next: output.next_marker().map(str::to_string),
        })
    }

    async fn list_health_check_tags(&self, health_check_id: &str) -> Result<Tags> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_type(TagResourceType::Healthcheck)
            .resource_id(health_check_id)
            .send()
            .await
            .map_err(|e| api_error("ListTagsForResource", e))?;

        let tag_set: Option<&aws_sdk_route53::types::ResourceTagSet> =
            output.resource_tag_set().into();
        Ok(tag_set
            .map(|set| tags_from_sdk(set.tags()))
            .unwrap_or_default())
    }
}

#[async_trait]
impl ZoneWriter for Route53Provider {
    async fn create_zone(&self, request: &ZoneCreation) -> Result<HostedZone> {
        let output = self
            .client
            .create_hosted_zone()
            .name(&request.name)
            .caller_reference(request.caller_reference.as_str())
            .hosted_zone_config(zone_config_to_sdk(&request.config))
            .set_vpc(request.vpc.as_ref().map(vpc_to_sdk))
            .send()
            .await
            .map_err(|e| api_error("CreateHostedZone", e))?;

        let zone: Option<&aws_sdk_route53::types::HostedZone> = output.hosted_zone().into();
        zone.map(zone_from_sdk).ok_or_else(|| {
            Error::provider(
                PROVIDER_NAME,
                format!("CreateHostedZone returned no zone for {}", request.name),
            )
        })
    }

    async fn upsert_record_sets(
        &self,
        zone_id: &str,
        comment: &str,
        record_sets: &[ResourceRecordSet],
    ) -> Result<()> {
        let changes = record_sets
            .iter()
            .map(|set| {
                Change::builder()
                    .action(ChangeAction::Upsert)
                    .resource_record_set(record_set_to_sdk(set)?)
                    .build()
                    .map_err(|e| Error::invalid_input(format!("Cannot build change: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = ChangeBatch::builder()
            .comment(comment)
            .set_changes(Some(changes))
            .build()
            .map_err(|e| Error::invalid_input(format!("Cannot build change batch: {}", e)))?;

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(bare_id(zone_id))
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| api_error("ChangeResourceRecordSets", e))?;

        Ok(())
    }
}

#[async_trait]
impl HealthCheckWriter for Route53Provider {
    async fn create_health_check(
        &self,
        caller_reference: &CallerReference,
        config: &HealthCheckConfig,
    ) -> Result<HealthCheck> {
        let output = self
            .client
            .create_health_check()
            .caller_reference(caller_reference.as_str())
            .health_check_config(health_check_config_to_sdk(config)?)
            .send()
            .await
            .map_err(|e| api_error("CreateHealthCheck", e))?;

        let created: Option<&aws_sdk_route53::types::HealthCheck> = output.health_check().into();
        let created = created.ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "CreateHealthCheck returned no health check")
        })?;

        health_check_from_sdk(created)
    }

    async fn add_health_check_tags(&self, health_check_id: &str, tags: &Tags) -> Result<()> {
        self.client
            .change_tags_for_resource()
            .resource_type(TagResourceType::Healthcheck)
            .resource_id(health_check_id)
            .set_add_tags(Some(tags_to_sdk(tags)))
            .send()
            .await
            .map_err(|e| api_error("ChangeTagsForResource", e))?;

        Ok(())
    }
}

impl DnsProvider for Route53Provider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
