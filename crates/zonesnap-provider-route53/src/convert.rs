//! Conversions between Route 53 SDK shapes and the snapshot model
//!
//! Enumerations travel as their wire strings, so values the SDK does not
//! know yet survive a backup/restore cycle unchanged.

use aws_sdk_route53::error::BuildError;
use aws_sdk_route53::types;
use zonesnap_core::model::{
    AlarmIdentifier, AliasTarget, GeoLocation, HealthCheck, HealthCheckConfig, HostedZone,
    ResourceRecord, ResourceRecordSet, Tags, Vpc, ZoneConfig,
};
use zonesnap_core::{Error, Result};

fn invalid(what: &str, err: BuildError) -> Error {
    Error::invalid_input(format!("Cannot build {}: {}", what, err))
}

/// Strip the `/hostedzone/` style prefix from a resource Id
pub fn bare_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

pub fn zone_from_sdk(zone: &types::HostedZone) -> HostedZone {
    let config = zone
        .config()
        .map(|config| ZoneConfig {
            comment: config.comment().map(str::to_string),
            private_zone: config.private_zone(),
        })
        .unwrap_or_default();

    HostedZone {
        id: zone.id().to_string(),
        name: zone.name().to_string(),
        config,
        caller_reference: Some(zone.caller_reference().to_string()),
        resource_record_set_count: zone.resource_record_set_count(),
        vpcs: Vec::new(),
    }
}

pub fn zone_config_to_sdk(config: &ZoneConfig) -> types::HostedZoneConfig {
    types::HostedZoneConfig::builder()
        .set_comment(config.comment.clone())
        .private_zone(config.private_zone)
        .build()
}

pub fn vpc_from_sdk(vpc: &types::Vpc) -> Vpc {
    Vpc {
        region: vpc.vpc_region().map(|region| region.as_str().to_string()),
        id: vpc.vpc_id().map(str::to_string),
    }
}

pub fn vpc_to_sdk(vpc: &Vpc) -> types::Vpc {
    types::Vpc::builder()
        .set_vpc_region(vpc.region.as_deref().map(types::VpcRegion::from))
        .set_vpc_id(vpc.id.clone())
        .build()
}

pub fn record_set_from_sdk(set: &types::ResourceRecordSet) -> ResourceRecordSet {
    ResourceRecordSet {
        name: set.name().to_string(),
        record_type: set.r#type().as_str().to_string(),
        set_identifier: set.set_identifier().map(str::to_string),
        weight: set.weight(),
        region: set.region().map(|region| region.as_str().to_string()),
        geo_location: set.geo_location().map(|geo| GeoLocation {
            continent_code: geo.continent_code().map(str::to_string),
            country_code: geo.country_code().map(str::to_string),
            subdivision_code: geo.subdivision_code().map(str::to_string),
        }),
        failover: set.failover().map(|failover| failover.as_str().to_string()),
        multi_value_answer: set.multi_value_answer(),
        ttl: set.ttl(),
        resource_records: set
            .resource_records()
            .iter()
            .map(|record| ResourceRecord {
                value: record.value().to_string(),
            })
            .collect(),
        alias_target: set.alias_target().map(|alias| AliasTarget {
            hosted_zone_id: alias.hosted_zone_id().to_string(),
            dns_name: alias.dns_name().to_string(),
            evaluate_target_health: alias.evaluate_target_health(),
        }),
        health_check_id: set.health_check_id().map(str::to_string),
        traffic_policy_instance_id: set.traffic_policy_instance_id().map(str::to_string),
    }
}

pub fn record_set_to_sdk(set: &ResourceRecordSet) -> Result<types::ResourceRecordSet> {
    let resource_records = if set.resource_records.is_empty() {
        None
    } else {
        Some(
            set.resource_records
                .iter()
                .map(|record| {
                    types::ResourceRecord::builder()
                        .value(&record.value)
                        .build()
                        .map_err(|e| invalid("resource record", e))
                })
                .collect::<Result<Vec<_>>>()?,
        )
    };

    let alias_target = set
        .alias_target
        .as_ref()
        .map(|alias| {
            types::AliasTarget::builder()
                .hosted_zone_id(&alias.hosted_zone_id)
                .dns_name(&alias.dns_name)
                .evaluate_target_health(alias.evaluate_target_health)
                .build()
                .map_err(|e| invalid("alias target", e))
        })
        .transpose()?;

    let geo_location = set.geo_location.as_ref().map(|geo| {
        types::GeoLocation::builder()
            .set_continent_code(geo.continent_code.clone())
            .set_country_code(geo.country_code.clone())
            .set_subdivision_code(geo.subdivision_code.clone())
            .build()
    });

    types::ResourceRecordSet::builder()
        .name(&set.name)
        .r#type(types::RrType::from(set.record_type.as_str()))
        .set_set_identifier(set.set_identifier.clone())
        .set_weight(set.weight)
        .set_region(
            set.region
                .as_deref()
                .map(types::ResourceRecordSetRegion::from),
        )
        .set_geo_location(geo_location)
        .set_failover(
            set.failover
                .as_deref()
                .map(types::ResourceRecordSetFailover::from),
        )
        .set_multi_value_answer(set.multi_value_answer)
        .set_ttl(set.ttl)
        .set_resource_records(resource_records)
        .set_alias_target(alias_target)
        .set_health_check_id(set.health_check_id.clone())
        .set_traffic_policy_instance_id(set.traffic_policy_instance_id.clone())
        .build()
        .map_err(|e| invalid(&format!("record set {}", set.name), e))
}

pub fn health_check_from_sdk(check: &types::HealthCheck) -> Result<HealthCheck> {
    let config: Option<&types::HealthCheckConfig> = check.health_check_config().into();
    let config = config.ok_or_else(|| {
        Error::provider(
            crate::PROVIDER_NAME,
            format!("Health check {} has no configuration", check.id()),
        )
    })?;

    Ok(HealthCheck {
        id: check.id().to_string(),
        caller_reference: Some(check.caller_reference().to_string()),
        health_check_config: health_check_config_from_sdk(config),
        health_check_version: check.health_check_version().into(),
        tags: Tags::new(),
    })
}

pub fn health_check_config_from_sdk(config: &types::HealthCheckConfig) -> HealthCheckConfig {
    HealthCheckConfig {
        ip_address: config.ip_address().map(str::to_string),
        port: config.port(),
        check_type: config.r#type().as_str().to_string(),
        resource_path: config.resource_path().map(str::to_string),
        fully_qualified_domain_name: config.fully_qualified_domain_name().map(str::to_string),
        search_string: config.search_string().map(str::to_string),
        request_interval: config.request_interval(),
        failure_threshold: config.failure_threshold(),
        measure_latency: config.measure_latency(),
        inverted: config.inverted(),
        disabled: config.disabled(),
        health_threshold: config.health_threshold(),
        child_health_checks: config.child_health_checks().to_vec(),
        enable_sni: config.enable_sni(),
        regions: config
            .regions()
            .iter()
            .map(|region| region.as_str().to_string())
            .collect(),
        alarm_identifier: config.alarm_identifier().map(|alarm| AlarmIdentifier {
            region: alarm.region().as_str().to_string(),
            name: alarm.name().to_string(),
        }),
        insufficient_data_health_status: config
            .insufficient_data_health_status()
            .map(|status| status.as_str().to_string()),
        routing_control_arn: config.routing_control_arn().map(str::to_string),
    }
}

pub fn health_check_config_to_sdk(config: &HealthCheckConfig) -> Result<types::HealthCheckConfig> {
    let alarm_identifier = config
        .alarm_identifier
        .as_ref()
        .map(|alarm| {
            types::AlarmIdentifier::builder()
                .region(types::CloudWatchRegion::from(alarm.region.as_str()))
                .name(&alarm.name)
                .build()
                .map_err(|e| invalid("alarm identifier", e))
        })
        .transpose()?;

    let child_health_checks =
        (!config.child_health_checks.is_empty()).then(|| config.child_health_checks.clone());
    let regions = (!config.regions.is_empty()).then(|| {
        config
            .regions
            .iter()
            .map(|region| types::HealthCheckRegion::from(region.as_str()))
            .collect()
    });

    types::HealthCheckConfig::builder()
        .set_ip_address(config.ip_address.clone())
        .set_port(config.port)
        .r#type(types::HealthCheckType::from(config.check_type.as_str()))
        .set_resource_path(config.resource_path.clone())
        .set_fully_qualified_domain_name(config.fully_qualified_domain_name.clone())
        .set_search_string(config.search_string.clone())
        .set_request_interval(config.request_interval)
        .set_failure_threshold(config.failure_threshold)
        .set_measure_latency(config.measure_latency)
        .set_inverted(config.inverted)
        .set_disabled(config.disabled)
        .set_health_threshold(config.health_threshold)
        .set_child_health_checks(child_health_checks)
        .set_enable_sni(config.enable_sni)
        .set_regions(regions)
        .set_alarm_identifier(alarm_identifier)
        .set_insufficient_data_health_status(
            config
                .insufficient_data_health_status
                .as_deref()
                .map(types::InsufficientDataHealthStatus::from),
        )
        .set_routing_control_arn(config.routing_control_arn.clone())
        .build()
        .map_err(|e| invalid("health check config", e))
}

pub fn tags_from_sdk(tags: &[types::Tag]) -> Tags {
    tags.iter()
        .filter_map(|tag| {
            let key = tag.key()?;
            Some((key.to_string(), tag.value().unwrap_or_default().to_string()))
        })
        .collect()
}

pub fn tags_to_sdk(tags: &Tags) -> Vec<types::Tag> {
    tags.iter()
        .map(|(key, value)| types::Tag::builder().key(key).value(value).build())
        .collect()
}
