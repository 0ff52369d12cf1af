//! Health checks and their tags

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag set of a resource (key → value)
pub type Tags = BTreeMap<String, String>;

/// A health check as captured in a snapshot
///
/// The `id` is never reused on restore: the provider assigns a fresh one
/// to every created health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheck {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_reference: Option<String>,

    pub health_check_config: HealthCheckConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_version: Option<i64>,

    #[serde(default, with = "tag_list")]
    pub tags: Tags,
}

impl HealthCheck {
    pub fn new(id: impl Into<String>, config: HealthCheckConfig) -> Self {
        Self {
            id: id.into(),
            caller_reference: None,
            health_check_config: config,
            health_check_version: None,
            tags: Tags::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Health check configuration, carried through backup and restore verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheckConfig {
    #[serde(rename = "IPAddress", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    #[serde(rename = "Type")]
    pub check_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_interval: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_latency: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverted: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_threshold: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_health_checks: Vec<String>,

    #[serde(rename = "EnableSNI", default, skip_serializing_if = "Option::is_none")]
    pub enable_sni: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_identifier: Option<AlarmIdentifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insufficient_data_health_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_control_arn: Option<String>,
}

impl HealthCheckConfig {
    /// An HTTP(S)-style endpoint check against a domain name
    pub fn endpoint(check_type: impl Into<String>, fqdn: impl Into<String>, port: i32) -> Self {
        Self {
            ip_address: None,
            port: Some(port),
            check_type: check_type.into(),
            resource_path: None,
            fully_qualified_domain_name: Some(fqdn.into()),
            search_string: None,
            request_interval: Some(30),
            failure_threshold: Some(3),
            measure_latency: None,
            inverted: None,
            disabled: None,
            health_threshold: None,
            child_health_checks: Vec::new(),
            enable_sni: None,
            regions: Vec::new(),
            alarm_identifier: None,
            insufficient_data_health_status: None,
            routing_control_arn: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmIdentifier {
    pub region: String,
    pub name: String,
}

/// (De)serializes [`Tags`] as the provider's `[{"Key": .., "Value": ..}]` list
mod tag_list {
    use super::Tags;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct TagEntry {
        key: String,
        #[serde(default)]
        value: String,
    }

    pub fn serialize<S: Serializer>(tags: &Tags, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(tags.iter().map(|(key, value)| TagEntry {
            key: key.clone(),
            value: value.clone(),
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tags, D::Error> {
        let entries = Vec::<TagEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect())
    }
}
