//! Resource record sets
//!
//! A record set has no identifier of its own. It is addressed by
//! (zone, name, type[, set identifier]) but compared structurally: two
//! record sets are the same only when every stored field matches.

use serde::{Deserialize, Serialize};

/// A resource record set as captured in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecordSet {
    pub name: String,

    #[serde(rename = "Type")]
    pub record_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_answer: Option<bool>,

    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_records: Vec<ResourceRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_policy_instance_id: Option<String>,
}

impl ResourceRecordSet {
    /// Create a basic (simple routing) record set
    pub fn simple<I, V>(name: impl Into<String>, record_type: impl Into<String>, ttl: i64, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            set_identifier: None,
            weight: None,
            region: None,
            geo_location: None,
            failover: None,
            multi_value_answer: None,
            ttl: Some(ttl),
            resource_records: values
                .into_iter()
                .map(|value| ResourceRecord { value: value.into() })
                .collect(),
            alias_target: None,
            health_check_id: None,
            traffic_policy_instance_id: None,
        }
    }

    /// Create an alias record set
    pub fn alias(name: impl Into<String>, record_type: impl Into<String>, target: AliasTarget) -> Self {
        Self {
            ttl: None,
            alias_target: Some(target),
            ..Self::simple(name, record_type, 0, Vec::<String>::new())
        }
    }

    /// The (name, type, set identifier) tuple addressing this record set in its zone
    pub fn key(&self) -> (&str, &str, Option<&str>) {
        (
            &self.name,
            &self.record_type,
            self.set_identifier.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasTarget {
    pub hosted_zone_id: String,

    #[serde(rename = "DNSName")]
    pub dns_name: String,

    #[serde(default)]
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeoLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,
}
