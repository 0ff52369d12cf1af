//! Hosted zones and their VPC associations

use serde::{Deserialize, Serialize};

/// A hosted zone as captured in a snapshot
///
/// Field names follow the provider's wire shape so that `zones.json`
/// objects stay readable by other tooling that uses the same layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZone {
    /// Provider-assigned identifier (e.g. `/hostedzone/Z123`)
    pub id: String,

    /// DNS name, with the provider's trailing `.`
    pub name: String,

    /// Zone configuration
    pub config: ZoneConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_record_set_count: Option<i64>,

    /// VPC associations, only populated for private zones
    #[serde(rename = "VPCs", default, skip_serializing_if = "Vec::is_empty")]
    pub vpcs: Vec<Vpc>,
}

impl HostedZone {
    /// Create a public zone
    pub fn public(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            config: ZoneConfig::default(),
            caller_reference: None,
            resource_record_set_count: None,
            vpcs: Vec::new(),
        }
    }

    /// Create a private zone associated with the given VPCs
    pub fn private(id: impl Into<String>, name: impl Into<String>, vpcs: Vec<Vpc>) -> Self {
        Self {
            config: ZoneConfig {
                comment: None,
                private_zone: true,
            },
            vpcs,
            ..Self::public(id, name)
        }
    }

    pub fn is_private(&self) -> bool {
        self.config.private_zone
    }

    /// Whether `other` is the same logical zone: same name and same visibility
    ///
    /// Record reconciliation only proceeds against a live zone for which
    /// this holds.
    pub fn matches_identity(&self, other: &HostedZone) -> bool {
        same_zone_name(&self.name, &other.name) && self.is_private() == other.is_private()
    }
}

/// Hosted zone configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default)]
    pub private_zone: bool,
}

/// A VPC association of a private hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    #[serde(rename = "VPCRegion", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(rename = "VPCId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Vpc {
    pub fn new(region: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            id: Some(id.into()),
        }
    }
}

/// Compare two DNS names, ignoring a trailing `.` and ASCII case
pub fn same_zone_name(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}
