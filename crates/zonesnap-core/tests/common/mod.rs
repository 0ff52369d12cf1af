//! Test doubles and common utilities for contract tests
//!
//! [`FakeProvider`] keeps provider state in memory, serves it in small pages
//! so that every listing is truncated at least once, and records every
//! mutation so tests can assert on what a restore actually did.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonesnap_core::MemoryBlobStore;
use zonesnap_core::SnapshotStore;
use zonesnap_core::error::{Error, Result};
use zonesnap_core::model::{
    CallerReference, HealthCheck, HealthCheckConfig, HostedZone, ResourceRecordSet, Tags, Timestamp,
    Vpc,
};
use zonesnap_core::paginator::Page;
use zonesnap_core::traits::{
    DnsProvider, HealthCheckLister, HealthCheckWriter, RecordCursor, RecordLister, ZoneCreation,
    ZoneCursor, ZoneLister, ZoneLookup, ZoneWriter,
};

/// A zone held by the fake, with its live record sets
#[derive(Debug, Clone)]
struct FakeZone {
    zone: HostedZone,
    records: Vec<ResourceRecordSet>,
}

/// A change batch received by the fake
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertCall {
    pub zone_id: String,
    pub comment: String,
    pub record_sets: Vec<ResourceRecordSet>,
}

#[derive(Debug, Default)]
struct FakeState {
    zones: Vec<FakeZone>,
    health_checks: Vec<HealthCheck>,
    next_id: usize,
    zone_creations: Vec<ZoneCreation>,
    upserts: Vec<UpsertCall>,
    health_check_creations: Vec<(CallerReference, HealthCheckConfig)>,
    tag_calls: Vec<(String, Tags)>,
    list_calls: usize,
    failing_lookups: HashSet<String>,
    failing_upserts: HashSet<String>,
    fail_tag_listing: bool,
    fail_health_check_create: bool,
    fail_tagging: bool,
    zone_pager: PagerFault,
}

/// Misbehaviour of the hosted-zone pager
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PagerFault {
    #[default]
    None,
    /// Every page is truncated and points back at the first zone
    Loop,
    /// Every page is truncated without a cursor
    MissingCursor,
}

/// In-memory hosted-zone provider
///
/// Cloning shares state, so a test can hand one clone to the component under
/// test and inspect calls through another.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
    page_size: usize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::with_page_size(2)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            page_size: page_size.max(1),
        }
    }

    pub fn add_zone(&self, zone: HostedZone, records: Vec<ResourceRecordSet>) {
        self.state.lock().unwrap().zones.push(FakeZone { zone, records });
    }

    pub fn add_health_check(&self, check: HealthCheck) {
        self.state.lock().unwrap().health_checks.push(check);
    }

    /// Delete a zone behind the backup's back
    pub fn drop_zone(&self, zone_id: &str) {
        self.state
            .lock()
            .unwrap()
            .zones
            .retain(|fake| fake.zone.id != zone_id);
    }

    pub fn set_records(&self, zone_id: &str, records: Vec<ResourceRecordSet>) {
        let mut state = self.state.lock().unwrap();
        if let Some(fake) = state.zones.iter_mut().find(|fake| fake.zone.id == zone_id) {
            fake.records = records;
        }
    }

    pub fn drop_health_check(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .health_checks
            .retain(|check| check.id != id);
    }

    /// Make `get_zone` fail with a provider error for this Id
    pub fn fail_lookup(&self, zone_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_lookups
            .insert(zone_id.to_string());
    }

    /// Make `upsert_record_sets` fail for this zone Id
    pub fn fail_upsert(&self, zone_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_upserts
            .insert(zone_id.to_string());
    }

    pub fn fail_health_check_create(&self) {
        self.state.lock().unwrap().fail_health_check_create = true;
    }

    /// Make `add_health_check_tags` fail; creation itself still succeeds
    pub fn fail_tagging(&self) {
        self.state.lock().unwrap().fail_tagging = true;
    }

    pub fn set_zone_pager_fault(&self, fault: PagerFault) {
        self.state.lock().unwrap().zone_pager = fault;
    }

    pub fn fail_tag_listing(&self) {
        self.state.lock().unwrap().fail_tag_listing = true;
    }

    pub fn zones(&self) -> Vec<HostedZone> {
        let state = self.state.lock().unwrap();
        state.zones.iter().map(|fake| fake.zone.clone()).collect()
    }

    pub fn zone_named(&self, name: &str) -> Vec<HostedZone> {
        self.zones()
            .into_iter()
            .filter(|zone| zone.name == name)
            .collect()
    }

    pub fn records(&self, zone_id: &str) -> Vec<ResourceRecordSet> {
        let state = self.state.lock().unwrap();
        state
            .zones
            .iter()
            .find(|fake| fake.zone.id == zone_id)
            .map(|fake| fake.records.clone())
            .unwrap_or_default()
    }

    pub fn health_checks(&self) -> Vec<HealthCheck> {
        self.state.lock().unwrap().health_checks.clone()
    }

    pub fn zone_creations(&self) -> Vec<ZoneCreation> {
        self.state.lock().unwrap().zone_creations.clone()
    }

    pub fn upserts(&self) -> Vec<UpsertCall> {
        self.state.lock().unwrap().upserts.clone()
    }

    pub fn health_check_creations(&self) -> Vec<(CallerReference, HealthCheckConfig)> {
        self.state.lock().unwrap().health_check_creations.clone()
    }

    pub fn tag_calls(&self) -> Vec<(String, Tags)> {
        self.state.lock().unwrap().tag_calls.clone()
    }

    /// Number of listing page requests served
    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// Total number of mutating calls received
    pub fn mutation_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.zone_creations.len()
            + state.upserts.len()
            + state.health_check_creations.len()
            + state.tag_calls.len()
    }

    fn page<T: Clone, C>(&self, items: &[T], start: usize, cursor_at: impl Fn(&T) -> C) -> Page<T, C> {
        let end = (start + self.page_size).min(items.len());
        let chunk = items[start.min(items.len())..end].to_vec();
        match items.get(end) {
            Some(next) => Page::truncated(chunk, cursor_at(next)),
            None => Page::last(chunk),
        }
    }
}

#[async_trait]
impl ZoneLister for FakeProvider {
    async fn list_zones(&self, cursor: Option<ZoneCursor>) -> Result<Page<HostedZone, ZoneCursor>> {
        let (zones, fault) = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            let zones = state
                .zones
                .iter()
                .map(|fake| {
                    // Listings never include VPC associations
                    let mut zone = fake.zone.clone();
                    zone.vpcs.clear();
                    zone
                })
                .collect::<Vec<_>>();
            (zones, state.zone_pager)
        };

        match fault {
            PagerFault::None => {}
            PagerFault::Loop => {
                let first = zones
                    .first()
                    .ok_or_else(|| Error::provider("fake", "no zones to loop over"))?;
                let cursor = ZoneCursor {
                    dns_name: first.name.clone(),
                    hosted_zone_id: first.id.clone(),
                };
                return Ok(Page::truncated(zones, cursor));
            }
            PagerFault::MissingCursor => {
                return Ok(Page {
                    items: zones,
                    is_truncated: true,
                    next: None,
                });
            }
        }

        let start = match cursor {
            None => 0,
            Some(cursor) => zones
                .iter()
                .position(|zone| zone.id == cursor.hosted_zone_id)
                .ok_or_else(|| Error::provider("fake", "unknown zone cursor"))?,
        };

        Ok(self.page(&zones, start, |zone| ZoneCursor {
            dns_name: zone.name.clone(),
            hosted_zone_id: zone.id.clone(),
        }))
    }

    async fn get_zone(&self, zone_id: &str) -> Result<ZoneLookup> {
        let state = self.state.lock().unwrap();
        if state.failing_lookups.contains(zone_id) {
            return Err(Error::provider("fake", "InternalFailure"));
        }

        let fake = state
            .zones
            .iter()
            .find(|fake| fake.zone.id == zone_id)
            .ok_or_else(|| Error::resource_not_found(zone_id))?;

        let mut zone = fake.zone.clone();
        let vpcs = std::mem::take(&mut zone.vpcs);
        Ok(ZoneLookup { zone, vpcs })
    }
}

#[async_trait]
impl RecordLister for FakeProvider {
    async fn list_record_sets(
        &self,
        zone_id: &str,
        cursor: Option<RecordCursor>,
    ) -> Result<Page<ResourceRecordSet, RecordCursor>> {
        let records = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            state
                .zones
                .iter()
                .find(|fake| fake.zone.id == zone_id)
                .map(|fake| fake.records.clone())
                .ok_or_else(|| Error::resource_not_found(zone_id))?
        };

        let start = match cursor {
            None => 0,
            Some(cursor) => records
                .iter()
                .position(|set| {
                    set.key()
                        == (
                            cursor.name.as_str(),
                            cursor.record_type.as_str(),
                            cursor.identifier.as_deref(),
                        )
                })
                .ok_or_else(|| Error::provider("fake", "unknown record cursor"))?,
        };

        Ok(self.page(&records, start, |set| RecordCursor {
            name: set.name.clone(),
            record_type: set.record_type.clone(),
            identifier: set.set_identifier.clone(),
        }))
    }
}

#[async_trait]
impl HealthCheckLister for FakeProvider {
    async fn list_health_checks(&self, marker: Option<String>) -> Result<Page<HealthCheck, String>> {
        let checks = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            state
                .health_checks
                .iter()
                .map(|check| {
                    // Tags come from a separate call
                    let mut check = check.clone();
                    check.tags.clear();
                    check
                })
                .collect::<Vec<_>>()
        };

        let start = match marker {
            None => 0,
            Some(marker) => checks
                .iter()
                .position(|check| check.id == marker)
                .ok_or_else(|| Error::provider("fake", "unknown marker"))?,
        };

        Ok(self.page(&checks, start, |check| check.id.clone()))
    }

    async fn list_health_check_tags(&self, health_check_id: &str) -> Result<Tags> {
        let state = self.state.lock().unwrap();
        if state.fail_tag_listing {
            return Err(Error::provider("fake", "Throttling"));
        }

        state
            .health_checks
            .iter()
            .find(|check| check.id == health_check_id)
            .map(|check| check.tags.clone())
            .ok_or_else(|| Error::resource_not_found(health_check_id))
    }
}

#[async_trait]
impl ZoneWriter for FakeProvider {
    async fn create_zone(&self, request: &ZoneCreation) -> Result<HostedZone> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;

        let zone = HostedZone {
            id: format!("/hostedzone/NEW{}", state.next_id),
            name: request.name.clone(),
            config: request.config.clone(),
            caller_reference: Some(request.caller_reference.to_string()),
            resource_record_set_count: None,
            vpcs: request.vpc.iter().cloned().collect::<Vec<Vpc>>(),
        };

        state.zone_creations.push(request.clone());
        state.zones.push(FakeZone {
            zone: zone.clone(),
            records: Vec::new(),
        });

        let mut listed = zone;
        listed.vpcs.clear();
        Ok(listed)
    }

    async fn upsert_record_sets(
        &self,
        zone_id: &str,
        comment: &str,
        record_sets: &[ResourceRecordSet],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_upserts.contains(zone_id) {
            return Err(Error::provider("fake", "InvalidChangeBatch"));
        }

        state.upserts.push(UpsertCall {
            zone_id: zone_id.to_string(),
            comment: comment.to_string(),
            record_sets: record_sets.to_vec(),
        });

        let fake = state
            .zones
            .iter_mut()
            .find(|fake| fake.zone.id == zone_id)
            .ok_or_else(|| Error::resource_not_found(zone_id))?;

        for set in record_sets {
            match fake.records.iter_mut().find(|live| live.key() == set.key()) {
                Some(live) => *live = set.clone(),
                None => fake.records.push(set.clone()),
            }
        }

        Ok(())
    }
}

#[async_trait]
impl HealthCheckWriter for FakeProvider {
    async fn create_health_check(
        &self,
        caller_reference: &CallerReference,
        config: &HealthCheckConfig,
    ) -> Result<HealthCheck> {
        let mut state = self.state.lock().unwrap();
        if state.fail_health_check_create {
            return Err(Error::provider("fake", "TooManyHealthChecks"));
        }

        state.next_id += 1;

        let mut check = HealthCheck::new(format!("hc-new-{}", state.next_id), config.clone());
        check.caller_reference = Some(caller_reference.to_string());

        state
            .health_check_creations
            .push((caller_reference.clone(), config.clone()));
        state.health_checks.push(check.clone());
        Ok(check)
    }

    async fn add_health_check_tags(&self, health_check_id: &str, tags: &Tags) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_tagging {
            return Err(Error::provider("fake", "ThrottlingException"));
        }

        state
            .tag_calls
            .push((health_check_id.to_string(), tags.clone()));

        let check = state
            .health_checks
            .iter_mut()
            .find(|check| check.id == health_check_id)
            .ok_or_else(|| Error::resource_not_found(health_check_id))?;
        check.tags.extend(tags.clone());
        Ok(())
    }
}

impl DnsProvider for FakeProvider {
    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// A public zone with a handful of record sets, enough to span several pages
pub fn public_zone(id: &str, name: &str, hosts: &[&str]) -> (HostedZone, Vec<ResourceRecordSet>) {
    let zone = HostedZone::public(id, name);
    let mut records = vec![
        ResourceRecordSet::simple(name, "NS", 172800, ["ns-1.example.net.", "ns-2.example.net."]),
        ResourceRecordSet::simple(
            name,
            "SOA",
            900,
            ["ns-1.example.net. hostmaster.example.net. 1 7200 900 1209600 86400"],
        ),
    ];
    for (i, host) in hosts.iter().enumerate() {
        records.push(ResourceRecordSet::simple(
            format!("{}.{}", host, name),
            "A",
            300,
            [format!("192.0.2.{}", i + 1)],
        ));
    }
    (zone, records)
}

/// A zone whose `www` name is served by several weighted record sets
///
/// Every set shares name and type, so only the set identifier tells them apart.
pub fn weighted_zone(id: &str, name: &str, weights: &[i64]) -> (HostedZone, Vec<ResourceRecordSet>) {
    let (zone, mut records) = public_zone(id, name, &[]);
    for (i, weight) in weights.iter().enumerate() {
        let mut set = ResourceRecordSet::simple(
            format!("www.{}", name),
            "A",
            60,
            [format!("198.51.100.{}", i + 1)],
        );
        set.set_identifier = Some(format!("backend-{}", i));
        set.weight = Some(*weight);
        records.push(set);
    }
    (zone, records)
}

pub fn web_check(id: &str, fqdn: &str) -> HealthCheck {
    HealthCheck::new(id, HealthCheckConfig::endpoint("HTTPS", fqdn, 443))
}

/// Provider state shared by most contract tests: two public zones, one
/// private zone with two VPCs, three health checks (one tagged)
pub fn populated_provider() -> FakeProvider {
    let provider = FakeProvider::new();

    let (zone, records) = public_zone("/hostedzone/ZPUB1", "example.com.", &["www", "api", "mail"]);
    provider.add_zone(zone, records);

    let (zone, records) = public_zone("/hostedzone/ZPUB2", "example.org.", &["www"]);
    provider.add_zone(zone, records);

    let private = HostedZone::private(
        "/hostedzone/ZPRIV",
        "corp.internal.",
        vec![
            Vpc::new("us-east-1", "vpc-aaa"),
            Vpc::new("us-west-2", "vpc-bbb"),
        ],
    );
    let (_, records) = public_zone("/hostedzone/ZPRIV", "corp.internal.", &["db"]);
    provider.add_zone(private, records);

    provider.add_health_check(web_check("hc-1", "www.example.com").with_tag("Name", "www"));
    provider.add_health_check(web_check("hc-2", "api.example.com"));
    provider.add_health_check(web_check("hc-3", "www.example.org"));

    provider
}

/// Snapshot store over a shared in-memory blob store
pub fn memory_store() -> (MemoryBlobStore, SnapshotStore) {
    let blobs = MemoryBlobStore::new();
    let store = SnapshotStore::new(Arc::new(blobs.clone()));
    (blobs, store)
}

pub fn ts(text: &str) -> Timestamp {
    text.parse().expect("valid timestamp")
}
