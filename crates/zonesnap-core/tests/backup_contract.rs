//! Architectural Contract Test: Backup Completeness & Atomic Pointer
//!
//! Constraints verified:
//! - Every page of every listing ends up in the snapshot, including weighted
//!   sets that share a name and type across a page boundary
//! - Private zones carry their VPC associations, health checks their tags
//! - Objects land under the timestamp-prefixed layout
//! - The latest pointer only moves after a fully successful backup
//!
//! If this test fails, backups may be silently partial.

mod common;

use common::*;
use std::sync::Arc;
use zonesnap_core::traits::BlobStore;
use zonesnap_core::snapshot::{LATEST_POINTER_KEY, health_checks_key, zone_records_key, zones_key};
use zonesnap_core::{BackupService, Error, HealthCheck, HostedZone, ResourceRecordSet};

#[tokio::test]
async fn backup_collects_every_page() {
    let provider = FakeProvider::with_page_size(1);
    let (zone, mut records) = public_zone("/hostedzone/ZBIG", "big.example.", &[]);
    for i in 0..7 {
        records.push(ResourceRecordSet::simple(
            format!("host{}.big.example.", i),
            "AAAA",
            60,
            [format!("2001:db8::{}", i)],
        ));
    }
    let expected = records.clone();
    provider.add_zone(zone, records);
    for i in 0..4 {
        provider.add_health_check(web_check(&format!("hc-{}", i), "big.example"));
    }

    let (_blobs, store) = memory_store();
    let service = BackupService::new(Arc::new(provider.clone()), store.clone());
    let summary = service
        .run_at(ts("2024-03-01T12:00:00Z"))
        .await
        .expect("backup succeeds");

    assert_eq!(summary.zones, 1);
    assert_eq!(summary.record_sets, expected.len());
    assert_eq!(summary.health_checks, 4);

    let stored = store
        .get_zone_records(summary.timestamp, "big.example.")
        .await
        .expect("records stored");
    assert_eq!(stored, expected, "records keep listing order across pages");

    // one page per item plus the zone listing
    assert!(provider.list_calls() >= expected.len() + 4 + 1);
}

#[tokio::test]
async fn backup_pages_through_weighted_sets() {
    for page_size in [1, 2, 3] {
        let provider = FakeProvider::with_page_size(page_size);
        let (zone, records) =
            weighted_zone("/hostedzone/ZW", "weighted.example.", &[10, 20, 30, 40]);
        provider.add_zone(zone, records.clone());

        let (_blobs, store) = memory_store();
        let summary = BackupService::new(Arc::new(provider), store.clone())
            .run_at(ts("2024-03-01T12:00:00Z"))
            .await
            .expect("sets sharing name and type page by identifier");

        let stored = store
            .get_zone_records(summary.timestamp, "weighted.example.")
            .await
            .expect("records stored");
        assert_eq!(stored, records, "page_size={}", page_size);
    }
}

#[tokio::test]
async fn backup_writes_timestamped_layout() {
    let provider = populated_provider();
    let (blobs, store) = memory_store();
    let timestamp = ts("2024-03-01T12:00:00Z");

    let summary = BackupService::new(Arc::new(provider), store)
        .run_at(timestamp)
        .await
        .expect("backup succeeds");

    assert_eq!(
        summary.to_string(),
        "Success: 2024-03-01T12:00:00Z: Zones: 3 HealthChecks: 3"
    );

    let keys = blobs.keys().await;
    for key in [
        zones_key(timestamp),
        zone_records_key(timestamp, "example.com."),
        zone_records_key(timestamp, "example.org."),
        zone_records_key(timestamp, "corp.internal."),
        health_checks_key(timestamp),
        LATEST_POINTER_KEY.to_string(),
    ] {
        assert!(keys.contains(&key), "missing object {}", key);
    }
    assert!(keys.contains(&"2024-03-01T12:00:00Z/example.com.json".to_string()));

    let pointer = blobs.get(LATEST_POINTER_KEY).await.expect("pointer");
    assert_eq!(pointer, b"2024-03-01T12:00:00Z");
}

#[tokio::test]
async fn backup_attaches_vpcs_and_tags() {
    let provider = populated_provider();
    let (_blobs, store) = memory_store();
    let timestamp = ts("2024-03-01T12:00:00Z");

    BackupService::new(Arc::new(provider), store.clone())
        .run_at(timestamp)
        .await
        .expect("backup succeeds");

    let zones = store.get_zones(timestamp).await.expect("zones stored");
    let private: Vec<&HostedZone> = zones.iter().filter(|zone| zone.is_private()).collect();
    assert_eq!(private.len(), 1);
    assert_eq!(private[0].vpcs.len(), 2);
    assert_eq!(private[0].vpcs[0].id.as_deref(), Some("vpc-aaa"));
    assert!(
        zones
            .iter()
            .filter(|zone| !zone.is_private())
            .all(|zone| zone.vpcs.is_empty())
    );

    let checks = store
        .get_health_checks(timestamp)
        .await
        .expect("health checks stored");
    let tagged: Vec<&HealthCheck> = checks.iter().filter(|c| !c.tags.is_empty()).collect();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, "hc-1");
    assert_eq!(tagged[0].tags.get("Name").map(String::as_str), Some("www"));
}

#[tokio::test]
async fn failed_backup_leaves_pointer_on_previous_run() {
    let provider = populated_provider();
    let (blobs, store) = memory_store();
    let service = BackupService::new(Arc::new(provider.clone()), store.clone());

    let first = ts("2024-03-01T12:00:00Z");
    service.run_at(first).await.expect("first backup succeeds");

    provider.fail_tag_listing();
    let result = service.run_at(ts("2024-03-02T12:00:00Z")).await;
    assert!(matches!(result, Err(Error::Provider { .. })));

    assert_eq!(
        store.get_latest_timestamp().await.expect("pointer readable"),
        first,
        "pointer must still name the last complete backup"
    );
    assert!(blobs.get(&health_checks_key(first)).await.is_ok());
}

#[tokio::test]
async fn backup_of_empty_account_is_valid() {
    let provider = FakeProvider::new();
    let (_blobs, store) = memory_store();
    let timestamp = ts("2024-03-01T12:00:00Z");

    let summary = BackupService::new(Arc::new(provider), store.clone())
        .run_at(timestamp)
        .await
        .expect("backup succeeds");

    assert_eq!(summary.zones, 0);
    assert_eq!(summary.health_checks, 0);

    let snapshot = store.load_snapshot(timestamp).await.expect("loadable");
    assert!(snapshot.zones.is_empty());
    assert!(snapshot.health_checks.is_empty());
    assert_eq!(store.get_latest_timestamp().await.unwrap(), timestamp);
}
