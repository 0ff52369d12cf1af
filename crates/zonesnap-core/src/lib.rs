// # zonesnap-core
//
// Point-in-time backup and reconciliation-based restore of hosted DNS zones.
//
// ## Architecture Overview
//
// - **Paginator**: follows truncation cursors of provider listings
// - **SnapshotBuilder**: assembles zones, record sets and health checks into a Snapshot
// - **SnapshotStore**: persists snapshots under timestamp-prefixed keys in a BlobStore
// - **Reconciler**: computes and applies the non-destructive delta back to a snapshot
//
// ```text
// backup:  DnsProvider ─▶ SnapshotBuilder ─▶ SnapshotStore ─▶ BlobStore
// restore: BlobStore ─▶ SnapshotStore ─▶ Reconciler ◀─▶ DnsProvider
// ```
//
// ## Design Principles
//
// 1. **Injected capabilities**: provider and storage are traits, never globals
// 2. **Fail-fast backup**: any failure aborts before the latest pointer moves
// 3. **Add/update only**: restore never deletes, and compares before it mutates
// 4. **Library-first**: the binary is a thin wrapper over this crate

pub mod blob;
pub mod config;
pub mod error;
pub mod model;
pub mod paginator;
pub mod restore;
pub mod snapshot;
pub mod traits;

// Re-export core types for convenience
pub use blob::{FileBlobStore, MemoryBlobStore};
pub use config::{ProviderConfig, StoreConfig};
pub use error::{Error, Result};
pub use model::{HealthCheck, HostedZone, ResourceRecordSet, Snapshot, Timestamp};
pub use paginator::{Page, paginate};
pub use restore::{Reconciler, RestoreRequest, RestoreSummary};
pub use snapshot::{BackupService, BackupSummary, SnapshotBuilder, SnapshotStore};
pub use traits::{BlobStore, DnsProvider};
