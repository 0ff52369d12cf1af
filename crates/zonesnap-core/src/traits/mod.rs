//! Capability interfaces
//!
//! - [`ZoneLister`], [`RecordLister`], [`HealthCheckLister`]: read provider state
//! - [`ZoneWriter`], [`HealthCheckWriter`]: non-destructive provider mutations
//! - [`DnsProvider`]: all of the above
//! - [`BlobStore`]: durable storage for snapshot objects

pub mod blob_store;
pub mod dns_provider;

pub use blob_store::BlobStore;
pub use dns_provider::{
    DnsProvider, HealthCheckLister, HealthCheckWriter, RecordCursor, RecordLister, ZoneCreation,
    ZoneCursor, ZoneLister, ZoneLookup, ZoneWriter,
};
