//! Application Layer - Pipeline orchestration
//!
//! - `Aggregator`: concurrent fetch across provider domains
//! - `Enricher`: best-effort metadata second pass
//! - `GraduatedPipeline`: aggregate, deduplicate, enrich, sort
//! - `SnapshotCache` / `SnapshotService`: TTL-gated snapshot access

pub mod aggregator;
pub mod cache;
pub mod enricher;
pub mod pipeline;
pub mod service;

pub use aggregator::Aggregator;
pub use cache::{Snapshot, SnapshotCache, DEFAULT_SNAPSHOT_TTL};
pub use enricher::{EnrichmentConfig, Enricher};
pub use pipeline::GraduatedPipeline;
pub use service::{ServiceError, SnapshotService};
