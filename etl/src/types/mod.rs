//! Core data types exchanged between the paginator, normalizer and merge engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical per-paper statement count record.
///
/// Produced by the normalizer and persisted in the destination table. The `id`
/// is assigned upstream and immutable; `title` and `count` are overwritten on
/// every sync run that observes the record again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    /// Globally unique paper identifier assigned by the upstream system.
    pub id: String,
    /// Human-readable paper title; falls back to the id when upstream omits it.
    pub title: String,
    /// Number of statements associated with the paper.
    pub count: i64,
}

/// Pagination envelope returned by the upstream collection endpoint.
///
/// Used only to decide loop termination, never persisted. All fields are
/// optional because the upstream contract has been observed to omit the whole
/// envelope as well as individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
}

/// One raw record as returned by the upstream collection endpoint.
///
/// Fields are loosely typed on purpose: the upstream payload is dynamic and
/// all coercion happens in [`crate::conversions::record`], so looseness never
/// travels past the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStatementRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub count: Option<serde_json::Value>,
}

/// One raw page of the upstream collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementsPage {
    #[serde(default)]
    pub content: Vec<RawStatementRecord>,
    #[serde(default)]
    pub page: Option<PageMeta>,
}

/// Parameters of a single upstream page fetch.
///
/// The title filter is not part of the request: it is constant for a run and
/// owned by the source client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page_number: u32,
    /// Number of records requested per page.
    pub page_size: u32,
}

/// Summary of one completed sync run.
///
/// The run itself is ephemeral; only the destination rows outlive it.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Identifier of this load, unique per run.
    pub load_id: Uuid,
    /// Number of upstream page fetches issued.
    pub pages_fetched: u32,
    /// Number of non-empty batches merged into the destination.
    pub batches_applied: u32,
    /// Number of rows merged across all batches.
    pub rows_loaded: u64,
    /// Destination resources touched by the run.
    pub resources: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
