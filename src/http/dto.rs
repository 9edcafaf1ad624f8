//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Partition and working-copy DTOs are re-exported from the api module
//! since they already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Export
    ExportTable,
    // History
    CurrentMetrics,
    HistoryData,
    HistoryPoint,
    // Reconciliation
    MergeOutcome,
    PendingRow,
    RejectedRow,
    UnknownRow,
    // Review decisions
    ReviewDecision,
    // Working copy
    WorkingRow,
};

/// Request body for ingesting an uploaded candidate file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Original filename, informational only
    #[serde(default)]
    pub filename: Option<String>,
    /// Raw tabular payload: header row first, all cells as strings
    pub rows: Vec<Vec<String>>,
}

/// Response for upload ingest and re-reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Content digest identifying this upload
    pub digest: String,
    /// Whether a previously parsed upload was reused
    pub reused: bool,
    /// Number of candidate rows in the upload
    pub candidate_count: usize,
    /// The three partitions against the current roster
    pub outcome: MergeOutcome,
}

/// Query parameters for the roster review view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterQuery {
    /// Filter by credibility: "approved" or "rejected"
    #[serde(default)]
    pub credibility: Option<String>,
    /// Filter by exact comment text
    #[serde(default)]
    pub comment: Option<String>,
}

/// Response for the roster review view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterViewResponse {
    /// Working-copy rows after filtering
    pub rows: Vec<WorkingRow>,
    /// Total rows in the working copy before filtering
    pub total: usize,
    /// Edit-version keying editable UI state
    pub edit_version: u64,
    /// True when a remote change forced a reload, discarding local edits
    pub reloaded: bool,
    /// Distinct comment values, for the filter control
    pub comments: Vec<String>,
}

/// Request body for editing one working-copy row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// Stable row key from the roster view
    pub key: u64,
    pub approved: bool,
    pub comment: String,
}

/// Response for a row edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    /// Whether anything changed (a no-op edit returns false)
    pub changed: bool,
    pub edit_version: u64,
}

/// Request body for adding or updating a roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertRequest {
    pub identity: String,
    pub approved: bool,
    #[serde(default)]
    pub comment: String,
}

/// Response for an add-or-update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertResponse {
    /// "added" or "updated"
    pub outcome: String,
    /// Stable key of the affected row
    pub key: u64,
    pub edit_version: u64,
}

/// Response for a working-copy push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Rows written, header included
    pub rows_written: usize,
    pub message: String,
}

/// Request body for committing review decisions on unknown candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalsRequest {
    /// Decisions the operator marked for committing
    pub decisions: Vec<ReviewDecision>,
}

/// Response for committed review decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalsResponse {
    /// Rows appended to the roster sheet
    pub appended: usize,
}

/// Request body for building an export.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportRequest {
    /// Identities to include; omitted means every pending row
    #[serde(default)]
    pub selected: Option<Vec<String>>,
}

/// Query parameters for the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryQuery {
    /// Upload digest supplying the candidate's current metrics
    #[serde(default)]
    pub digest: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}
