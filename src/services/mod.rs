//! Service layer for business logic and orchestration.
//!
//! This module contains the reconciliation/sync core that sits between the
//! worksheet store and the HTTP layer: upload ingest, partitioning,
//! working-copy editing, sync, trend extraction, and export.

pub mod export;

pub mod history;

pub mod reconcile;

pub mod sync;

pub mod upload;
pub mod working_copy;

pub use export::{build_export, ExportTable};
pub use history::{history_data, CurrentMetrics, HistoryData, HistoryPoint};
pub use reconcile::{reconcile, MergeOutcome, PendingRow, RejectedRow, UnknownRow};
pub use sync::{append_review_decisions, push_working_copy, ReviewDecision};
pub use upload::{parse_upload, upload_digest, UploadRegistry, UploadSession};
pub use working_copy::{
    ColumnTitles, RefreshOutcome, UpsertOutcome, WorkingCopy, WorkingCopyManager, WorkingRow,
};
