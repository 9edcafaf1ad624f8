//! Public API surface for the reconciliation backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::services::export::ExportTable;
pub use crate::services::history::CurrentMetrics;
pub use crate::services::history::HistoryData;
pub use crate::services::history::HistoryPoint;
pub use crate::services::reconcile::MergeOutcome;
pub use crate::services::reconcile::PendingRow;
pub use crate::services::reconcile::RejectedRow;
pub use crate::services::reconcile::UnknownRow;
pub use crate::services::sync::ReviewDecision;
pub use crate::services::working_copy::ColumnTitles;
pub use crate::services::working_copy::RefreshOutcome;
pub use crate::services::working_copy::UpsertOutcome;
pub use crate::services::working_copy::WorkingRow;

use serde::{Deserialize, Serialize};

/// Stable synthetic identifier of a roster row within a working copy.
///
/// Assigned at load time (origin index) and carried through every
/// transformation, so edits address rows independently of display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowKey(pub u64);

impl RowKey {
    pub fn new(value: u64) -> Self {
        RowKey(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Content digest identifying one uploaded candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadDigest(pub String);

impl UploadDigest {
    pub fn new(value: impl Into<String>) -> Self {
        UploadDigest(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UploadDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewStatus;

    #[test]
    fn test_row_key_serializes_transparently() {
        let json = serde_json::to_string(&RowKey(7)).unwrap();
        assert_eq!(json, "7");
        let key: RowKey = serde_json::from_str("7").unwrap();
        assert_eq!(key, RowKey::new(7));
    }

    #[test]
    fn test_review_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::Approved).unwrap(),
            r#""approved""#
        );
        let status: ReviewStatus = serde_json::from_str(r#""rejected""#).unwrap();
        assert_eq!(status, ReviewStatus::Rejected);
    }

    #[test]
    fn test_upload_digest_display_and_json_agree() {
        let digest = UploadDigest::new("abc123");
        assert_eq!(digest.to_string(), "abc123");
        assert_eq!(serde_json::to_string(&digest).unwrap(), r#""abc123""#);
    }
}
