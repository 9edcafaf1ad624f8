//! Uploaded candidate file ingest.
//!
//! An upload arrives as raw tabular rows (header row first). Ingest performs
//! the schema fixes once (renaming the first column to `ID` when no `ID`
//! column exists, normalizing identities, coercing the known metric columns
//! to numbers) and registers the result under a content digest so the same
//! bytes are never re-parsed.

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::UploadDigest;
use crate::models::{make_unique_headers, normalize, parse_metric, Candidate};
use crate::store::{StoreError, StoreResult};

/// Metric columns coerced to numbers, by exact header name.
const NUMERIC_COLUMNS: [&str; 7] = [
    "Followers",
    "Post price",
    "Avg View",
    "CPV",
    "IER",
    "Avg like",
    "Avg comments",
];

/// One parsed upload, immutable once registered.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub digest: UploadDigest,
    pub filename: Option<String>,
    pub candidates: Vec<Candidate>,
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl UploadSession {
    /// Find a candidate by normalized identity (first occurrence).
    pub fn candidate(&self, identity: &str) -> Option<&Candidate> {
        let wanted = normalize(identity);
        self.candidates.iter().find(|c| c.identity == wanted)
    }
}

/// Content digest of a raw upload payload.
pub fn upload_digest(rows: &[Vec<String>]) -> UploadDigest {
    let mut hasher = Sha256::new();
    for row in rows {
        for cell in row {
            hasher.update(cell.as_bytes());
            hasher.update([0x1f]); // cell separator
        }
        hasher.update([0x1e]); // row separator
    }
    UploadDigest(hex::encode(hasher.finalize()))
}

/// Parse raw upload rows into typed candidates.
///
/// Fails only when no identity column can be determined (no columns at
/// all); every other shape problem degrades to documented defaults.
pub fn parse_upload(raw: &[Vec<String>]) -> StoreResult<Vec<Candidate>> {
    let Some((header, data)) = raw.split_first() else {
        return Err(StoreError::data_shape(
            "uploaded file is empty; cannot determine an identity column",
        ));
    };
    if header.is_empty() {
        return Err(StoreError::data_shape(
            "uploaded file has no columns; cannot determine an identity column",
        ));
    }

    let headers = make_unique_headers(header);
    // When no column is named exactly "ID", the first column takes the role.
    let id_col = headers.iter().position(|h| h == "ID").unwrap_or(0);

    let column = |name: &str| headers.iter().position(|h| h == name);
    let numeric_cols: HashMap<&str, Option<usize>> = NUMERIC_COLUMNS
        .iter()
        .map(|name| (*name, column(name)))
        .collect();
    let category_col = column("Category");

    let cell = |row: &[String], col: Option<usize>| -> Option<f64> {
        col.and_then(|c| row.get(c)).and_then(|v| parse_metric(v))
    };

    Ok(data
        .iter()
        .map(|row| Candidate {
            identity: normalize(row.get(id_col).map(String::as_str).unwrap_or("")),
            followers: cell(row, numeric_cols["Followers"]),
            post_price: cell(row, numeric_cols["Post price"]),
            avg_view: cell(row, numeric_cols["Avg View"]),
            cost_per_view: cell(row, numeric_cols["CPV"]),
            engagement_rate: cell(row, numeric_cols["IER"]),
            avg_like: cell(row, numeric_cols["Avg like"]),
            avg_comments: cell(row, numeric_cols["Avg comments"]),
            category: category_col
                .and_then(|c| row.get(c))
                .cloned()
                .unwrap_or_default(),
        })
        .collect())
}

/// Registry of parsed uploads, keyed by content digest.
#[derive(Default)]
pub struct UploadRegistry {
    sessions: RwLock<HashMap<String, Arc<UploadSession>>>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upload, skipping the parse when the digest is known.
    ///
    /// Returns the session and whether it was reused.
    pub fn ingest(
        &self,
        raw: &[Vec<String>],
        filename: Option<String>,
    ) -> StoreResult<(Arc<UploadSession>, bool)> {
        let digest = upload_digest(raw);

        if let Some(existing) = self.sessions.read().get(digest.as_str()) {
            return Ok((Arc::clone(existing), true));
        }

        let candidates = parse_upload(raw)?;
        let session = Arc::new(UploadSession {
            digest: digest.clone(),
            filename,
            candidates,
            received_at: chrono::Utc::now(),
        });

        let mut sessions = self.sessions.write();
        // A concurrent ingest of the same bytes may have won the race.
        let entry = sessions
            .entry(digest.0)
            .or_insert_with(|| Arc::clone(&session));
        Ok((Arc::clone(entry), false))
    }

    /// Look up a previously ingested upload.
    pub fn get(&self, digest: &str) -> Option<Arc<UploadSession>> {
        self.sessions.read().get(digest).cloned()
    }
}
