//! Sync coordinator: pushing local state back to the authoritative sheet.
//!
//! A push is a full overwrite: clear, then write the entire working copy.
//! It is not a merge, and it is never retried: re-running a partially
//! applied overwrite risks duplicating or corrupting remote rows. On
//! success the shared [`ChangeSignal`] fires so every cache bypasses its
//! TTL and any live working copy reloads on its next fingerprint check. On
//! failure the remote is in an unknown partial state; callers invalidate
//! their caches and re-fingerprint before trusting it again.

use crate::cache::ChangeSignal;
use crate::models::{normalize, ReviewStatus};
use crate::store::{StoreResult, WorksheetStore};

/// An operator's decision on one unknown candidate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReviewDecision {
    pub identity: String,
    pub comment: String,
    pub status: ReviewStatus,
}

/// Overwrite the roster sheet with serialized working-copy rows.
///
/// `rows` must include the header row (see
/// [`WorkingCopy::to_sheet_rows`]). Returns the number of rows written,
/// header included. Pushing identical content twice leaves the remote
/// byte-identical; the push is idempotent at the content level.
///
/// [`WorkingCopy::to_sheet_rows`]: crate::services::working_copy::WorkingCopy::to_sheet_rows
pub async fn push_working_copy(
    sheet: &dyn WorksheetStore,
    rows: Vec<Vec<String>>,
    signal: &ChangeSignal,
) -> StoreResult<usize> {
    let count = rows.len();
    sheet.clear().await?;
    sheet.write_rows(rows).await?;
    log::info!("pushed {} rows to the roster sheet", count);
    signal.notify();
    Ok(count)
}

/// Append operator decisions on unknown candidates to the roster sheet.
///
/// Each decision becomes one `[identity, comment, credibility]` row with
/// the credibility literal the sheet expects. Returns the number of rows
/// appended; an empty decision list is a no-op that fires no signal.
pub async fn append_review_decisions(
    sheet: &dyn WorksheetStore,
    decisions: &[ReviewDecision],
    signal: &ChangeSignal,
) -> StoreResult<usize> {
    if decisions.is_empty() {
        return Ok(0);
    }

    let rows: Vec<Vec<String>> = decisions
        .iter()
        .map(|d| {
            vec![
                normalize(&d.identity),
                d.comment.clone(),
                d.status.sheet_literal().to_string(),
            ]
        })
        .collect();

    let count = rows.len();
    sheet.append_rows(rows).await?;
    log::info!("appended {} review decisions to the roster sheet", count);
    signal.notify();
    Ok(count)
}
