//! Editable working copy of the roster.
//!
//! The review screen edits an in-memory projection of the roster, not the
//! remote sheet. Rows carry a stable synthetic [`RowKey`] assigned at load,
//! so an edit always lands on the row it was made against no matter how the
//! display is filtered or re-sorted. A monotonic edit-version counter bumps
//! on every accepted mutation and on every forced reload; the UI keys its
//! editor state on it so stale widget state never shadows fresh data.
//!
//! When the remote fingerprint diverges from the one the copy was loaded
//! under, the copy is discarded and rebuilt; local unsynced edits are lost
//! by design.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::api::RowKey;
use crate::cache::RosterSnapshot;
use crate::models::normalize;

/// One editable roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingRow {
    pub key: RowKey,
    pub identity: String,
    /// Review-view credibility: `true` only when the stored value is
    /// exactly `"true"`.
    pub approved: bool,
    pub comment: String,
}

/// Column titles used when the copy is serialized back to sheet rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTitles {
    pub id: String,
    pub comment: String,
    pub credibility: String,
}

/// Outcome of an [`WorkingCopy::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Updated(RowKey),
    Added(RowKey),
}

impl UpsertOutcome {
    pub fn key(&self) -> RowKey {
        match self {
            UpsertOutcome::Updated(key) | UpsertOutcome::Added(key) => *key,
        }
    }
}

/// In-memory editable projection of the roster.
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    rows: Vec<WorkingRow>,
    titles: ColumnTitles,
    /// Fingerprint of the remote payload this copy was built from.
    fingerprint: String,
    edit_version: u64,
    next_key: u64,
}

impl WorkingCopy {
    /// Build a working copy from a roster snapshot.
    ///
    /// `edit_version` seeds the counter; a reload passes the previous
    /// version plus one so editor state is invalidated across reloads.
    pub fn from_snapshot(snapshot: &RosterSnapshot, edit_version: u64) -> Self {
        let rows: Vec<WorkingRow> = snapshot
            .records
            .iter()
            .map(|record| WorkingRow {
                key: record.key,
                identity: record.identity.clone(),
                approved: record.is_approved(),
                comment: record.comment.clone(),
            })
            .collect();
        let next_key = rows.iter().map(|r| r.key.0 + 1).max().unwrap_or(0);

        Self {
            rows,
            titles: ColumnTitles {
                id: snapshot.binding.id_title.clone(),
                comment: snapshot.binding.comment_title.clone(),
                credibility: snapshot.binding.credibility_title.clone(),
            },
            fingerprint: snapshot.fingerprint.clone(),
            edit_version,
            next_key,
        }
    }

    pub fn rows(&self) -> &[WorkingRow] {
        &self.rows
    }

    pub fn edit_version(&self) -> u64 {
        self.edit_version
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn titles(&self) -> &ColumnTitles {
        &self.titles
    }

    /// Apply an edit to the row with the given key.
    ///
    /// Field-wise comparison first: proposing the currently stored values is
    /// a no-op and does not bump the edit-version, so applying the same edit
    /// twice bumps the version exactly once. Returns whether anything
    /// changed. An unknown key changes nothing.
    pub fn apply_edit(&mut self, key: RowKey, approved: bool, comment: &str) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.key == key) else {
            return false;
        };
        if row.approved == approved && row.comment == comment {
            return false;
        }
        row.approved = approved;
        row.comment = comment.to_string();
        self.edit_version += 1;
        true
    }

    /// Update the row holding `identity` in place, or prepend a new row.
    ///
    /// The identity is normalized before lookup. Either path bumps the
    /// edit-version.
    pub fn upsert(&mut self, identity: &str, approved: bool, comment: &str) -> UpsertOutcome {
        let identity = normalize(identity);
        self.edit_version += 1;

        if let Some(row) = self.rows.iter_mut().find(|r| r.identity == identity) {
            row.approved = approved;
            row.comment = comment.to_string();
            return UpsertOutcome::Updated(row.key);
        }

        let key = RowKey(self.next_key);
        self.next_key += 1;
        self.rows.insert(
            0,
            WorkingRow {
                key,
                identity,
                approved,
                comment: comment.to_string(),
            },
        );
        UpsertOutcome::Added(key)
    }

    /// Rows matching the review-view filters, in copy order.
    pub fn filtered(&self, approved: Option<bool>, comment: Option<&str>) -> Vec<&WorkingRow> {
        self.rows
            .iter()
            .filter(|r| approved.map_or(true, |a| r.approved == a))
            .filter(|r| comment.map_or(true, |c| r.comment == c))
            .collect()
    }

    /// Sorted distinct non-empty comments, for the filter control.
    pub fn distinct_comments(&self) -> Vec<String> {
        let mut comments: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.comment.clone())
            .filter(|c| !c.is_empty())
            .collect();
        comments.sort();
        comments.dedup();
        comments
    }

    /// Serialize to the sheet's native tabular form: a header row with the
    /// original column titles, then one row per entry with credibility
    /// rendered as the literal `"True"`/`"False"`.
    pub fn to_sheet_rows(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(vec![
            self.titles.id.clone(),
            self.titles.comment.clone(),
            self.titles.credibility.clone(),
        ]);
        for row in &self.rows {
            out.push(vec![
                row.identity.clone(),
                row.comment.clone(),
                if row.approved { "True" } else { "False" }.to_string(),
            ]);
        }
        out
    }
}

/// How [`WorkingCopyManager::sync_with`] left the managed copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshOutcome {
    /// First load of the session.
    Initialized,
    /// Remote fingerprint diverged; local edits were discarded.
    Reloaded,
    /// Copy still matches the remote fingerprint.
    Unchanged,
}

/// Owner of the session's single working copy.
#[derive(Default)]
pub struct WorkingCopyManager {
    inner: RwLock<Option<WorkingCopy>>,
}

impl WorkingCopyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the managed copy with a fresh snapshot.
    ///
    /// Loads the copy on first use; replaces it (bumping the edit-version)
    /// when the snapshot's fingerprint differs from the one the copy was
    /// built under; otherwise leaves it untouched.
    pub fn sync_with(&self, snapshot: &RosterSnapshot) -> RefreshOutcome {
        let mut guard = self.inner.write();
        match guard.as_ref() {
            None => {
                *guard = Some(WorkingCopy::from_snapshot(snapshot, 0));
                RefreshOutcome::Initialized
            }
            Some(copy) if copy.fingerprint() != snapshot.fingerprint => {
                log::info!("remote roster changed; discarding local working copy");
                let version = copy.edit_version() + 1;
                *guard = Some(WorkingCopy::from_snapshot(snapshot, version));
                RefreshOutcome::Reloaded
            }
            Some(_) => RefreshOutcome::Unchanged,
        }
    }

    /// Read access to the copy, if one is loaded.
    pub fn read<R>(&self, f: impl FnOnce(&WorkingCopy) -> R) -> Option<R> {
        self.inner.read().as_ref().map(f)
    }

    /// Write access to the copy, if one is loaded.
    pub fn write<R>(&self, f: impl FnOnce(&mut WorkingCopy) -> R) -> Option<R> {
        self.inner.write().as_mut().map(f)
    }
}
