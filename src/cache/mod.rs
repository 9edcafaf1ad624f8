//! Roster cache: TTL-bounded snapshots of the authoritative worksheets.
//!
//! Each dashboard view owns a cache instance with its own time-to-live (the
//! merge view refreshes more aggressively than the review view). All
//! instances share one [`ChangeSignal`]; a successful push advances the
//! signal's generation, which every cache treats as an implicit
//! invalidation, so no view serves pre-push data after a sync.
//!
//! A failed refresh surfaces the error to the caller and commits nothing:
//! whatever was cached before stays in place until a refresh succeeds or
//! [`RosterCache::invalidate`] drops it.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::RowKey;
use crate::models::{
    normalize, parse_metric, parse_publication_date, HistoricalMetric, RawTable, RosterRecord,
    SchemaBinding,
};
use crate::store::{
    roster_fingerprint, RetryPolicy, StoreError, StoreResult, WorksheetStore,
};

/// Monotonic generation counter shared by caches and the sync coordinator.
///
/// Cloning shares the underlying counter. A bumped generation tells every
/// cache that its TTL no longer applies.
#[derive(Clone, Default)]
pub struct ChangeSignal(Arc<AtomicU64>);

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the remote roster changed.
    pub fn notify(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Current generation; changes whenever [`notify`] fires.
    ///
    /// [`notify`]: ChangeSignal::notify
    pub fn generation(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Typed snapshot of the roster sheet at one point in time.
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    pub records: Vec<RosterRecord>,
    pub binding: SchemaBinding,
    /// Fingerprint of the raw rows this snapshot was built from.
    pub fingerprint: String,
}

impl RosterSnapshot {
    /// Join-key index over the records. First occurrence wins, matching the
    /// roster's identity-uniqueness contract.
    pub fn by_identity(&self) -> HashMap<&str, &RosterRecord> {
        let mut index = HashMap::with_capacity(self.records.len());
        for record in &self.records {
            index.entry(record.identity.as_str()).or_insert(record);
        }
        index
    }
}

/// Typed snapshot of the metrics history sheet.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub metrics: Vec<HistoricalMetric>,
}

/// Both snapshots from one cache load.
#[derive(Clone)]
pub struct RosterView {
    pub roster: Arc<RosterSnapshot>,
    pub metrics: Arc<MetricsSnapshot>,
}

struct CachedLoad {
    view: RosterView,
    loaded_at: Instant,
    generation: u64,
}

/// TTL-bounded cache over the roster and metrics worksheets.
pub struct RosterCache {
    roster_sheet: Arc<dyn WorksheetStore>,
    metrics_sheet: Option<Arc<dyn WorksheetStore>>,
    ttl: Duration,
    retry: RetryPolicy,
    signal: ChangeSignal,
    state: Mutex<Option<CachedLoad>>,
}

impl RosterCache {
    pub fn new(
        roster_sheet: Arc<dyn WorksheetStore>,
        metrics_sheet: Option<Arc<dyn WorksheetStore>>,
        ttl: Duration,
        retry: RetryPolicy,
        signal: ChangeSignal,
    ) -> Self {
        Self {
            roster_sheet,
            metrics_sheet,
            ttl,
            retry,
            signal,
            state: Mutex::new(None),
        }
    }

    /// Return the cached view, refreshing from the store when the TTL has
    /// lapsed, the change signal advanced, or the cache was invalidated.
    pub async fn load(&self) -> StoreResult<RosterView> {
        let generation = self.signal.generation();

        {
            let state = self.state.lock();
            if let Some(cached) = state.as_ref() {
                if cached.generation == generation && cached.loaded_at.elapsed() < self.ttl {
                    return Ok(cached.view.clone());
                }
            }
        }

        // Fetch outside the lock; commit only a fully built view.
        let roster_raw = self
            .retry
            .run(|| self.roster_sheet.get_all_rows())
            .await?;
        let metrics_raw = match &self.metrics_sheet {
            Some(sheet) => self.retry.run(|| sheet.get_all_rows()).await?,
            None => Vec::new(),
        };

        let view = RosterView {
            roster: Arc::new(build_roster_snapshot(roster_raw)?),
            metrics: Arc::new(build_metrics_snapshot(metrics_raw)),
        };

        let mut state = self.state.lock();
        *state = Some(CachedLoad {
            view: view.clone(),
            loaded_at: Instant::now(),
            generation,
        });
        Ok(view)
    }

    /// Drop the cached view; the next [`load`] re-fetches.
    ///
    /// [`load`]: RosterCache::load
    pub fn invalidate(&self) {
        *self.state.lock() = None;
    }
}

/// Build a typed roster snapshot from raw worksheet rows.
///
/// Defaults applied here, once: missing credibility column reads `"false"`,
/// missing comment column reads `""`, credibility cells are trimmed and
/// lowercased, identities normalized. An empty payload is a valid empty
/// roster.
pub fn build_roster_snapshot(raw: Vec<Vec<String>>) -> StoreResult<RosterSnapshot> {
    let fingerprint = roster_fingerprint(&raw);
    let table = RawTable::from_rows(raw);

    if table.headers().is_empty() {
        return Ok(RosterSnapshot {
            records: Vec::new(),
            binding: SchemaBinding {
                id_col: 0,
                credibility_col: None,
                comment_col: None,
                id_title: "ID".to_string(),
                credibility_title: "Credibility".to_string(),
                comment_title: "Comment".to_string(),
            },
            fingerprint,
        });
    }

    let binding = SchemaBinding::resolve(&table)
        .map_err(|e| StoreError::data_shape(e.to_string()).with_operation("load_roster"))?;

    let records = (0..table.rows().len())
        .map(|i| RosterRecord {
            key: RowKey(i as u64),
            identity: normalize(table.cell(i, binding.id_col)),
            credibility: match binding.credibility_col {
                Some(col) => table.cell(i, col).trim().to_lowercase(),
                None => "false".to_string(),
            },
            comment: match binding.comment_col {
                Some(col) => table.cell(i, col).to_string(),
                None => String::new(),
            },
        })
        .collect();

    Ok(RosterSnapshot {
        records,
        binding,
        fingerprint,
    })
}

/// Build a typed metrics snapshot from raw worksheet rows.
///
/// Columns are resolved by substring once; metric columns the sheet lacks
/// read as `None` for every row.
pub fn build_metrics_snapshot(raw: Vec<Vec<String>>) -> MetricsSnapshot {
    let table = RawTable::from_rows(raw);
    if table.headers().is_empty() {
        return MetricsSnapshot::default();
    }

    let id_col = match table.column_containing("ID") {
        Some(col) => col,
        None => return MetricsSnapshot::default(),
    };
    let date_col = table.column_containing("Publication date");
    let price_col = table.column_containing("Post Price");
    let follower_col = table.column_containing("Follower");
    let view_col = table.column_containing("Avg View");
    let cpv_col = table.column_containing("CPV");
    let category_col = table.column_containing("Category");

    let number = |row: usize, col: Option<usize>| col.and_then(|c| parse_metric(table.cell(row, c)));

    let metrics = (0..table.rows().len())
        .map(|i| {
            let raw_date = date_col.map(|c| table.cell(i, c).to_string()).unwrap_or_default();
            HistoricalMetric {
                identity: normalize(table.cell(i, id_col)),
                published_on: parse_publication_date(&raw_date),
                publication_date: raw_date,
                post_price: number(i, price_col),
                follower: number(i, follower_col),
                avg_view: number(i, view_col),
                cost_per_view: number(i, cpv_col),
                category: category_col
                    .map(|c| table.cell(i, c).to_string())
                    .filter(|v| !v.is_empty()),
            }
        })
        .collect();

    MetricsSnapshot { metrics }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_roster_snapshot_normalizes_and_lowercases() {
        let snapshot = build_roster_snapshot(rows(&[
            &["ID", "Comment", "Credibility"],
            &["@Alice ", "solid", "TRUE"],
            &["bob", "", "False"],
        ]))
        .unwrap();

        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].identity, "Alice");
        assert_eq!(snapshot.records[0].credibility, "true");
        assert_eq!(snapshot.records[1].credibility, "false");
        assert_eq!(snapshot.records[0].key, RowKey(0));
    }

    #[test]
    fn test_roster_snapshot_defaults_missing_columns() {
        let snapshot =
            build_roster_snapshot(rows(&[&["Handle"], &["alice"], &["bob"]])).unwrap();
        for record in &snapshot.records {
            assert_eq!(record.credibility, "false");
            assert_eq!(record.comment, "");
        }
        assert_eq!(snapshot.binding.credibility_title, "Credibility");
    }

    #[test]
    fn test_roster_snapshot_empty_payload() {
        let snapshot = build_roster_snapshot(Vec::new()).unwrap();
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.binding.id_title, "ID");
    }

    #[test]
    fn test_roster_snapshot_keeps_empty_credibility_cells() {
        // An existing credibility column with a blank cell stays blank; the
        // "false" default applies only when the whole column is absent.
        let snapshot = build_roster_snapshot(rows(&[
            &["ID", "Credibility"],
            &["alice", ""],
        ]))
        .unwrap();
        assert_eq!(snapshot.records[0].credibility, "");
        assert!(!snapshot.records[0].is_rejected());
    }

    #[test]
    fn test_by_identity_first_occurrence_wins() {
        let snapshot = build_roster_snapshot(rows(&[
            &["ID", "Comment", "Credibility"],
            &["alice", "first", "true"],
            &["alice", "second", "false"],
        ]))
        .unwrap();
        let index = snapshot.by_identity();
        assert_eq!(index["alice"].comment, "first");
    }

    #[test]
    fn test_metrics_snapshot_typed_columns() {
        let snapshot = build_metrics_snapshot(rows(&[
            &["ID", "Publication date(Miladi)", "Post Price", "Follower", "Avg View", "CPV"],
            &["@alice", "2024-02-01", "1500", "20000", "bad", ""],
        ]));
        let metric = &snapshot.metrics[0];
        assert_eq!(metric.identity, "alice");
        assert_eq!(metric.post_price, Some(1500.0));
        assert_eq!(metric.follower, Some(20000.0));
        assert_eq!(metric.avg_view, None);
        assert_eq!(metric.cost_per_view, None);
        assert!(metric.published_on.is_some());
    }

    #[test]
    fn test_change_signal_generations() {
        let signal = ChangeSignal::new();
        let observer = signal.clone();
        let before = observer.generation();
        signal.notify();
        assert_ne!(observer.generation(), before);
    }
}
