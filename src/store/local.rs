//! In-memory worksheet store implementation.
//!
//! Backs unit tests and local development. All data lives in memory behind
//! `RwLock`s, giving fast, deterministic, isolated execution. Failure
//! injection hooks mimic the error classes a real transport produces.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::error::{ErrorContext, StoreError, StoreResult};
use super::worksheet::{WorkbookStore, WorksheetStore};

/// In-memory worksheet.
#[derive(Clone)]
pub struct LocalWorksheet {
    title: String,
    rows: Arc<RwLock<Vec<Vec<String>>>>,
    healthy: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl LocalWorksheet {
    /// Create an empty worksheet with a title and a shared health flag.
    fn new(title: impl Into<String>, healthy: Arc<AtomicBool>) -> Self {
        Self {
            title: title.into(),
            rows: Arc::new(RwLock::new(Vec::new())),
            healthy,
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the worksheet content directly, bypassing the store contract.
    ///
    /// Test/setup helper; does not count as a push.
    pub fn seed(&self, rows: Vec<Vec<String>>) {
        *self.rows.write().unwrap_or_else(|e| e.into_inner()) = rows;
    }

    /// Snapshot of the current rows, for assertions.
    pub fn rows_snapshot(&self) -> Vec<Vec<String>> {
        self.rows.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make `write_rows`/`append_rows` fail while `clear` still succeeds,
    /// simulating a partial overwrite.
    pub fn set_write_failure(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_health(&self, operation: &str) -> StoreResult<()> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(StoreError::io_with_context(
                "remote store unreachable",
                ErrorContext::new(operation).with_entity(self.title.clone()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WorksheetStore for LocalWorksheet {
    async fn get_all_rows(&self) -> StoreResult<Vec<Vec<String>>> {
        self.check_health("get_all_rows")?;
        Ok(self.rows_snapshot())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.check_health("clear")?;
        self.rows.write().unwrap_or_else(|e| e.into_inner()).clear();
        Ok(())
    }

    async fn write_rows(&self, rows: Vec<Vec<String>>) -> StoreResult<()> {
        self.check_health("write_rows")?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io_with_context(
                "write rejected by remote store",
                ErrorContext::new("write_rows").with_entity(self.title.clone()),
            ));
        }
        let mut guard = self.rows.write().unwrap_or_else(|e| e.into_inner());
        // write_rows replaces content starting at row 1; rows beyond the
        // written range survive, which is why callers clear first.
        for (i, row) in rows.into_iter().enumerate() {
            if i < guard.len() {
                guard[i] = row;
            } else {
                guard.push(row);
            }
        }
        Ok(())
    }

    async fn append_rows(&self, rows: Vec<Vec<String>>) -> StoreResult<()> {
        self.check_health("append_rows")?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io_with_context(
                "write rejected by remote store",
                ErrorContext::new("append_rows").with_entity(self.title.clone()),
            ));
        }
        self.rows
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .extend(rows);
        Ok(())
    }
}

/// In-memory workbook holding named worksheets.
///
/// # Example
/// ```
/// use ivc_rust::store::LocalWorkbook;
///
/// let workbook = LocalWorkbook::new(&["Influencers List", "Master"]);
/// let sheet = workbook.sheet("Influencers List").unwrap();
/// sheet.seed(vec![vec!["ID".into(), "Comment".into(), "Credibility".into()]]);
/// ```
#[derive(Clone)]
pub struct LocalWorkbook {
    sheets: Arc<HashMap<String, LocalWorksheet>>,
    healthy: Arc<AtomicBool>,
    reject_credentials: Arc<AtomicBool>,
}

impl LocalWorkbook {
    /// Create a workbook with the given worksheet titles, all empty.
    pub fn new(titles: &[&str]) -> Self {
        let healthy = Arc::new(AtomicBool::new(true));
        let sheets = titles
            .iter()
            .map(|t| (t.to_string(), LocalWorksheet::new(*t, Arc::clone(&healthy))))
            .collect();
        Self {
            sheets: Arc::new(sheets),
            healthy,
            reject_credentials: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Direct (non-trait) access to a worksheet for seeding and assertions.
    pub fn sheet(&self, title: &str) -> Option<&LocalWorksheet> {
        self.sheets.get(title)
    }

    /// Set the health flag shared by every worksheet, for simulating
    /// transient transport failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Make the next `authorize` calls fail as a credential rejection.
    pub fn set_reject_credentials(&self, reject: bool) {
        self.reject_credentials.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorkbookStore for LocalWorkbook {
    async fn authorize(&self) -> StoreResult<()> {
        if self.reject_credentials.load(Ordering::SeqCst) {
            return Err(StoreError::auth("service account credentials rejected"));
        }
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(StoreError::io("remote store unreachable"));
        }
        Ok(())
    }

    async fn worksheet(&self, title: &str) -> StoreResult<Arc<dyn WorksheetStore>> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(StoreError::io_with_context(
                "remote store unreachable",
                ErrorContext::new("worksheet").with_entity(title.to_string()),
            ));
        }
        match self.sheets.get(title) {
            Some(sheet) => Ok(Arc::new(sheet.clone())),
            None => Err(StoreError::not_found_with_context(
                format!("worksheet '{}' not found", title),
                ErrorContext::new("worksheet").with_entity(title.to_string()),
            )),
        }
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}
