//! Worksheet store traits.
//!
//! The authoritative roster lives in a remote row-oriented workbook. This
//! crate consumes it through these traits only; the transport behind them is
//! out of scope and swappable.

use async_trait::async_trait;
use std::sync::Arc;

use super::error::StoreResult;

/// A single worksheet: raw string rows, header row first.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait WorksheetStore: Send + Sync {
    /// Fetch all rows, header row included, every cell as a string.
    ///
    /// Idempotent read; eligible for bounded retry by the caller.
    async fn get_all_rows(&self) -> StoreResult<Vec<Vec<String>>>;

    /// Remove all rows from the worksheet.
    ///
    /// Destructive; never retried.
    async fn clear(&self) -> StoreResult<()>;

    /// Replace worksheet content starting at row 1.
    ///
    /// Destructive; never retried. A failure after a preceding [`clear`]
    /// leaves the remote in a partial state the caller must treat as
    /// unknown.
    ///
    /// [`clear`]: WorksheetStore::clear
    async fn write_rows(&self, rows: Vec<Vec<String>>) -> StoreResult<()>;

    /// Append rows after the current last row without disturbing existing
    /// content.
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> StoreResult<()>;
}

/// A workbook holding named worksheets, reached through an authorized
/// session.
#[async_trait]
pub trait WorkbookStore: Send + Sync {
    /// Perform the credential handshake with the remote store.
    ///
    /// The handshake is idempotent and may be wrapped in bounded retry; a
    /// credential rejection surfaces as [`StoreError::AuthError`] and must
    /// not be retried further.
    ///
    /// [`StoreError::AuthError`]: super::error::StoreError::AuthError
    async fn authorize(&self) -> StoreResult<()>;

    /// Open a worksheet by title.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn WorksheetStore>)` - Handle to the worksheet
    /// * `Err(StoreError::NotFound)` - When no worksheet has that title
    async fn worksheet(&self, title: &str) -> StoreResult<Arc<dyn WorksheetStore>>;

    /// Check whether the remote store is reachable.
    async fn health_check(&self) -> StoreResult<bool>;
}
