//! Application state for the HTTP server.

use std::sync::Arc;

use crate::cache::{ChangeSignal, RosterCache};
use crate::services::upload::UploadRegistry;
use crate::services::working_copy::WorkingCopyManager;
use crate::store::{AppConfig, StoreResult, WorkbookStore, WorksheetStore};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Workbook handle, used for health checks.
    pub workbook: Arc<dyn WorkbookStore>,
    /// Roster worksheet, target of pushes and appends.
    pub roster_sheet: Arc<dyn WorksheetStore>,
    /// Cache backing the merge (upload reconciliation) view.
    pub merge_cache: Arc<RosterCache>,
    /// Cache backing the credibility review view.
    pub review_cache: Arc<RosterCache>,
    /// Shared roster-changed signal.
    pub signal: ChangeSignal,
    /// Parsed uploads, keyed by content digest.
    pub uploads: Arc<UploadRegistry>,
    /// The session's working copy of the roster.
    pub working: Arc<WorkingCopyManager>,
}

impl AppState {
    /// Authorize against the workbook, resolve the worksheets, and wire up
    /// the caches.
    ///
    /// The handshake and worksheet lookups go through the configured retry
    /// policy; a credential rejection or missing worksheet surfaces
    /// immediately.
    pub async fn initialize(
        workbook: Arc<dyn WorkbookStore>,
        config: &AppConfig,
    ) -> StoreResult<Self> {
        let retry = config.retry.policy();

        retry.run(|| workbook.authorize()).await?;

        let roster_title = config.workbook.roster_sheet.clone();
        let metrics_title = config.workbook.metrics_sheet.clone();
        let roster_sheet = retry.run(|| workbook.worksheet(&roster_title)).await?;
        let metrics_sheet = retry.run(|| workbook.worksheet(&metrics_title)).await?;

        let signal = ChangeSignal::new();
        let merge_cache = Arc::new(RosterCache::new(
            Arc::clone(&roster_sheet),
            Some(metrics_sheet),
            config.cache.merge_ttl(),
            retry,
            signal.clone(),
        ));
        let review_cache = Arc::new(RosterCache::new(
            Arc::clone(&roster_sheet),
            None,
            config.cache.review_ttl(),
            retry,
            signal.clone(),
        ));

        Ok(Self {
            workbook,
            roster_sheet,
            merge_cache,
            review_cache,
            signal,
            uploads: Arc::new(UploadRegistry::new()),
            working: Arc::new(WorkingCopyManager::new()),
        })
    }
}
