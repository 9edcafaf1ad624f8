//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Handlers never hold in-process locks
//! across awaits: cache loads happen first, lock-bound work runs in sync
//! closures after.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    ApprovalsRequest, ApprovalsResponse, EditRequest, EditResponse, ExportRequest, HealthResponse,
    HistoryQuery, RosterQuery, RosterViewResponse, SyncResponse, UploadRequest, UploadResponse,
    UpsertRequest, UpsertResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{ExportTable, HistoryData, RowKey, UpsertOutcome};
use crate::models::normalize;
use crate::services::working_copy::RefreshOutcome;
use crate::services::{build_export, history_data, reconcile};
use crate::store::WorkbookStore;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the remote
/// store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match state.workbook.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
    }))
}

// =============================================================================
// Upload Reconciliation
// =============================================================================

/// POST /v1/uploads
///
/// Ingest an uploaded candidate file and reconcile it against the current
/// roster. Re-posting identical bytes reuses the parsed upload.
pub async fn ingest_upload(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> HandlerResult<UploadResponse> {
    let (session, reused) = state.uploads.ingest(&request.rows, request.filename)?;
    let view = state.merge_cache.load().await?;
    let outcome = reconcile(&session.candidates, &view.roster);

    Ok(Json(UploadResponse {
        digest: session.digest.to_string(),
        reused,
        candidate_count: session.candidates.len(),
        outcome,
    }))
}

/// GET /v1/uploads/{digest}
///
/// Re-reconcile a previously ingested upload against the current roster.
pub async fn get_reconciliation(
    State(state): State<AppState>,
    Path(digest): Path<String>,
) -> HandlerResult<UploadResponse> {
    let session = state
        .uploads
        .get(&digest)
        .ok_or_else(|| AppError::NotFound(format!("no upload with digest {}", digest)))?;

    let view = state.merge_cache.load().await?;
    let outcome = reconcile(&session.candidates, &view.roster);

    Ok(Json(UploadResponse {
        digest: session.digest.to_string(),
        reused: true,
        candidate_count: session.candidates.len(),
        outcome,
    }))
}

/// POST /v1/uploads/{digest}/approvals
///
/// Commit operator decisions on unknown candidates by appending them to the
/// roster sheet.
pub async fn append_approvals(
    State(state): State<AppState>,
    Path(digest): Path<String>,
    Json(request): Json<ApprovalsRequest>,
) -> HandlerResult<ApprovalsResponse> {
    // The digest ties the decisions to a live upload session.
    state
        .uploads
        .get(&digest)
        .ok_or_else(|| AppError::NotFound(format!("no upload with digest {}", digest)))?;

    let appended = crate::services::append_review_decisions(
        state.roster_sheet.as_ref(),
        &request.decisions,
        &state.signal,
    )
    .await?;

    Ok(Json(ApprovalsResponse { appended }))
}

/// POST /v1/uploads/{digest}/export
///
/// Build the export table for the selected pending candidates of an upload.
pub async fn export_upload(
    State(state): State<AppState>,
    Path(digest): Path<String>,
    Json(request): Json<ExportRequest>,
) -> HandlerResult<ExportTable> {
    let session = state
        .uploads
        .get(&digest)
        .ok_or_else(|| AppError::NotFound(format!("no upload with digest {}", digest)))?;

    let view = state.merge_cache.load().await?;
    let outcome = reconcile(&session.candidates, &view.roster);
    let export = build_export(&session, &outcome, request.selected.as_deref());

    Ok(Json(export))
}

// =============================================================================
// Historical Comparison
// =============================================================================

/// GET /v1/influencers/{identity}/history
///
/// Historical trend series for one identity, optionally paired with the
/// candidate's current metrics from an upload session.
pub async fn get_history(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> HandlerResult<HistoryData> {
    let session = match query.digest.as_deref() {
        Some(digest) => Some(state.uploads.get(digest).ok_or_else(|| {
            AppError::NotFound(format!("no upload with digest {}", digest))
        })?),
        None => None,
    };

    let view = state.merge_cache.load().await?;
    let candidate = session.as_deref().and_then(|s| s.candidate(&identity));

    Ok(Json(history_data(&view.metrics, &identity, candidate)))
}

// =============================================================================
// Roster Review View
// =============================================================================

/// GET /v1/roster
///
/// The working copy of the roster, filtered for the review view. Loading
/// the view also runs the fingerprint check: when the remote roster changed
/// underneath a live working copy, local edits are discarded and the
/// response flags the reload.
pub async fn get_roster(
    State(state): State<AppState>,
    Query(query): Query<RosterQuery>,
) -> HandlerResult<RosterViewResponse> {
    let approved = match query.credibility.as_deref() {
        None => None,
        Some("approved") => Some(true),
        Some("rejected") => Some(false),
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "unknown credibility filter '{}'; expected 'approved' or 'rejected'",
                other
            )))
        }
    };

    let view = state.review_cache.load().await?;
    let refresh = state.working.sync_with(&view.roster);

    let response = state
        .working
        .read(|copy| RosterViewResponse {
            rows: copy
                .filtered(approved, query.comment.as_deref())
                .into_iter()
                .cloned()
                .collect(),
            total: copy.rows().len(),
            edit_version: copy.edit_version(),
            reloaded: refresh == RefreshOutcome::Reloaded,
            comments: copy.distinct_comments(),
        })
        .ok_or_else(|| AppError::Internal("working copy missing after sync".to_string()))?;

    Ok(Json(response))
}

/// POST /v1/roster/edits
///
/// Apply one row edit to the working copy. Proposing the stored values is a
/// no-op and does not bump the edit-version.
pub async fn apply_edit(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> HandlerResult<EditResponse> {
    let view = state.review_cache.load().await?;
    state.working.sync_with(&view.roster);

    let (changed, edit_version) = state
        .working
        .write(|copy| {
            let changed = copy.apply_edit(RowKey(request.key), request.approved, &request.comment);
            (changed, copy.edit_version())
        })
        .ok_or_else(|| AppError::Internal("working copy missing after sync".to_string()))?;

    Ok(Json(EditResponse {
        changed,
        edit_version,
    }))
}

/// POST /v1/roster/entries
///
/// Add a new influencer to the working copy, or update the existing row
/// holding the same identity.
pub async fn upsert_entry(
    State(state): State<AppState>,
    Json(request): Json<UpsertRequest>,
) -> HandlerResult<UpsertResponse> {
    if normalize(&request.identity).is_empty() {
        return Err(AppError::BadRequest(
            "identity must not be empty".to_string(),
        ));
    }

    let view = state.review_cache.load().await?;
    state.working.sync_with(&view.roster);

    let (outcome, edit_version) = state
        .working
        .write(|copy| {
            let outcome = copy.upsert(&request.identity, request.approved, &request.comment);
            (outcome, copy.edit_version())
        })
        .ok_or_else(|| AppError::Internal("working copy missing after sync".to_string()))?;

    Ok(Json(UpsertResponse {
        outcome: match outcome {
            UpsertOutcome::Added(_) => "added".to_string(),
            UpsertOutcome::Updated(_) => "updated".to_string(),
        },
        key: outcome.key().value(),
        edit_version,
    }))
}

/// POST /v1/roster/sync
///
/// Push the working copy to the roster sheet as a full overwrite. On
/// failure the remote state is unknown: both caches are invalidated so the
/// next load re-fetches and re-fingerprints before anything trusts it.
pub async fn sync_roster(State(state): State<AppState>) -> HandlerResult<SyncResponse> {
    let rows = state
        .working
        .read(|copy| copy.to_sheet_rows())
        .ok_or_else(|| {
            AppError::BadRequest("no working copy loaded; fetch /v1/roster first".to_string())
        })?;

    match crate::services::push_working_copy(state.roster_sheet.as_ref(), rows, &state.signal).await
    {
        Ok(rows_written) => Ok(Json(SyncResponse {
            rows_written,
            message: "roster sheet updated".to_string(),
        })),
        Err(err) => {
            state.merge_cache.invalidate();
            state.review_cache.invalidate();
            Err(err.into())
        }
    }
}
