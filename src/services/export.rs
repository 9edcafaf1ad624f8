//! Export of selected pending candidates.
//!
//! The downstream consumer expects a fixed column layout with blank spacer
//! columns: ID, four blanks, page link, category, one blank, follower
//! count, engagement rate, average likes, average comments, one blank, post
//! price. Values are mapped back through the original upload by identity.
//! File materialization (xlsx/csv) happens client-side; this service
//! produces the tabular payload.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::normalize;
use crate::services::reconcile::MergeOutcome;
use crate::services::upload::UploadSession;

/// Tabular export payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTable {
    pub filename: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Render an optional metric without trailing `.0` noise for whole numbers.
fn render(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
    }
}

/// Build the export table for the pending partition of an upload.
///
/// `selected` filters by identity (normalized); `None` exports every
/// pending row, matching the select-by-default flag.
pub fn build_export(
    session: &UploadSession,
    outcome: &MergeOutcome,
    selected: Option<&[String]>,
) -> ExportTable {
    let filter: Option<HashSet<String>> =
        selected.map(|ids| ids.iter().map(|id| normalize(id)).collect());

    let headers: Vec<String> = [
        "ID", "", "", "", "", "Page link", "Category", "", "Follower", "ER", "Ave Like",
        "Ave Comment", "", "Post Price",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let rows = outcome
        .pending
        .iter()
        .filter(|row| {
            filter
                .as_ref()
                .map_or(true, |ids| ids.contains(&row.candidate.identity))
        })
        .map(|row| {
            // Map numbers back through the upload rather than trusting any
            // edited display copy.
            let candidate = session
                .candidate(&row.candidate.identity)
                .unwrap_or(&row.candidate);
            vec![
                candidate.identity.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                row.link.clone(),
                candidate.category.clone(),
                String::new(),
                render(candidate.followers),
                render(candidate.engagement_rate),
                render(candidate.avg_like),
                render(candidate.avg_comments),
                String::new(),
                render(candidate.post_price),
            ]
        })
        .collect();

    ExportTable {
        filename: "selected_influencers.xlsx".to_string(),
        headers,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::build_roster_snapshot;
    use crate::services::reconcile::reconcile;
    use crate::services::upload::UploadRegistry;

    fn session_and_outcome() -> (std::sync::Arc<UploadSession>, MergeOutcome) {
        let upload: Vec<Vec<String>> = vec![
            vec!["ID", "Followers", "IER", "Avg like", "Avg comments", "Post price", "Category"],
            vec!["alice", "1000", "3.5", "120", "14", "250", "beauty"],
            vec!["bob", "500", "", "", "", "90", "tech"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();

        let registry = UploadRegistry::new();
        let (session, _) = registry.ingest(&upload, None).unwrap();

        let roster = build_roster_snapshot(
            vec![
                vec!["ID", "Comment", "Credibility"],
                vec!["alice", "", "true"],
                vec!["bob", "", "true"],
            ]
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect(),
        )
        .unwrap();
        let outcome = reconcile(&session.candidates, &roster);
        (session, outcome)
    }

    #[test]
    fn test_layout_and_mapping() {
        let (session, outcome) = session_and_outcome();
        let export = build_export(&session, &outcome, None);

        assert_eq!(export.headers.len(), 14);
        assert_eq!(export.headers[0], "ID");
        assert_eq!(export.headers[5], "Page link");
        assert_eq!(export.headers[13], "Post Price");
        // Spacer columns are blank.
        for spacer in [1, 2, 3, 4, 7, 12] {
            assert_eq!(export.headers[spacer], "");
        }

        assert_eq!(export.rows.len(), 2);
        let alice = &export.rows[0];
        assert_eq!(alice.len(), export.headers.len());
        assert_eq!(alice[0], "alice");
        assert_eq!(alice[5], "https://www.instagram.com/alice");
        assert_eq!(alice[6], "beauty");
        assert_eq!(alice[8], "1000");
        assert_eq!(alice[9], "3.5");
        assert_eq!(alice[13], "250");
    }

    #[test]
    fn test_selected_filter() {
        let (session, outcome) = session_and_outcome();
        let export = build_export(&session, &outcome, Some(&["@bob ".to_string()]));

        assert_eq!(export.rows.len(), 1);
        assert_eq!(export.rows[0][0], "bob");
        // Missing metrics render as empty cells.
        assert_eq!(export.rows[0][9], "");
    }

    #[test]
    fn test_empty_selection_exports_nothing() {
        let (session, outcome) = session_and_outcome();
        let export = build_export(&session, &outcome, Some(&[]));
        assert!(export.rows.is_empty());
    }
}
