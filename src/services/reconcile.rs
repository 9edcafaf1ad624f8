//! Reconciliation of an uploaded candidate list against the roster.
//!
//! Every uploaded row is left-joined to the roster on normalized identity
//! and bucketed into exactly one of three partitions:
//!
//! - **rejected**: the matching roster row's credibility is `"false"`
//!   (case-insensitively; roster values are canonicalized at load)
//! - **unknown**: no roster row matches; the operator reviews these with a
//!   pre-selected Rejected status they can flip before committing
//! - **pending**: everything else, i.e. matched with `"true"` or any other
//!   stored value
//!
//! The partitions are disjoint and together cover every uploaded identity.
//! Duplicate identities in the upload are preserved as separate rows.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cache::RosterSnapshot;
use crate::models::{profile_link, Candidate, ReviewStatus};

/// Comment shown for an unknown candidate before the operator writes one.
pub const DEFAULT_UNKNOWN_COMMENT: &str = "No comment yet";

/// A candidate cleared for export consideration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRow {
    pub candidate: Candidate,
    /// Profile link derived from the identity.
    pub link: String,
    /// Include in export; defaults on.
    pub select: bool,
    /// Show historical trend comparison; defaults off.
    pub compare: bool,
}

/// A candidate the roster has already rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub identity: String,
    /// Operator comment from the roster row.
    pub comment: String,
    pub link: String,
}

/// A candidate absent from the roster, awaiting an operator decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownRow {
    pub identity: String,
    pub link: String,
    /// Editable comment, pre-filled with [`DEFAULT_UNKNOWN_COMMENT`].
    pub comment: String,
    /// Pre-selected decision; editable before commit.
    pub status: ReviewStatus,
    /// Whether to write this decision to the roster sheet; defaults off.
    pub include: bool,
}

/// The three disjoint partitions of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub pending: Vec<PendingRow>,
    pub rejected: Vec<RejectedRow>,
    pub unknown: Vec<UnknownRow>,
}

impl MergeOutcome {
    /// All identities across the three partitions, with multiplicity.
    pub fn identity_count(&self) -> usize {
        self.pending.len() + self.rejected.len() + self.unknown.len()
    }
}

/// Partition uploaded candidates against a roster snapshot.
///
/// Deterministic: the output preserves upload order within each partition
/// and depends only on the inputs.
pub fn reconcile(candidates: &[Candidate], roster: &RosterSnapshot) -> MergeOutcome {
    let index = roster.by_identity();

    let mut rejected = Vec::new();
    let mut unknown = Vec::new();
    let mut excluded: HashSet<&str> = HashSet::new();

    for candidate in candidates {
        match index.get(candidate.identity.as_str()) {
            Some(record) if record.is_rejected() => {
                excluded.insert(candidate.identity.as_str());
                rejected.push(RejectedRow {
                    identity: candidate.identity.clone(),
                    comment: record.comment.clone(),
                    link: profile_link(&candidate.identity),
                });
            }
            Some(_) => {}
            None => {
                excluded.insert(candidate.identity.as_str());
                unknown.push(UnknownRow {
                    identity: candidate.identity.clone(),
                    link: profile_link(&candidate.identity),
                    comment: DEFAULT_UNKNOWN_COMMENT.to_string(),
                    status: ReviewStatus::Rejected,
                    include: false,
                });
            }
        }
    }

    // Pending is the complement of the other two partitions within the
    // candidate set, which makes the three exhaustive by construction.
    let pending = candidates
        .iter()
        .filter(|c| !excluded.contains(c.identity.as_str()))
        .map(|c| PendingRow {
            link: profile_link(&c.identity),
            candidate: c.clone(),
            select: true,
            compare: false,
        })
        .collect();

    MergeOutcome {
        pending,
        rejected,
        unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::build_roster_snapshot;
    use proptest::prelude::*;

    fn candidate(identity: &str) -> Candidate {
        Candidate {
            identity: identity.to_string(),
            followers: None,
            post_price: None,
            avg_view: None,
            cost_per_view: None,
            engagement_rate: None,
            avg_like: None,
            avg_comments: None,
            category: String::new(),
        }
    }

    fn roster(rows: &[&[&str]]) -> RosterSnapshot {
        let mut raw = vec![vec![
            "ID".to_string(),
            "Comment".to_string(),
            "Credibility".to_string(),
        ]];
        raw.extend(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<_>>()),
        );
        build_roster_snapshot(raw).unwrap()
    }

    #[test]
    fn test_uploaded_scenario() {
        // Upload [alice, @bob ] against roster [alice -> false].
        let candidates = vec![
            Candidate {
                followers: Some(1000.0),
                ..candidate("alice")
            },
            Candidate {
                followers: Some(500.0),
                ..candidate(&crate::models::normalize("@bob "))
            },
        ];
        let snapshot = roster(&[&["alice", "spam account", "false"]]);

        let outcome = reconcile(&candidates, &snapshot);

        assert_eq!(outcome.pending.len(), 0);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].identity, "alice");
        assert_eq!(outcome.rejected[0].comment, "spam account");
        assert_eq!(outcome.unknown.len(), 1);
        assert_eq!(outcome.unknown[0].identity, "bob");
    }

    #[test]
    fn test_matched_true_is_pending_with_defaults() {
        let snapshot = roster(&[&["alice", "", "true"]]);
        let outcome = reconcile(&[candidate("alice")], &snapshot);

        assert_eq!(outcome.pending.len(), 1);
        let row = &outcome.pending[0];
        assert_eq!(row.link, "https://www.instagram.com/alice");
        assert!(row.select);
        assert!(!row.compare);
    }

    #[test]
    fn test_unmatched_unknown_defaults() {
        let snapshot = roster(&[]);
        let outcome = reconcile(&[candidate("carol")], &snapshot);

        let row = &outcome.unknown[0];
        assert_eq!(row.comment, DEFAULT_UNKNOWN_COMMENT);
        assert_eq!(row.status, ReviewStatus::Rejected);
        assert!(!row.include);
    }

    #[test]
    fn test_credibility_false_any_case_rejects() {
        // Cells are lowercased at snapshot build, so FALSE/False/false all
        // land in the rejected partition.
        for spelling in ["FALSE", "False", "false"] {
            let snapshot = roster(&[&["alice", "", spelling]]);
            let outcome = reconcile(&[candidate("alice")], &snapshot);
            assert_eq!(outcome.rejected.len(), 1, "spelling {:?}", spelling);
        }
    }

    #[test]
    fn test_unexpected_credibility_value_is_pending() {
        let snapshot = roster(&[&["alice", "", "maybe"]]);
        let outcome = reconcile(&[candidate("alice")], &snapshot);
        assert_eq!(outcome.pending.len(), 1);
        assert!(outcome.rejected.is_empty());
        assert!(outcome.unknown.is_empty());
    }

    #[test]
    fn test_duplicate_candidates_preserved() {
        let snapshot = roster(&[&["alice", "", "false"]]);
        let candidates = vec![
            candidate("alice"),
            candidate("alice"),
            candidate("dave"),
            candidate("dave"),
        ];
        let outcome = reconcile(&candidates, &snapshot);

        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.unknown.len(), 2);
        assert_eq!(outcome.identity_count(), candidates.len());
    }

    #[test]
    fn test_deterministic_on_repeated_calls() {
        let snapshot = roster(&[&["alice", "", "false"], &["bob", "", "true"]]);
        let candidates = vec![candidate("alice"), candidate("bob"), candidate("carol")];
        assert_eq!(
            reconcile(&candidates, &snapshot),
            reconcile(&candidates, &snapshot)
        );
    }

    proptest! {
        #[test]
        fn prop_partitions_disjoint_and_exhaustive(
            ids in proptest::collection::vec("[a-c]{1,2}", 0..12),
            roster_rows in proptest::collection::vec(("[a-c]{1,2}", proptest::bool::ANY), 0..6),
        ) {
            let rows: Vec<Vec<&str>> = roster_rows
                .iter()
                .map(|(id, rejected)| {
                    vec![id.as_str(), "", if *rejected { "false" } else { "true" }]
                })
                .collect();
            let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
            let snapshot = roster(&row_refs);

            let candidates: Vec<Candidate> = ids.iter().map(|id| candidate(id)).collect();
            let outcome = reconcile(&candidates, &snapshot);

            // Exhaustive with multiplicity.
            prop_assert_eq!(outcome.identity_count(), candidates.len());

            // Disjoint by identity.
            let pending: std::collections::HashSet<_> =
                outcome.pending.iter().map(|r| r.candidate.identity.clone()).collect();
            let rejected: std::collections::HashSet<_> =
                outcome.rejected.iter().map(|r| r.identity.clone()).collect();
            let unknown: std::collections::HashSet<_> =
                outcome.unknown.iter().map(|r| r.identity.clone()).collect();
            prop_assert!(pending.is_disjoint(&rejected));
            prop_assert!(pending.is_disjoint(&unknown));
            prop_assert!(rejected.is_disjoint(&unknown));

            // Union covers exactly the uploaded identities.
            let mut union = pending;
            union.extend(rejected);
            union.extend(unknown);
            let uploaded: std::collections::HashSet<_> =
                candidates.iter().map(|c| c.identity.clone()).collect();
            prop_assert_eq!(union, uploaded);
        }
    }
}
