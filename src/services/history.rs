//! Historical trend data for a single identity.
//!
//! Pulls the identity's publication events out of the metrics snapshot,
//! ordered by publication date ascending for charting, and pairs them with
//! the candidate's current numbers from an upload session when one is in
//! scope.

use serde::{Deserialize, Serialize};

use crate::cache::MetricsSnapshot;
use crate::models::{normalize, Candidate};

/// One charted publication event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Raw publication-date cell, as charted on the x axis.
    pub date: String,
    pub post_price: Option<f64>,
    pub follower: Option<f64>,
    pub avg_view: Option<f64>,
    pub cost_per_view: Option<f64>,
    pub category: Option<String>,
}

/// The candidate's current numbers, for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    pub post_price: Option<f64>,
    pub followers: Option<f64>,
    pub avg_view: Option<f64>,
    pub cost_per_view: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub avg_like: Option<f64>,
    pub avg_comments: Option<f64>,
    pub category: String,
}

impl From<&Candidate> for CurrentMetrics {
    fn from(candidate: &Candidate) -> Self {
        Self {
            post_price: candidate.post_price,
            followers: candidate.followers,
            avg_view: candidate.avg_view,
            cost_per_view: candidate.cost_per_view,
            engagement_rate: candidate.engagement_rate,
            avg_like: candidate.avg_like,
            avg_comments: candidate.avg_comments,
            category: candidate.category.clone(),
        }
    }
}

/// Trend payload for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub identity: String,
    /// Publication events, oldest first.
    pub points: Vec<HistoryPoint>,
    /// Present when an upload session supplies current numbers.
    pub current: Option<CurrentMetrics>,
}

/// Build the trend payload for `identity`.
///
/// Events with unparseable dates sort after all dated events, keeping their
/// relative sheet order.
pub fn history_data(
    metrics: &MetricsSnapshot,
    identity: &str,
    candidate: Option<&Candidate>,
) -> HistoryData {
    let identity = normalize(identity);

    let mut events: Vec<_> = metrics
        .metrics
        .iter()
        .filter(|m| m.identity == identity)
        .collect();
    events.sort_by_key(|m| (m.published_on.is_none(), m.published_on));

    let points = events
        .into_iter()
        .map(|m| HistoryPoint {
            date: m.publication_date.clone(),
            post_price: m.post_price,
            follower: m.follower,
            avg_view: m.avg_view,
            cost_per_view: m.cost_per_view,
            category: m.category.clone(),
        })
        .collect();

    HistoryData {
        identity,
        points,
        current: candidate.map(CurrentMetrics::from),
    }
}
