//! Typed records for the roster, the metrics history, and uploaded candidates.
//!
//! Worksheet data arrives as raw string cells; these types are the result of
//! the one-time schema-mapping step performed at load time, so downstream
//! code never re-parses cells or branches on column absence.

use serde::{Deserialize, Serialize};

use crate::api::RowKey;

/// Review outcome an operator can assign to an unknown candidate.
///
/// The worksheet stores credibility as the literal strings `"True"` and
/// `"False"`; [`ReviewStatus::sheet_literal`] is the only place that mapping
/// lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// The literal string written to the credibility column of the sheet.
    pub fn sheet_literal(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "True",
            ReviewStatus::Rejected => "False",
        }
    }
}

/// One row of the authoritative roster sheet.
///
/// `credibility` holds the trimmed, lowercased raw cell value. The merge view
/// buckets a matched candidate as rejected only when the value equals
/// `"false"`; any other stored value leaves the candidate pending. The review
/// view treats exactly `"true"` as approved. Both interpretations read the
/// same canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    /// Stable synthetic row identifier (origin index at load time).
    pub key: RowKey,
    /// Normalized identity, the join key.
    pub identity: String,
    /// Canonical (trimmed, lowercased) credibility cell; `"false"` when the
    /// sheet has no credibility column.
    pub credibility: String,
    /// Free-text operator comment, `""` when the sheet has no comment column.
    pub comment: String,
}

impl RosterRecord {
    /// Whether the merge view buckets a matching candidate as rejected.
    pub fn is_rejected(&self) -> bool {
        self.credibility == "false"
    }

    /// Whether the review view shows this row as approved.
    pub fn is_approved(&self) -> bool {
        self.credibility == "true"
    }
}

/// One publication event from the metrics history sheet.
///
/// Append-only and read-only from this crate's perspective; used for trend
/// comparison against a candidate's current numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMetric {
    /// Normalized identity this event belongs to.
    pub identity: String,
    /// Raw publication-date cell, preserved for display.
    pub publication_date: String,
    /// Parsed publication date, used only for ordering. `None` when the raw
    /// cell does not parse.
    pub published_on: Option<chrono::NaiveDate>,
    pub post_price: Option<f64>,
    pub follower: Option<f64>,
    pub avg_view: Option<f64>,
    pub cost_per_view: Option<f64>,
    pub category: Option<String>,
}

/// One row of an uploaded candidate file after schema mapping.
///
/// Metric columns the upload does not carry are `None`; unparseable numeric
/// cells also collapse to `None` rather than aborting the upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Normalized identity, the join key.
    pub identity: String,
    pub followers: Option<f64>,
    pub post_price: Option<f64>,
    pub avg_view: Option<f64>,
    pub cost_per_view: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub avg_like: Option<f64>,
    pub avg_comments: Option<f64>,
    /// Category label, `""` when the upload has no category column.
    #[serde(default)]
    pub category: String,
}

/// Parse a numeric metric cell, treating blanks and garbage as absent.
pub fn parse_metric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a publication-date cell into a [`chrono::NaiveDate`] for ordering.
///
/// The sheet is hand-maintained, so a couple of common spellings are
/// accepted; anything else sorts after all parsed dates.
pub fn parse_publication_date(cell: &str) -> Option<chrono::NaiveDate> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDate::parse_from_str(trimmed, fmt).ok())
}
