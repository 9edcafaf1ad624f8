//! Raw worksheet tables and one-time schema binding.
//!
//! The remote store hands back untyped rows (`Vec<Vec<String>>`, header row
//! first). Column positions are resolved here exactly once per load into a
//! [`SchemaBinding`]; use sites index by position and never search headers
//! again.

use anyhow::{bail, Result};

/// A raw tabular payload: unique-ified headers plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Split a raw worksheet payload into headers and data rows.
    ///
    /// Returns an empty table for an empty payload; a header-only payload
    /// yields headers with zero data rows.
    pub fn from_rows(mut raw: Vec<Vec<String>>) -> Self {
        if raw.is_empty() {
            return Self {
                headers: Vec::new(),
                rows: Vec::new(),
            };
        }
        let headers = make_unique_headers(&raw.remove(0));
        Self { headers, rows: raw }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell accessor tolerant of ragged rows: out-of-range cells read as "".
    pub fn cell<'a>(&'a self, row: usize, col: usize) -> &'a str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// First column whose header contains `needle`.
    pub fn column_containing(&self, needle: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.contains(needle))
    }

    /// First column whose header equals `name` exactly.
    pub fn column_named(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// De-duplicate headers by suffixing repeats with `_1`, `_2`, …
///
/// The first occurrence keeps its name so column resolution stays stable.
pub fn make_unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    headers
        .iter()
        .map(|h| {
            let count = seen.entry(h.as_str()).or_insert(0);
            let name = if *count == 0 {
                h.clone()
            } else {
                format!("{}_{}", h, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Column binding for the roster sheet, resolved once at load time.
///
/// The identity column is required (substring match on "ID", falling back to
/// the first column). Credibility and comment columns are optional; absent
/// columns read as the documented defaults and keep a default title so a
/// later push can still write a complete header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaBinding {
    pub id_col: usize,
    pub credibility_col: Option<usize>,
    pub comment_col: Option<usize>,
    pub id_title: String,
    pub credibility_title: String,
    pub comment_title: String,
}

impl SchemaBinding {
    /// Resolve the roster columns from a table's headers.
    ///
    /// Fails only when the table has no columns at all, in which case no
    /// join key can be determined.
    pub fn resolve(table: &RawTable) -> Result<Self> {
        if table.headers().is_empty() {
            bail!("roster sheet has no columns; cannot determine an identity column");
        }

        let id_col = table.column_containing("ID").unwrap_or(0);
        let credibility_col = table.column_containing("Credibility");
        let comment_col = table.column_containing("Comment");

        let title = |col: Option<usize>, default: &str| {
            col.map(|c| table.headers()[c].clone())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            id_col,
            credibility_col,
            comment_col,
            id_title: table.headers()[id_col].clone(),
            credibility_title: title(credibility_col, "Credibility"),
            comment_title: title(comment_col, "Comment"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_make_unique_headers() {
        let headers = strings(&["ID", "Comment", "ID", "ID"]);
        assert_eq!(
            make_unique_headers(&headers),
            strings(&["ID", "Comment", "ID_1", "ID_2"])
        );
    }

    #[test]
    fn test_from_rows_empty_payload() {
        let table = RawTable::from_rows(vec![]);
        assert!(table.headers().is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_rows_header_only() {
        let table = RawTable::from_rows(vec![strings(&["ID", "Comment"])]);
        assert_eq!(table.headers(), &strings(&["ID", "Comment"])[..]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_cell_tolerates_ragged_rows() {
        let table = RawTable::from_rows(vec![
            strings(&["ID", "Comment", "Credibility"]),
            strings(&["alice"]),
        ]);
        assert_eq!(table.cell(0, 0), "alice");
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_binding_resolves_by_substring() {
        let table = RawTable::from_rows(vec![strings(&[
            "Influencer ID",
            "Comments",
            "Credibility check",
        ])]);
        let binding = SchemaBinding::resolve(&table).unwrap();
        assert_eq!(binding.id_col, 0);
        assert_eq!(binding.credibility_col, Some(2));
        assert_eq!(binding.comment_col, Some(1));
        assert_eq!(binding.id_title, "Influencer ID");
    }

    #[test]
    fn test_binding_falls_back_to_first_column_for_id() {
        let table = RawTable::from_rows(vec![strings(&["Handle", "Comment"])]);
        let binding = SchemaBinding::resolve(&table).unwrap();
        assert_eq!(binding.id_col, 0);
        assert_eq!(binding.id_title, "Handle");
        assert_eq!(binding.credibility_col, None);
        assert_eq!(binding.credibility_title, "Credibility");
    }

    #[test]
    fn test_binding_fails_with_no_columns() {
        let table = RawTable::from_rows(vec![]);
        assert!(SchemaBinding::resolve(&table).is_err());
    }
}
