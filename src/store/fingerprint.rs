//! Roster change fingerprint.
//!
//! A cheap digest over the raw worksheet rows used to detect that the remote
//! roster changed underneath a cached or locally edited copy. The digest
//! covers only the row count and the last row's cells: an edit confined to
//! interior rows that changes neither is invisible. That blind spot is the
//! intended behavior, not an oversight; consumers asserting on it exist.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of a raw roster payload (header row included).
///
/// # Arguments
/// * `rows` - All worksheet rows, every cell as a string
///
/// # Returns
/// Hexadecimal SHA-256 digest of `"<row_count>-<concatenated last row>"`.
pub fn roster_fingerprint(rows: &[Vec<String>]) -> String {
    let last_row = rows.last().map(|r| r.concat()).unwrap_or_default();
    let seed = format!("{}-{}", rows.len(), last_row);

    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hex::encode(hasher.finalize())
}
