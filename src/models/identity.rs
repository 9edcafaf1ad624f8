//! Identity normalization.
//!
//! Uploaded files and the roster sheet spell the same handle in different
//! ways ("@alice", " alice ", "alice"). Every identity is passed through
//! [`normalize`] before it participates in a join or set operation, so the
//! canonical form is the only form the rest of the crate ever sees.

/// Canonicalize a raw social-media handle.
///
/// Strips leading `@` characters and surrounding whitespace. The result has
/// no leading `@` and no leading/trailing whitespace, and the function is
/// idempotent: `normalize(normalize(s)) == normalize(s)` for all inputs.
pub fn normalize(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_string()
}

/// Build the public profile link for a normalized identity.
pub fn profile_link(identity: &str) -> String {
    format!("https://www.instagram.com/{}", identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_at_and_whitespace() {
        assert_eq!(normalize("@alice"), "alice");
        assert_eq!(normalize("  bob  "), "bob");
        assert_eq!(normalize("@bob "), "bob");
        assert_eq!(normalize(" @carol"), "carol");
        assert_eq!(normalize("@ dave "), "dave");
    }

    #[test]
    fn test_normalize_plain_identity_unchanged() {
        assert_eq!(normalize("alice"), "alice");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("@"), "");
    }

    #[test]
    fn test_normalize_keeps_interior_at() {
        assert_eq!(normalize("a@b"), "a@b");
    }

    #[test]
    fn test_profile_link() {
        assert_eq!(profile_link("alice"), "https://www.instagram.com/alice");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in ".*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_no_leading_at_or_whitespace(s in ".*") {
            let out = normalize(&s);
            prop_assert!(!out.starts_with('@'));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
