//! Configuration loading tests: environment overrides and TOML files.

mod support;

use std::io::Write;

use ivc_rust::store::AppConfig;
use support::with_scoped_env;

#[test]
fn test_env_overrides_defaults() {
    with_scoped_env(
        &[
            ("IVC_ROSTER_SHEET", Some("Vetted")),
            ("IVC_MERGE_TTL_SECS", Some("15")),
            ("IVC_RETRY_MAX_ATTEMPTS", Some("5")),
            ("IVC_CONFIG", None),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.workbook.roster_sheet, "Vetted");
            assert_eq!(config.cache.merge_ttl_secs, 15);
            assert_eq!(config.retry.max_attempts, 5);
            // Untouched settings keep their defaults.
            assert_eq!(config.workbook.metrics_sheet, "Master");
            assert_eq!(config.cache.review_ttl_secs, 120);
        },
    );
}

#[test]
fn test_invalid_env_values_fall_back() {
    with_scoped_env(
        &[("IVC_MERGE_TTL_SECS", Some("soon")), ("IVC_CONFIG", None)],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.cache.merge_ttl_secs, 60);
        },
    );
}

#[test]
fn test_config_file_wins_when_pointed_at() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[workbook]
roster_sheet = "Roster"
metrics_sheet = "History"

[cache]
merge_ttl_secs = 10
review_ttl_secs = 20

[retry]
max_attempts = 2
base_delay_ms = 50
"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    with_scoped_env(&[("IVC_CONFIG", Some(path.as_str()))], || {
        let config = AppConfig::load().unwrap();
        assert_eq!(config.workbook.roster_sheet, "Roster");
        assert_eq!(config.workbook.metrics_sheet, "History");
        assert_eq!(config.cache.merge_ttl_secs, 10);
        assert_eq!(config.cache.review_ttl_secs, 20);
        assert_eq!(config.retry.policy().max_attempts, 2);
    });
}

#[test]
fn test_missing_config_file_is_an_error() {
    with_scoped_env(
        &[("IVC_CONFIG", Some("/nonexistent/ivc.toml"))],
        || {
            assert!(AppConfig::load().is_err());
        },
    );
}
