//! Shared test utilities for the dashboard tests.
//!
//! This module provides common test infrastructure including:
//! - Config file fixtures written to a temporary directory
//! - Test harness wiring settings, an agenda database and a pinned clock
//! - JSON assertion helpers

#![allow(dead_code)]

use chrono::NaiveDate;
use pregnancy_dashboard::agenda::AgendaStore;
use pregnancy_dashboard::config::{ConfigLoader, Settings};
use pregnancy_dashboard::database;
use pregnancy_dashboard::state::AppState;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// "Today" for every harness: 100 days after the sample conception date.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 7, 31).unwrap()
}

/// Sample configuration. `{db}` is replaced with a database URL.
pub const SAMPLE_CONFIG: &str = r#"
default:
  config:
    baby:
      name: Jantje
      conception_date: "2021-04-22"
    server:
      host: 127.0.0.1
      port: 0
    database:
      url: "{db}"
      pool_size: 2
      pool_overflow: 1
    logging:
      level: warn
    dates:
      - date: "2021-06-01"
        description: First echo
development:
  baby:
    name: Dev Baby
  logging:
    level: debug
"#;

/// Write `content` as `config.yaml` inside `dir` and return its path.
pub fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, content).expect("Failed to write config fixture");
    path
}

/// Assert that a JSON value contains specific fields with expected values.
///
/// # Example
/// ```ignore
/// let actual = json!({"status": "ok", "id": 1});
/// let expected = json!({"status": "ok"});
/// assert_json_contains(&actual, &expected); // Passes - actual contains all of expected
/// ```
pub fn assert_json_contains(actual: &Value, expected: &Value) {
    match (actual, expected) {
        (Value::Object(actual_map), Value::Object(expected_map)) => {
            for (key, expected_value) in expected_map {
                let actual_value = actual_map
                    .get(key)
                    .unwrap_or_else(|| panic!("Expected key '{}' not found in actual JSON", key));
                assert_json_contains(actual_value, expected_value);
            }
        }
        (Value::Array(actual_arr), Value::Array(expected_arr)) => {
            assert_eq!(actual_arr.len(), expected_arr.len(), "Array lengths differ");
            for (actual_item, expected_item) in actual_arr.iter().zip(expected_arr.iter()) {
                assert_json_contains(actual_item, expected_item);
            }
        }
        _ => {
            assert_eq!(
                actual, expected,
                "JSON values differ: expected {:?}, got {:?}",
                expected, actual
            );
        }
    }
}

/// Test harness that provides a complete environment: loaded settings, a
/// fresh agenda database and an app state whose clock is pinned.
pub struct TestHarness {
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub settings: Settings,
    pub state: AppState,
}

impl TestHarness {
    /// Create a harness from the sample config in the given environment.
    pub async fn new(environment: &str) -> Self {
        Self::with_config(SAMPLE_CONFIG, environment).await
    }

    /// Create a harness from a config template; `{db}` is replaced with a
    /// database URL inside the harness directory.
    pub async fn with_config(template: &str, environment: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("agenda.db").display());
        let config_path = write_config(&dir, &template.replace("{db}", &db_url));

        let loader = ConfigLoader::new();
        loader.set_environment(environment);
        loader
            .load(Some(&config_path))
            .expect("Failed to load config fixture");
        let mut settings = Settings::from_tree(&loader.config()).expect("Invalid settings");
        settings.server.static_dir = dir.path().to_path_buf();

        let pool = database::connect(&settings.database)
            .await
            .expect("Failed to connect to test database");
        let agenda = AgendaStore::new(pool);
        agenda
            .create_tables()
            .await
            .expect("Failed to create tables");

        let state = AppState::new(settings.clone(), agenda).with_clock(fixed_today);

        Self {
            dir,
            config_path,
            settings,
            state,
        }
    }

    pub fn agenda(&self) -> &AgendaStore {
        &self.state.agenda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_json_contains_object() {
        let actual = serde_json::json!({
            "status": "ok",
            "id": 1,
            "extra": "data"
        });
        let expected = serde_json::json!({
            "status": "ok",
            "id": 1
        });

        assert_json_contains(&actual, &expected);
    }

    #[test]
    #[should_panic(expected = "Expected key 'missing' not found")]
    fn test_assert_json_contains_missing_key() {
        let actual = serde_json::json!({"status": "ok"});
        let expected = serde_json::json!({"missing": "key"});

        assert_json_contains(&actual, &expected);
    }

    #[tokio::test]
    async fn test_harness_creation() {
        let harness = TestHarness::new("production").await;
        assert_eq!(harness.settings.baby.name.as_deref(), Some("Jantje"));
        assert_eq!(harness.state.today(), fixed_today());
    }

    #[tokio::test]
    async fn test_harness_applies_environment() {
        let harness = TestHarness::new("development").await;
        assert_eq!(harness.settings.baby.name.as_deref(), Some("Dev Baby"));
        assert_eq!(harness.settings.logging.level, "debug");
    }
}
