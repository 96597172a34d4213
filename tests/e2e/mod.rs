//! End-to-end tests for the pregnancy dashboard.
//!
//! These tests run against the real router and a real SQLite file. Only the
//! clock is pinned so progress numbers are stable.

pub mod dashboard_tests;
