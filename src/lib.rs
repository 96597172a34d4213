//! Pregnancy Dashboard Library
//!
//! This library provides the pieces of a small personal dashboard that shows
//! pregnancy progress next to an agenda of dated events.
//!
//! # Modules
//!
//! - `config`: YAML configuration with per-environment overrides and
//!   `${env:NAME}` substitution
//! - `pregnancy`: Progress, trimester and due date calculations
//! - `database`: SQLite pool bootstrap and pool statistics
//! - `agenda`: Agenda item storage
//! - `dashboard`: HTTP routes (HTML page, assets, JSON API)
//! - `state`: Shared state handed to route handlers
//! - `error`: HTTP error type
//! - `logging`: tracing subscriber setup

pub mod agenda;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod logging;
pub mod pregnancy;
pub mod state;

// Re-export commonly used types for convenience
pub use agenda::{AgendaError, AgendaItem, AgendaStore, NewAgendaItem};
pub use config::{ConfigLoader, ConfigResult, LoadError, Settings, SettingsError};
pub use database::{DatabaseError, PoolStatistics};
pub use error::{AppError, AppResult};
pub use pregnancy::{Pregnancy, PregnancyProgress};
pub use state::AppState;
