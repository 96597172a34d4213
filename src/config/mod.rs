//! Configuration module for the dashboard.
//!
//! This module loads a single YAML file with per-environment overrides.
//!
//! # File Layout
//!
//! ```yaml
//! default:
//!   config:            # base settings
//!     baby:
//!       name: Jantje
//!       conception_date: "2021-04-22"
//!     database:
//!       url: sqlite://jantje.db
//! production:          # merged onto default.config when selected
//!   database:
//!     url: "sqlite://${env:DATA_DIR}/jantje.db"
//! ```
//!
//! # Resolution
//!
//! The file is chosen by (highest first): the path passed to
//! [`ConfigLoader::load`], [`ConfigLoader::set_source`], `$CONFIG_FILE`,
//! `./config.yaml`. The environment is chosen by
//! [`ConfigLoader::set_environment`], `$ENVIRONMENT`, then `production`.
//!
//! After merging, every `${env:NAME}` marker in a string value is replaced
//! with the value of `$NAME`. Strings inside lists are left as written.
//!
//! # Example
//!
//! ```rust,ignore
//! use pregnancy_dashboard::config::{ConfigLoader, Settings};
//!
//! let loader = ConfigLoader::new();
//! loader.load(None)?;
//! let settings = Settings::from_tree(&loader.config())?;
//! println!("Listening on {}", settings.server.bind_addr());
//! ```

mod error;
mod loader;
mod schema;
mod tree;

pub use error::{ConfigResult, LoadError, SettingsError};
pub use loader::{
    load_from_file, resolve_config_path, resolve_environment, ConfigLoader, CONFIG_FILE_ENV,
    DEFAULT_CONFIG_FILE, DEFAULT_ENVIRONMENT, ENVIRONMENT_ENV,
};
pub use schema::{
    BabyConfig, DatabaseConfig, DateEntry, LogFormat, LoggingConfig, ServerConfig, Settings,
};
pub use tree::{
    empty_tree, get_path, get_str, merge_environment, substitute, substitute_env, substitute_str,
};
