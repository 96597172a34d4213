//! Configuration loader with source resolution, environment merge and
//! `${env:NAME}` substitution.

use super::error::{ConfigResult, LoadError};
use super::tree::{empty_tree, merge_environment, substitute_env};
use parking_lot::Mutex;
use serde_yaml::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Config file used when nothing else selects one
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Environment variable for an explicit config path
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Environment selected when nothing else selects one
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Environment variable selecting the environment
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Top-level key holding the base settings
const DEFAULT_KEY: &str = "default";

/// Key under `default` holding the base settings tree
const CONFIG_KEY: &str = "config";

#[derive(Debug)]
struct LoaderState {
    source: Option<PathBuf>,
    environment: Option<String>,
    config: Arc<Value>,
    loaded: bool,
}

impl Default for LoaderState {
    fn default() -> Self {
        Self {
            source: None,
            environment: None,
            config: Arc::new(empty_tree()),
            loaded: false,
        }
    }
}

/// Loads the YAML configuration once and hands out the merged tree.
///
/// Construct one at startup and share it behind an `Arc`. The first
/// successful [`load`](Self::load) freezes the tree; later calls return
/// immediately without touching the file system.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    state: Mutex<LoaderState>,
}

impl ConfigLoader {
    /// Create an empty, not-yet-loaded loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the configuration file to read on the next load.
    pub fn set_source(&self, path: impl Into<PathBuf>) {
        let mut st = self.state.lock();
        if st.loaded {
            debug!("configuration already loaded; ignoring new source");
            return;
        }
        st.source = Some(path.into());
    }

    /// Record which environment's overrides to apply on the next load.
    pub fn set_environment(&self, name: impl Into<String>) {
        let mut st = self.state.lock();
        if st.loaded {
            debug!("configuration already loaded; ignoring new environment");
            return;
        }
        st.environment = Some(name.into());
    }

    /// Load the configuration.
    ///
    /// Source precedence: `path` argument, then [`set_source`](Self::set_source),
    /// then `$CONFIG_FILE`, then `config.yaml`. Environment precedence:
    /// [`set_environment`](Self::set_environment), then `$ENVIRONMENT`, then
    /// `production`.
    ///
    /// The lock is held for the whole load so that concurrent first callers
    /// read the file exactly once. On failure nothing is stored and the
    /// loader stays unloaded.
    pub fn load(&self, path: Option<&Path>) -> ConfigResult<bool> {
        let mut st = self.state.lock();
        if st.loaded {
            return Ok(true);
        }

        let source = match path {
            Some(p) => p.to_path_buf(),
            None => st.source.clone().unwrap_or_else(resolve_config_path),
        };
        st.source = Some(source.clone());

        let environment = st.environment.clone().unwrap_or_else(resolve_environment);
        st.environment = Some(environment.clone());

        info!(source = %source.display(), environment = %environment, "loading configuration");
        let config = load_from_file(&source, &environment)?;

        st.config = Arc::new(config);
        st.loaded = true;
        Ok(true)
    }

    /// The merged, substituted configuration tree.
    ///
    /// Before a successful load this is an empty mapping.
    pub fn config(&self) -> Arc<Value> {
        Arc::clone(&self.state.lock().config)
    }

    /// Whether a load has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// The configuration file that was selected (if any).
    pub fn source(&self) -> Option<PathBuf> {
        self.state.lock().source.clone()
    }

    /// The environment that was selected (if any).
    pub fn environment(&self) -> Option<String> {
        self.state.lock().environment.clone()
    }
}

/// Resolve the config path from `$CONFIG_FILE`, falling back to `config.yaml`.
pub fn resolve_config_path() -> PathBuf {
    std::env::var_os(CONFIG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Resolve the environment from `$ENVIRONMENT`, falling back to `production`.
pub fn resolve_environment() -> String {
    std::env::var(ENVIRONMENT_ENV).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

/// Read, merge and substitute a configuration file.
pub fn load_from_file(path: &Path, environment: &str) -> ConfigResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::SourceNotFound(path.to_path_buf()),
        _ => LoadError::invalid(path, e.to_string()),
    })?;

    let mut document: Value =
        serde_yaml::from_str(&content).map_err(|e| LoadError::invalid(path, e.to_string()))?;
    // Expand `<<: *anchor` merge keys before any lookup
    document
        .apply_merge()
        .map_err(|e| LoadError::invalid(path, e.to_string()))?;

    let mut config = base_config(&document).map_err(|msg| LoadError::invalid(path, msg))?;

    match document.get(environment) {
        Some(overrides @ Value::Mapping(_)) => {
            debug!(environment, "merging environment overrides");
            merge_environment(&mut config, overrides);
        }
        Some(Value::Null) | None => {
            debug!(environment, "no overrides for environment");
        }
        Some(_) => {
            return Err(LoadError::invalid(
                path,
                format!("environment '{environment}' must be a mapping"),
            ));
        }
    }

    substitute_env(&mut config)?;
    Ok(config)
}

fn base_config(document: &Value) -> Result<Value, String> {
    if !document.is_mapping() {
        return Err(format!("missing key '{DEFAULT_KEY}'"));
    }
    let default = document
        .get(DEFAULT_KEY)
        .ok_or_else(|| format!("missing key '{DEFAULT_KEY}'"))?;
    if !default.is_mapping() {
        return Err(format!("'{DEFAULT_KEY}' must be a mapping"));
    }
    let config = default
        .get(CONFIG_KEY)
        .ok_or_else(|| format!("missing key '{DEFAULT_KEY}.{CONFIG_KEY}'"))?;
    if !config.is_mapping() {
        return Err(format!("'{DEFAULT_KEY}.{CONFIG_KEY}' must be a mapping"));
    }
    Ok(config.clone())
}
