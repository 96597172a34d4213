//! Operations on the raw configuration tree.
//!
//! The tree is a [`serde_yaml::Value`]. Only two rules matter here:
//!
//! - merging recurses where *both* sides are mappings; anything else (scalars,
//!   sequences, mismatched kinds) is replaced wholesale by the override;
//! - substitution rewrites `${env:NAME}` markers in string values reachable
//!   through mappings. Sequence elements are not visited.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::error::{ConfigResult, LoadError};

static ENV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{env:([a-zA-Z0-9_]+)\}").expect("env substitution pattern is valid")
});

/// An empty configuration tree.
pub fn empty_tree() -> Value {
    Value::Mapping(Mapping::new())
}

/// Overlay `overrides` onto `base`, in place.
///
/// Keys present only in `base` are kept, keys present only in `overrides`
/// are added. Where both sides hold a mapping the merge recurses; in every
/// other case the override value replaces the base value.
pub fn merge_environment(base: &mut Value, overrides: &Value) {
    let (Value::Mapping(base_map), Value::Mapping(override_map)) = (&mut *base, overrides) else {
        return;
    };

    for (key, value) in override_map {
        match (base_map.get_mut(key), value) {
            (Some(existing @ Value::Mapping(_)), Value::Mapping(_)) => {
                merge_environment(existing, value);
            }
            _ => {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Replace `${env:NAME}` markers in every string value using the process
/// environment.
pub fn substitute_env(tree: &mut Value) -> ConfigResult<()> {
    substitute(tree, |name| std::env::var(name).ok())
}

/// Replace `${env:NAME}` markers in every string value reachable through
/// mappings, resolving names with `lookup`.
///
/// Numbers, booleans, nulls and sequences are left untouched, including any
/// strings nested inside sequences.
pub fn substitute<F>(tree: &mut Value, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    substitute_mapping(tree, &lookup)
}

fn substitute_mapping<F>(tree: &mut Value, lookup: &F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let Value::Mapping(map) = tree else {
        return Ok(());
    };

    for (_, value) in map.iter_mut() {
        match value {
            Value::Mapping(_) => substitute_mapping(value, lookup)?,
            Value::String(text) => {
                if let Some(replaced) = substitute_str(text, lookup)? {
                    *text = replaced;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Expand every marker in `text`. Returns `None` when the string holds no
/// marker so the caller can skip the write.
pub fn substitute_str<F>(text: &str, lookup: &F) -> ConfigResult<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    if !ENV_PATTERN.is_match(text) {
        return Ok(None);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in ENV_PATTERN.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let value = lookup(name).ok_or_else(|| LoadError::missing_env(name))?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(Some(out))
}

/// Look up a nested value with a dotted path such as `database.url`.
///
/// An empty path returns the tree itself.
pub fn get_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }
    path.split('.')
        .try_fold(tree, |node, segment| node.as_mapping()?.get(segment))
}

/// Convenience wrapper around [`get_path`] for string leaves.
pub fn get_str<'a>(tree: &'a Value, path: &str) -> Option<&'a str> {
    get_path(tree, path).and_then(Value::as_str)
}
