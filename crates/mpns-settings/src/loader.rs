//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`MpnsSettings::default()`]
//! 2. If `~/.mpns/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `MPNS_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::MpnsSettings;

/// Resolve the path to the settings file (`~/.mpns/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".mpns").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<MpnsSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<MpnsSettings> {
    let mut settings = load_file(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn load_file(path: &Path) -> Result<MpnsSettings> {
    let defaults = serde_json::to_value(MpnsSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `MPNS_*` overrides, reading variables through `lookup`.
///
/// Empty values are treated as unset. Invalid booleans are ignored with a
/// warning (falling back to file/default).
pub fn apply_overrides(settings: &mut MpnsSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let transport = &mut settings.transport;

    if let Some(v) = read("MPNS_PROXY") {
        transport.proxy = Some(v);
    }
    if let Some(v) = read("MPNS_CERT") {
        transport.cert_path = Some(v);
    }
    if let Some(v) = read("MPNS_KEY") {
        transport.key_path = Some(v);
    }
    if let Some(v) = read("MPNS_CA") {
        transport.ca_path = Some(v);
    }
    if let Some(v) = read("MPNS_PASSPHRASE") {
        transport.passphrase = Some(v);
    }
    if let Some(v) = read("MPNS_CIPHERS") {
        transport.ciphers = Some(v);
    }
    if let Some(v) = read("MPNS_REJECT_UNAUTHORIZED") {
        match parse_bool(&v) {
            Some(b) => transport.reject_unauthorized = b,
            None => {
                tracing::warn!(key = "MPNS_REJECT_UNAUTHORIZED", value = %v, "invalid boolean env var, ignoring");
            }
        }
    }
    if let Some(v) = read("MPNS_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "transport": {"proxy": null, "rejectUnauthorized": true}
        });
        let source = serde_json::json!({
            "transport": {"proxy": "http://p:1"}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["transport"]["proxy"], "http://p:1");
        assert_eq!(merged["transport"]["rejectUnauthorized"], true);
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 42);
    }

    // ── load_file ───────────────────────────────────────────────────

    #[test]
    fn missing_file_gives_defaults() {
        let settings = load_file(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings, MpnsSettings::default());
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"logging": {"level": "debug"}, "transport": {"caPath": "/ca.pem"}}"#,
        )
        .unwrap();
        let settings = load_file(&path).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.transport.ca_path.as_deref(), Some("/ca.pem"));
        assert!(settings.transport.reject_unauthorized);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_file(&path), Err(SettingsError::Json(_))));
    }

    // ── apply_overrides ─────────────────────────────────────────────

    #[test]
    fn env_overrides_transport() {
        let mut settings = MpnsSettings::default();
        apply_overrides(
            &mut settings,
            env(&[
                ("MPNS_CERT", "/c.pem"),
                ("MPNS_KEY", "/k.pem"),
                ("MPNS_CA", "/ca.pem"),
                ("MPNS_PROXY", "http://proxy:3128"),
                ("MPNS_REJECT_UNAUTHORIZED", "off"),
                ("MPNS_LOG_LEVEL", "info"),
            ]),
        );
        assert_eq!(settings.transport.cert_path.as_deref(), Some("/c.pem"));
        assert_eq!(settings.transport.key_path.as_deref(), Some("/k.pem"));
        assert_eq!(settings.transport.ca_path.as_deref(), Some("/ca.pem"));
        assert_eq!(
            settings.transport.proxy.as_deref(),
            Some("http://proxy:3128")
        );
        assert!(!settings.transport.reject_unauthorized);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn empty_and_invalid_env_values_are_ignored() {
        let mut settings = MpnsSettings::default();
        apply_overrides(
            &mut settings,
            env(&[("MPNS_PROXY", ""), ("MPNS_REJECT_UNAUTHORIZED", "maybe")]),
        );
        assert!(settings.transport.proxy.is_none());
        assert!(settings.transport.reject_unauthorized);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for v in ["true", "1", "YES", "On"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "0", "no", "OFF"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("2"), None);
    }
}
