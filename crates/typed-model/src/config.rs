// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime configuration for coercion defaults.
//!
//! # Architecture
//!
//! - **Static**: [`Settings`] is a plain serde struct (load it from JSON, TOML, env...)
//! - **Dynamic**: [`RuntimeConfig`] holds the active settings behind an `ArcSwap`
//!
//! Every new [`crate::Context`] snapshots [`global()`] once; per-call overrides
//! go through the context builder, not through the global.
//!
//! # Example
//!
//! ```ignore
//! use typed_model::config::{self, DatePolicy, Settings};
//!
//! config::global().set_settings(Settings {
//!     date_policy: DatePolicy::Local,
//!     ..Settings::default()
//! });
//! ```

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// How ISO-8601 strings without a `Z` designator are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Only `YYYY-MM-DDTHH:MM:SS[.fff]Z` parses; anything else yields null.
    #[default]
    Utc,
    /// Strings without `Z` are read in the host's local timezone.
    Local,
}

/// Coercion defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Date string interpretation.
    pub date_policy: DatePolicy,
    /// Strict coercion (no number parsing, no array promotion).
    pub strict: bool,
}

impl Settings {
    /// Parse settings from a JSON document; missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Shared runtime configuration.
///
/// Reads are a single atomic load; `set_settings` swaps the whole snapshot.
pub struct RuntimeConfig {
    settings: ArcSwap<Settings>,
}

impl RuntimeConfig {
    /// Create a config holding default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a config holding the given settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
        }
    }

    /// Current settings snapshot.
    #[inline]
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    /// Replace the settings.
    pub fn set_settings(&self, settings: Settings) {
        log::debug!("[config] settings replaced: {:?}", settings);
        self.settings.store(Arc::new(settings));
    }

    /// Apply an edit to a copy of the current settings and store it.
    pub fn update(&self, edit: impl FnOnce(&mut Settings)) {
        let mut next = (*self.settings()).clone();
        edit(&mut next);
        self.set_settings(next);
    }

    /// Return to default settings.
    pub fn reset(&self) {
        self.set_settings(Settings::default());
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Process-wide configuration consulted by [`crate::Context::new`].
pub fn global() -> &'static RuntimeConfig {
    GLOBAL_CONFIG.get_or_init(RuntimeConfig::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::new();
        let settings = config.settings();
        assert_eq!(settings.date_policy, DatePolicy::Utc);
        assert!(!settings.strict);
    }

    #[test]
    fn test_update_and_reset() {
        let config = RuntimeConfig::new();
        config.update(|s| s.strict = true);
        assert!(config.settings().strict);
        config.reset();
        assert!(!config.settings().strict);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json_str(r#"{"date_policy": "local"}"#).expect("parse");
        assert_eq!(settings.date_policy, DatePolicy::Local);
        assert!(!settings.strict);
    }

    #[test]
    fn test_from_json_rejects_unknown_policy() {
        assert!(Settings::from_json_str(r#"{"date_policy": "mars"}"#).is_err());
    }
}
