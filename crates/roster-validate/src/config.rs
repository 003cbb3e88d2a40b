//! Validator configuration
//!
//! Loaded from TOML or built in code. Every default reproduces the stock
//! behavior; none of the settings change what counts as valid data.
//!
//! ```toml
//! max_range_span = 10000
//!
//! [sheet_prefixes]
//! client = "client"
//! worker = "worker"
//! task = "task"
//!
//! [cache]
//! enabled = true
//! max_sheets = 64
//! ```

use crate::error::{ConfigError, ConfigResult};
use roster_model::EntityKind;
use roster_normalize::{NormalizeOptions, DEFAULT_MAX_RANGE_SPAN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sheet-name prefixes used to classify sheets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetPrefixes {
    /// Prefix for client sheets
    pub client: String,
    /// Prefix for worker sheets
    pub worker: String,
    /// Prefix for task sheets
    pub task: String,
}

impl SheetPrefixes {
    /// Prefix configured for `kind`
    #[must_use]
    pub fn prefix(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Client => &self.client,
            EntityKind::Worker => &self.worker,
            EntityKind::Task => &self.task,
        }
    }
}

impl Default for SheetPrefixes {
    fn default() -> Self {
        Self {
            client: EntityKind::Client.default_prefix().to_string(),
            worker: EntityKind::Worker.default_prefix().to_string(),
            task: EntityKind::Task.default_prefix().to_string(),
        }
    }
}

/// Per-sheet memoization settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Reuse entity-check results for unchanged sheets
    pub enabled: bool,
    /// Maximum cached sheets
    pub max_sheets: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_sheets: 64,
        }
    }
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Sheet classification prefixes
    pub sheet_prefixes: SheetPrefixes,
    /// Memoization settings
    pub cache: CacheConfig,
    /// Largest range expression expanded before it counts as malformed
    pub max_range_span: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            sheet_prefixes: SheetPrefixes::default(),
            cache: CacheConfig::default(),
            max_range_span: DEFAULT_MAX_RANGE_SPAN,
        }
    }
}

impl ValidatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With memoization on or off
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, max_sheets: u64) -> Self {
        self.cache.max_sheets = max_sheets;
        self
    }

    /// With range span limit
    #[inline]
    #[must_use]
    pub fn with_max_range_span(mut self, span: usize) -> Self {
        self.max_range_span = span;
        self
    }

    /// With a custom classification prefix
    #[must_use]
    pub fn with_prefix(mut self, kind: EntityKind, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        match kind {
            EntityKind::Client => self.sheet_prefixes.client = prefix,
            EntityKind::Worker => self.sheet_prefixes.worker = prefix,
            EntityKind::Task => self.sheet_prefixes.task = prefix,
        }
        self
    }

    /// Parse from TOML text and check the settings
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for bad TOML or
    /// [`ConfigError::Invalid`] for nonsensical settings.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] on read failure, otherwise as
    /// [`ValidatorConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Check the settings
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an empty prefix, a zero range
    /// span or a zero-capacity enabled cache.
    pub fn validate(&self) -> ConfigResult<()> {
        for kind in EntityKind::ALL {
            if self.sheet_prefixes.prefix(kind).trim().is_empty() {
                return Err(ConfigError::invalid(format!("empty sheet prefix for {kind}")));
            }
        }
        if self.max_range_span == 0 {
            return Err(ConfigError::invalid("max_range_span must be at least 1"));
        }
        if self.cache.enabled && self.cache.max_sheets == 0 {
            return Err(ConfigError::invalid(
                "cache.max_sheets must be at least 1 when the cache is enabled",
            ));
        }
        Ok(())
    }

    /// Classify a sheet name
    ///
    /// Case-insensitive prefix match; kinds are tried in client, worker, task
    /// order and the first match wins. Surrounding whitespace in the sheet
    /// name is ignored, so " Clients" classifies as a client sheet.
    #[must_use]
    pub fn classify(&self, sheet_name: &str) -> Option<EntityKind> {
        let name = sheet_name.trim().to_lowercase();
        EntityKind::ALL.into_iter().find(|kind| {
            let prefix = self.sheet_prefixes.prefix(*kind).trim().to_lowercase();
            !prefix.is_empty() && name.starts_with(&prefix)
        })
    }

    /// Normalizer options derived from this config
    #[inline]
    #[must_use]
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_range_span: self.max_range_span,
        }
    }
}
