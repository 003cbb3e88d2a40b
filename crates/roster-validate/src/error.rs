//! Error types for the validation engine
//!
//! Data problems are never Rust errors; they are reported as
//! [`ValidationError`](roster_model::ValidationError) entries. The types here
//! cover setup failures only.

use std::path::PathBuf;

/// Errors while loading or checking a [`ValidatorConfig`](crate::ValidatorConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings parse but make no sense
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid-settings error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_display() {
        let err = ConfigError::invalid("empty prefix for worker");
        assert_eq!(err.to_string(), "invalid config: empty prefix for worker");
    }

    #[test]
    fn toml_error_converts() {
        let err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: ConfigError = err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
