// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Serializer configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! max_depth = 32
//! eligibility = "all-registered"
//! initial_capacity = 256
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::bridge::EligibilityPolicy;
use crate::core::CodecError;
use crate::encoding::DEFAULT_MAX_DEPTH;

/// Errors raised while loading a [`SerializerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl From<ConfigError> for CodecError {
    fn from(err: ConfigError) -> Self {
        CodecError::Other(err.to_string())
    }
}

/// Settings for [`MessagePackSerializer`](crate::MessagePackSerializer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerConfig {
    /// Nesting limit for containers and nested objects
    pub max_depth: usize,
    /// Which registered types the bridge codec handles
    pub eligibility: EligibilityPolicy,
    /// Starting capacity of output buffers, in bytes
    pub initial_capacity: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            eligibility: EligibilityPolicy::default(),
            initial_capacity: 64,
        }
    }
}

impl SerializerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: SerializerConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
