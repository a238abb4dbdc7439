//! Configuration system
//!
//! TOML-backed configuration with strong typing and defaults. The
//! runtime reads one [`RuntimeConfig`] at startup; the backend choice
//! in it is the only place the packaged/remote strategy split is
//! visible.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a TOML file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Which resource-loading strategy the cache is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceBackendKind {
    /// Assets bundled into the build
    Packaged,
    /// Remote-addressable content
    Remote,
}

/// Pool sizing defaults for lazily created pools
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Free-list capacity reserved when a pool is created
    pub default_capacity: usize,
    /// Retention bound: instances released beyond this are destroyed
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_capacity: 10,
            max_size: 100,
        }
    }
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Frame-rate target the host loop should pace to
    pub target_frame_rate: u32,
    /// Resource backend selected at construction
    pub resource_backend: ResourceBackendKind,
    /// Pool sizing defaults
    pub pool: PoolConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_frame_rate: 60,
            resource_backend: ResourceBackendKind::Packaged,
            pool: PoolConfig::default(),
        }
    }
}

impl Config for RuntimeConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.target_frame_rate, 60);
        assert_eq!(config.resource_backend, ResourceBackendKind::Packaged);
        assert_eq!(config.pool.default_capacity, 10);
        assert_eq!(config.pool.max_size, 100);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RuntimeConfig {
            target_frame_rate: 144,
            resource_backend: ResourceBackendKind::Remote,
            pool: PoolConfig {
                default_capacity: 4,
                max_size: 32,
            },
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: RuntimeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.target_frame_rate, 144);
        assert_eq!(parsed.resource_backend, ResourceBackendKind::Remote);
        assert_eq!(parsed.pool.max_size, 32);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let result = RuntimeConfig::load_from_file("runtime.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
