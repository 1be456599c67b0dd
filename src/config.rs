use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::ConfigError;

static CONFIG: OnceCell<MessageConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Buffer size used when a stream reads everything at once
    pub read_chunk_size: usize,

    /// Bytes a temp resource keeps in memory before spilling to disk
    pub temp_memory_limit: usize,

    pub default_mode: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: 8192,
            temp_memory_limit: 2 * 1024 * 1024, // 2 MB
            default_mode: "r+".to_string(),
        }
    }
}

impl MessageConfig {
    pub fn try_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        Ok(toml::from_str::<MessageConfig>(content.as_str())?)
    }

    pub fn from_file(path: &str) -> Self {
        match Self::try_from_file(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(%path, %err, "falling back to default config");
                MessageConfig::default()
            }
        }
    }
}

pub fn set_config(cfg: MessageConfig) -> Result<(), ConfigError> {
    CONFIG.set(cfg).map_err(|_| ConfigError::AlreadySet)
}

/// Global configuration, initialised to the defaults when never set.
pub fn config() -> &'static MessageConfig {
    CONFIG.get_or_init(MessageConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "read_chunk_size = 16").unwrap();

        let cfg = MessageConfig::try_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.read_chunk_size, 16);
        assert_eq!(cfg.temp_memory_limit, MessageConfig::default().temp_memory_limit);
        assert_eq!(cfg.default_mode, "r+");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = MessageConfig::try_from_file("/nonexistent/rustymsg.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "read_chunk_size = \"lots\"").unwrap();

        let path = file.path().to_str().unwrap();
        assert!(matches!(
            MessageConfig::try_from_file(path),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(MessageConfig::from_file(path), MessageConfig::default());
    }

    #[test]
    fn global_config_is_never_uninitialised() {
        assert!(config().read_chunk_size > 0);
    }
}
