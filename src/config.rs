//! Configuration for the drivesense SDK.

use crate::attributes::DriverAttributes;
use crate::validation::is_valid_input_parameter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the SDK host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Identity of the driver this installation records for. Must pass the
    /// input validity check before the engine can be started.
    pub driver_id: String,

    /// Identity of the device, defaulting to the hostname.
    pub device_id: String,

    /// Attributes associated with the driver at initialization time.
    pub attributes: DriverAttributes,

    /// Path for storing state and delivery counters.
    pub data_path: PathBuf,

    /// Recording to replay when no vendor engine is present.
    pub recording_path: Option<PathBuf>,

    /// Fixed delay between replayed records, in milliseconds.
    pub replay_interval_millis: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drivesense-sdk");

        let device_id = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown-device".to_string());

        Self {
            driver_id: String::new(),
            device_id,
            attributes: DriverAttributes::new(),
            data_path: data_dir,
            recording_path: None,
            replay_interval_millis: 0,
        }
    }
}

impl SdkConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: SdkConfig = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drivesense-sdk")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Check that the configuration is usable for starting an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_input_parameter(&self.driver_id) {
            return Err(ConfigError::InvalidDriverId(self.driver_id.clone()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    InvalidDriverId(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::InvalidDriverId(id) => write!(f, "Invalid driver id: {id:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
