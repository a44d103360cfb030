//! Runtime configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a working in-memory
//! setup. The file path can come from the `FULFILLMENT_CONFIG` environment variable, which a
//! `.env` file in the working directory may set.

use crate::model::{Amount, PromoCreate};
use crate::ports::DeliveryZone;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "FULFILLMENT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("Failed to parse config file: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FulfillmentConfig {
    /// Capacity of each actor's request channel.
    pub channel_buffer: usize,
    /// Bound on every client request.
    pub request_timeout_ms: u64,
    pub order_number_prefix: String,
    /// Share of the daily limit under which a dish counts as low on stock.
    pub low_stock_percent: u8,
    /// Fee for addresses outside every zone.
    pub default_delivery_fee: Amount,
    /// Persist collections as JSON files here. In memory when unset.
    pub data_dir: Option<PathBuf>,
    pub zones: Vec<DeliveryZone>,
    /// Promo codes created at startup when no promo with the same code exists.
    pub promos: Vec<PromoCreate>,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            request_timeout_ms: 5000,
            order_number_prefix: "BC".to_string(),
            low_stock_percent: 20,
            default_delivery_fee: 500,
            data_dir: None,
            zones: Vec::new(),
            promos: Vec::new(),
        }
    }
}

impl FulfillmentConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects fees below zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_delivery_fee < 0 {
            return Err(ConfigError::Invalid(format!(
                "default_delivery_fee is negative ({})",
                self.default_delivery_fee
            )));
        }
        if let Some(zone) = self.zones.iter().find(|z| z.fee < 0) {
            return Err(ConfigError::Invalid(format!(
                "zone {} has a negative fee ({})",
                zone.name, zone.fee
            )));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&contents)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Loads the file named by `FULFILLMENT_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                info!("{CONFIG_ENV_VAR} not set, using default configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
