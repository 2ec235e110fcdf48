//! Platform configuration store.
//!
//! Integer items keyed by ini name, loaded from a JSON object such as
//! `{"packet_capture_mode": 3}`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pkt_capture_core::traits::config_source::ConfigSource;

#[derive(Debug, Error)]
pub enum CfgError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CfgStore {
    values: HashMap<String, u32>,
}

impl CfgStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, CfgError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, CfgError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set `key`, overriding any loaded value.
    pub fn with(mut self, key: &str, value: u32) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }

    pub fn to_json_string(&self) -> Result<String, CfgError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ConfigSource for CfgStore {
    fn get_u32(&self, key: &str) -> Option<u32> {
        self.values.get(key).copied()
    }
}
