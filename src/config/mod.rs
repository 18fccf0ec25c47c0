use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    errors::StorageError,
    storage::json_file::{tmp_path, write_atomic},
    utils::{app_data_dir, ensure_dir},
};

const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";

/// User preferences shared by the projection views and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Horizon of the headline balance forecast.
    pub default_balance_months: u32,
    /// Span of the timeline chart; also picks its bucket granularity.
    pub timeline_scale_months: u32,
    /// Label shown for entries whose category no longer exists.
    pub uncategorized_label: String,
    pub share_horizon_months: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_balance_months: 12,
            timeline_scale_months: 24,
            uncategorized_label: "Uncategorized".into(),
            share_horizon_months: 12,
        }
    }
}

impl TrackerConfig {
    /// Balance horizon in (possibly fractional) years.
    pub fn balance_years(&self) -> f64 {
        f64::from(self.default_balance_months) / 12.0
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at `BUDGET_TRACKER_HOME` or `~/.budget_tracker`.
    pub fn new() -> Result<Self, StorageError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StorageError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
            base,
        })
    }

    /// Directory the entry and category documents are stored in.
    pub fn data_dir(&self) -> PathBuf {
        self.base.join(DATA_DIR)
    }

    pub fn load(&self) -> Result<TrackerConfig, StorageError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(TrackerConfig::default())
        }
    }

    pub fn save(&self, config: &TrackerConfig) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
