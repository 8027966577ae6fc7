//! vault configuration
//!
//! ```toml
//! tree_height = 20
//! root_history_size = 30
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use cloakroom_tree::{TreeError, MAX_HEIGHT};

use crate::error::ConfigError;

/// 2^20 deposits
pub const DEFAULT_TREE_HEIGHT: u8 = 20;

/// how many recent roots stay valid as proof anchors
pub const DEFAULT_ROOT_HISTORY_SIZE: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    pub tree_height: u8,
    pub root_history_size: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            tree_height: DEFAULT_TREE_HEIGHT,
            root_history_size: DEFAULT_ROOT_HISTORY_SIZE,
        }
    }
}

impl VaultConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree_height == 0 || self.tree_height > MAX_HEIGHT {
            return Err(TreeError::InvalidHeight(self.tree_height).into());
        }
        if self.root_history_size == 0 {
            return Err(TreeError::InvalidRootHistorySize.into());
        }
        Ok(())
    }
}
