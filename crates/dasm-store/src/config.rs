//! Store configuration.

use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Configuration for saving files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Gzip level for project files, 0 (store) to 9 (best).
    pub compression_level: u32,

    /// Flush file contents to disk before the final rename.
    pub sync_on_save: bool,

    /// Extension appended to the target name for the temporary file.
    pub temp_suffix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            sync_on_save: true,
            temp_suffix: "tmp".to_string(),
        }
    }
}

impl StoreConfig {
    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(StoreError::InvalidConfig {
                message: format!(
                    "compression_level must be between 0 and 9, got {}",
                    self.compression_level
                ),
            });
        }
        if self.temp_suffix.is_empty()
            || self.temp_suffix.contains(['/', '\\'])
        {
            return Err(StoreError::InvalidConfig {
                message: format!(
                    "temp_suffix must be a non-empty file extension, got {:?}",
                    self.temp_suffix
                ),
            });
        }
        Ok(())
    }

    /// Gzip level for flate2.
    pub fn compression(&self) -> Compression {
        Compression::new(self.compression_level.min(9))
    }
}
