//! Configuration for the cluster write path

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Write-path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteConfig {
    /// Per-request write timeout (milliseconds)
    ///
    /// Each shard's replica fan-out runs under this deadline, so the
    /// wall-clock bound on a request is roughly one timeout regardless of
    /// how many shards it touches.
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

fn default_write_timeout_ms() -> u64 {
    10_000
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

impl WriteConfig {
    /// The write timeout as a [`Duration`].
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WriteConfig = serde_json::from_str(&content)
            .map_err(|e| crate::Error::Other(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save to file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| crate::Error::Other(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.write_timeout_ms == 0 {
            return Err(crate::Error::InvalidConfig(
                "write_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
