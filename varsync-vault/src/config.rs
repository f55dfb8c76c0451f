//! Vault session configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the vault endpoint client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Base URL for the Varsync API (e.g., "https://varsync.app").
    pub api_base_url: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://varsync.app".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl VaultConfig {
    /// Creates a config pointing at a local dev server.
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 5,
        }
    }
}
