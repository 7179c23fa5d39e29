//! Tree configuration
//!
//! Configuration can be built in code or loaded from a JSON file:
//!
//! ```json
//! { "parts": 2 }
//! ```

use crate::nibble::{NibbleCodec, DEFAULT_PARTS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a [`RadixTree`](crate::RadixTree)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrieConfig {
    /// Digits per key byte: 1, 2, 4 or 8
    pub parts: usize,
}

impl TrieConfig {
    /// Config with a given digit split
    pub fn with_parts(parts: usize) -> Self {
        TrieConfig { parts }
    }

    /// Check the config and build the codec it describes
    pub fn codec(&self) -> Result<NibbleCodec> {
        NibbleCodec::new(self.parts)
    }

    /// Check the config without keeping the codec
    pub fn validate(&self) -> Result<()> {
        self.codec().map(|_| ())
    }

    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: TrieConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }
}

impl Default for TrieConfig {
    fn default() -> Self {
        TrieConfig {
            parts: DEFAULT_PARTS,
        }
    }
}
