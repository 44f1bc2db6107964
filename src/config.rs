//! Catalog configuration
//!
//! Runtime-tunable limits for the catalog and its search engine.
//!
//! # Example
//! ```
//! use listingdb::CatalogConfig;
//!
//! let config = CatalogConfig::default().default_limit(20).max_limit(200);
//! assert_eq!(config.default_limit, 20);
//! assert_eq!(config.max_limit, Some(200));
//! ```

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page size used when a search does not specify one
    pub default_limit: usize,
    /// Largest page size a search may request. Uncapped when `None`
    pub max_limit: Option<usize>,
    /// Catalog size above which full-scan searches filter in parallel (rayon)
    pub parallel_scan_threshold: usize,
    /// Maximum byte length of a location string
    pub max_location_len: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: None,
            parallel_scan_threshold: 4096,
            max_location_len: 1024,
        }
    }
}

impl CatalogConfig {
    pub fn default_limit(mut self, n: usize) -> Self {
        self.default_limit = n;
        self
    }

    pub fn max_limit(mut self, n: usize) -> Self {
        self.max_limit = Some(n);
        self
    }

    pub fn parallel_scan_threshold(mut self, n: usize) -> Self {
        self.parallel_scan_threshold = n;
        self
    }

    pub fn max_location_len(mut self, n: usize) -> Self {
        self.max_location_len = n;
        self
    }

    /// Parse from a JSON document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}
