//! GitHub Release metadata returned by the REST API

use serde::{Deserialize, Serialize};

/// GitHub Release metadata from API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// Release tag name (e.g., "v1.2.0"); empty when the payload lacks one
    #[serde(default)]
    pub tag_name: String,
    /// List of downloadable assets
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// GitHub Release asset (downloadable file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    /// Asset filename (e.g., "neo4j-mcp_Darwin_arm64.tar.gz")
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
    /// File size in bytes
    pub size: u64,
}

impl Release {
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }
}
