/// Tag resolver configuration
use serde::{Deserialize, Serialize};

/// How archive members are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveScan {
    /// Check that a plugin exists for the suffix and commit an empty tag
    #[default]
    Detached,

    /// Scan the member through the input stream transport
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// URI prefixes of synthetic library sections
    ///
    /// Songs below these prefixes keep their URI as title instead of going
    /// through path metadata.
    #[serde(default = "default_synthetic_prefixes")]
    pub synthetic_prefixes: Vec<String>,

    /// Derive artist/album/track/title from `.../Media/<artist>/<album>/...` paths
    #[serde(default = "default_path_metadata")]
    pub path_metadata: bool,

    #[serde(default)]
    pub archive_scan: ArchiveScan,
}

fn default_synthetic_prefixes() -> Vec<String> {
    vec!["Untagged/".to_string(), "External/".to_string()]
}

fn default_path_metadata() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            synthetic_prefixes: default_synthetic_prefixes(),
            path_metadata: default_path_metadata(),
            archive_scan: ArchiveScan::default(),
        }
    }
}

impl ResolverConfig {
    /// The synthetic prefix `uri` starts with, if any
    pub fn synthetic_prefix(&self, uri: &str) -> Option<&str> {
        self.synthetic_prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| !prefix.is_empty() && uri.starts_with(prefix))
    }
}
