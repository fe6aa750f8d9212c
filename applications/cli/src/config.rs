/// Application configuration
use serde::{Deserialize, Serialize};
use songtag_core::{Result, TagError};
use songtag_decoder::SymphoniaConfig;
use songtag_metadata::{ResolverConfig, ScanConfig};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "songtag.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub symphonia: SymphoniaConfig,

    #[serde(default)]
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_music_directory")]
    pub music_directory: PathBuf,

    /// Base path scanned song URIs are reported under
    #[serde(default)]
    pub uri_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanSettings {
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker threads; defaults to the number of CPUs
    #[serde(default)]
    pub num_threads: Option<usize>,

    #[serde(default)]
    pub follow_links: bool,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `songtag.toml` in the working directory is
    /// used if it exists. `SONGTAG_*` environment variables override file
    /// values, with `__` separating nested keys
    /// (`SONGTAG_LIBRARY__MUSIC_DIRECTORY`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SONGTAG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| TagError::config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| TagError::config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.library.music_directory.is_dir() {
            return Err(TagError::config(format!(
                "Music directory not found at {:?}",
                self.library.music_directory
            )));
        }

        if self.scan.num_threads == Some(0) {
            return Err(TagError::config("scan.num_threads must be at least 1"));
        }

        if self.symphonia.max_probe_bytes == 0 {
            return Err(TagError::config("symphonia.max_probe_bytes must not be 0"));
        }

        Ok(())
    }

    /// Library scanner settings
    pub fn scan_config(&self) -> ScanConfig {
        let defaults = ScanConfig::default();
        ScanConfig {
            parallel: self.scan.parallel,
            num_threads: self.scan.num_threads.unwrap_or(defaults.num_threads),
            follow_links: self.scan.follow_links,
            uri_base: self.library.uri_base.clone(),
        }
    }
}

// Default values
fn default_music_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_parallel() -> bool {
    true
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_directory: default_music_directory(),
            uri_base: String::new(),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            num_threads: None,
            follow_links: false,
        }
    }
}
