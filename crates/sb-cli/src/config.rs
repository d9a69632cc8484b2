//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Container name `sb stats` keeps rows for.
    pub container: String,
    /// Chart width in columns.
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container: "xlayer-seq".to_string(),
            chart_width: 60,
        }
    }
}

impl Config {
    /// Loads configuration, optionally merging a specific file.
    ///
    /// Precedence, lowest to highest: defaults, the user config file,
    /// `config_path`, then `SB_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but this is called once at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("SB_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for seq-bench.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|path| path.join("seq-bench"))
}
