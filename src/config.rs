//! Application settings.
//!
//! Defaults are embedded at compile time; a json5 config file at
//! `~/.fintui-config.json5` (written on first run) or a `--config` path
//! overrides them field by field.

use std::{fs, path::PathBuf};

use directories::BaseDirs;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../.config/config.json5");
const HOME_CONFIG_NAME: &str = ".fintui-config.json5";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the finance API, e.g. `http://localhost:5001/api`.
    pub api_base_url: String,
    /// Per-request timeout handed to the HTTP client.
    pub request_timeout_secs: u64,
    /// Initial page size; must be one of the grid's fixed options.
    pub rows_per_page: usize,
    /// Theme name: "dark" or "light".
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        // The embedded defaults are part of the build; failing to parse them
        // is a programming error, caught by tests.
        json5::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }
}

impl Settings {
    /// Load settings: embedded defaults, overridden by the selected config
    /// file when one exists.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let mut builder = config::Config::builder()
            .set_default("api_base_url", defaults.api_base_url.clone())?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("rows_per_page", defaults.rows_per_page as u64)?
            .set_default("theme", defaults.theme.clone())?;

        let selected = match config_path {
            Some(path) => path.clone(),
            None => {
                let home_cfg = default_home_config_path();
                // Seed the home config with the embedded defaults so users
                // have a file to edit.
                if !home_cfg.exists() {
                    let _ = fs::write(&home_cfg, DEFAULT_CONFIG);
                }
                home_cfg
            }
        };
        builder = builder.add_source(
            config::File::from(selected)
                .format(config::FileFormat::Json5)
                .required(config_path.is_some()),
        );

        builder.build()?.try_deserialize()
    }
}

fn default_home_config_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(HOME_CONFIG_NAME))
        .unwrap_or_else(|| PathBuf::from(HOME_CONFIG_NAME))
}
