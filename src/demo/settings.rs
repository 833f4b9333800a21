use anyhow::Context;
use history_router::engine::memory::Route;
use history_router::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};

const DATA_DIR: &str = ".history-router";
const SETTINGS_FILE: &str = "settings.json";
const LOG_DIR: &str = "logs";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DemoSettings {
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default = "Route::defaults")]
    pub routes: Vec<Route>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        DemoSettings {
            coordinator: CoordinatorConfig::default(),
            routes: Route::defaults(),
        }
    }
}

impl DemoSettings {
    /// A missing or empty file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<DemoSettings> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(DemoSettings::default());
        }
        let mut file = OpenOptions::new()
            .read(true)
            .open(path)
            .context("Failed to open settings file")?;
        let mut file_content = String::new();
        file.read_to_string(&mut file_content)
            .context("Failed to read settings file")?;
        if file_content.trim().is_empty() {
            Ok(DemoSettings::default())
        } else {
            serde_json::from_str(&file_content).context("Failed to parse settings json")
        }
    }
}

/// `~/.history-router`, or a directory relative to the working directory when
/// there is no home directory.
pub fn data_dir() -> PathBuf {
    home::home_dir()
        .map(|home| home.join(DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR))
}

pub fn default_settings_path() -> PathBuf {
    data_dir().join(SETTINGS_FILE)
}

pub fn log_dir() -> PathBuf {
    data_dir().join(LOG_DIR)
}
