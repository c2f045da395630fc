use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const APP_DIR: &str = "boxoffice_tui";

/// User settings. Environment variables win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub kobis_api_key: Option<String>,
    pub kakao_api_key: Option<String>,
    /// Start in the one-line list instead of the card grid.
    #[serde(default)]
    pub compact_list: bool,
}

impl Config {
    pub fn load() -> Self {
        let mut config = config_path()
            .map(|path| Self::from_file(&path))
            .unwrap_or_default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Reads a config file, falling back to defaults if it is missing or
    /// unreadable.
    pub fn from_file(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str::<Self>(&contents) {
            Ok(config) => config.without_blank_keys(),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring invalid config file");
                Self::default()
            }
        }
    }

    fn without_blank_keys(mut self) -> Self {
        self.kobis_api_key = self.kobis_api_key.filter(|k| !k.trim().is_empty());
        self.kakao_api_key = self.kakao_api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn has_kobis_key(&self) -> bool {
        self.kobis_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("KOBIS_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.kobis_api_key = Some(key);
        }
        if let Some(key) = lookup("KAKAO_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.kakao_api_key = Some(key);
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

pub fn log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join("boxoffice_tui.log"))
}
