use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

// Per-field defaults so a partial, hand-edited config.json keeps the
// remaining defaults instead of being discarded wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            target_lang: default_target_lang(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
        let dir = exe.parent().unwrap_or(Path::new("."));
        dir.join("config.json")
    }

    pub fn load() -> Self {
        let path = Self::path();
        match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str::<Config>(&s).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        let s = serde_json::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_api() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, "http://localhost:8000/api");
        assert_eq!(cfg.target_lang, "en");
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"base_url": "http://10.0.0.2:8000/api"}"#).unwrap();
        assert_eq!(cfg.base_url, "http://10.0.0.2:8000/api");
        assert_eq!(cfg.target_lang, "en");
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let cfg = Config {
            base_url: "http://example.com/api".to_string(),
            target_lang: "fr".to_string(),
            request_timeout_secs: 7,
        };
        let s = serde_json::to_string_pretty(&cfg).unwrap();
        let back: Config = serde_json::from_str(&s).unwrap();
        assert_eq!(back.base_url, cfg.base_url);
        assert_eq!(back.target_lang, cfg.target_lang);
        assert_eq!(back.request_timeout_secs, cfg.request_timeout_secs);
    }
}
