use std::{collections::HashMap, fs, path::Path};

use client_core::FillMode;
use tracing::warn;

pub const CONFIG_FILE: &str = "dashboard.toml";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub fill_mode: FillMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            fill_mode: FillMode::default(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` config file, then environment.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("server_url") {
                    settings.server_url = normalize_server_url(v);
                }
                if let Some(v) = file_cfg.get("fill_mode") {
                    apply_fill_mode(&mut settings, v);
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring unreadable config file: {err}"),
        }
    }

    if let Some(v) = env("FEEDER_SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }
    if let Some(v) = env("APP__FILL_MODE") {
        apply_fill_mode(&mut settings, &v);
    }

    settings
}

fn apply_fill_mode(settings: &mut Settings, raw: &str) {
    match raw.parse::<FillMode>() {
        Ok(mode) => settings.fill_mode = mode,
        Err(err) => warn!("keeping fill mode {:?}: {err}", settings.fill_mode),
    }
}

pub fn normalize_server_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }

    let mut url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
