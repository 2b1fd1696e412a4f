use std::{fs, path::Path};

use serde::Deserialize;
use server_api::DEFAULT_ERGAST_BASE_URL;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub ergast_base_url: String,
    pub ergast_accept_invalid_certs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            ergast_base_url: DEFAULT_ERGAST_BASE_URL.into(),
            ergast_accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    ergast_base_url: Option<String>,
    ergast_accept_invalid_certs: Option<bool>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |name| std::env::var(name).ok())
}

/// Defaults, then the optional TOML file, then environment overrides.
pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.ergast_base_url {
                    settings.ergast_base_url = v;
                }
                if let Some(v) = file_cfg.ergast_accept_invalid_certs {
                    settings.ergast_accept_invalid_certs = v;
                }
            }
            Err(err) => {
                warn!(path = %config_path.display(), %err, "ignoring unparsable config file");
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("ERGAST_BASE_URL") {
        settings.ergast_base_url = v;
    }
    if let Some(v) = env("APP__ERGAST_BASE_URL") {
        settings.ergast_base_url = v;
    }

    if let Some(v) = env("APP__ERGAST_ACCEPT_INVALID_CERTS") {
        if let Some(parsed) = parse_flag(&v) {
            settings.ergast_accept_invalid_certs = parsed;
        }
    }

    settings
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
