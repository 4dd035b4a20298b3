use std::path::Path;

use serde::Deserialize;

/// File-level settings for the varsync binary.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub project_url: Option<String>,
    pub token: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Load settings from an explicit config path, or `./varsync.toml` when it
/// exists. Environment variables win over file values; command line flags
/// are applied on top by the caller.
pub fn load(path: Option<&str>) -> anyhow::Result<Config> {
    let default_path = Path::new("varsync.toml");
    let mut cfg: Config = match path {
        Some(p) => toml::from_str(&std::fs::read_to_string(p)?)?,
        None if default_path.exists() => {
            toml::from_str(&std::fs::read_to_string(default_path)?)?
        }
        None => Config::default(),
    };

    if let Ok(v) = std::env::var("VARSYNC_PROJECT_URL") {
        if !v.trim().is_empty() {
            cfg.project_url = Some(v);
        }
    }
    if let Ok(v) = std::env::var("VARSYNC_TOKEN") {
        if !v.trim().is_empty() {
            cfg.token = Some(v);
        }
    }

    Ok(cfg)
}
