use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use storage::{load_seed_file, ActivitySeed};
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub seed_file: Option<PathBuf>,
    pub static_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            seed_file: None,
            static_dir: default_static_dir(),
        }
    }
}

/// The frontend bundled with this crate; independent of the working directory.
pub fn default_static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Keys `server.toml` may set. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    seed_file: Option<PathBuf>,
    static_dir: Option<PathBuf>,
}

pub fn load_settings() -> Settings {
    let mut settings = settings_from_file(Path::new(SETTINGS_FILE));
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Defaults overlaid with whatever keys `path` provides. A missing file is
/// not an error. Invalid toml, or a known key with the wrong type, is logged
/// and the whole file is ignored.
pub fn settings_from_file(path: &Path) -> Settings {
    let mut settings = Settings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    let file_cfg = match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unparsable settings file");
            return settings;
        }
    };

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.seed_file {
        settings.seed_file = Some(v);
    }
    if let Some(v) = file_cfg.static_dir {
        settings.static_dir = v;
    }

    settings
}

/// Environment wins over the settings file; `APP__` names win over plain ones.
pub fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("ACTIVITIES_SEED_FILE") {
        settings.seed_file = Some(PathBuf::from(v));
    }
    if let Some(v) = var("APP__SEED_FILE") {
        settings.seed_file = Some(PathBuf::from(v));
    }

    if let Some(v) = var("STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }
    if let Some(v) = var("APP__STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }
}

pub fn load_seed(settings: &Settings) -> anyhow::Result<Vec<ActivitySeed>> {
    match settings.seed_file.as_deref() {
        Some(path) if !path.as_os_str().is_empty() => load_seed_file(path)
            .with_context(|| format!("failed to load activities from '{}'", path.display())),
        _ => Ok(ActivitySeed::defaults()),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
