//! Settings path resolution helpers.

use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "skillinfra.toml";

/// Global settings file inside the tool's config directory.
pub fn global_settings_path(global_dir: &Path) -> PathBuf {
    global_dir.join(SETTINGS_FILE)
}

/// Project settings file at the skill project root.
pub fn project_settings_path(project_root: &Path) -> PathBuf {
    project_root.join(SETTINGS_FILE)
}

/// Default global config directory (`<config dir>/skillinfra`).
pub fn default_global_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("skillinfra"))
}
