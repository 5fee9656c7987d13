//! Settings store for loading and layering skillinfra.toml files.

use std::path::{Path, PathBuf};

use super::{Settings, parser, paths};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    global_path: PathBuf,
    project_path: PathBuf,
}

impl SettingsStore {
    pub fn from_paths(global_dir: &Path, project_root: &Path) -> Self {
        Self {
            global_path: paths::global_settings_path(global_dir),
            project_path: paths::project_settings_path(project_root),
        }
    }

    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Load global settings overlaid with project settings.
    ///
    /// Missing files contribute defaults.
    pub fn load(&self) -> anyhow::Result<Settings> {
        let mut settings = load_file(&self.global_path)?;
        settings.merge(load_file(&self.project_path)?);
        tracing::debug!(
            global = %self.global_path.display(),
            project = %self.project_path.display(),
            delegates = settings.delegates.len(),
            "loaded settings"
        );
        Ok(settings)
    }
}

fn load_file(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::new());
    }
    parser::parse_settings_toml(path)
}
