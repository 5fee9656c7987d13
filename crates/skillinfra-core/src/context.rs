//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::config::{Settings, SettingsStore, paths};
use crate::manifest::MANIFEST_RELATIVE_PATH;
use crate::resources::ResourcesStore;

/// Default profile name.
pub const DEFAULT_PROFILE: &str = "default";

/// Per-invocation context.
///
/// Frontends create this once and pass it to the controller; nothing in the
/// library reads process-global configuration on its own.
#[derive(Debug, Clone)]
pub struct AppContext {
    project_root: PathBuf,
    global_config_dir: PathBuf,
    profile: String,
}

impl AppContext {
    /// Create a context using the platform config directory.
    pub fn new(project_root: PathBuf, profile: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::with_global_config_dir(
            project_root,
            paths::default_global_dir()?,
            profile,
        ))
    }

    /// Create a context with a custom global config directory (for testing).
    pub fn with_global_config_dir(
        project_root: PathBuf,
        global_config_dir: PathBuf,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            project_root,
            global_config_dir,
            profile: profile.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn global_config_dir(&self) -> &Path {
        &self.global_config_dir
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::from_paths(&self.global_config_dir, &self.project_root)
    }

    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        self.settings_store().load()
    }

    pub fn resources_store(&self) -> ResourcesStore {
        ResourcesStore::for_project(&self.project_root)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(MANIFEST_RELATIVE_PATH)
    }
}
