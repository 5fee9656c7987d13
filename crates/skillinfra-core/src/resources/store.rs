//! Store for loading and writing ask-resources.json.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::ResourcesConfig;

pub const RESOURCES_FILE: &str = "ask-resources.json";

#[derive(Debug, Clone)]
pub struct ResourcesStore {
    path: PathBuf,
}

impl ResourcesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(RESOURCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<ResourcesConfig> {
        if !self.path.exists() {
            return Ok(ResourcesConfig::new());
        }
        let content = std::fs::read_to_string(&self.path).with_context(|| {
            format!("Failed to read resources config: {}", self.path.display())
        })?;
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse resources config: {}", self.path.display())
        })
    }

    /// Write the whole config in one pass.
    pub fn save(&self, config: &ResourcesConfig) -> anyhow::Result<()> {
        let mut content = serde_json::to_string_pretty(config)
            .context("Failed to serialize resources config")?;
        content.push('\n');
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, content).with_context(|| {
            format!("Failed to write resources config: {}", self.path.display())
        })?;
        Ok(())
    }
}
