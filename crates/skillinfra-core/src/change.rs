//! Change detection for regional build artifacts.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::fs::hash_path;

/// Injectable digest function: `hash(path) -> digest`.
pub type HashFn = dyn Fn(&Path) -> anyhow::Result<String> + Send + Sync;

/// Digest of an artifact and whether it differs from the last deployed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChange {
    pub digest: String,
    pub modified: bool,
}

/// Compares an artifact's current digest against the last recorded digest.
#[derive(Clone)]
pub struct ChangeDetector {
    hasher: Arc<HashFn>,
}

impl fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDetector").finish_non_exhaustive()
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(hash_path)
    }
}

impl ChangeDetector {
    pub fn new<F>(hasher: F) -> Self
    where
        F: Fn(&Path) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            hasher: Arc::new(hasher),
        }
    }

    /// Digest `artifact` and compare it with `last_known`.
    ///
    /// A missing prior digest always counts as modified.
    pub fn detect(&self, artifact: &Path, last_known: Option<&str>) -> anyhow::Result<CodeChange> {
        let digest = (self.hasher)(artifact)?;
        let modified = last_known != Some(digest.as_str());
        Ok(CodeChange { digest, modified })
    }
}
