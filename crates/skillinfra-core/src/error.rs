//! Error taxonomy for bootstrap and deployment attempts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::types::AggregateDeployResult;

/// Errors surfaced by the infrastructure controller and its components.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("[Error]: Please set the \"type\" field for your skill infrastructures.")]
    MissingInfraType,

    #[error("{0}")]
    Configuration(String),

    #[error("[Error]: Deploy delegate not found for infrastructure type \"{0}\".")]
    DelegateNotFound(String),

    #[error("[Error]: Failed to compute the digest of {path:?} for region \"{region}\": {reason}")]
    ArtifactRead {
        region: String,
        path: PathBuf,
        reason: String,
    },

    #[error("[Error]: Deployment failed for region \"{region}\": {message}")]
    RegionFailed { region: String, message: String },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("{0}")]
    RemoteUpdate(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One or more regions failed. Carries every result fragment that was
/// produced so the caller can persist it before reporting the failure.
#[derive(Debug)]
pub struct AggregateError {
    /// Failure message per failed region.
    pub failures: BTreeMap<String, String>,
    /// Results of successful regions plus fragments of failed ones.
    pub partial: AggregateDeployResult,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regions: Vec<&str> = self.failures.keys().map(String::as_str).collect();
        write!(
            f,
            "[Error]: Skill infrastructure deployment failed in {} region(s): {}",
            regions.len(),
            regions.join(", ")
        )?;
        for (region, message) in &self.failures {
            write!(f, "\n  {region}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// A fully successful aggregate result violates the delegate contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[Error]: Invalid response from deploy delegate for region \"{region}\": {rule}")]
pub struct ShapeError {
    pub region: String,
    pub rule: String,
}

impl ShapeError {
    pub fn new(region: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            rule: rule.into(),
        }
    }
}

pub type Result<T, E = DeployError> = std::result::Result<T, E>;
