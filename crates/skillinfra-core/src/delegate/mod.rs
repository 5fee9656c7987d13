//! Deploy delegate layer
//!
//! A deploy delegate performs the actual provisioning for one infrastructure
//! backend. The orchestrator only sees the fixed capability set below:
//! - `bootstrap`: one-off project preparation, run sequentially
//! - `invoke`: deploy one region, called once per region per attempt
//! - `validate_response`: contract check over a fully successful aggregate

pub mod process;
pub mod registry;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deploy::{TaskReporter, validator};
use crate::error::ShapeError;
use crate::types::{AggregateDeployResult, InvokeResult, RegionConfig};

pub use process::ProcessDelegate;
pub use registry::{CFN_DEPLOYER, DelegateFactory, DelegateRegistry, LAMBDA_DEPLOYER};

/// Input to [`DeployDelegate::bootstrap`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapOptions {
    pub profile: String,
    #[serde(default)]
    pub user_config: Value,
    pub workspace_path: PathBuf,
}

/// Output of [`DeployDelegate::bootstrap`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResult {
    /// Replaces the persisted user configuration.
    #[serde(default)]
    pub user_config: Value,
}

/// Capability set every infrastructure backend implements.
///
/// Invocations are independent: the orchestrator may call `invoke` for
/// several distinct regions at the same time.
#[async_trait]
pub trait DeployDelegate: Send + Sync + fmt::Debug {
    /// Infrastructure type this delegate serves.
    fn infra_type(&self) -> &str;

    async fn bootstrap(&self, options: BootstrapOptions) -> anyhow::Result<BootstrapResult>;

    /// Deploy a single region.
    ///
    /// Regional failures are reported through [`InvokeResult::reasons`];
    /// an `Err` means the delegate could not produce a result at all.
    async fn invoke(
        &self,
        reporter: &TaskReporter,
        config: &RegionConfig,
    ) -> anyhow::Result<InvokeResult>;

    /// Check a fully successful aggregate against the delegate contract.
    ///
    /// Defaults to requiring a usable endpoint for every region.
    fn validate_response(&self, result: &AggregateDeployResult) -> Result<(), ShapeError> {
        validator::validate_endpoints(result)
    }
}
