//! A single regional deployment task.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::change::{ChangeDetector, CodeChange};
use crate::delegate::DeployDelegate;
use crate::error::DeployError;
use crate::types::{CodeDescriptor, InvokeResult, RegionConfig};

use super::TaskReporter;

/// Values shared by every region of one deployment attempt.
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub profile: String,
    pub skill_id: Option<String>,
    pub skill_name: String,
    pub user_config: Value,
}

/// Region-specific inputs, read from persisted state before the fan-out.
#[derive(Debug, Clone)]
pub struct RegionTask {
    pub region: String,
    pub artifact: PathBuf,
    pub last_deploy_hash: Option<String>,
    pub deploy_state: Value,
}

impl RegionTask {
    fn into_config(self, target: &DeployTarget, change: &CodeChange) -> RegionConfig {
        RegionConfig {
            profile: target.profile.clone(),
            alexa_region: self.region,
            skill_id: target.skill_id.clone(),
            skill_name: target.skill_name.clone(),
            code: CodeDescriptor {
                code_build: self.artifact,
                is_code_modified: change.modified,
            },
            user_config: target.user_config.clone(),
            deploy_state: self.deploy_state,
        }
    }
}

/// How one regional task settled.
#[derive(Debug)]
pub enum RegionOutcome {
    Succeeded(InvokeResult),
    Failed {
        error: DeployError,
        /// Result of a region that failed after producing durable state.
        fragment: Option<InvokeResult>,
    },
}

/// Digest the artifact, invoke the delegate and classify the result.
///
/// Every failure is captured in the returned outcome.
pub async fn deploy_region(
    delegate: Arc<dyn DeployDelegate>,
    detector: ChangeDetector,
    target: Arc<DeployTarget>,
    task: RegionTask,
) -> RegionOutcome {
    let region = task.region.clone();
    let artifact = task.artifact.clone();
    let last_known = task.last_deploy_hash.clone();

    let digest_result = tokio::task::spawn_blocking(move || {
        detector.detect(&artifact, last_known.as_deref())
    })
    .await;
    let change = match digest_result {
        Ok(Ok(change)) => change,
        Ok(Err(e)) => return artifact_error(&task, format!("{:#}", e)),
        Err(e) => return artifact_error(&task, e.to_string()),
    };
    tracing::debug!(
        region = %region,
        digest = %change.digest,
        modified = change.modified,
        "computed artifact digest"
    );

    let reporter = TaskReporter::new(region.clone());
    let config = task.into_config(&target, &change);
    let mut result = match delegate.invoke(&reporter, &config).await {
        Ok(result) => result,
        Err(e) => {
            return RegionOutcome::Failed {
                error: DeployError::RegionFailed {
                    region,
                    message: format!("{:#}", e),
                },
                fragment: None,
            };
        }
    };

    if result.artifact_persisted {
        result.last_deploy_hash = Some(change.digest);
    }

    if result.is_failure() {
        tracing::warn!(region = %region, "regional deployment reported failure");
        RegionOutcome::Failed {
            error: DeployError::RegionFailed {
                region,
                message: result.failure_message(),
            },
            fragment: Some(result),
        }
    } else {
        reporter.update_status("Deployed");
        RegionOutcome::Succeeded(result)
    }
}

fn artifact_error(task: &RegionTask, reason: String) -> RegionOutcome {
    RegionOutcome::Failed {
        error: DeployError::ArtifactRead {
            region: task.region.clone(),
            path: task.artifact.clone(),
            reason,
        },
        fragment: None,
    }
}
