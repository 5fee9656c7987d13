//! Concurrent fan-out of regional deployment tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::change::ChangeDetector;
use crate::delegate::DeployDelegate;
use crate::error::{AggregateError, DeployError};
use crate::types::AggregateDeployResult;

use super::region::{DeployTarget, RegionOutcome, RegionTask, deploy_region};

/// Runs one task per region and waits for all of them to settle.
///
/// A failing region never cancels its siblings.
#[derive(Debug, Clone)]
pub struct RegionScheduler {
    delegate: Arc<dyn DeployDelegate>,
    detector: ChangeDetector,
}

impl RegionScheduler {
    pub fn new(delegate: Arc<dyn DeployDelegate>, detector: ChangeDetector) -> Self {
        Self { delegate, detector }
    }

    /// Deploy every region concurrently.
    ///
    /// Returns the full aggregate when all regions succeed. Otherwise returns
    /// [`DeployError::Aggregate`] holding every result fragment that was
    /// produced, successful or not.
    pub async fn run(
        &self,
        target: DeployTarget,
        tasks: Vec<RegionTask>,
    ) -> Result<AggregateDeployResult, DeployError> {
        if tasks.is_empty() {
            return Err(DeployError::Configuration(
                "[Error]: No regions to deploy.".to_string(),
            ));
        }

        let target = Arc::new(target);
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let region = task.region.clone();
                tracing::debug!(region = %region, "starting regional deployment");
                let handle = tokio::spawn(deploy_region(
                    self.delegate.clone(),
                    self.detector.clone(),
                    target.clone(),
                    task,
                ));
                (region, handle)
            })
            .collect();

        let mut results = AggregateDeployResult::new();
        let mut failures = BTreeMap::new();
        for (region, handle) in handles {
            match handle.await {
                Ok(RegionOutcome::Succeeded(result)) => {
                    results.insert(region, result);
                }
                Ok(RegionOutcome::Failed { error, fragment }) => {
                    tracing::warn!(region = %region, error = %error, "regional deployment failed");
                    if let Some(fragment) = fragment {
                        results.insert(region.clone(), fragment);
                    }
                    failures.insert(region, error.to_string());
                }
                Err(e) => {
                    failures.insert(region, format!("regional task aborted: {}", e));
                }
            }
        }

        if failures.is_empty() {
            Ok(results)
        } else {
            Err(AggregateError {
                failures,
                partial: results,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::TaskReporter;
    use crate::delegate::{BootstrapOptions, BootstrapResult};
    use crate::types::{Endpoint, InvokeResult, RegionConfig};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct ScriptedDelegate {
        calls: AtomicUsize,
        seen: Mutex<Vec<RegionConfig>>,
    }

    #[async_trait]
    impl crate::delegate::DeployDelegate for ScriptedDelegate {
        fn infra_type(&self) -> &str {
            "@test/scripted"
        }

        async fn bootstrap(&self, _: BootstrapOptions) -> anyhow::Result<BootstrapResult> {
            Ok(BootstrapResult::default())
        }

        async fn invoke(
            &self,
            _reporter: &TaskReporter,
            config: &RegionConfig,
        ) -> anyhow::Result<InvokeResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(config.clone());
            match config.alexa_region.as_str() {
                "SLOW" => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(InvokeResult::success(Endpoint::new("https://slow"), json!({})))
                }
                "PARTIAL" => Ok(InvokeResult::failure(
                    "stack failed",
                    vec!["CREATE_FAILED".to_string()],
                    json!({ "s3": { "key": "code.zip" } }),
                )
                .with_artifact_persisted()),
                "BROKEN" => anyhow::bail!("delegate crashed"),
                region => Ok(InvokeResult::success(
                    Endpoint::new(format!("https://{}", region)),
                    json!({ "region": region }),
                )
                .with_artifact_persisted()),
            }
        }
    }

    fn target() -> DeployTarget {
        DeployTarget {
            profile: "default".to_string(),
            skill_id: Some("skill".to_string()),
            skill_name: "Hello".to_string(),
            user_config: Value::Null,
        }
    }

    fn task(region: &str, last: Option<&str>) -> RegionTask {
        RegionTask {
            region: region.to_string(),
            artifact: PathBuf::from(format!("code/{}", region)),
            last_deploy_hash: last.map(str::to_string),
            deploy_state: Value::Null,
        }
    }

    fn scheduler(delegate: Arc<ScriptedDelegate>) -> RegionScheduler {
        let detector = ChangeDetector::new(|path| {
            if path.ends_with("UNREADABLE") {
                anyhow::bail!("permission denied");
            }
            Ok(format!("digest-of-{}", path.display()))
        });
        RegionScheduler::new(delegate, detector)
    }

    #[tokio::test]
    async fn all_regions_succeed() {
        let delegate = Arc::new(ScriptedDelegate::default());
        let result = scheduler(delegate.clone())
            .run(target(), vec![task("NA", None), task("EU", None), task("SLOW", None)])
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            result["NA"].last_deploy_hash.as_deref(),
            Some("digest-of-code/NA")
        );
        assert_eq!(result["SLOW"].last_deploy_hash, None);
    }

    #[tokio::test]
    async fn modified_flag_follows_prior_digest() {
        let delegate = Arc::new(ScriptedDelegate::default());
        scheduler(delegate.clone())
            .run(
                target(),
                vec![task("NA", Some("digest-of-code/NA")), task("EU", Some("stale"))],
            )
            .await
            .unwrap();

        let seen = delegate.seen.lock().unwrap();
        let modified = |region: &str| {
            seen.iter()
                .find(|c| c.alexa_region == region)
                .map(|c| c.code.is_code_modified)
        };
        assert_eq!(modified("NA"), Some(false));
        assert_eq!(modified("EU"), Some(true));
    }

    #[tokio::test]
    async fn failure_keeps_partial_fragments_and_waits_for_siblings() {
        let delegate = Arc::new(ScriptedDelegate::default());
        let err = scheduler(delegate.clone())
            .run(
                target(),
                vec![
                    task("PARTIAL", None),
                    task("BROKEN", None),
                    task("SLOW", None),
                    task("UNREADABLE", None),
                ],
            )
            .await
            .unwrap_err();

        let err = match err {
            DeployError::Aggregate(err) => err,
            other => panic!("expected aggregate error, got {other:?}"),
        };
        assert_eq!(
            err.failures.keys().collect::<Vec<_>>(),
            vec!["BROKEN", "PARTIAL", "UNREADABLE"]
        );
        assert!(err.failures["BROKEN"].contains("delegate crashed"));
        assert!(err.failures["UNREADABLE"].contains("permission denied"));

        assert_eq!(err.partial.len(), 2);
        assert!(err.partial.contains_key("SLOW"));
        let partial = &err.partial["PARTIAL"];
        assert_eq!(
            partial.last_deploy_hash.as_deref(),
            Some("digest-of-code/PARTIAL")
        );
        assert_eq!(partial.deploy_state["s3"]["key"], "code.zip");

        // UNREADABLE never reached the delegate
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_region_set_never_touches_delegate() {
        let delegate = Arc::new(ScriptedDelegate::default());
        let err = scheduler(delegate.clone())
            .run(target(), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Configuration(_)));
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 0);
    }
}
