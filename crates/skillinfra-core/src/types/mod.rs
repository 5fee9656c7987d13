//! Shared core types exchanged between the orchestrator and deploy delegates.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Region key used when a skill has a single, region-agnostic endpoint.
pub const DEFAULT_REGION: &str = "default";

/// Per-region outcome map produced after every regional task has settled.
///
/// Keys are exactly the regions that produced a result fragment.
pub type AggregateDeployResult = BTreeMap<String, InvokeResult>;

/// Endpoint exposed by a deployed region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Code package handed to a delegate for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeDescriptor {
    /// Location of the build artifact (file or directory).
    pub code_build: PathBuf,
    /// Whether the artifact digest differs from the last deployed one.
    pub is_code_modified: bool,
}

/// Input to a single delegate invocation.
///
/// Built once per regional task and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionConfig {
    pub profile: String,
    pub alexa_region: String,
    pub skill_id: Option<String>,
    pub skill_name: String,
    pub code: CodeDescriptor,
    /// Delegate-opaque user configuration.
    #[serde(default)]
    pub user_config: Value,
    /// Deploy state recorded for this region by the previous attempt.
    #[serde(default)]
    pub deploy_state: Value,
}

/// A delegate's output for one region.
///
/// A region counts as failed whenever `reasons` holds at least one entry,
/// regardless of the other fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,

    /// Delegate-defined state, persisted verbatim.
    #[serde(default)]
    pub deploy_state: Value,

    /// Set by the delegate once the region's code package has been durably
    /// (re)written, even if a later step of the region failed.
    #[serde(default)]
    pub artifact_persisted: bool,

    /// Digest of the artifact that was persisted. Stamped by the orchestrator,
    /// never trusted from the delegate.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub last_deploy_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

impl InvokeResult {
    /// Successful result with an endpoint and deploy state.
    pub fn success(endpoint: Endpoint, deploy_state: Value) -> Self {
        Self {
            endpoint: Some(endpoint),
            deploy_state,
            ..Self::default()
        }
    }

    /// Failed result carrying a message and the reasons for failure.
    pub fn failure(message: impl Into<String>, reasons: Vec<String>, deploy_state: Value) -> Self {
        Self {
            deploy_state,
            message: Some(message.into()),
            reasons: Some(reasons),
            ..Self::default()
        }
    }

    pub fn with_artifact_persisted(mut self) -> Self {
        self.artifact_persisted = true;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.reasons.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Human-readable description of a failed region.
    pub fn failure_message(&self) -> String {
        let reasons = self.reasons.as_deref().unwrap_or_default().join("; ");
        match (self.message.as_deref(), reasons.is_empty()) {
            (Some(message), true) => message.to_string(),
            (Some(message), false) => format!("{message} ({reasons})"),
            (None, _) => reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reasons_mark_failure_even_with_endpoint() {
        let mut result = InvokeResult::success(Endpoint::new("https://a"), json!({}));
        assert!(!result.is_failure());

        result.reasons = Some(vec!["stack rolled back".to_string()]);
        assert!(result.is_failure());
    }

    #[test]
    fn empty_reasons_are_not_a_failure() {
        let result = InvokeResult {
            reasons: Some(Vec::new()),
            ..InvokeResult::default()
        };
        assert!(!result.is_failure());
    }

    #[test]
    fn failure_message_joins_reasons() {
        let result = InvokeResult::failure(
            "Deploy failed",
            vec!["a".to_string(), "b".to_string()],
            Value::Null,
        );
        assert_eq!(result.failure_message(), "Deploy failed (a; b)");
    }

    #[test]
    fn delegate_cannot_inject_last_deploy_hash() {
        let result: InvokeResult = serde_json::from_value(json!({
            "endpoint": { "url": "https://x" },
            "deployState": { "stackId": "s" },
            "artifactPersisted": true,
            "lastDeployHash": "forged"
        }))
        .unwrap();

        assert!(result.artifact_persisted);
        assert_eq!(result.last_deploy_hash, None);
        assert_eq!(result.deploy_state, json!({ "stackId": "s" }));
    }
}
