//! Propagation of deployed endpoints into the skill manifest.

use serde_json::Value;

use crate::api::{DEVELOPMENT_STAGE, ManifestApi};
use crate::error::{DeployError, ShapeError};
use crate::manifest::Manifest;
use crate::types::AggregateDeployResult;

/// Rewrite endpoints, write the manifest locally, then push it remotely.
///
/// Only called with a validated, fully successful aggregate. For every
/// declared api domain and every deployed region the domain's regional
/// endpoint is set to that region's endpoint.
pub async fn sync_manifest(
    api: &dyn ManifestApi,
    manifest: &mut Manifest,
    skill_id: &str,
    result: &AggregateDeployResult,
) -> Result<(), DeployError> {
    for domain in manifest.api_domains() {
        for (region, invoke_result) in result {
            let endpoint = invoke_result
                .endpoint
                .as_ref()
                .ok_or_else(|| ShapeError::new(region.clone(), "endpoint is missing"))?;
            manifest.set_apis_endpoint_by_domain_region(&domain, region, endpoint)?;
        }
    }
    manifest.write()?;

    let response = api
        .update_manifest(skill_id, DEVELOPMENT_STAGE, manifest.content())
        .await?;
    if response.status_code >= 300 {
        return Err(DeployError::RemoteUpdate(body_to_string(&response.body)));
    }

    tracing::info!(
        "  The api endpoint of skill.json have been updated from the skill infrastructure deploy results."
    );
    Ok(())
}

fn body_to_string(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
