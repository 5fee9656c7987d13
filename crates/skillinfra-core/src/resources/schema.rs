//! Schema for ask-resources.json
//!
//! Only the keys the deployment flow reads or writes are modelled; everything
//! else is carried through `extra` so a write never drops user data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root of the resources config, keyed by profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileResources>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,

    #[serde(default)]
    pub skill_infrastructure: SkillInfrastructure,

    /// Build artifact per region.
    #[serde(default)]
    pub code: BTreeMap<String, CodeEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInfrastructure {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub infra_type: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub user_config: Value,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deploy_state: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntry {
    /// Artifact locator, relative to the project root unless absolute.
    #[serde(alias = "file")]
    pub src: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deploy_hash: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourcesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self, profile: &str) -> Option<&ProfileResources> {
        self.profiles.get(profile)
    }

    pub fn profile_mut(&mut self, profile: &str) -> &mut ProfileResources {
        self.profiles.entry(profile.to_string()).or_default()
    }

    pub fn skill_id(&self, profile: &str) -> Option<&str> {
        self.profile(profile)?.skill_id.as_deref()
    }

    pub fn skill_infra_type(&self, profile: &str) -> Option<&str> {
        self.profile(profile)?
            .skill_infrastructure
            .infra_type
            .as_deref()
    }

    pub fn skill_infra_user_config(&self, profile: &str) -> Value {
        self.profile(profile)
            .map(|p| p.skill_infrastructure.user_config.clone())
            .unwrap_or(Value::Null)
    }

    pub fn set_skill_infra_user_config(&mut self, profile: &str, user_config: Value) {
        self.profile_mut(profile).skill_infrastructure.user_config = user_config;
    }

    pub fn skill_infra_deploy_state(&self, profile: &str, region: &str) -> Value {
        self.profile(profile)
            .and_then(|p| p.skill_infrastructure.deploy_state.get(region))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn set_skill_infra_deploy_state(&mut self, profile: &str, region: &str, state: Value) {
        self.profile_mut(profile)
            .skill_infrastructure
            .deploy_state
            .insert(region.to_string(), state);
    }

    /// Regions that have a configured build artifact.
    pub fn code_regions(&self, profile: &str) -> Vec<String> {
        self.profile(profile)
            .map(|p| p.code.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn code_by_region(&self, profile: &str, region: &str) -> Option<&CodeEntry> {
        self.profile(profile)?.code.get(region)
    }

    pub fn code_last_deploy_hash(&self, profile: &str, region: &str) -> Option<&str> {
        self.code_by_region(profile, region)?
            .last_deploy_hash
            .as_deref()
    }

    pub fn set_code_last_deploy_hash(&mut self, profile: &str, region: &str, digest: String) {
        self.profile_mut(profile)
            .code
            .entry(region.to_string())
            .or_default()
            .last_deploy_hash = Some(digest);
    }
}
