//! Skill infrastructure controller: the two entry points used by frontends.
//!
//! A deployment attempt moves through
//! `resolve -> fan-out -> reconcile -> validate -> sync`. Reconciliation runs
//! before the success/failure branch so durable regional state is never lost.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{ManifestApi, SmapiClient};
use crate::change::ChangeDetector;
use crate::context::AppContext;
use crate::delegate::{BootstrapOptions, DelegateRegistry, DeployDelegate};
use crate::deploy::{
    DeployTarget, RegionScheduler, RegionTask, StateReconciler, sync_manifest, validator,
};
use crate::error::{DeployError, Result};
use crate::manifest::Manifest;
use crate::resources::{ResourcesConfig, ResourcesStore};
use crate::strings::{filter_non_alphanumeric, is_non_blank};

#[derive(Debug)]
pub struct SkillInfrastructureController {
    profile: String,
    project_root: PathBuf,
    resources: ResourcesStore,
    manifest_path: PathBuf,
    registry: DelegateRegistry,
    api: Arc<dyn ManifestApi>,
    detector: ChangeDetector,
}

impl SkillInfrastructureController {
    pub fn new(
        ctx: &AppContext,
        registry: DelegateRegistry,
        api: Arc<dyn ManifestApi>,
    ) -> Self {
        Self {
            profile: ctx.profile().to_string(),
            project_root: ctx.project_root().to_path_buf(),
            resources: ctx.resources_store(),
            manifest_path: ctx.manifest_path(),
            registry,
            api,
            detector: ChangeDetector::default(),
        }
    }

    /// Wire the controller from settings: built-in plus configured delegates
    /// and the HTTP management API client.
    pub fn from_context(ctx: &AppContext) -> anyhow::Result<Self> {
        let settings = ctx.load_settings()?;
        let registry = DelegateRegistry::from_settings(&settings);
        let api = Arc::new(SmapiClient::from_settings(&settings)?);
        Ok(Self::new(ctx, registry, api))
    }

    /// Replace the content digest function.
    pub fn with_change_detector(mut self, detector: ChangeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Run the delegate's bootstrap step and persist the returned user config.
    pub async fn bootstrap_infrastructures(&self, workspace_path: &Path) -> Result<()> {
        let mut config = self.resources.load()?;
        let delegate = self.resolve_delegate(&config)?;

        let options = BootstrapOptions {
            profile: self.profile.clone(),
            user_config: config.skill_infra_user_config(&self.profile),
            workspace_path: workspace_path.to_path_buf(),
        };
        let result = delegate.bootstrap(options).await?;

        config.set_skill_infra_user_config(&self.profile, result.user_config);
        self.resources.save(&config)?;
        tracing::info!(
            profile = %self.profile,
            infra_type = delegate.infra_type(),
            "bootstrapped skill infrastructure"
        );
        Ok(())
    }

    /// Deploy every configured region, persist the outcome, then update the
    /// skill manifest with the new endpoints.
    pub async fn deploy_infrastructure(&self) -> Result<()> {
        let mut config = self.resources.load()?;
        let delegate = self.resolve_delegate(&config)?;
        let mut manifest = Manifest::load(&self.manifest_path)?;

        let target = DeployTarget {
            profile: self.profile.clone(),
            skill_id: config.skill_id(&self.profile).map(str::to_string),
            skill_name: self.skill_name(&manifest)?,
            user_config: config.skill_infra_user_config(&self.profile),
        };
        let tasks = self.region_tasks(&config);
        if tasks.is_empty() {
            return Err(DeployError::Configuration(
                "[Warn]: Skip the infrastructure deployment, as the \"code\" field has not been set in the resources config file.".to_string(),
            ));
        }
        tracing::info!(
            profile = %self.profile,
            infra_type = delegate.infra_type(),
            regions = tasks.len(),
            "deploying skill infrastructure"
        );

        let reconciler = StateReconciler::new(&self.resources, &self.profile);
        let scheduler = RegionScheduler::new(delegate.clone(), self.detector.clone());
        let result = match scheduler.run(target, tasks).await {
            Ok(result) => {
                reconciler.reconcile(&mut config, &result)?;
                result
            }
            Err(DeployError::Aggregate(err)) => {
                if !err.partial.is_empty() {
                    if let Err(save_err) = reconciler.reconcile(&mut config, &err.partial) {
                        tracing::error!(
                            profile = %self.profile,
                            error = %format!("{:#}", save_err),
                            "failed to persist partial deploy state"
                        );
                    }
                }
                return Err(err.into());
            }
            Err(other) => return Err(other),
        };

        validator::validate(delegate.as_ref(), &result)?;

        let skill_id = config.skill_id(&self.profile).ok_or_else(|| {
            DeployError::Configuration(format!(
                "[Error]: Skill ID is not set for profile \"{}\"; cannot update the skill manifest.",
                self.profile
            ))
        })?;
        sync_manifest(self.api.as_ref(), &mut manifest, skill_id, &result).await
    }

    fn resolve_delegate(&self, config: &ResourcesConfig) -> Result<Arc<dyn DeployDelegate>> {
        let infra_type = config
            .skill_infra_type(&self.profile)
            .filter(|t| is_non_blank(t))
            .ok_or(DeployError::MissingInfraType)?;
        self.registry.resolve(infra_type)
    }

    /// Manifest skill name, else the project folder name, alphanumerics only.
    fn skill_name(&self, manifest: &Manifest) -> Result<String> {
        let from_manifest = manifest
            .skill_name()
            .map(filter_non_alphanumeric)
            .unwrap_or_default();
        if is_non_blank(&from_manifest) {
            return Ok(from_manifest);
        }

        let from_folder = self
            .project_root
            .file_name()
            .map(|name| filter_non_alphanumeric(&name.to_string_lossy()))
            .unwrap_or_default();
        if is_non_blank(&from_folder) {
            return Ok(from_folder);
        }

        Err(DeployError::Configuration(
            "[Error]: Failed to parse the skill name used to decide the CloudFormation stack name. \
             Please make sure your skill name or skill project folder basename contains alphanumeric characters."
                .to_string(),
        ))
    }

    fn region_tasks(&self, config: &ResourcesConfig) -> Vec<RegionTask> {
        config
            .code_regions(&self.profile)
            .into_iter()
            .filter_map(|region| {
                let code = config.code_by_region(&self.profile, &region)?;
                Some(RegionTask {
                    artifact: self.project_root.join(&code.src),
                    last_deploy_hash: code.last_deploy_hash.clone(),
                    deploy_state: config.skill_infra_deploy_state(&self.profile, &region),
                    region,
                })
            })
            .collect()
    }
}
