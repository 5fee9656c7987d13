//! Reconciliation of observed regional state into ask-resources.json.

use crate::resources::{ResourcesConfig, ResourcesStore};
use crate::types::AggregateDeployResult;

/// Single writer of persisted deployment state.
#[derive(Debug)]
pub struct StateReconciler<'a> {
    store: &'a ResourcesStore,
    profile: &'a str,
}

impl<'a> StateReconciler<'a> {
    pub fn new(store: &'a ResourcesStore, profile: &'a str) -> Self {
        Self { store, profile }
    }

    /// Merge every region of `result` into `config`, then write it once.
    ///
    /// The deploy state of each region is replaced with what the delegate
    /// returned. The digest is only replaced when the region reported a
    /// persisted artifact; otherwise the previous digest is kept.
    pub fn reconcile(
        &self,
        config: &mut ResourcesConfig,
        result: &AggregateDeployResult,
    ) -> anyhow::Result<()> {
        for (region, invoke_result) in result {
            config.set_skill_infra_deploy_state(
                self.profile,
                region,
                invoke_result.deploy_state.clone(),
            );
            if let Some(digest) = &invoke_result.last_deploy_hash {
                config.set_code_last_deploy_hash(self.profile, region, digest.clone());
            }
        }
        self.store.save(config)?;
        tracing::debug!(
            profile = self.profile,
            regions = result.len(),
            path = %self.store.path().display(),
            "reconciled deploy state"
        );
        Ok(())
    }
}
