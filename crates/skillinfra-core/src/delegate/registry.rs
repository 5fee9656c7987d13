//! Delegate registry for resolving infrastructure types.
//!
//! Types map to factory functions registered at startup; resolution never
//! loads code at runtime.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::DeployError;

use super::{DeployDelegate, ProcessDelegate};

/// CloudFormation-backed deployer.
pub const CFN_DEPLOYER: &str = "@ask-cli/cfn-deployer";
/// Lambda-only deployer.
pub const LAMBDA_DEPLOYER: &str = "@ask-cli/lambda-deployer";

/// Builds a fresh delegate instance.
pub type DelegateFactory = Box<dyn Fn() -> Arc<dyn DeployDelegate> + Send + Sync>;

/// Registry of known deploy delegates keyed by infrastructure type.
pub struct DelegateRegistry {
    factories: BTreeMap<String, DelegateFactory>,
}

impl fmt::Debug for DelegateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateRegistry")
            .field("infra_types", &self.infra_types())
            .finish()
    }
}

impl Default for DelegateRegistry {
    fn default() -> Self {
        Self::with_default_delegates()
    }
}

impl DelegateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in deployers.
    pub fn with_default_delegates() -> Self {
        let mut registry = Self::new();
        registry.register_command(CFN_DEPLOYER, "ask-cfn-deployer", Vec::new());
        registry.register_command(LAMBDA_DEPLOYER, "ask-lambda-deployer", Vec::new());
        registry
    }

    /// Built-in deployers plus the commands declared in settings.
    ///
    /// A settings entry for a built-in type replaces the built-in command.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::with_default_delegates();
        for (infra_type, entry) in &settings.delegates {
            registry.register_command(infra_type, &entry.command, entry.args.clone());
        }
        registry
    }

    /// Register a factory, replacing any previous one for the same type.
    pub fn register<F>(&mut self, infra_type: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn DeployDelegate> + Send + Sync + 'static,
    {
        self.factories.insert(infra_type.into(), Box::new(factory));
    }

    /// Register an external deployer executable.
    pub fn register_command(&mut self, infra_type: &str, command: &str, args: Vec<String>) {
        let infra_type = infra_type.to_string();
        let command = command.to_string();
        self.register(infra_type.clone(), move || {
            Arc::new(ProcessDelegate::new(
                infra_type.clone(),
                command.clone(),
                args.clone(),
            )) as Arc<dyn DeployDelegate>
        });
    }

    /// Resolve an infrastructure type to a delegate instance.
    pub fn resolve(&self, infra_type: &str) -> Result<Arc<dyn DeployDelegate>, DeployError> {
        self.factories
            .get(infra_type)
            .map(|factory| factory())
            .ok_or_else(|| DeployError::DelegateNotFound(infra_type.to_string()))
    }

    pub fn contains(&self, infra_type: &str) -> bool {
        self.factories.contains_key(infra_type)
    }

    /// List all registered infrastructure types.
    pub fn infra_types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}
