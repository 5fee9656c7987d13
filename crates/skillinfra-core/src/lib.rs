//! Skillinfra Core Library
//!
//! Drives pluggable deploy delegates to provision a skill's infrastructure in
//! every configured region concurrently, persists what each region reported,
//! and pushes the resulting endpoints into the skill manifest.

pub mod api;
pub mod change;
pub mod config;
pub mod context;
pub mod controller;
pub mod delegate;
pub mod deploy;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod resources;
pub mod strings;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Entry points
    pub use crate::context::{AppContext, DEFAULT_PROFILE};
    pub use crate::controller::SkillInfrastructureController;
    pub use crate::error::{AggregateError, DeployError, ShapeError};

    // Delegates
    pub use crate::delegate::{
        BootstrapOptions, BootstrapResult, DelegateRegistry, DeployDelegate, ProcessDelegate,
    };
    pub use crate::deploy::TaskReporter;

    // Data model
    pub use crate::types::{
        AggregateDeployResult, CodeDescriptor, Endpoint, InvokeResult, RegionConfig,
    };

    // Persistence and remote API
    pub use crate::api::{ApiResponse, ManifestApi, SmapiClient};
    pub use crate::config::{Settings, SettingsStore};
    pub use crate::manifest::Manifest;
    pub use crate::resources::{ResourcesConfig, ResourcesStore};
}
