//! Deployment flow: regional fan-out, reconciliation, validation and
//! manifest synchronisation.

pub mod manifest_sync;
pub mod reconcile;
pub mod region;
pub mod reporter;
pub mod scheduler;
pub mod validator;

pub use manifest_sync::sync_manifest;
pub use reconcile::StateReconciler;
pub use region::{DeployTarget, RegionOutcome, RegionTask};
pub use reporter::TaskReporter;
pub use scheduler::RegionScheduler;
