//! Persisted per-profile deployment configuration (ask-resources.json).

pub mod schema;
pub mod store;

pub use schema::{CodeEntry, ProfileResources, ResourcesConfig, SkillInfrastructure};
pub use store::{RESOURCES_FILE, ResourcesStore};
