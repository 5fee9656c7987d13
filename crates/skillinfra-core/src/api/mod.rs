//! Skill management API surface used by the deployment flow.

pub mod smapi;

use async_trait::async_trait;
use serde_json::Value;

pub use smapi::SmapiClient;

/// Stage every manifest update targets.
pub const DEVELOPMENT_STAGE: &str = "development";

/// Raw HTTP outcome; status interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }
}

#[async_trait]
pub trait ManifestApi: Send + Sync + std::fmt::Debug {
    /// Replace the skill manifest of `skill_id` at `stage`.
    ///
    /// `Err` is reserved for transport failures; HTTP error statuses come
    /// back as a normal [`ApiResponse`].
    async fn update_manifest(
        &self,
        skill_id: &str,
        stage: &str,
        manifest: &Value,
    ) -> anyhow::Result<ApiResponse>;
}
