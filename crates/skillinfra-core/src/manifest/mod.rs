//! Skill manifest (skill.json) access.
//!
//! The manifest is treated as an untyped JSON document: only the skill name
//! and the `apis` endpoints are read or written, every other key is left as-is.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Map, Value};

use crate::types::{DEFAULT_REGION, Endpoint};

/// Manifest location relative to the project root.
pub const MANIFEST_RELATIVE_PATH: &str = "skill-package/skill.json";

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    content: Value,
}

impl Manifest {
    pub fn new(path: PathBuf, content: Value) -> Self {
        Self { path, content }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("File {} not exists.", path.display()))?;
        let content: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse skill manifest: {}", path.display()))?;
        Ok(Self::new(path.to_path_buf(), content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full manifest document.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Name from the first declared locale, if any.
    pub fn skill_name(&self) -> Option<&str> {
        self.content
            .pointer("/manifest/publishingInformation/locales")?
            .as_object()?
            .values()
            .next()?
            .get("name")?
            .as_str()
    }

    /// Domains declared under `manifest.apis`.
    pub fn api_domains(&self) -> Vec<String> {
        self.content
            .pointer("/manifest/apis")
            .and_then(Value::as_object)
            .map(|apis| apis.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Endpoint URI of `domain` in `region`.
    pub fn apis_endpoint_uri(&self, domain: &str, region: &str) -> Option<&str> {
        let pointer = if region == DEFAULT_REGION {
            format!("/manifest/apis/{}/endpoint/uri", escape(domain))
        } else {
            format!(
                "/manifest/apis/{}/regions/{}/endpoint/uri",
                escape(domain),
                escape(region)
            )
        };
        self.content.pointer(&pointer)?.as_str()
    }

    /// Set the endpoint URI of `domain` in `region`.
    ///
    /// The `default` region maps to `apis.<domain>.endpoint`; any other region to
    /// `apis.<domain>.regions.<region>.endpoint`. Other keys of an existing
    /// endpoint object are kept.
    pub fn set_apis_endpoint_by_domain_region(
        &mut self,
        domain: &str,
        region: &str,
        endpoint: &Endpoint,
    ) -> anyhow::Result<()> {
        let api = object_entry(&mut self.content, "manifest")
            .and_then(|manifest| object_entry(manifest, "apis"))
            .and_then(|apis| object_entry(apis, domain))
            .with_context(|| format!("Manifest api domain \"{}\" is not an object", domain))?;

        let parent = if region == DEFAULT_REGION {
            api
        } else {
            object_entry(api, "regions")
                .and_then(|regions| object_entry(regions, region))
                .with_context(|| {
                    format!(
                        "Manifest regions of api domain \"{}\" are not an object",
                        domain
                    )
                })?
        };
        let endpoint_value = object_entry(parent, "endpoint")
            .with_context(|| format!("Manifest endpoint of \"{}\" is not an object", domain))?;
        endpoint_value
            .as_object_mut()
            .context("endpoint is not an object")?
            .insert("uri".to_string(), Value::String(endpoint.url.clone()));
        Ok(())
    }

    pub fn write(&self) -> anyhow::Result<()> {
        let mut content = serde_json::to_string_pretty(&self.content)
            .context("Failed to serialize skill manifest")?;
        content.push('\n');
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write skill manifest: {}", self.path.display()))
    }
}

/// Get `value[key]` as an object, creating it when absent.
/// Returns `None` if either level holds a non-object value.
fn object_entry<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    let entry = value
        .as_object_mut()?
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    entry.is_object().then_some(entry)
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
