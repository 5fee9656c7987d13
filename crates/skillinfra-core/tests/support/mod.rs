#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use skillinfra_core::api::{ApiResponse, ManifestApi};
use skillinfra_core::context::AppContext;
use skillinfra_core::controller::SkillInfrastructureController;
use skillinfra_core::delegate::{BootstrapOptions, BootstrapResult, DelegateRegistry, DeployDelegate};
use skillinfra_core::deploy::TaskReporter;
use skillinfra_core::types::{Endpoint, InvokeResult, RegionConfig};

pub const SCRIPTED_TYPE: &str = "@test/scripted";

/// What the scripted delegate does for one region.
#[derive(Debug, Clone)]
pub enum Script {
    Succeed(&'static str),
    Fail { persisted: bool },
    Error(&'static str),
}

#[derive(Debug, Default)]
pub struct ScriptedDelegate {
    scripts: BTreeMap<String, Script>,
    pub invoked: Mutex<Vec<RegionConfig>>,
    pub bootstrapped: Mutex<Vec<BootstrapOptions>>,
}

impl ScriptedDelegate {
    pub fn new(scripts: &[(&str, Script)]) -> Arc<Self> {
        Arc::new(Self {
            scripts: scripts
                .iter()
                .map(|(region, script)| (region.to_string(), script.clone()))
                .collect(),
            ..Self::default()
        })
    }

    pub fn invoked_regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .invoked
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.alexa_region.clone())
            .collect();
        regions.sort();
        regions
    }
}

#[async_trait]
impl DeployDelegate for ScriptedDelegate {
    fn infra_type(&self) -> &str {
        SCRIPTED_TYPE
    }

    async fn bootstrap(&self, options: BootstrapOptions) -> anyhow::Result<BootstrapResult> {
        self.bootstrapped.lock().unwrap().push(options.clone());
        Ok(BootstrapResult {
            user_config: json!({
                "runtime": "nodejs18.x",
                "handler": "index.handler",
                "workspace": options.workspace_path,
            }),
        })
    }

    async fn invoke(
        &self,
        reporter: &TaskReporter,
        config: &RegionConfig,
    ) -> anyhow::Result<InvokeResult> {
        self.invoked.lock().unwrap().push(config.clone());
        reporter.update_status("scripted");
        let state = json!({ "stackId": format!("stack-{}", config.alexa_region) });
        match self.scripts.get(&config.alexa_region) {
            Some(Script::Succeed(url)) => {
                Ok(InvokeResult::success(Endpoint::new(*url), state).with_artifact_persisted())
            }
            Some(Script::Fail { persisted }) => {
                let result = InvokeResult::failure(
                    "stack update failed",
                    vec!["UPDATE_ROLLBACK_COMPLETE".to_string()],
                    state,
                );
                Ok(if *persisted {
                    result.with_artifact_persisted()
                } else {
                    result
                })
            }
            Some(Script::Error(message)) => Err(anyhow::anyhow!(*message)),
            None => Err(anyhow::anyhow!("no script for {}", config.alexa_region)),
        }
    }
}

/// Records every manifest push and replies with a fixed response.
#[derive(Debug)]
pub struct RecordingApi {
    status: u16,
    body: Value,
    pub pushed: Mutex<Vec<(String, String, Value)>>,
}

impl RecordingApi {
    pub fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            pushed: Mutex::new(Vec::new()),
        })
    }

    pub fn push_count(&self) -> usize {
        self.pushed.lock().unwrap().len()
    }
}

#[async_trait]
impl ManifestApi for RecordingApi {
    async fn update_manifest(
        &self,
        skill_id: &str,
        stage: &str,
        manifest: &Value,
    ) -> anyhow::Result<ApiResponse> {
        self.pushed
            .lock()
            .unwrap()
            .push((skill_id.to_string(), stage.to_string(), manifest.clone()));
        Ok(ApiResponse::new(self.status, self.body.clone()))
    }
}

/// A skill project on disk: resources config, manifest and one artifact per
/// region.
pub struct Project {
    pub temp: TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new(resources: Value) -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("hello-world");
        std::fs::create_dir_all(root.join("skill-package")).unwrap();
        write_json(&root.join("ask-resources.json"), &resources);
        write_json(
            &root.join("skill-package/skill.json"),
            &json!({
                "manifest": {
                    "publishingInformation": {
                        "locales": { "en-US": { "name": "Hello World!" } }
                    },
                    "apis": { "custom": {} }
                }
            }),
        );
        Self { temp, root }
    }

    pub fn write_artifact(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn context(&self) -> AppContext {
        AppContext::with_global_config_dir(
            self.root.clone(),
            self.temp.path().join("config"),
            "default",
        )
    }

    pub fn controller(
        &self,
        delegate: Arc<ScriptedDelegate>,
        api: Arc<RecordingApi>,
    ) -> SkillInfrastructureController {
        let mut registry = DelegateRegistry::new();
        registry.register(SCRIPTED_TYPE, move || {
            delegate.clone() as Arc<dyn DeployDelegate>
        });
        SkillInfrastructureController::new(&self.context(), registry, api)
    }

    pub fn resources(&self) -> Value {
        read_json(&self.root.join("ask-resources.json"))
    }

    pub fn manifest(&self) -> Value {
        read_json(&self.root.join("skill-package/skill.json"))
    }
}

/// Resources config for the `default` profile with one artifact per region.
pub fn resources_with_regions(infra_type: &str, regions: &[&str]) -> Value {
    let code: serde_json::Map<String, Value> = regions
        .iter()
        .map(|region| {
            (
                region.to_string(),
                json!({ "src": format!("lambda/{region}") }),
            )
        })
        .collect();
    json!({
        "askcliResourcesVersion": "2020-03-31",
        "profiles": {
            "default": {
                "skillId": "amzn1.ask.skill.1234",
                "skillInfrastructure": {
                    "type": infra_type,
                    "userConfig": { "runtime": "nodejs18.x" }
                },
                "code": code
            }
        }
    })
}

pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
