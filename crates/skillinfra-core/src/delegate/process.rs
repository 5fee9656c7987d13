//! Deploy delegate backed by an external deployer executable.
//!
//! Each call spawns the executable once, writes a single JSON request to its
//! stdin and reads a single JSON response from its stdout:
//!
//! ```text
//! -> {"command":"bootstrap","options":{...}}      <- {"userConfig":{...}}
//! -> {"command":"invoke","regionConfig":{...}}    <- {"endpoint":{"url":..},"deployState":..,...}
//! ```
//!
//! Lines written to stderr are forwarded to the task reporter.

use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};

use crate::deploy::TaskReporter;
use crate::types::{InvokeResult, RegionConfig};

use super::{BootstrapOptions, BootstrapResult, DeployDelegate};

#[derive(Debug, Clone)]
pub struct ProcessDelegate {
    infra_type: String,
    command: String,
    args: Vec<String>,
}

struct ProcessOutput {
    stdout: Vec<u8>,
    stderr: String,
}

impl ProcessDelegate {
    pub fn new(infra_type: String, command: String, args: Vec<String>) -> Self {
        Self {
            infra_type,
            command,
            args,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: &Value,
        reporter: Option<&TaskReporter>,
    ) -> anyhow::Result<T> {
        let output = self.run(request).await?;
        if let Some(reporter) = reporter {
            for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
                reporter.update_status(line);
            }
        }
        serde_json::from_slice(&output.stdout).with_context(|| {
            format!(
                "Deployer '{}' returned an invalid response for {}",
                self.command, request["command"]
            )
        })
    }

    async fn run(&self, request: &Value) -> anyhow::Result<ProcessOutput> {
        let payload = serde_json::to_vec(request).context("Failed to encode deployer request")?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start deployer '{}'", self.command))?;

        let stdin = child
            .stdin
            .take()
            .context("Deployer stdin was not captured")?;
        // Feed stdin while stdout/stderr drain so neither side blocks on a full pipe.
        let writer = tokio::spawn(write_request(stdin, payload));

        let output = child
            .wait_with_output()
            .await
            .with_context(|| format!("Failed to wait for deployer '{}'", self.command))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!(
                    command = %self.command,
                    "deployer closed stdin before reading the request"
                );
            }
            Ok(Err(e)) => {
                return Err(e).with_context(|| {
                    format!("Failed to send request to deployer '{}'", self.command)
                });
            }
            Err(e) => {
                anyhow::bail!("Request writer for deployer '{}' failed: {}", self.command, e)
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            anyhow::bail!(
                "Deployer '{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            );
        }

        Ok(ProcessOutput {
            stdout: output.stdout,
            stderr,
        })
    }
}

async fn write_request(mut stdin: ChildStdin, payload: Vec<u8>) -> std::io::Result<()> {
    stdin.write_all(&payload).await?;
    stdin.shutdown().await
}

#[async_trait]
impl DeployDelegate for ProcessDelegate {
    fn infra_type(&self) -> &str {
        &self.infra_type
    }

    async fn bootstrap(&self, options: BootstrapOptions) -> anyhow::Result<BootstrapResult> {
        let request = json!({ "command": "bootstrap", "options": options });
        self.call(&request, None).await
    }

    async fn invoke(
        &self,
        reporter: &TaskReporter,
        config: &RegionConfig,
    ) -> anyhow::Result<InvokeResult> {
        reporter.update_status(format!("Running deployer '{}'", self.command));
        let request = json!({ "command": "invoke", "regionConfig": config });
        self.call(&request, Some(reporter)).await
    }
}
