//! Host bridge over a helper process.
//!
//! Each call spawns the configured command, writes one JSON request to its
//! stdin, and reads one JSON reply from its stdout:
//!
//! ```text
//! -> {"method": "setSelectedClipPosition", "params": [0.5, 0.85]}
//! <- {"ok": true, "result": true}
//! <- {"ok": false, "error": "No project open"}
//! ```
//!
//! The helper owns the host scripting side (selection lookup, motion
//! component access, import commands).

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use subcard_common::HostConfig;

use crate::{ClipPosition, HostBridge, HostError, HostResult, ImportTarget};

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    method: &'a str,
    params: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    ok: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

/// Talks to the host through a helper command.
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessBridge {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Build from config. Returns `None` when no command is configured.
    pub fn from_config(config: &HostConfig) -> Option<Self> {
        let (program, args) = config.command.split_first()?;
        Some(Self::new(
            program.clone(),
            args.to_vec(),
            Duration::from_millis(config.timeout_ms.max(1)),
        ))
    }

    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> HostResult<serde_json::Value> {
        let request = serde_json::to_vec(&BridgeRequest { method, params }).map_err(|e| {
            HostError::Protocol {
                method: method.to_string(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(program = %self.program, method, "Calling host bridge");

        let exchange = async {
            let mut child = Command::new(&self.program)
                .args(&self.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(&request).await?;
                stdin.write_all(b"\n").await?;
                stdin.shutdown().await?;
            }

            child.wait_with_output().await
        };

        let output = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| HostError::Timeout {
                method: method.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HostError::Rejected {
                method: method.to_string(),
                message: format!("bridge exited with {}: {}", output.status, stderr.trim()),
            });
        }

        parse_reply(method, &output.stdout)
    }
}

/// Decode the first non-empty stdout line as a reply.
fn parse_reply(method: &str, stdout: &[u8]) -> HostResult<serde_json::Value> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| HostError::Protocol {
            method: method.to_string(),
            message: "empty reply".to_string(),
        })?;

    let reply: BridgeReply = serde_json::from_str(line).map_err(|e| HostError::Protocol {
        method: method.to_string(),
        message: e.to_string(),
    })?;

    if reply.ok {
        Ok(reply.result)
    } else {
        Err(HostError::Rejected {
            method: method.to_string(),
            message: reply.error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

fn expect_bool(method: &str, value: serde_json::Value) -> HostResult<bool> {
    match value {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Null => Ok(false),
        other => Err(HostError::Protocol {
            method: method.to_string(),
            message: format!("expected boolean, got {other}"),
        }),
    }
}

#[async_trait::async_trait]
impl HostBridge for ProcessBridge {
    async fn import_asset(&self, path: &Path, target: ImportTarget) -> HostResult<bool> {
        let method = match target {
            ImportTarget::Bin => "importFile",
            ImportTarget::Playhead => "importAndInsert",
        };
        let params = vec![serde_json::Value::String(path.to_string_lossy().into_owned())];
        let result = self.call(method, params).await?;
        expect_bool(method, result)
    }

    async fn selected_clip_position(&self) -> HostResult<Option<ClipPosition>> {
        let method = "getSelectedClipPosition";
        let result = self.call(method, vec![]).await?;
        if result.is_null() {
            return Ok(None);
        }
        serde_json::from_value(result)
            .map(Some)
            .map_err(|e| HostError::Protocol {
                method: method.to_string(),
                message: e.to_string(),
            })
    }

    async fn set_selected_clip_position(&self, position: ClipPosition) -> HostResult<bool> {
        let method = "setSelectedClipPosition";
        let result = self
            .call(method, vec![position.x.into(), position.y.into()])
            .await?;
        expect_bool(method, result)
    }

    async fn clip_motion_info(&self) -> HostResult<Option<serde_json::Value>> {
        let result = self.call("getClipMotionInfo", vec![]).await?;
        Ok((!result.is_null()).then_some(result))
    }

    fn name(&self) -> &str {
        &self.program
    }
}
