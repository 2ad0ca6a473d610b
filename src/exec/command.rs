// src/exec/command.rs

//! Shell-command node used by the `dagexec` binary.

use std::process::Stdio;

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::dag::{Node, NodeFuture};
use crate::errors::IgnorableError;

/// A node whose action is a shell command.
///
/// A non-zero exit is fatal unless `ignore_failure` is set, in which case it
/// is reported as an [`IgnorableError`].
#[derive(Debug, Clone)]
pub struct CommandNode {
    id: String,
    parents: Vec<String>,
    cmd: String,
    ignore_failure: bool,
}

impl CommandNode {
    pub fn new(id: impl Into<String>, parents: Vec<String>, cmd: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parents,
            cmd: cmd.into(),
            ignore_failure: false,
        }
    }

    pub fn ignore_failure(mut self, ignore: bool) -> Self {
        self.ignore_failure = ignore;
        self
    }

    /// One node per `[node.<id>]` section, sorted by ID.
    pub fn from_config(cfg: &ConfigFile) -> Vec<Self> {
        cfg.node
            .iter()
            .map(|(id, nc)| {
                CommandNode::new(id.clone(), nc.after.clone(), nc.cmd.clone())
                    .ignore_failure(nc.ignore_failure)
            })
            .collect()
    }

    async fn execute(&self) -> anyhow::Result<()> {
        info!(node = %self.id, cmd = %self.cmd, "starting process");

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for node '{}'", self.id))?;

        // Drain both pipes so the child never blocks on a full buffer.
        if let Some(stdout) = child.stdout.take() {
            let id = self.id.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(node = %id, "stdout: {}", line);
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            let id = self.id.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(node = %id, "stderr: {}", line);
                }
            });
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for process of node '{}'", self.id))?;

        let code = status.code().unwrap_or(-1);
        info!(node = %self.id, exit_code = code, success = status.success(), "process exited");

        if status.success() {
            return Ok(());
        }
        if self.ignore_failure {
            return Err(IgnorableError::new(format!("`{}` exited with code {code}", self.cmd)).into());
        }
        bail!("`{}` exited with code {code}", self.cmd)
    }
}

impl Node for CommandNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_ids(&self) -> &[String] {
        &self.parents
    }

    fn run(&self) -> NodeFuture<'_> {
        Box::pin(self.execute())
    }
}
