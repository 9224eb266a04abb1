use super::ClusterCli;
use crate::types::AppError;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// `aws eks list-clusters --output json` payload
#[derive(Debug, Deserialize)]
struct ClusterListing {
    #[serde(default)]
    clusters: Vec<String>,
}

/// Runs the `aws` CLI as a child process
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: PathBuf,
    region: String,
    timeout: Duration,
    credentials_file: Option<PathBuf>,
    kubeconfig: Option<PathBuf>,
}

impl AwsCli {
    pub fn new(program: impl Into<PathBuf>, region: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            region: region.into(),
            timeout: DEFAULT_TIMEOUT,
            credentials_file: None,
            kubeconfig: None,
        }
    }

    /// Kill the child and fail if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the CLI at this credentials file via `AWS_SHARED_CREDENTIALS_FILE`
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Make `update-kubeconfig` write to this file instead of its default
    pub fn with_kubeconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(path.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.stdin(Stdio::null()).kill_on_drop(true);
        if let Some(path) = &self.credentials_file {
            command.env("AWS_SHARED_CREDENTIALS_FILE", path);
        }
        command
    }

    async fn run(&self, mut command: Command, operation: &str) -> Result<Output, AppError> {
        tracing::debug!(
            "Running {} eks {} (timeout {}s)",
            self.program.display(),
            operation,
            self.timeout.as_secs()
        );

        match timeout(self.timeout, command.output()).await {
            Err(_) => Err(AppError::ExternalCommand(format!(
                "{} eks {} did not finish within {} seconds",
                self.program.display(),
                operation,
                self.timeout.as_secs()
            ))),
            Ok(Err(e)) => Err(AppError::ExternalCommand(format!(
                "Failed to run {}: {}",
                self.program.display(),
                e
            ))),
            Ok(Ok(output)) => Ok(output),
        }
    }
}

/// Diagnostic text of a failed run, falling back to the exit status
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("process exited with {}", output.status)
    } else {
        stderr
    }
}

#[async_trait::async_trait]
impl ClusterCli for AwsCli {
    async fn list_clusters(&self, profile: &str) -> Result<Vec<String>, AppError> {
        let mut command = self.command();
        command.args([
            "eks",
            "list-clusters",
            "--region",
            self.region.as_str(),
            "--profile",
            profile,
            "--output",
            "json",
        ]);

        let output = self.run(command, "list-clusters").await?;
        if !output.status.success() {
            let text = failure_text(&output);
            tracing::warn!("list-clusters failed for profile {}: {}", profile, text);
            return Err(AppError::ExternalCommand(format!(
                "Failed to list clusters: {}",
                text
            )));
        }

        let listing: ClusterListing = serde_json::from_slice(&output.stdout).map_err(|e| {
            AppError::ExternalCommand(format!(
                "Failed to list clusters: unexpected output from aws: {}",
                e
            ))
        })?;

        tracing::info!(
            "LIST clusters: profile={}, region={}, found={}",
            profile,
            self.region,
            listing.clusters.len()
        );
        Ok(listing.clusters)
    }

    async fn update_kubeconfig(
        &self,
        profile: &str,
        cluster: &str,
        alias: &str,
    ) -> Result<(), AppError> {
        let mut command = self.command();
        command.args([
            "eks",
            "update-kubeconfig",
            "--region",
            self.region.as_str(),
            "--name",
            cluster,
            "--profile",
            profile,
            "--alias",
            alias,
        ]);
        if let Some(path) = &self.kubeconfig {
            command.arg("--kubeconfig").arg(path);
        }

        let output = self.run(command, "update-kubeconfig").await?;
        if !output.status.success() {
            let text = failure_text(&output);
            tracing::warn!(
                "update-kubeconfig failed for {} on {}: {}",
                profile,
                cluster,
                text
            );
            return Err(AppError::ExternalCommand(format!(
                "Failed to create kubeconfig: {}",
                text
            )));
        }

        tracing::info!(
            "CREATE context: alias={}, cluster={}, region={}",
            alias,
            cluster,
            self.region
        );
        Ok(())
    }
}
