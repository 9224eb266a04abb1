mod process;

pub use process::AwsCli;

use crate::types::AppError;

/// EKS operations the tool delegates to an external CLI
#[async_trait::async_trait]
pub trait ClusterCli: Send + Sync {
    /// Names of the EKS clusters visible to `profile`
    async fn list_clusters(&self, profile: &str) -> Result<Vec<String>, AppError>;

    /// Add a kubeconfig context called `alias` for `cluster`, authenticated as `profile`
    async fn update_kubeconfig(
        &self,
        profile: &str,
        cluster: &str,
        alias: &str,
    ) -> Result<(), AppError>;
}

/// Context name linking a profile to a cluster, e.g. `dev@payments`
pub fn context_alias(profile: &str, cluster: &str) -> String {
    format!("{}@{}", profile, cluster)
}
