use crate::types::{AppError, ProfileClusters};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// The parts of a kubeconfig document this tool looks at
#[derive(Debug, Default, Deserialize)]
pub struct KubeConfig {
    #[serde(default)]
    pub contexts: Option<Vec<NamedContext>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedContext {
    pub name: String,
    pub context: ContextRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextRef {
    pub cluster: String,
}

impl KubeConfig {
    pub fn contexts(&self) -> &[NamedContext] {
        self.contexts.as_deref().unwrap_or_default()
    }
}

/// Parse kubeconfig YAML; an empty or null document has no contexts
pub fn parse_kubeconfig(content: &str) -> Result<KubeConfig, serde_yml::Error> {
    if content.trim().is_empty() {
        return Ok(KubeConfig::default());
    }
    let config: Option<KubeConfig> = serde_yml::from_str(content)?;
    Ok(config.unwrap_or_default())
}

/// Group context clusters under the profile named by the context prefix
///
/// A context named `<profile>@<anything>` belongs to `<profile>`. When several
/// profile names match (`a` and `a@b` for `a@b@c`) the longest one wins, so
/// each context is attributed to exactly one profile. Cluster ids are kept in
/// order of first appearance without duplicates.
pub fn index_clusters<'a, I>(contexts: &[NamedContext], profile_names: I) -> ProfileClusters
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = profile_names.into_iter().collect();
    let mut index = ProfileClusters::new();

    for named in contexts {
        let Some(profile) = owning_profile(&named.name, &names) else {
            continue;
        };

        let clusters = index.entry(profile.to_string()).or_default();
        if !clusters.contains(&named.context.cluster) {
            clusters.push(named.context.cluster.clone());
        }
    }

    index
}

fn owning_profile<'a>(context_name: &str, names: &[&'a str]) -> Option<&'a str> {
    names
        .iter()
        .copied()
        .filter(|name| {
            context_name
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('@'))
        })
        .max_by_key(|name| name.len())
}

/// Kubeconfig file (`~/.kube/config`), read only
#[derive(Debug, Clone)]
pub struct KubeconfigFile {
    path: PathBuf,
}

impl KubeconfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the profile -> clusters index for the given profile names
    pub async fn read<'a, I>(&self, profile_names: I) -> Result<ProfileClusters, AppError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Kubeconfig {} does not exist", self.path.display());
                return Ok(ProfileClusters::new());
            }
            Err(e) => {
                return Err(AppError::StoreRead {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        let config = parse_kubeconfig(&content).map_err(|e| AppError::StoreRead {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(index_clusters(config.contexts(), profile_names))
    }
}
