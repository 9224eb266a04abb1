mod backend;
mod credentials_file;
mod in_memory;
pub mod ini;
mod kubeconfig;

pub use backend::ProfileStore;
pub use credentials_file::{CredentialsFile, parse_profiles, render_profiles};
pub use in_memory::InMemoryProfileStore;
pub use kubeconfig::{KubeConfig, KubeconfigFile, NamedContext, index_clusters, parse_kubeconfig};
