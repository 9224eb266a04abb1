use crate::{
    aws_cli::ClusterCli,
    flash::FlashKey,
    store::{KubeconfigFile, ProfileStore},
    types::{Notice, Profiles},
    views::Views,
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub kubeconfig: KubeconfigFile,
    pub cluster_cli: Arc<dyn ClusterCli>,
    pub flash: FlashKey,
    pub views: Views,
    /// Display name of the credentials store for the listing page
    pub credentials_label: String,
    profiles_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        kubeconfig: KubeconfigFile,
        cluster_cli: Arc<dyn ClusterCli>,
        flash: FlashKey,
        views: Views,
        credentials_label: String,
    ) -> Self {
        Self {
            profiles,
            kubeconfig,
            cluster_cli,
            flash,
            views,
            credentials_label,
            profiles_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Serializes read-modify-write cycles on the profile store
    pub async fn lock_profiles(&self) -> MutexGuard<'_, ()> {
        self.profiles_lock.lock().await
    }

    /// Read the profile store for display; a read failure becomes a notice
    /// and an empty listing
    pub async fn load_profiles(&self, notices: &mut Vec<Notice>) -> Profiles {
        match self.profiles.read().await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!("{}", e);
                notices.push(Notice::from(&e));
                Profiles::new()
            }
        }
    }
}
