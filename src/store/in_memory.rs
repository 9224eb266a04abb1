use super::backend::ProfileStore;
use crate::types::{AppError, Profiles};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory profile store for testing/development
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<Profiles>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Profiles) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(profiles)),
        }
    }

    /// Current contents, bypassing the trait
    pub async fn snapshot(&self) -> Profiles {
        self.profiles.read().await.clone()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn read(&self) -> Result<Profiles, AppError> {
        Ok(self.profiles.read().await.clone())
    }

    async fn write(&self, profiles: &Profiles) -> Result<(), AppError> {
        *self.profiles.write().await = profiles.clone();
        Ok(())
    }
}
