use crate::types::{AppError, Profiles};

/// Profile store trait - implement this for different credential backends
///
/// Every operation reads the whole store and every save replaces it.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn read(&self) -> Result<Profiles, AppError>;
    async fn write(&self, profiles: &Profiles) -> Result<(), AppError>;
}
