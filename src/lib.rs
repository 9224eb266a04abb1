// Library exports for integration tests
pub mod app_state;
pub mod aws_cli;
pub mod config;
pub mod flash;
pub mod handlers;
pub mod server;
pub mod store;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use app_state::AppState;
pub use aws_cli::{AwsCli, ClusterCli};
pub use config::{Config, Settings};
pub use flash::FlashKey;
pub use store::{CredentialsFile, InMemoryProfileStore, KubeconfigFile, ProfileStore};
pub use types::{AppError, Notice, NoticeLevel, Profile, Profiles};
pub use views::Views;

// Re-export server creation function
pub use server::create_app;
