pub mod error;
pub mod models;

pub use error::AppError;
pub use models::{Notice, NoticeLevel, Profile, ProfileClusters, Profiles};
