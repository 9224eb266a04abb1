mod add_profile;
mod create_context;
mod delete_profile;
mod edit_profile;
mod index;
mod list_clusters;
mod not_found;

pub use add_profile::add_profile;
pub use create_context::create_context;
pub use delete_profile::delete_profile;
pub use edit_profile::{edit_form, save_profile};
pub use index::index;
pub use list_clusters::list_clusters;
pub use not_found::not_found;

use crate::{store::ini, types::AppError};

/// Reject names that would not come back as the same single `[name]` header
fn check_profile_name(name: &str) -> Result<(), AppError> {
    if ini::is_section_name(name) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Profile name {:?} cannot be used as a [section] header.",
            name
        )))
    }
}
