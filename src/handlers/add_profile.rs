use super::check_profile_name;
use crate::{
    app_state::AppState,
    flash,
    store::ini,
    types::{AppError, Notice, Profile},
};
use axum::{Form, extract::State, http::HeaderMap, response::Response};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AddProfileForm {
    #[serde(default)]
    profile_content: String,
}

/// POST /add - Add a profile from a `[name]` section of INI text
///
/// The name must not already exist; see `save_profile` for the edit path,
/// which overwrites instead.
pub async fn add_profile(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddProfileForm>,
) -> Response {
    let mut notices = app_state.flash.take(&headers);

    match add(&app_state, &form.profile_content).await {
        Ok(name) => notices.push(Notice::success(format!("Profile {} added.", name))),
        Err(e) => {
            tracing::warn!("ADD profile rejected: {}", e);
            notices.push(Notice::from(&e));
        }
    }

    flash::redirect(&app_state.flash, "/", &notices)
}

async fn add(app_state: &AppState, content: &str) -> Result<String, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "Profile content cannot be empty.".to_string(),
        ));
    }

    let sections = ini::parse(content).map_err(|e| {
        AppError::Validation(format!("Could not parse profile content: {}", e))
    })?;

    let [section] = sections.as_slice() else {
        return Err(AppError::Validation(
            "Content must contain exactly one profile (one [profile_name] section).".to_string(),
        ));
    };
    check_profile_name(&section.name)?;

    let _guard = app_state.lock_profiles().await;
    let mut profiles = app_state.profiles.read().await?;

    if profiles.contains_key(&section.name) {
        return Err(AppError::Validation(format!(
            "Profile {} already exists.",
            section.name
        )));
    }

    profiles.insert(section.name.clone(), Profile::from_section(section));
    app_state.profiles.write(&profiles).await?;

    tracing::info!("ADD profile: name={}", section.name);
    Ok(section.name.clone())
}
