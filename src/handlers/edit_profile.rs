use super::check_profile_name;
use crate::{
    app_state::AppState,
    flash,
    store::ini,
    types::{AppError, Notice, Profile},
};
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct EditProfileForm {
    #[serde(default)]
    profile_content: String,
    /// New name; blank or missing keeps the current one
    profile: Option<String>,
}

/// GET /edit/{profile} - Edit form prefilled with the profile's `key=value` lines
///
/// An unknown profile gets an empty form; saving it creates the profile.
pub async fn edit_form(
    Path(profile): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let mut notices = app_state.flash.take(&headers);
    let profiles = app_state.load_profiles(&mut notices).await;

    let content = profiles
        .get(&profile)
        .map(Profile::to_form_content)
        .unwrap_or_default();

    let body = app_state.views.edit(&profile, &content, &notices)?;
    Ok(flash::page(body))
}

/// POST /edit/{profile} - Replace a profile, optionally under a new name
///
/// Renaming onto another existing profile overwrites it.
pub async fn save_profile(
    Path(profile): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EditProfileForm>,
) -> Result<Response, AppError> {
    let mut notices = app_state.flash.take(&headers);
    let new_name = form
        .profile
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&profile)
        .to_string();

    match save(&app_state, &profile, &new_name, &form.profile_content).await {
        Ok(()) => {
            notices.push(Notice::success(format!("Profile {} saved.", new_name)));
            Ok(flash::redirect(&app_state.flash, "/", &notices))
        }
        Err(e) => {
            tracing::warn!("EDIT profile {} rejected: {}", profile, e);
            notices.push(Notice::from(&e));
            let body = app_state
                .views
                .edit(&profile, &form.profile_content, &notices)?;
            Ok(flash::page(body))
        }
    }
}

async fn save(
    app_state: &AppState,
    original: &str,
    new_name: &str,
    content: &str,
) -> Result<(), AppError> {
    check_profile_name(new_name)?;

    // The submitted text is the body of the section being saved
    let sections = ini::parse(&format!("[{}]\n{}", new_name, content)).map_err(|e| {
        AppError::Validation(format!(
            "Could not parse profile content: line {}: {}",
            e.line.saturating_sub(1),
            e.message
        ))
    })?;
    let section = sections.first().ok_or_else(|| {
        AppError::Validation("Could not parse profile content.".to_string())
    })?;

    let _guard = app_state.lock_profiles().await;
    let mut profiles = app_state.profiles.read().await?;

    profiles.remove(original);
    profiles.insert(new_name.to_string(), Profile::from_section(section));
    app_state.profiles.write(&profiles).await?;

    if new_name == original {
        tracing::info!("EDIT profile: name={}", new_name);
    } else {
        tracing::info!("EDIT profile: name={}, renamed_from={}", new_name, original);
    }
    Ok(())
}
