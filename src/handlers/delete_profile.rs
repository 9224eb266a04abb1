use crate::{
    app_state::AppState,
    flash,
    types::{AppError, Notice},
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};

/// POST /delete/{profile} - Delete a profile
pub async fn delete_profile(
    Path(profile): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let mut notices = app_state.flash.take(&headers);

    notices.push(match delete(&app_state, &profile).await {
        Ok(true) => Notice::success(format!("Profile {} deleted.", profile)),
        Ok(false) => Notice::error(format!("Profile {} does not exist.", profile)),
        Err(e) => {
            tracing::warn!("DELETE profile {} failed: {}", profile, e);
            Notice::from(&e)
        }
    });

    flash::redirect(&app_state.flash, "/", &notices)
}

/// Returns whether the profile existed; an absent profile leaves the store untouched
async fn delete(app_state: &AppState, profile: &str) -> Result<bool, AppError> {
    let _guard = app_state.lock_profiles().await;
    let mut profiles = app_state.profiles.read().await?;

    if profiles.remove(profile).is_none() {
        return Ok(false);
    }

    app_state.profiles.write(&profiles).await?;
    tracing::info!("DELETE profile: name={}", profile);
    Ok(true)
}
