use crate::{
    app_state::AppState,
    flash,
    types::{AppError, Notice, ProfileClusters},
};
use axum::{extract::State, http::HeaderMap, response::Response};

/// GET / - List profiles and the clusters linked to them
pub async fn index(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let mut notices = app_state.flash.take(&headers);
    let profiles = app_state.load_profiles(&mut notices).await;

    let clusters = match app_state
        .kubeconfig
        .read(profiles.keys().map(String::as_str))
        .await
    {
        Ok(clusters) => clusters,
        Err(e) => {
            tracing::warn!("{}", e);
            notices.push(Notice::from(&e));
            ProfileClusters::new()
        }
    };

    tracing::info!(
        "LIST profiles: count={}, linked={}",
        profiles.len(),
        clusters.len()
    );

    let body = app_state.views.index(
        &profiles,
        &clusters,
        &app_state.credentials_label,
        &notices,
    )?;
    Ok(flash::page(body))
}
