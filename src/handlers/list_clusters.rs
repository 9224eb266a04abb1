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

/// GET /create-kubeconfig/{profile} - Ask aws which EKS clusters the profile can see
pub async fn list_clusters(
    Path(profile): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let mut notices = app_state.flash.take(&headers);
    let profiles = app_state.load_profiles(&mut notices).await;

    if !profiles.contains_key(&profile) {
        notices.push(Notice::error(format!("Profile {} does not exist.", profile)));
        return Ok(flash::redirect(&app_state.flash, "/", &notices));
    }

    match app_state.cluster_cli.list_clusters(&profile).await {
        Ok(clusters) if clusters.is_empty() => {
            notices.push(Notice::info(format!(
                "No EKS clusters found for profile {}.",
                profile
            )));
            Ok(flash::redirect(&app_state.flash, "/", &notices))
        }
        Ok(clusters) => {
            let body = app_state
                .views
                .select_cluster(&profile, &clusters, &notices)?;
            Ok(flash::page(body))
        }
        Err(e) => {
            notices.push(Notice::from(&e));
            Ok(flash::redirect(&app_state.flash, "/", &notices))
        }
    }
}
