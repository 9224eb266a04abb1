use crate::{
    app_state::AppState,
    aws_cli::context_alias,
    flash,
    types::Notice,
    views::profile_path,
};
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SelectClusterForm {
    cluster: Option<String>,
}

/// POST /run-kubeconfig/{profile} - Create the `profile@cluster` kubeconfig context
pub async fn create_context(
    Path(profile): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectClusterForm>,
) -> Response {
    let mut notices = app_state.flash.take(&headers);
    let profiles = app_state.load_profiles(&mut notices).await;

    if !profiles.contains_key(&profile) {
        notices.push(Notice::error(format!("Profile {} does not exist.", profile)));
        return flash::redirect(&app_state.flash, "/", &notices);
    }

    let Some(cluster) = form
        .cluster
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
    else {
        notices.push(Notice::error("Select a cluster first."));
        return flash::redirect(
            &app_state.flash,
            &profile_path("/create-kubeconfig", &profile),
            &notices,
        );
    };

    let alias = context_alias(&profile, &cluster);
    notices.push(
        match app_state
            .cluster_cli
            .update_kubeconfig(&profile, &cluster, &alias)
            .await
        {
            Ok(()) => Notice::success(format!(
                "Kubeconfig context {} created for cluster {} with profile {}.",
                alias, cluster, profile
            )),
            Err(e) => Notice::from(&e),
        },
    );

    flash::redirect(&app_state.flash, "/", &notices)
}
