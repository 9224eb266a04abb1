use crate::{app_state::AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes and middleware
///
/// This function is used by both main.rs and integration tests to ensure
/// the same server configuration is used in both production and tests.
pub fn create_app(app_state: AppState) -> Router {
    use handlers::{
        add_profile, create_context, delete_profile, edit_form, index, list_clusters, not_found,
        save_profile,
    };

    Router::new()
        // Profile listing and CRUD
        .route("/", get(index))
        .route("/add", post(add_profile))
        .route("/edit/{profile}", get(edit_form).post(save_profile))
        .route("/delete/{profile}", post(delete_profile))
        // Cluster linking through the aws CLI
        .route("/create-kubeconfig/{profile}", get(list_clusters))
        .route("/run-kubeconfig/{profile}", post(create_context))
        // Fallback for 404 Not Found
        .fallback(not_found)
        // Add shared state
        .with_state(app_state)
        // Add tracing
        .layer(TraceLayer::new_for_http())
}
