use crate::{app_state::AppState, types::AppError};
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

/// Fallback handler for 404 Not Found
pub async fn not_found(State(app_state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    let body = app_state.views.not_found(uri.path())?;
    Ok((StatusCode::NOT_FOUND, Html(body)).into_response())
}
