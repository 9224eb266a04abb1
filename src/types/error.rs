use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use super::Notice;

/// Errors raised by the stores, the aws CLI invoker and the views
///
/// Handlers turn everything except `Render` into a notice for the user and
/// keep going; only a page that cannot be rendered becomes an error response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not read {path}: {message}")]
    StoreRead { path: String, message: String },

    #[error("Could not save {path}: {source}")]
    StoreWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    ExternalCommand(String),

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        Notice::error(err.to_string())
    }
}

/// Only reached by `Render` in practice, so every variant is a 500
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);

        let body = format!(
            "<!doctype html><html><head><title>kubecreds</title></head><body><h1>Error</h1><p>{}</p><p><a href=\"/\">Back to profiles</a></p></body></html>",
            handlebars::html_escape(&self.to_string())
        );

        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
