use askama::Template;
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::config::{APP_NAME, APP_VERSION};
use crate::error::AppError;

#[derive(Template)]
#[template(path = "index.html")]
struct LandingTemplate {
    app_name: &'static str,
    version: &'static str,
}

/// The fixed page served for `/`.
pub fn landing() -> Result<impl IntoResponse, AppError> {
    let template = LandingTemplate {
        app_name: APP_NAME,
        version: APP_VERSION,
    };
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render landing page: {e}")))?;

    Ok(([(header::X_CONTENT_TYPE_OPTIONS, "nosniff")], Html(html)))
}
