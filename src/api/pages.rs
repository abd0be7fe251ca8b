//! Gated page routes for the admin panel and member archive.
//!
//! The HTML itself lives in the public directory; these routes only decide
//! whether to serve it or redirect to /login.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::AppState;

/// GET /admin - Admin panel, admin session required.
pub async fn admin_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.sessions.from_headers(&headers).await {
        Some(session) if session.is_admin() => serve_page(&state, "admin.html").await,
        _ => Redirect::to("/login").into_response(),
    }
}

/// GET /archive - Back-issue archive, any session suffices.
pub async fn archive_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.sessions.from_headers(&headers).await {
        Some(_) => serve_page(&state, "archive.html").await,
        None => Redirect::to("/login").into_response(),
    }
}

/// GET /login - Login page.
pub async fn login_page(State(state): State<AppState>) -> Response {
    serve_page(&state, "login.html").await
}

/// GET /flipbook/{id} - Public flip-book viewer shell; the id is resolved
/// client side through /api/flipbook/{id}.
pub async fn flipbook_page(State(state): State<AppState>, Path(_id): Path<String>) -> Response {
    serve_page(&state, "flipbook.html").await
}

async fn serve_page(state: &AppState, file: &str) -> Response {
    let path = state.config.public_dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read page {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
