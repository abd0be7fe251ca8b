//! Token-gated serving of uploaded PDFs.
//!
//! The upload directory sits outside the static web root; the flip-book
//! service fetches PDFs through these routes with the access token as a
//! query parameter.

use std::path::PathBuf;

use axum::{
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::ApiResult;
use crate::auth::constant_time_compare;
use crate::errors::AppError;
use crate::uploads::is_safe_filename;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FileTokenQuery {
    token: Option<String>,
}

/// GET /uploads/{filename} - Serve an uploaded PDF.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<FileTokenQuery>,
) -> ApiResult<Response> {
    serve_protected(&state, state.config.upload_dir.clone(), filename, query.token).await
}

/// GET /uploads/splitted/{filename} - Serve a page-split PDF.
pub async fn serve_splitted_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<FileTokenQuery>,
) -> ApiResult<Response> {
    serve_protected(&state, state.config.splitted_dir(), filename, query.token).await
}

async fn serve_protected(
    state: &AppState,
    dir: PathBuf,
    filename: String,
    token: Option<String>,
) -> ApiResult<Response> {
    let authorized = token
        .map(|t| constant_time_compare(&t, &state.config.upload_token))
        .unwrap_or(false);
    if !authorized {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    // Path traversal in the filename segment maps to a plain 404
    if !is_safe_filename(&filename) {
        return Err(AppError::NotFound("Not found".to_string()));
    }

    let path = dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Not found".to_string()));
        }
        Err(e) => {
            return Err(AppError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(CONTENT_TYPE, mime.as_ref())], bytes).into_response())
}
