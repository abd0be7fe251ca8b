//! REST API module.
//!
//! Public collection routes return bare JSON arrays of active records;
//! mutations behind the admin gate return `{"success": true, "record": ...}`
//! and failures return `{"error": "..."}`.

mod advertisers;
mod auth;
mod events;
mod files;
mod magazines;
mod members;
mod news;
mod pages;
mod products;
mod reefclubs;
mod sponsors;

pub use advertisers::*;
pub use auth::*;
pub use events::*;
pub use files::*;
pub use magazines::*;
pub use members::*;
pub use news::*;
pub use pages::*;
pub use products::*;
pub use reefclubs::*;
pub use sponsors::*;

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::uploads::UploadedFile;

/// Response type used by all handlers.
pub type ApiResult<T> = Result<T, AppError>;

/// Mutation acknowledgement carrying the stored record:
/// `{"success": true, "record": {...}}`.
#[derive(Debug, Serialize)]
pub struct RecordResponse<T: Serialize> {
    pub success: bool,
    pub record: T,
}

/// Create the standard mutation response.
pub fn record<T: Serialize>(record: T) -> RecordResponse<T> {
    RecordResponse {
        success: true,
        record,
    }
}

impl<T: Serialize> IntoResponse for RecordResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Bare `{"success": true}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Presence check for required text fields; blank counts as missing.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Form fields shared by the image-carrying collections (sponsors, products).
#[derive(Debug, Default)]
pub(crate) struct ImageForm {
    pub title: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
    pub image: Option<UploadedFile>,
}

/// Read a sponsor or product multipart form. Unknown fields are skipped.
pub(crate) async fn read_image_form(mut multipart: Multipart) -> Result<ImageForm, AppError> {
    let mut form = ImageForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "website" => form.website = Some(field.text().await?),
            "status" => form.status = Some(field.text().await?),
            "image" => {
                form.image = Some(UploadedFile {
                    original_name: field.file_name().map(str::to_string),
                    bytes: field.bytes().await?,
                })
            }
            other => tracing::debug!("Ignoring unexpected form field {}", other),
        }
    }
    Ok(form)
}
