//! Magazine handlers: the public archive plus admin CRUD with PDF upload and
//! flip-book rendering.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::gateway::Notification;
use crate::models::{default_status, Magazine, UpdateMagazineRequest, STATUS_ACTIVE};
use crate::uploads::{self, UploadedFile};
use crate::AppState;

/// Text and file fields of the magazine upload form.
#[derive(Default)]
struct MagazineForm {
    title: Option<String>,
    published_date: Option<String>,
    year: Option<String>,
    featured: Option<String>,
    status: Option<String>,
    pdf: Option<UploadedFile>,
    cover: Option<UploadedFile>,
    splitted_pdf: Option<UploadedFile>,
}

async fn file_part(field: Field<'_>) -> Result<UploadedFile, AppError> {
    Ok(UploadedFile {
        original_name: field.file_name().map(str::to_string),
        bytes: field.bytes().await?,
    })
}

async fn read_magazine_form(mut multipart: Multipart) -> Result<MagazineForm, AppError> {
    let mut form = MagazineForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "publishedDate" => form.published_date = Some(field.text().await?),
            "year" => form.year = Some(field.text().await?),
            "featured" => form.featured = Some(field.text().await?),
            "status" => form.status = Some(field.text().await?),
            "pdf" => form.pdf = Some(file_part(field).await?),
            "cover" => form.cover = Some(file_part(field).await?),
            "splitted_pdf" => form.splitted_pdf = Some(file_part(field).await?),
            other => tracing::debug!("Ignoring unexpected form field {}", other),
        }
    }
    Ok(form)
}

/// GET /api/magazines - Active issues, featured first.
pub async fn list_magazines(State(state): State<AppState>) -> ApiResult<Json<Vec<Magazine>>> {
    let mut magazines: Vec<Magazine> = state
        .repos
        .magazines
        .list()
        .await?
        .into_iter()
        .filter(|m| m.status == STATUS_ACTIVE)
        .collect();
    // Stable sort keeps insertion order within each group
    magazines.sort_by(|a, b| b.featured.cmp(&a.featured));
    Ok(Json(magazines))
}

/// GET /api/flipbook/{id} - One issue for the public viewer page.
pub async fn get_flipbook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Magazine>> {
    let magazine = state
        .repos
        .magazines
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(magazine))
}

/// GET /api/admin/magazines - Every issue regardless of status.
pub async fn admin_list_magazines(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Magazine>>> {
    Ok(Json(state.repos.magazines.list().await?))
}

/// GET /api/admin/magazines/{id} - One issue.
pub async fn admin_get_magazine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Magazine>> {
    let magazine = state
        .repos
        .magazines
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Magazine {} not found", id)))?;
    Ok(Json(magazine))
}

/// POST /api/admin/magazines - Upload an issue and render its flip-book.
pub async fn create_magazine(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<RecordResponse<Magazine>> {
    let form = read_magazine_form(multipart).await?;

    // Validate before any file is written or any external call is made
    let title = required(form.title, "Title is required")?;
    let pdf = form
        .pdf
        .ok_or_else(|| AppError::Validation("PDF and cover are required".to_string()))?;
    let cover = form
        .cover
        .ok_or_else(|| AppError::Validation("PDF and cover are required".to_string()))?;

    let pdf_name = uploads::save_file(&state.config.upload_dir, &pdf).await?;
    let cover_name = uploads::save_file(&state.config.covers_dir(), &cover).await?;
    let splitted_name = match &form.splitted_pdf {
        Some(file) => Some(uploads::save_file(&state.config.splitted_dir(), file).await?),
        None => None,
    };

    // The render service pulls the PDF back through the token-gated route
    let pdf_url = format!(
        "{}/uploads/{}?token={}",
        state.config.base_url, pdf_name, state.config.upload_token
    );
    let embed = state.flipbook.render(&pdf_url).await?;

    let magazine = Magazine {
        id: Uuid::new_v4().to_string(),
        title,
        published_date: form.published_date.filter(|v| !v.trim().is_empty()),
        year: form.year.and_then(|y| y.trim().parse().ok()),
        featured: form.featured.as_deref() == Some("true"),
        status: default_status(form.status),
        cover: format!("/covers/{}", cover_name),
        pdf: format!("/uploads/{}", pdf_name),
        splitted_pdf: splitted_name.map(|n| format!("/uploads/splitted/{}", n)),
        flipbook_id: embed.id,
        embed_url: embed.embed_url,
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    let created = state.repos.magazines.insert(magazine).await?;
    Ok(record(created))
}

/// PATCH /api/admin/magazines/{id} - Partial metadata update.
pub async fn update_magazine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMagazineRequest>,
) -> ApiResult<RecordResponse<Magazine>> {
    let now = Utc::now().to_rfc3339();
    let updated = state
        .repos
        .magazines
        .update(&id, |m| {
            if let Some(title) = request.title {
                m.title = title;
            }
            if let Some(published_date) = request.published_date {
                m.published_date = Some(published_date);
            }
            if let Some(year) = request.year {
                m.year = Some(year);
            }
            if let Some(featured) = request.featured {
                m.featured = featured;
            }
            if let Some(status) = request.status {
                m.status = status;
            }
            m.updated_at = Some(now);
        })
        .await?;
    Ok(record(updated))
}

/// DELETE /api/admin/magazines/{id} - Remove the issue, its stored files and
/// its rendered flip-book.
pub async fn delete_magazine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    let removed = state.repos.magazines.delete(&id).await?;

    uploads::remove_artifact(&state.config, &removed.pdf).await;
    uploads::remove_artifact(&state.config, &removed.cover).await;
    if let Some(splitted) = &removed.splitted_pdf {
        uploads::remove_artifact(&state.config, splitted).await;
    }
    if let Some(flipbook_id) = removed.flipbook_id {
        state
            .notifier
            .enqueue(Notification::FlipbookDelete { id: flipbook_id });
    }

    Ok(Ack::ok())
}
