//! Sponsor handlers: public carousel listing plus admin CRUD with image
//! upload.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{read_image_form, record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{default_status, Sponsor, STATUS_ACTIVE};
use crate::uploads;
use crate::AppState;

/// GET /api/sponsors - Active sponsors.
pub async fn list_sponsors(State(state): State<AppState>) -> ApiResult<Json<Vec<Sponsor>>> {
    let sponsors: Vec<Sponsor> = state
        .repos
        .sponsors
        .list()
        .await?
        .into_iter()
        .filter(|s| s.status == STATUS_ACTIVE)
        .collect();
    Ok(Json(sponsors))
}

/// GET /api/admin/sponsors - Every sponsor regardless of status.
pub async fn admin_list_sponsors(State(state): State<AppState>) -> ApiResult<Json<Vec<Sponsor>>> {
    Ok(Json(state.repos.sponsors.list().await?))
}

/// GET /api/admin/sponsors/{id} - One sponsor.
pub async fn admin_get_sponsor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sponsor>> {
    let sponsor = state
        .repos
        .sponsors
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sponsor {} not found", id)))?;
    Ok(Json(sponsor))
}

/// POST /api/admin/sponsors - Create a sponsor, image optional.
pub async fn create_sponsor(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<RecordResponse<Sponsor>> {
    let form = read_image_form(multipart).await?;
    let title = required(form.title, "Title is required")?;

    let image = match &form.image {
        Some(file) => {
            let name = uploads::save_file(&state.config.sponsors_dir(), file).await?;
            Some(format!("/sponsors/{}", name))
        }
        None => None,
    };

    let sponsor = Sponsor {
        id: Uuid::new_v4().to_string(),
        title,
        website: form.website.filter(|v| !v.trim().is_empty()),
        status: default_status(form.status),
        image,
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    let created = state.repos.sponsors.insert(sponsor).await?;
    Ok(record(created))
}

/// PATCH /api/admin/sponsors/{id} - Partial update; a new image replaces the
/// stored file.
pub async fn update_sponsor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<RecordResponse<Sponsor>> {
    // Bail before writing a new image for a record that does not exist
    if state.repos.sponsors.get(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Sponsor {} not found", id)));
    }

    let form = read_image_form(multipart).await?;
    let new_image = match &form.image {
        Some(file) => {
            let name = uploads::save_file(&state.config.sponsors_dir(), file).await?;
            Some(format!("/sponsors/{}", name))
        }
        None => None,
    };

    let now = Utc::now().to_rfc3339();
    let mut replaced_image: Option<String> = None;
    let updated = state
        .repos
        .sponsors
        .update(&id, |s| {
            if let Some(title) = form.title {
                if !title.trim().is_empty() {
                    s.title = title;
                }
            }
            if let Some(website) = form.website {
                if !website.trim().is_empty() {
                    s.website = Some(website);
                }
            }
            if let Some(status) = form.status {
                if !status.trim().is_empty() {
                    s.status = status;
                }
            }
            if let Some(image) = new_image {
                replaced_image = s.image.replace(image);
            }
            s.updated_at = Some(now);
        })
        .await?;

    // The old image is released only after the record is saved
    if let Some(old) = replaced_image {
        uploads::remove_artifact(&state.config, &old).await;
    }

    Ok(record(updated))
}

/// DELETE /api/admin/sponsors/{id} - Remove the sponsor and its image.
pub async fn delete_sponsor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    let removed = state.repos.sponsors.delete(&id).await?;
    if let Some(image) = &removed.image {
        uploads::remove_artifact(&state.config, image).await;
    }
    Ok(Ack::ok())
}
