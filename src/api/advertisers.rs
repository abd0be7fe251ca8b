//! Advertiser handlers: public listing plus admin CRUD.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{
    default_status, Advertiser, CreateAdvertiserRequest, UpdateAdvertiserRequest, STATUS_ACTIVE,
};
use crate::AppState;

/// GET /api/advertisers - Active advertisers.
pub async fn list_advertisers(State(state): State<AppState>) -> ApiResult<Json<Vec<Advertiser>>> {
    let advertisers: Vec<Advertiser> = state
        .repos
        .advertisers
        .list()
        .await?
        .into_iter()
        .filter(|a| a.status == STATUS_ACTIVE)
        .collect();
    Ok(Json(advertisers))
}

/// GET /api/admin/advertisers - Every advertiser regardless of status.
pub async fn admin_list_advertisers(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Advertiser>>> {
    Ok(Json(state.repos.advertisers.list().await?))
}

/// GET /api/admin/advertisers/{id} - One advertiser.
pub async fn admin_get_advertiser(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Advertiser>> {
    let advertiser = state
        .repos
        .advertisers
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Advertiser {} not found", id)))?;
    Ok(Json(advertiser))
}

/// POST /api/admin/advertisers - Create an advertiser.
pub async fn create_advertiser(
    State(state): State<AppState>,
    Json(request): Json<CreateAdvertiserRequest>,
) -> ApiResult<RecordResponse<Advertiser>> {
    let title = required(request.title, "Title is required")?;

    let advertiser = Advertiser {
        id: Uuid::new_v4().to_string(),
        title,
        website: request.website.filter(|v| !v.trim().is_empty()),
        status: default_status(request.status),
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    let created = state.repos.advertisers.insert(advertiser).await?;
    Ok(record(created))
}

/// PATCH /api/admin/advertisers/{id} - Partial update.
pub async fn update_advertiser(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAdvertiserRequest>,
) -> ApiResult<RecordResponse<Advertiser>> {
    let now = Utc::now().to_rfc3339();
    let updated = state
        .repos
        .advertisers
        .update(&id, |a| {
            if let Some(title) = request.title {
                a.title = title;
            }
            if let Some(website) = request.website {
                a.website = Some(website);
            }
            if let Some(status) = request.status {
                a.status = status;
            }
            a.updated_at = Some(now);
        })
        .await?;
    Ok(record(updated))
}

/// DELETE /api/admin/advertisers/{id} - Remove an advertiser.
pub async fn delete_advertiser(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    state.repos.advertisers.delete(&id).await?;
    Ok(Ack::ok())
}
