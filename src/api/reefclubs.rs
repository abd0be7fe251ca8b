//! Reef club handlers: public listing in sort order plus admin CRUD.
//!
//! The sort position is unique per club; the repository rejects a duplicate
//! before anything is written.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{
    default_status, CreateReefClubRequest, ReefClub, UpdateReefClubRequest, STATUS_ACTIVE,
};
use crate::AppState;

/// GET /api/reefclubs - Active clubs in ascending sort order.
pub async fn list_reef_clubs(State(state): State<AppState>) -> ApiResult<Json<Vec<ReefClub>>> {
    let mut clubs: Vec<ReefClub> = state
        .repos
        .reef_clubs
        .list()
        .await?
        .into_iter()
        .filter(|c| c.status == STATUS_ACTIVE)
        .collect();
    clubs.sort_by_key(|c| c.sort);
    Ok(Json(clubs))
}

/// GET /api/admin/reefclubs - Every club regardless of status.
pub async fn admin_list_reef_clubs(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ReefClub>>> {
    Ok(Json(state.repos.reef_clubs.list().await?))
}

/// GET /api/admin/reefclubs/{id} - One club.
pub async fn admin_get_reef_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReefClub>> {
    let club = state
        .repos
        .reef_clubs
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reef club {} not found", id)))?;
    Ok(Json(club))
}

/// POST /api/admin/reefclubs - Create a club.
pub async fn create_reef_club(
    State(state): State<AppState>,
    Json(request): Json<CreateReefClubRequest>,
) -> ApiResult<RecordResponse<ReefClub>> {
    let title = required(request.title, "Title is required")?;
    let sort = request
        .sort
        .ok_or_else(|| AppError::Validation("Sort order is required".to_string()))?;

    let club = ReefClub {
        id: Uuid::new_v4().to_string(),
        title,
        city: request.city.filter(|v| !v.trim().is_empty()),
        state: request.state.filter(|v| !v.trim().is_empty()),
        website: request.website.filter(|v| !v.trim().is_empty()),
        status: default_status(request.status),
        sort,
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    let created = state.repos.reef_clubs.insert(club).await?;
    Ok(record(created))
}

/// PATCH /api/admin/reefclubs/{id} - Partial update.
pub async fn update_reef_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateReefClubRequest>,
) -> ApiResult<RecordResponse<ReefClub>> {
    let now = Utc::now().to_rfc3339();
    let updated = state
        .repos
        .reef_clubs
        .update(&id, |c| {
            if let Some(title) = request.title {
                c.title = title;
            }
            if let Some(city) = request.city {
                c.city = Some(city);
            }
            if let Some(club_state) = request.state {
                c.state = Some(club_state);
            }
            if let Some(website) = request.website {
                c.website = Some(website);
            }
            if let Some(status) = request.status {
                c.status = status;
            }
            if let Some(sort) = request.sort {
                c.sort = sort;
            }
            c.updated_at = Some(now);
        })
        .await?;
    Ok(record(updated))
}

/// DELETE /api/admin/reefclubs/{id} - Remove a club.
pub async fn delete_reef_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    state.repos.reef_clubs.delete(&id).await?;
    Ok(Ack::ok())
}
