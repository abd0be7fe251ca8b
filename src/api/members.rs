//! Member handlers, admin only.
//!
//! Members arrive in members.json from an external signup flow, so there is
//! no create route; the admin panel can inspect, correct and remove them.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use super::{record, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{Member, UpdateMemberRequest};
use crate::AppState;

/// GET /api/admin/members - Every member.
pub async fn admin_list_members(State(state): State<AppState>) -> ApiResult<Json<Vec<Member>>> {
    Ok(Json(state.repos.members.list().await?))
}

/// GET /api/admin/members/{id} - One member.
pub async fn admin_get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Member>> {
    let member = state
        .repos
        .members
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;
    Ok(Json(member))
}

/// PATCH /api/admin/members/{id} - Partial update.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> ApiResult<RecordResponse<Member>> {
    let now = Utc::now().to_rfc3339();
    let updated = state
        .repos
        .members
        .update(&id, |m| {
            if let Some(email) = request.email {
                m.email = email;
            }
            if let Some(country) = request.country {
                m.country = Some(country);
            }
            if let Some(registration) = request.registration {
                m.registration = registration;
            }
            if let Some(activation) = request.activation {
                m.activation = Some(activation);
            }
            if let Some(status) = request.status {
                m.status = status;
            }
            m.updated_at = Some(now);
        })
        .await?;
    Ok(record(updated))
}

/// DELETE /api/admin/members/{id} - Remove a member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    state.repos.members.delete(&id).await?;
    Ok(Ack::ok())
}
