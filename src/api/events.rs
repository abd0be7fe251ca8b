//! Event handlers: public listing in sort order plus admin CRUD.
//!
//! Events share the reef clubs' unique sort position and the magazines'
//! exclusive featured flag; both rules live on the repository.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{
    default_status, CreateEventRequest, Event, UpdateEventRequest, STATUS_ACTIVE,
};
use crate::AppState;

/// GET /api/events - Active events in ascending sort order.
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    let mut events: Vec<Event> = state
        .repos
        .events
        .list()
        .await?
        .into_iter()
        .filter(|e| e.status == STATUS_ACTIVE)
        .collect();
    events.sort_by_key(|e| e.sort);
    Ok(Json(events))
}

/// GET /api/admin/events - Every event regardless of status.
pub async fn admin_list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(state.repos.events.list().await?))
}

/// GET /api/admin/events/{id} - One event.
pub async fn admin_get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    let event = state
        .repos
        .events
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;
    Ok(Json(event))
}

/// POST /api/admin/events - Create an event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> ApiResult<RecordResponse<Event>> {
    let title = required(request.title, "Title is required")?;
    let event_date = required(request.event_date, "Event date is required")?;
    let sort = request
        .sort
        .ok_or_else(|| AppError::Validation("Sort order is required".to_string()))?;

    let now = Utc::now().to_rfc3339();
    let event = Event {
        id: Uuid::new_v4().to_string(),
        title,
        description: request.description.filter(|v| !v.trim().is_empty()),
        event_date,
        status: default_status(request.status),
        featured: request.featured.unwrap_or(false),
        sort,
        created_at: now.clone(),
        updated_at: now,
    };
    let created = state.repos.events.insert(event).await?;
    Ok(record(created))
}

/// PATCH /api/admin/events/{id} - Partial update.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> ApiResult<RecordResponse<Event>> {
    let now = Utc::now().to_rfc3339();
    let updated = state
        .repos
        .events
        .update(&id, |e| {
            if let Some(title) = request.title {
                e.title = title;
            }
            if let Some(description) = request.description {
                e.description = Some(description);
            }
            if let Some(event_date) = request.event_date {
                e.event_date = event_date;
            }
            if let Some(status) = request.status {
                e.status = status;
            }
            if let Some(featured) = request.featured {
                e.featured = featured;
            }
            if let Some(sort) = request.sort {
                e.sort = sort;
            }
            e.updated_at = now;
        })
        .await?;
    Ok(record(updated))
}

/// DELETE /api/admin/events/{id} - Remove an event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    state.repos.events.delete(&id).await?;
    Ok(Ack::ok())
}
