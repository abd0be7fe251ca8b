//! News handlers: public listing plus admin CRUD.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{
    default_status, CreateNewsRequest, NewsItem, UpdateNewsRequest, STATUS_ACTIVE,
};
use crate::AppState;

/// GET /api/news - Active news items in insertion order.
pub async fn list_news(State(state): State<AppState>) -> ApiResult<Json<Vec<NewsItem>>> {
    let items: Vec<NewsItem> = state
        .repos
        .news
        .list()
        .await?
        .into_iter()
        .filter(|n| n.status == STATUS_ACTIVE)
        .collect();
    Ok(Json(items))
}

/// GET /api/admin/news - Every news item regardless of status.
pub async fn admin_list_news(State(state): State<AppState>) -> ApiResult<Json<Vec<NewsItem>>> {
    Ok(Json(state.repos.news.list().await?))
}

/// GET /api/admin/news/{id} - One news item.
pub async fn admin_get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<NewsItem>> {
    let item = state
        .repos
        .news
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("News item {} not found", id)))?;
    Ok(Json(item))
}

/// POST /api/admin/news - Create a news item.
pub async fn create_news(
    State(state): State<AppState>,
    Json(request): Json<CreateNewsRequest>,
) -> ApiResult<RecordResponse<NewsItem>> {
    let title = required(request.title, "Title is required")?;

    let item = NewsItem {
        id: Uuid::new_v4().to_string(),
        title,
        description: request.description.filter(|v| !v.trim().is_empty()),
        status: default_status(request.status),
        featured: request.featured.unwrap_or(false),
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    let created = state.repos.news.insert(item).await?;
    Ok(record(created))
}

/// PATCH /api/admin/news/{id} - Partial update.
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNewsRequest>,
) -> ApiResult<RecordResponse<NewsItem>> {
    let now = Utc::now().to_rfc3339();
    let updated = state
        .repos
        .news
        .update(&id, |n| {
            if let Some(title) = request.title {
                n.title = title;
            }
            if let Some(description) = request.description {
                n.description = Some(description);
            }
            if let Some(status) = request.status {
                n.status = status;
            }
            if let Some(featured) = request.featured {
                n.featured = featured;
            }
            n.updated_at = Some(now);
        })
        .await?;
    Ok(record(updated))
}

/// DELETE /api/admin/news/{id} - Remove a news item.
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    state.repos.news.delete(&id).await?;
    Ok(Ack::ok())
}
