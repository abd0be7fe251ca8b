//! Product handlers: public shop listing plus admin CRUD with image upload.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{read_image_form, record, required, Ack, ApiResult, RecordResponse};
use crate::errors::AppError;
use crate::models::{default_status, Product, STATUS_ACTIVE};
use crate::uploads;
use crate::AppState;

/// GET /api/products - Active products.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products: Vec<Product> = state
        .repos
        .products
        .list()
        .await?
        .into_iter()
        .filter(|p| p.status == STATUS_ACTIVE)
        .collect();
    Ok(Json(products))
}

/// GET /api/admin/products - Every product regardless of status.
pub async fn admin_list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.repos.products.list().await?))
}

/// GET /api/admin/products/{id} - One product.
pub async fn admin_get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .repos
        .products
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/admin/products - Create a product. The image is required.
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<RecordResponse<Product>> {
    let form = read_image_form(multipart).await?;
    let title = required(form.title, "Title is required")?;
    let image_file = form
        .image
        .ok_or_else(|| AppError::Validation("Image is required".to_string()))?;

    let image_name = uploads::save_file(&state.config.products_dir(), &image_file).await?;

    let product = Product {
        id: Uuid::new_v4().to_string(),
        title,
        website: form.website.filter(|v| !v.trim().is_empty()),
        status: default_status(form.status),
        image: format!("/products/{}", image_name),
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    };
    let created = state.repos.products.insert(product).await?;
    Ok(record(created))
}

/// PATCH /api/admin/products/{id} - Partial update; a new image replaces the
/// stored file.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<RecordResponse<Product>> {
    // Bail before writing a new image for a record that does not exist
    if state.repos.products.get(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Product {} not found", id)));
    }

    let form = read_image_form(multipart).await?;
    let new_image = match &form.image {
        Some(file) => {
            let name = uploads::save_file(&state.config.products_dir(), file).await?;
            Some(format!("/products/{}", name))
        }
        None => None,
    };

    let now = Utc::now().to_rfc3339();
    let mut replaced_image: Option<String> = None;
    let updated = state
        .repos
        .products
        .update(&id, |p| {
            if let Some(title) = form.title {
                if !title.trim().is_empty() {
                    p.title = title;
                }
            }
            if let Some(website) = form.website {
                if !website.trim().is_empty() {
                    p.website = Some(website);
                }
            }
            if let Some(status) = form.status {
                if !status.trim().is_empty() {
                    p.status = status;
                }
            }
            if let Some(image) = new_image {
                replaced_image = Some(std::mem::replace(&mut p.image, image));
            }
            p.updated_at = Some(now);
        })
        .await?;

    // The old image is released only after the record is saved
    if let Some(old) = replaced_image {
        uploads::remove_artifact(&state.config, &old).await;
    }

    Ok(record(updated))
}

/// DELETE /api/admin/products/{id} - Remove the product and its image.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    let removed = state.repos.products.delete(&id).await?;
    uploads::remove_artifact(&state.config, &removed.image).await;
    Ok(Ack::ok())
}
