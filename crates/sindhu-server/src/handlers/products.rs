//! Product catalog handlers

use super::MessageResponse;
use crate::error::{parse_id, ApiError};
use crate::extractors::{AdminGuard, Payload, ValidatedJson};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sindhu_core::{CatalogError, NewProduct, Product, ProductPatch};
use tracing::info;

const INVALID_ID: &str = "Invalid product ID";
const NOT_FOUND: &str = "Product not found";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store
        .get_all_products()
        .await
        .map_err(ApiError::backend("Failed to fetch products"))?;
    Ok(Json(products))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;

    state
        .store
        .get_product_by_id(id)
        .await
        .map_err(ApiError::backend("Failed to fetch product"))?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store
        .get_products_by_category(&category)
        .await
        .map_err(ApiError::backend("Failed to fetch products by category"))?;
    Ok(Json(products))
}

pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store
        .get_featured_products()
        .await
        .map_err(ApiError::backend("Failed to fetch featured products"))?;
    Ok(Json(products))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminGuard,
    ValidatedJson(new_product): ValidatedJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = match state.store.create_product(new_product).await {
        Ok(product) => product,
        Err(CatalogError::Pricing(e)) => return Err(ApiError::pricing(NewProduct::INVALID, e)),
        Err(e) => return Err(ApiError::backend("Failed to create product")(e)),
    };

    info!("Created product {} ({})", product.id, product.name);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminGuard,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;

    let product = match state.store.update_product(id, patch).await {
        Ok(Some(product)) => product,
        Ok(None) | Err(CatalogError::ProductNotFound(_)) => {
            return Err(ApiError::NotFound(NOT_FOUND))
        }
        Err(CatalogError::Pricing(e)) => return Err(ApiError::pricing(ProductPatch::INVALID, e)),
        Err(e) => return Err(ApiError::backend("Failed to update product")(e)),
    };

    info!("Updated product {}", product.id);
    Ok(Json(product))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminGuard,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;

    let deleted = state
        .store
        .delete_product(id)
        .await
        .map_err(ApiError::backend("Failed to delete product"))?;
    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    info!("Deleted product {}", id);
    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}
