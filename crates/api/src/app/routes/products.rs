use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use stockroom_core::ProductId;
use stockroom_products::{NewProduct, Product, ProductPatch, parse_leading_int};

use crate::app::dto::ProductFields;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// `/produtos` is the path the legacy browser client calls.
const COLLECTION_PATHS: [&str; 2] = ["/products", "/produtos"];

pub fn router() -> Router {
    COLLECTION_PATHS.iter().fold(Router::new(), |router, base| {
        router
            .route(base, get(list_products).post(create_product))
            .route(
                &format!("{base}/:id"),
                get(get_product).put(update_product).delete(delete_product),
            )
    })
}

/// Path ids are read like numeric fields; anything unreadable cannot match a product.
fn product_id(raw: &str) -> Result<ProductId, ApiError> {
    parse_leading_int(raw)
        .and_then(|n| u64::try_from(n).ok())
        .map(ProductId::new)
        .ok_or(ApiError::NotFound("Product not found"))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<Product>> {
    Json(services.catalog().list())
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = product_id(&id)?;
    Ok(Json(services.catalog().get(id)?))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<ProductFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(fields) = payload?;
    let new = NewProduct::try_from(fields)?;

    let product = services.catalog().create(new, Utc::now());

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductFields>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = product_id(&id)?;
    // An unknown id is reported before anything about the body.
    services.catalog().get(id)?;

    let Json(fields) = payload?;
    let patch = ProductPatch::try_from(fields)?;

    let product = services.catalog().update(id, &patch, Utc::now())?;

    Ok(Json(product))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = product_id(&id)?;
    services.catalog().delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
