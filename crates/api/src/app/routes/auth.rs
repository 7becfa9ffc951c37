use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};

use crate::app::dto::{LoginRequest, LoginResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;

    let response = stockroom_auth::login(services.credentials(), services.tokens(), request).await?;

    Ok(Json(response))
}
