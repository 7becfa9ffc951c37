use axum::{extract::Extension, Json};

use stockroom_auth::Identity;

use crate::app::dto::HealthResponse;
use crate::context::IdentityContext;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}

pub async fn whoami(Extension(ctx): Extension<IdentityContext>) -> Json<Identity> {
    Json(ctx.identity().clone())
}
