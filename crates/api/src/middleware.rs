use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use stockroom_auth::TokenValidator;

use crate::app::errors::{ApiError, Unauthorized};
use crate::context::IdentityContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenValidator>,
}

/// Access gate for protected routes.
///
/// A missing bearer token is refused without touching the validator; a token
/// the validator rejects is refused as invalid. On success the caller's
/// identity is attached to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let identity = state.tokens.validate(token, Utc::now()).map_err(|e| {
        debug!(reason = %e, path = %req.uri().path(), "bearer token rejected");
        ApiError::Unauthorized(Unauthorized::InvalidToken)
    })?;

    req.extensions_mut().insert(IdentityContext::new(identity));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::Unauthorized(Unauthorized::MissingToken);

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(missing)?;

    let header = header.to_str().map_err(|_| missing())?;

    let (scheme, token) = header.trim().split_once(' ').ok_or_else(missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(missing());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}
