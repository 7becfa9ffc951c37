use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod products;
pub mod system;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/login", post(auth::login))
}

/// Routes behind the access gate.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(system::whoami))
        .merge(products::router())
}
