//! Request/response DTOs that are not domain types themselves.

use serde::Serialize;

pub use stockroom_auth::{LoginRequest, LoginResponse};
pub use stockroom_products::ProductFields;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "API is running!",
        }
    }
}
