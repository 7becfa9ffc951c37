//! Owned service state shared by all handlers.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use stockroom_auth::{CredentialStore, DEFAULT_USERS, TokenService};
use stockroom_products::ProductCatalog;

use crate::config::ApiConfig;

/// Everything a request handler may touch.
///
/// One instance per running router; tests get a fresh one per server.
#[derive(Debug)]
pub struct AppServices {
    catalog: ProductCatalog,
    credentials: CredentialStore,
    tokens: Arc<TokenService>,
}

impl AppServices {
    pub fn new(
        catalog: ProductCatalog,
        credentials: CredentialStore,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            catalog,
            credentials,
            tokens,
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let tokens = Arc::new(TokenService::new(&config.jwt_secret));

    // bcrypt hashing is deliberately slow; keep it off the async workers.
    let cost = config.bcrypt_cost;
    let credentials =
        tokio::task::spawn_blocking(move || CredentialStore::from_seed(DEFAULT_USERS, cost))
            .await
            .context("credential seeding task failed")?
            .context("failed to seed credential store")?;
    anyhow::ensure!(!credentials.is_empty(), "credential store has no users");

    let catalog = if config.seed_products {
        ProductCatalog::with_demo_products(Utc::now())
    } else {
        ProductCatalog::new()
    };

    info!(
        users = credentials.len(),
        products = catalog.len(),
        "in-memory stores ready"
    );

    Ok(AppServices::new(catalog, credentials, tokens))
}
