//! In-memory product catalog.
//!
//! The collection and the id allocator live behind one mutex so allocating an
//! id and inserting the product happen as a single step.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::info;

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};

use crate::product::{NewProduct, Product, ProductPatch, merge};

#[derive(Debug)]
struct CatalogState {
    products: Vec<Product>,
    next_id: ProductId,
}

impl CatalogState {
    fn position(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id() == id)
    }
}

/// Ordered product collection plus its monotonically increasing id allocator.
///
/// Ids are never reused: deleting a product does not move the allocator back.
#[derive(Debug)]
pub struct ProductCatalog {
    inner: Mutex<CatalogState>,
}

impl ProductCatalog {
    /// Empty catalog; the first product gets id 1.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CatalogState {
                products: Vec::new(),
                next_id: ProductId::new(1),
            }),
        }
    }

    /// Catalog pre-loaded with the demo products (ids 1..=3).
    pub fn with_demo_products(now: DateTime<Utc>) -> Self {
        let catalog = Self::new();
        for new in demo_products() {
            catalog.create(new, now);
        }
        catalog
    }

    // Every mutation leaves the state consistent, so a poisoned lock is still usable.
    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All products in insertion order.
    pub fn list(&self) -> Vec<Product> {
        self.state().products.clone()
    }

    pub fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.state()
            .products
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    pub fn create(&self, new: NewProduct, now: DateTime<Utc>) -> Product {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id = id.next();

        let product = Product::from_new(id, new, now);
        state.products.push(product.clone());
        drop(state);

        info!(product_id = %id, "product created");
        product
    }

    /// Merge `patch` into an existing product. Never creates.
    pub fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Product> {
        let mut state = self.state();
        let idx = state.position(id).ok_or(DomainError::NotFound)?;

        let updated = merge(&state.products[idx], patch, now);
        state.products[idx] = updated.clone();
        drop(state);

        info!(product_id = %id, touched_only = patch.is_empty(), "product updated");
        Ok(updated)
    }

    pub fn delete(&self, id: ProductId) -> DomainResult<()> {
        let mut state = self.state();
        let idx = state.position(id).ok_or(DomainError::NotFound)?;
        state.products.remove(idx);
        drop(state);

        info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next `create` will assign.
    pub fn peek_next_id(&self) -> ProductId {
        self.state().next_id
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn demo_products() -> Vec<NewProduct> {
    let item = |name: &str, price: f64, description: &str, stock: u64| NewProduct {
        name: name.to_string(),
        price,
        category: "Electronics".to_string(),
        description: description.to_string(),
        stock,
    };

    vec![
        item("iPhone 15 Pro", 999.99, "Latest iPhone with advanced features", 50),
        item("MacBook Air M3", 1299.99, "Powerful laptop for professionals", 25),
        item("AirPods Pro", 249.99, "Wireless earbuds with noise cancellation", 100),
    ]
}
