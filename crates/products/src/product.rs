use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};

use crate::parse::NumericInput;

/// A catalog entry.
///
/// `id` and `created_at` are stamped by the catalog and never change;
/// `updated_at` is absent until the first update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub stock: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn from_new(id: ProductId, new: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            category: new.category,
            description: new.description,
            stock: new.stock,
            created_at,
            updated_at: None,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Product fields as a client sends them, for both create and update.
///
/// Everything is optional here; [`NewProduct`] and [`ProductPatch`] decide
/// what is required and how loosely numbers are read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<NumericInput>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub stock: Option<NumericInput>,
}

/// Validated input for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub stock: u64,
}

impl TryFrom<ProductFields> for NewProduct {
    type Error = DomainError;

    /// `name`, `price` and `category` are required. A price or stock that is
    /// present but unreadable falls back to 0 instead of failing.
    fn try_from(fields: ProductFields) -> DomainResult<Self> {
        let name = fields.name.filter(|s| !s.trim().is_empty());
        let category = fields.category.filter(|s| !s.trim().is_empty());
        let price = fields.price.filter(|p| !p.is_blank());

        let (Some(name), Some(price), Some(category)) = (name, price, category) else {
            return Err(DomainError::validation("name, price, and category are required"));
        };

        let price = check_price(price.as_decimal().unwrap_or(0.0))?;
        let stock = match fields.stock.as_ref().and_then(NumericInput::as_integer) {
            Some(n) => check_stock(n)?,
            None => 0,
        };

        Ok(Self {
            name,
            price,
            category,
            description: fields.description.unwrap_or_default(),
            stock,
        })
    }
}

/// Partial update. `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub stock: Option<u64>,
}

impl TryFrom<ProductFields> for ProductPatch {
    type Error = DomainError;

    /// Blank `name`/`category` count as not supplied. A supplied price or
    /// stock is read as on create, so an unreadable one becomes 0.
    /// `description` replaces whenever it is present, even when empty.
    fn try_from(fields: ProductFields) -> DomainResult<Self> {
        let price = fields
            .price
            .as_ref()
            .map(|p| check_price(p.as_decimal().unwrap_or(0.0)))
            .transpose()?;
        let stock = fields
            .stock
            .as_ref()
            .map(|s| check_stock(s.as_integer().unwrap_or(0)))
            .transpose()?;

        Ok(Self {
            name: fields.name.filter(|s| !s.trim().is_empty()),
            price,
            category: fields.category.filter(|s| !s.trim().is_empty()),
            description: fields.description,
            stock,
        })
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply `patch` over `existing`, stamping `updated_at` with `now`.
pub fn merge(existing: &Product, patch: &ProductPatch, now: DateTime<Utc>) -> Product {
    Product {
        id: existing.id,
        name: patch.name.clone().unwrap_or_else(|| existing.name.clone()),
        price: patch.price.unwrap_or(existing.price),
        category: patch.category.clone().unwrap_or_else(|| existing.category.clone()),
        description: patch
            .description
            .clone()
            .unwrap_or_else(|| existing.description.clone()),
        stock: patch.stock.unwrap_or(existing.stock),
        created_at: existing.created_at,
        updated_at: Some(now),
    }
}

fn check_price(price: f64) -> DomainResult<f64> {
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(price)
}

fn check_stock(stock: i64) -> DomainResult<u64> {
    u64::try_from(stock).map_err(|_| DomainError::validation("stock cannot be negative"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fields(name: &str, price: &str, category: &str) -> ProductFields {
        ProductFields {
            name: Some(name.to_string()),
            price: Some(price.into()),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    fn desk() -> Product {
        Product::from_new(
            ProductId::new(4),
            NewProduct {
                name: "Desk".to_string(),
                price: 199.5,
                category: "Office".to_string(),
                description: "Oak".to_string(),
                stock: 3,
            },
            Utc::now(),
        )
    }

    #[test]
    fn new_product_applies_defaults() {
        let new = NewProduct::try_from(fields("Desk", "199.5", "Office")).unwrap();
        assert_eq!(new.name, "Desk");
        assert_eq!(new.price, 199.5);
        assert_eq!(new.category, "Office");
        assert_eq!(new.description, "");
        assert_eq!(new.stock, 0);
    }

    #[test]
    fn new_product_requires_name_price_category() {
        for f in [
            fields("", "1", "Office"),
            fields("Desk", "", "Office"),
            fields("Desk", "1", "   "),
            ProductFields::default(),
        ] {
            let err = NewProduct::try_from(f).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn unreadable_numbers_fall_back_to_zero_on_create() {
        let mut f = fields("Desk", "cheap", "Office");
        f.stock = Some("lots".into());

        let new = NewProduct::try_from(f).unwrap();
        assert_eq!(new.price, 0.0);
        assert_eq!(new.stock, 0);
    }

    #[test]
    fn zero_price_number_is_accepted() {
        let mut f = fields("Sample", "x", "Freebies");
        f.price = Some(NumericInput::Number(0.0));
        assert_eq!(NewProduct::try_from(f).unwrap().price, 0.0);
    }

    #[test]
    fn negative_values_are_rejected() {
        let err = NewProduct::try_from(fields("Desk", "-1", "Office")).unwrap_err();
        assert_eq!(err, DomainError::validation("price cannot be negative"));

        let mut f = fields("Desk", "1", "Office");
        f.stock = Some(NumericInput::Number(-2.0));
        let err = NewProduct::try_from(f).unwrap_err();
        assert_eq!(err, DomainError::validation("stock cannot be negative"));
    }

    #[test]
    fn empty_patch_only_touches_updated_at() {
        let existing = desk();
        let now = existing.created_at + Duration::minutes(5);
        let patch = ProductPatch::try_from(ProductFields::default()).unwrap();
        assert!(patch.is_empty());

        let merged = merge(&existing, &patch, now);
        assert_eq!(merged.updated_at, Some(now));
        assert_eq!(Product { updated_at: None, ..merged }, existing);
    }

    #[test]
    fn patch_replaces_supplied_fields_only() {
        let existing = desk();
        let patch = ProductPatch::try_from(ProductFields {
            price: Some("249.90".into()),
            stock: Some(NumericInput::Number(10.0)),
            ..Default::default()
        })
        .unwrap();

        let merged = merge(&existing, &patch, Utc::now());
        assert_eq!(merged.price, 249.9);
        assert_eq!(merged.stock, 10);
        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.category, existing.category);
        assert_eq!(merged.description, existing.description);
        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.created_at, existing.created_at);
    }

    #[test]
    fn empty_description_clears_but_blank_name_keeps() {
        let existing = desk();
        let patch = ProductPatch::try_from(ProductFields {
            name: Some(String::new()),
            description: Some(String::new()),
            ..Default::default()
        })
        .unwrap();

        let merged = merge(&existing, &patch, Utc::now());
        assert_eq!(merged.name, "Desk");
        assert_eq!(merged.description, "");
    }

    #[test]
    fn unreadable_numbers_read_as_zero_on_update_like_create() {
        let raw = ProductFields {
            name: Some("Desk".to_string()),
            price: Some("abc".into()),
            category: Some("Office".to_string()),
            stock: Some("lots".into()),
            ..Default::default()
        };
        let created = NewProduct::try_from(raw.clone()).unwrap();

        let existing = desk();
        let patch = ProductPatch::try_from(raw).unwrap();
        let merged = merge(&existing, &patch, Utc::now());

        assert_eq!((merged.price, merged.stock), (0.0, 0));
        assert_eq!((merged.price, merged.stock), (created.price, created.stock));
    }

    #[test]
    fn negative_numbers_are_rejected_on_update() {
        let err = ProductPatch::try_from(ProductFields {
            stock: Some("-4".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, DomainError::validation("stock cannot be negative"));
    }

    #[test]
    fn serializes_camel_case_without_updated_at_until_set() {
        let product = desk();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["price"], 199.5);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());

        let updated = merge(&product, &ProductPatch::default(), Utc::now());
        let json = serde_json::to_value(&updated).unwrap();
        assert!(json.get("updatedAt").is_some());
    }
}
