//! Products domain module.
//!
//! This crate contains the product model and the in-memory catalog that owns
//! it, implemented as plain domain logic (no HTTP, no persistence).

pub mod catalog;
pub mod parse;
pub mod product;

pub use catalog::ProductCatalog;
pub use parse::{NumericInput, parse_leading_float, parse_leading_int};
pub use product::{NewProduct, Product, ProductFields, ProductPatch, merge};
