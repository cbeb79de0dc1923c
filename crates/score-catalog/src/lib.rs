//! # score-catalog
//!
//! Static topic-category catalog for nutrition-knowledge scoring.
//!
//! The catalog defines five fixed categories, each with a descriptive
//! purpose, an ordered list of keyword variants (English and Turkish), and a
//! maximum achievable score. It is constructed once at startup, validated,
//! and shared read-only across all conversations; adding or removing a
//! category is a deployment-time change.

mod category;

pub use category::{Catalog, CatalogError, Category, DEFAULT_MAX_SCORE};
