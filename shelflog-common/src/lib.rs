//! # shelflog common library
//!
//! Shared code for the shelflog service:
//! - Catalog item types returned by every provider
//! - Taxonomy normalization (category paths, genre ids, country codes)
//! - Author role filtering and query reformulation
//! - Ordered fallback helpers
//! - Configuration loading

pub mod authors;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fallback;
pub mod query;
pub mod taxonomy;

pub use catalog::{Annotations, CatalogItem, MediaType, Rating, Suggestion};
pub use error::{Error, Result};
pub use taxonomy::{Mapping, Taxonomy};
