//! Canvas LMS API domain.
//!
//! - `client.rs` - authenticated REST/GraphQL client with Link-header pagination
//! - `pagination.rs` - `Link` header parsing and page planning
//! - `query.rs` - query strings with Canvas `key[]` list encoding
//! - `models.rs` - course records and query enumerations
//! - `error.rs` - API error types

mod client;
mod error;
pub mod models;
pub mod pagination;
mod query;

pub use client::{ApiResponse, CanvasClient, Page};
pub use error::ApiError;
pub use pagination::PageOptions;
pub use query::QueryParams;
