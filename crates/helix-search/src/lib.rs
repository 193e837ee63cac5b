//! HTTP client for the external web-search API.

mod client;
mod error;
mod retry;
mod types;

pub use client::SearchClient;
pub use error::SearchError;
pub use types::{OrganicResult, SearchResponse};
