//! `HuggingFace` Hub catalog client for the Prowl install pipeline.
//!
//! Implements the `prowl-core` [`CatalogPort`](prowl_core::CatalogPort):
//! model search plus per-repository detail lookup, normalized into
//! [`CatalogEntry`](prowl_core::CatalogEntry) values with authoritative
//! GGUF file sizes. The HTTP layer sits behind an injectable backend
//! trait so the client is testable with canned responses.

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

pub use client::{DefaultCatalogClient, HfCatalogClient};
pub use config::HfClientConfig;
pub use error::HfError;
