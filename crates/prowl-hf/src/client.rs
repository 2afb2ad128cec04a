//! Catalog client for searching models and fetching file listings.

use tracing::debug;

use prowl_core::{CatalogEntry, CatalogFile, QuantTag};

use crate::config::HfClientConfig;
use crate::error::{HfError, HfResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{RawModelDetail, RawModelSummary};
use crate::url::{build_download_url, build_model_url, build_search_url};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default catalog client using the reqwest HTTP backend.
pub type DefaultCatalogClient = HfCatalogClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the Hugging Face Hub model catalog.
///
/// Generic over an HTTP backend so tests can substitute canned
/// responses. Production code uses `DefaultCatalogClient::new()`.
pub struct HfCatalogClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: HfClientConfig,
}

impl DefaultCatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HfClientConfig) -> HfResult<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self { backend, config })
    }
}

impl<B: HttpBackend> HfCatalogClient<B> {
    /// Create a client with a custom backend, for testing.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: HfClientConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// Search the catalog, sorted by downloads.
    ///
    /// Each hit is followed by a detail request so entries carry an
    /// authoritative GGUF file listing with sizes. When `filter_gguf`
    /// is set, files the API reports with no size are dropped rather
    /// than presented as zero-byte candidates.
    pub(crate) async fn search_catalog(
        &self,
        query: &str,
        limit: u32,
        filter_gguf: bool,
    ) -> HfResult<Vec<CatalogEntry>> {
        let url = build_search_url(&self.config.base_url, query, limit, filter_gguf)?;
        debug!(query, limit, "searching model catalog");

        let value = self.backend.get_json(&url).await?;
        let summaries: Vec<RawModelSummary> =
            serde_json::from_value(value).map_err(|e| HfError::InvalidResponse {
                message: format!("search response: {e}"),
            })?;

        let mut entries = Vec::with_capacity(summaries.len());
        for summary in summaries {
            match self.fetch_entry(&summary.id, filter_gguf).await {
                Ok(entry) if entry.files.is_empty() && filter_gguf => {
                    debug!(repo_id = %summary.id, "skipping repo with no usable GGUF files");
                }
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    // One broken repo should not sink the whole search.
                    debug!(repo_id = %summary.id, error = %e, "skipping repo detail failure");
                }
            }
        }

        Ok(entries)
    }

    /// Fetch one repository's full catalog entry.
    pub(crate) async fn fetch_entry(
        &self,
        repo_id: &str,
        filter_gguf: bool,
    ) -> HfResult<CatalogEntry> {
        let url = build_model_url(&self.config.base_url, repo_id)?;
        let value = self.backend.get_json(&url).await?;
        let detail: RawModelDetail =
            serde_json::from_value(value).map_err(|e| HfError::InvalidResponse {
                message: format!("model detail for {repo_id}: {e}"),
            })?;

        Ok(to_catalog_entry(&detail, filter_gguf))
    }
}

// ============================================================================
// Conversion
// ============================================================================

fn to_catalog_entry(detail: &RawModelDetail, filter_gguf: bool) -> CatalogEntry {
    let files = detail
        .siblings
        .iter()
        .filter(|s| s.rfilename.to_lowercase().ends_with(".gguf"))
        .filter_map(|s| {
            let size_bytes = s.effective_size();
            if size_bytes == 0 && filter_gguf {
                return None;
            }
            Some(CatalogFile {
                filename: s.rfilename.clone(),
                size_bytes,
                quant: QuantTag::from_filename(&s.rfilename),
                download_url: build_download_url(&detail.id, &s.rfilename),
            })
        })
        .collect();

    CatalogEntry {
        repo_id: detail.id.clone(),
        downloads: detail.downloads,
        likes: detail.likes,
        last_modified: detail.last_modified.clone(),
        files,
    }
}
