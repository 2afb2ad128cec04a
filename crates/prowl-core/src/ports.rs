//! Port traits consumed by the install orchestrator.
//!
//! Each pipeline stage is a trait so adapters can be swapped for fakes in
//! tests and the orchestrator never depends on a concrete HTTP client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::install::{BenchmarkResult, CatalogEntry, CatalogFile, InstallError, ProgressEvent};

/// Callback invoked with every progress event.
///
/// Called synchronously from the pipeline's task; implementations must
/// not block for long periods or they stall the chunk-read loop.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Options for a catalog search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of repositories to return. Clamped to at least 1.
    pub limit: u32,
    /// Drop files whose reported size is unknown or zero.
    pub filter_gguf: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            filter_gguf: true,
        }
    }
}

impl SearchOptions {
    /// Set the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Model catalog lookup (search + per-repository details).
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Search the catalog, returning entries with authoritative file sizes.
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<CatalogEntry>, InstallError>;

    /// Fetch one repository's entry with its GGUF files.
    async fn fetch_details(&self, repo_id: &str) -> Result<CatalogEntry, InstallError>;
}

/// Resumable file download to local storage.
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Download `file` to `dest`, emitting progress through `sink`.
    ///
    /// Returns the local path on success. Resumes a pre-existing partial
    /// file via HTTP range requests.
    async fn download(
        &self,
        file: &CatalogFile,
        dest: &Path,
        sink: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, InstallError>;
}

/// Registration of a downloaded file with the inference runtime.
#[async_trait]
pub trait RegistrarPort: Send + Sync {
    /// Register the file and return the runtime model name.
    async fn register(
        &self,
        local_path: &Path,
        display_name: &str,
    ) -> Result<String, InstallError>;
}

/// Functional probe of a freshly registered model.
#[async_trait]
pub trait BenchmarkPort: Send + Sync {
    /// Run the canary generation request against `model_name`.
    async fn benchmark(&self, model_name: &str) -> Result<BenchmarkResult, InstallError>;
}
