//! Model acquisition pipeline: pick a quantization that fits the
//! machine's RAM, download it resumably with progress reporting,
//! register it with the local Ollama runtime, and verify it with a
//! short benchmark generation.
//!
//! The [`Installer`] orchestrates the stages through the port traits
//! defined in `prowl-core`, so each stage can be swapped for a fake in
//! tests. [`Installer::install`] never returns an error: failures are
//! folded into the returned [`InstallResult`](prowl_core::InstallResult)
//! and reported through the progress sink.

mod download;
mod ollama;
mod orchestrator;
mod selector;

// ============================================================================
// Public API
// ============================================================================

pub use download::{
    ByteStream, Downloader, FetchBackend, FetchResponse, FreeSpaceProbe, RangeStatus,
    ReqwestFetchBackend, system_free_space,
};
pub use ollama::{OllamaBenchmark, OllamaConfig, OllamaRegistrar};
pub use orchestrator::{InstallRequest, Installer};
pub use selector::{RAM_HEADROOM, select_variant};
