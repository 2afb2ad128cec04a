//! Pure data types for the install pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::quant::QuantTag;

use super::InstallError;

/// One downloadable file in a catalog repository.
///
/// Immutable once fetched. A `size_bytes` of zero means the catalog did
/// not report a trustworthy size; such files never survive selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Filename as published by the repository (e.g. `llama.Q4_K_M.gguf`).
    pub filename: String,
    /// Authoritative size in bytes, 0 when unknown.
    pub size_bytes: u64,
    /// Quantization tag extracted from the filename.
    pub quant: QuantTag,
    /// Direct download URL supporting `Range` requests.
    pub download_url: String,
}

impl CatalogFile {
    /// Size in gigabytes for display and budget math.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / 1_073_741_824.0
    }
}

/// A catalog repository with its downloadable GGUF files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Repository id (`owner/name`).
    pub repo_id: String,
    /// Total download count reported by the catalog.
    pub downloads: u64,
    /// Like count reported by the catalog.
    pub likes: u64,
    /// Last modified timestamp (ISO 8601) when reported.
    pub last_modified: Option<String>,
    /// GGUF files in the repository.
    pub files: Vec<CatalogFile>,
}

/// Phase of an install attempt.
///
/// Successful runs emit phases in declaration order; `Error` may replace
/// any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallPhase {
    /// Catalog lookup and variant selection.
    FetchingMetadata,
    /// Byte transfer to local storage.
    Downloading,
    /// Manifest submission to the runtime.
    Registering,
    /// Canary generation probe.
    Benchmarking,
    /// Terminal success.
    Complete,
    /// Terminal failure.
    Error,
}

impl InstallPhase {
    /// Kebab-case name used on the wire and in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FetchingMetadata => "fetching-metadata",
            Self::Downloading => "downloading",
            Self::Registering => "registering",
            Self::Benchmarking => "benchmarking",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

/// Progress event delivered to the caller's sink throughout an install.
///
/// This is the only interface the UI sees; all fields are plain values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Current phase.
    pub phase: InstallPhase,
    /// Bytes transferred so far (0 outside the download phase).
    pub bytes_downloaded: u64,
    /// Total bytes expected (0 when unknown).
    pub total_bytes: u64,
    /// Percentage in `[0, 100]`.
    pub percent: f64,
    /// Transfer speed in MB/s over the sliding window.
    pub speed_mbps: f64,
    /// Estimated seconds remaining, 0 when speed is 0.
    pub eta_seconds: f64,
    /// Human-readable status line.
    pub message: String,
}

impl ProgressEvent {
    /// Event for a non-transfer phase (no byte counters).
    pub fn for_phase(phase: InstallPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            bytes_downloaded: 0,
            total_bytes: 0,
            percent: if matches!(phase, InstallPhase::Complete) {
                100.0
            } else {
                0.0
            },
            speed_mbps: 0.0,
            eta_seconds: 0.0,
            message: message.into(),
        }
    }

    /// Event carrying transfer counters. Percent is derived from the byte
    /// counts and clamped to `[0, 100]` even when `bytes_downloaded`
    /// transiently overshoots an estimated total.
    #[allow(clippy::cast_precision_loss)]
    pub fn transfer(
        phase: InstallPhase,
        bytes_downloaded: u64,
        total_bytes: u64,
        speed_mbps: f64,
        eta_seconds: f64,
        message: impl Into<String>,
    ) -> Self {
        let percent = if total_bytes > 0 {
            ((bytes_downloaded as f64 / total_bytes as f64) * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            phase,
            bytes_downloaded,
            total_bytes,
            percent,
            speed_mbps,
            eta_seconds,
            message: message.into(),
        }
    }
}

/// Outcome of the benchmark probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Generation throughput over the whole probe.
    pub tokens_per_second: f64,
    /// Elapsed milliseconds to the first non-empty token.
    pub first_token_ms: f64,
    /// True iff the reply contained the exact marker.
    pub passed: bool,
}

/// Final, non-throwing outcome of one install invocation.
///
/// Constructed only by the orchestrator; collaborators surface
/// [`InstallError`] values instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallResult {
    /// Whether the pipeline reached `complete`.
    pub success: bool,
    /// Name the model was registered under, when registration happened.
    pub runtime_model_name: Option<String>,
    /// Local path of the downloaded file, when the download happened.
    pub local_path: Option<PathBuf>,
    /// Benchmark outcome on success.
    pub benchmark: Option<BenchmarkResult>,
    /// `message (CODE)` text on failure.
    pub error: Option<String>,
}

impl InstallResult {
    /// Successful result with the registered name and benchmark outcome.
    #[must_use]
    pub fn completed(
        runtime_model_name: String,
        local_path: PathBuf,
        benchmark: BenchmarkResult,
    ) -> Self {
        Self {
            success: true,
            runtime_model_name: Some(runtime_model_name),
            local_path: Some(local_path),
            benchmark: Some(benchmark),
            error: None,
        }
    }

    /// Failed result carrying the error's `message (CODE)` rendering.
    #[must_use]
    pub fn failed(error: &InstallError) -> Self {
        Self {
            success: false,
            runtime_model_name: None,
            local_path: None,
            benchmark: None,
            error: Some(error.display_with_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_percent_clamped() {
        // Overshoot: downloaded more than the (stale) estimated total.
        let event = ProgressEvent::transfer(InstallPhase::Downloading, 1200, 1000, 1.0, 0.0, "x");
        assert!((event.percent - 100.0).abs() < f64::EPSILON);

        let event = ProgressEvent::transfer(InstallPhase::Downloading, 500, 1000, 1.0, 0.0, "x");
        assert!((event.percent - 50.0).abs() < 0.01);

        // Unknown total reports zero percent rather than NaN.
        let event = ProgressEvent::transfer(InstallPhase::Downloading, 500, 0, 1.0, 0.0, "x");
        assert!(event.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(InstallPhase::FetchingMetadata.as_str(), "fetching-metadata");
        assert_eq!(InstallPhase::Error.as_str(), "error");
    }

    #[test]
    fn test_complete_event_is_full() {
        let event = ProgressEvent::for_phase(InstallPhase::Complete, "done");
        assert!((event.percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_result_carries_code() {
        let err = InstallError::download_failed("stream reset");
        let result = InstallResult::failed(&err);
        assert!(!result.success);
        let text = result.error.unwrap();
        assert!(text.contains("stream reset"));
        assert!(text.contains("(DOWNLOAD_FAILED)"));
    }
}
