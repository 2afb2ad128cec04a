//! Typed error taxonomy for the install pipeline.
//!
//! Every failure anywhere in the pipeline reduces to one of these
//! variants. Each carries a stable machine code and a human-readable
//! suggestion, so a calling UI can render actionable guidance without
//! its own error-code table. Serializable so errors can cross FFI and
//! process boundaries without losing structure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for install pipeline operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum InstallError {
    /// Catalog or download HTTP failure.
    #[error("Network error: {message}")]
    Network {
        /// Detailed message, including a truncated response body when present.
        message: String,
        /// HTTP status code if one was received.
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },

    /// No GGUF file fits the memory budget (or none exists).
    #[error("No usable GGUF file: {message}")]
    NoGgufFiles {
        /// Why nothing was selectable, naming the minimum RAM when known.
        message: String,
    },

    /// Disk preflight machinery itself failed.
    #[error("Disk check failed: {message}")]
    DiskCheckFailed {
        /// What went wrong while probing.
        message: String,
    },

    /// Preflight found less free space than the remaining transfer needs.
    #[error("Insufficient disk space: {message}")]
    InsufficientDiskSpace {
        /// Required vs. available, in GB.
        message: String,
    },

    /// Transfer started but did not complete.
    #[error("Download failed: {message}")]
    DownloadFailed {
        /// Underlying cause.
        message: String,
    },

    /// The inference runtime is unreachable.
    #[error("Ollama is not running: {message}")]
    OllamaNotRunning {
        /// Transport-level evidence (connection refused, DNS failure).
        message: String,
    },

    /// The runtime was reachable but the request failed.
    #[error("Ollama request failed: {message}")]
    OllamaRequestFailed {
        /// Underlying cause.
        message: String,
    },

    /// The runtime rejected the model creation request.
    #[error("Model registration failed: {message}")]
    OllamaCreateFailed {
        /// Error text from the runtime's acknowledgement stream or status.
        message: String,
    },

    /// The benchmark request itself failed.
    #[error("Benchmark request failed: {message}")]
    OllamaBenchmarkFailed {
        /// Underlying cause.
        message: String,
    },

    /// The benchmark probe exceeded its deadline.
    #[error("Benchmark timed out after {seconds}s")]
    BenchmarkTimeout {
        /// Deadline that was exceeded.
        seconds: u64,
    },

    /// The benchmark ran but produced an unusable result.
    #[error("Benchmark failed: {message}")]
    BenchmarkFailed {
        /// What was wrong with the reply.
        message: String,
    },

    /// Catch-all for failures outside the specific taxonomy.
    #[error("{message}")]
    InstallFailed {
        /// Error message.
        message: String,
    },
}

/// Transport-error signatures that mean "the runtime is not running"
/// rather than "the runtime rejected the request".
const UNREACHABLE_SIGNATURES: &[&str] = &[
    "connection refused",
    "econnrefused",
    "dns error",
    "failed to lookup",
    "name or service not known",
    "no route to host",
];

impl InstallError {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Create a network error with an HTTP status code.
    pub fn network_with_status(message: impl Into<String>, status: u16) -> Self {
        Self::Network {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a no-usable-files error.
    pub fn no_gguf_files(message: impl Into<String>) -> Self {
        Self::NoGgufFiles {
            message: message.into(),
        }
    }

    /// Create a disk-check error.
    pub fn disk_check_failed(message: impl Into<String>) -> Self {
        Self::DiskCheckFailed {
            message: message.into(),
        }
    }

    /// Create an insufficient-space error naming the shortfall in GB.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn insufficient_disk_space(required_bytes: u64, available_bytes: u64) -> Self {
        let gb = 1_073_741_824.0;
        Self::InsufficientDiskSpace {
            message: format!(
                "need {:.1}GB free, only {:.1}GB available",
                required_bytes as f64 / gb,
                available_bytes as f64 / gb
            ),
        }
    }

    /// Create a download failure.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create a runtime-unreachable error.
    pub fn ollama_not_running(message: impl Into<String>) -> Self {
        Self::OllamaNotRunning {
            message: message.into(),
        }
    }

    /// Create a generic runtime request failure.
    pub fn ollama_request_failed(message: impl Into<String>) -> Self {
        Self::OllamaRequestFailed {
            message: message.into(),
        }
    }

    /// Create a model-creation failure.
    pub fn ollama_create_failed(message: impl Into<String>) -> Self {
        Self::OllamaCreateFailed {
            message: message.into(),
        }
    }

    /// Create a benchmark request failure.
    pub fn ollama_benchmark_failed(message: impl Into<String>) -> Self {
        Self::OllamaBenchmarkFailed {
            message: message.into(),
        }
    }

    /// Create a benchmark timeout.
    #[must_use]
    pub const fn benchmark_timeout(seconds: u64) -> Self {
        Self::BenchmarkTimeout { seconds }
    }

    /// Create a benchmark result failure.
    pub fn benchmark_failed(message: impl Into<String>) -> Self {
        Self::BenchmarkFailed {
            message: message.into(),
        }
    }

    /// Create a catch-all install failure.
    pub fn install_failed(message: impl Into<String>) -> Self {
        Self::InstallFailed {
            message: message.into(),
        }
    }

    /// Classify a runtime transport failure.
    ///
    /// Connection-refused and DNS signatures (and any failure against a
    /// loopback host, where DNS cannot be the culprit) become
    /// [`Self::OllamaNotRunning`]; everything else is a generic request
    /// failure.
    #[must_use]
    pub fn classify_runtime_transport(error_text: &str, base_url: &str) -> Self {
        let lower = error_text.to_lowercase();
        let unreachable = UNREACHABLE_SIGNATURES.iter().any(|sig| lower.contains(sig));
        let loopback = base_url.contains("localhost")
            || base_url.contains("127.0.0.1")
            || base_url.contains("[::1]");

        if unreachable || (loopback && lower.contains("error sending request")) {
            Self::ollama_not_running(format!("could not reach {base_url}: {error_text}"))
        } else {
            Self::ollama_request_failed(error_text.to_string())
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "NETWORK_ERROR",
            Self::NoGgufFiles { .. } => "NO_GGUF_FILES",
            Self::DiskCheckFailed { .. } => "DISK_CHECK_FAILED",
            Self::InsufficientDiskSpace { .. } => "INSUFFICIENT_DISK_SPACE",
            Self::DownloadFailed { .. } => "DOWNLOAD_FAILED",
            Self::OllamaNotRunning { .. } => "OLLAMA_NOT_RUNNING",
            Self::OllamaRequestFailed { .. } => "OLLAMA_REQUEST_FAILED",
            Self::OllamaCreateFailed { .. } => "OLLAMA_CREATE_FAILED",
            Self::OllamaBenchmarkFailed { .. } => "OLLAMA_BENCHMARK_FAILED",
            Self::BenchmarkTimeout { .. } => "BENCHMARK_TIMEOUT",
            Self::BenchmarkFailed { .. } => "BENCHMARK_FAILED",
            Self::InstallFailed { .. } => "INSTALL_FAILED",
        }
    }

    /// Actionable guidance for the user, paired with [`Self::code`].
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Check your internet connection and retry. The catalog may also be rate-limiting; wait a minute before trying again.".to_string()
            }
            Self::NoGgufFiles { .. } => {
                "Try a repository with smaller quantizations (Q3/Q4 variants) or free up memory by closing other applications.".to_string()
            }
            Self::DiskCheckFailed { .. } => {
                "Verify the models directory is on a readable volume and retry.".to_string()
            }
            Self::InsufficientDiskSpace { .. } => {
                "Free up disk space or point PROWL_MODELS_DIR at a larger volume.".to_string()
            }
            Self::DownloadFailed { .. } => {
                "Retry the install; completed ranges of the file are resumed automatically.".to_string()
            }
            Self::OllamaNotRunning { .. } => {
                "Start the Ollama runtime (`ollama serve`) and retry.".to_string()
            }
            Self::OllamaRequestFailed { .. } | Self::OllamaBenchmarkFailed { .. } => {
                "Check the runtime's logs for details and retry.".to_string()
            }
            Self::OllamaCreateFailed { message } => {
                if message.to_lowercase().contains("memory") {
                    "The runtime could not load the model; pick a smaller quantization.".to_string()
                } else {
                    "Check the runtime's logs; the manifest it rejected is kept in the modelfiles directory.".to_string()
                }
            }
            Self::BenchmarkTimeout { .. } => {
                "The model loaded but generates too slowly for this machine; consider a smaller quantization.".to_string()
            }
            Self::BenchmarkFailed { .. } => {
                "The model responded but not with the expected probe reply; it may still be usable.".to_string()
            }
            Self::InstallFailed { .. } => "Retry the install; if it keeps failing, file a bug with the error text.".to_string(),
        }
    }

    /// `message (CODE)` rendering used for terminal events and results.
    #[must_use]
    pub fn display_with_code(&self) -> String {
        format!("{self} ({})", self.code())
    }
}
