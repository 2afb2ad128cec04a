//! Ollama runtime integration: model registration and the benchmark
//! probe, both clients of the runtime's NDJSON streaming HTTP API.

use std::path::PathBuf;
use std::time::Duration;

mod benchmark;
mod register;

pub use benchmark::OllamaBenchmark;
pub use register::OllamaRegistrar;

/// Configuration shared by the runtime clients.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the runtime, default `http://localhost:11434`.
    pub(crate) base_url: String,
    /// Deadline for the benchmark probe, default 30 seconds.
    pub(crate) benchmark_deadline: Duration,
    /// Directory where registration manifests are kept.
    pub(crate) modelfiles_dir: PathBuf,
}

impl OllamaConfig {
    /// Configuration for a local runtime, keeping manifests under
    /// `modelfiles_dir`.
    #[must_use]
    pub fn new(modelfiles_dir: PathBuf) -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            benchmark_deadline: Duration::from_secs(30),
            modelfiles_dir,
        }
    }

    /// Point at a non-default runtime address.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Change the benchmark deadline.
    #[must_use]
    pub const fn with_benchmark_deadline(mut self, deadline: Duration) -> Self {
        self.benchmark_deadline = deadline;
        self
    }
}

/// Truncate a runtime response body for inclusion in error messages.
pub(crate) fn body_snippet(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= LIMIT {
        trimmed.to_string()
    } else {
        let mut end = LIMIT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::new(PathBuf::from("/tmp/modelfiles"));
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.benchmark_deadline, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_trailing_slash_dropped() {
        let config = OllamaConfig::new(PathBuf::from("/tmp"))
            .with_base_url("http://127.0.0.1:11434/");
        assert_eq!(config.base_url, "http://127.0.0.1:11434");
    }

    #[test]
    fn test_body_snippet_truncates() {
        let long = "y".repeat(500);
        let snippet = body_snippet(&long);
        assert!(snippet.ends_with('…'));
        assert!(snippet.chars().count() == 201);
    }
}
