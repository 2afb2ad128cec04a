//! Benchmark probe: a canary generation request against a freshly
//! registered model.
//!
//! The probe asks the model to echo an exact marker string and measures
//! time-to-first-token and overall throughput from the NDJSON token
//! stream. It answers two questions: does the model load and respond at
//! all, and does it follow a trivial instruction.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use prowl_core::{BenchmarkPort, BenchmarkResult, InstallError, NdjsonDecoder};

use super::{OllamaConfig, body_snippet};

/// Exact marker the canary prompt asks for.
const BENCH_MARKER: &str = "PROWL_BENCH_OK";

/// Benchmark client for the Ollama runtime.
pub struct OllamaBenchmark {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaBenchmark {
    /// Create a benchmark client for the configured runtime.
    pub fn new(config: OllamaConfig) -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| InstallError::install_failed(format!("building HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn canary_prompt() -> String {
        format!("Reply with exactly the text {BENCH_MARKER} and nothing else.")
    }

    async fn probe(&self, model_name: &str) -> Result<BenchmarkResult, InstallError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "model": model_name,
                "prompt": Self::canary_prompt(),
                "stream": true,
            }))
            .send()
            .await
            .map_err(|e| {
                InstallError::classify_runtime_transport(&e.to_string(), &self.config.base_url)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InstallError::ollama_benchmark_failed(format!(
                "runtime returned HTTP {}: {}",
                status.as_u16(),
                body_snippet(&body)
            )));
        }

        consume_generate_stream(response.bytes_stream().boxed(), started).await
    }
}

/// One NDJSON object from the generation stream.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

/// Consume the token stream and reduce it to a [`BenchmarkResult`].
pub(crate) async fn consume_generate_stream<S, E>(
    mut stream: S,
    started: Instant,
) -> Result<BenchmarkResult, InstallError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut decoder = NdjsonDecoder::new();
    let mut full_text = String::new();
    let mut first_token_ms: Option<f64> = None;
    let mut whitespace_tokens: u64 = 0;
    let mut eval_count: Option<u64> = None;

    let mut handle_line = |line: &str,
                           full_text: &mut String,
                           first_token_ms: &mut Option<f64>,
                           whitespace_tokens: &mut u64,
                           eval_count: &mut Option<u64>|
     -> Result<(), InstallError> {
        let Ok(chunk) = serde_json::from_str::<GenerateChunk>(line) else {
            return Ok(());
        };
        if let Some(error) = chunk.error.filter(|e| !e.trim().is_empty()) {
            return Err(InstallError::ollama_benchmark_failed(error));
        }
        if !chunk.response.is_empty() {
            if first_token_ms.is_none() && !chunk.response.trim().is_empty() {
                *first_token_ms = Some(started.elapsed().as_secs_f64() * 1000.0);
            }
            *whitespace_tokens += chunk.response.split_whitespace().count() as u64;
            full_text.push_str(&chunk.response);
        }
        if chunk.eval_count.is_some() {
            *eval_count = chunk.eval_count;
        }
        Ok(())
    };

    while let Some(item) = stream.next().await {
        let bytes = item.map_err(|e| {
            InstallError::ollama_benchmark_failed(format!("reading generation stream: {e}"))
        })?;
        decoder.feed(&bytes);
        while let Some(line) = decoder.next_line() {
            handle_line(
                &line,
                &mut full_text,
                &mut first_token_ms,
                &mut whitespace_tokens,
                &mut eval_count,
            )?;
        }
    }
    if let Some(line) = decoder.finish() {
        handle_line(
            &line,
            &mut full_text,
            &mut first_token_ms,
            &mut whitespace_tokens,
            &mut eval_count,
        )?;
    }

    if full_text.is_empty() {
        return Err(InstallError::benchmark_failed("model produced no output"));
    }

    let elapsed = started.elapsed().as_secs_f64();
    // The runtime's own count is authoritative; whitespace splitting is
    // the fallback when it never arrives.
    let token_count = eval_count.unwrap_or(whitespace_tokens);
    #[allow(clippy::cast_precision_loss)]
    let tokens_per_second = if elapsed > 0.0 {
        token_count as f64 / elapsed
    } else {
        0.0
    };
    let passed = full_text.to_lowercase().contains(&BENCH_MARKER.to_lowercase());

    debug!(token_count, elapsed_s = elapsed, passed, "benchmark stream consumed");

    Ok(BenchmarkResult {
        tokens_per_second,
        first_token_ms: first_token_ms.unwrap_or(0.0),
        passed,
    })
}

/// Run a probe future under the benchmark deadline.
pub(crate) async fn with_deadline<F, T>(
    deadline: Duration,
    fut: F,
) -> Result<T, InstallError>
where
    F: Future<Output = Result<T, InstallError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(InstallError::benchmark_timeout(deadline.as_secs())),
    }
}

#[async_trait]
impl BenchmarkPort for OllamaBenchmark {
    async fn benchmark(&self, model_name: &str) -> Result<BenchmarkResult, InstallError> {
        let result =
            with_deadline(self.config.benchmark_deadline, self.probe(model_name)).await?;
        info!(
            model_name,
            tokens_per_second = result.tokens_per_second,
            passed = result.passed,
            "benchmark complete"
        );
        Ok(result)
    }
}
