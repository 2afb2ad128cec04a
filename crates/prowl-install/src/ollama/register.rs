//! Model registration against the runtime's `/api/create` endpoint.
//!
//! Registration is manifest-based: a small modelfile naming the local
//! GGUF path plus fixed generation parameters is written to the
//! modelfiles directory (kept for reproducibility) and submitted to the
//! runtime. The runtime acknowledges with a stream of NDJSON status
//! objects; any object carrying a non-empty `error` aborts.

use std::fmt::Display;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::json;
use tracing::{debug, info};

use prowl_core::{InstallError, NdjsonDecoder, QuantTag, RegistrarPort};

use super::{OllamaConfig, body_snippet};

/// Namespace prefix keeping installed names clear of catalog-native tags.
const NAME_PREFIX: &str = "hf-";

/// Registration client for the Ollama runtime.
pub struct OllamaRegistrar {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaRegistrar {
    /// Create a registrar for the configured runtime.
    pub fn new(config: OllamaConfig) -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| InstallError::install_failed(format!("building HTTP client: {e}")))?;
        Ok(Self { config, client })
    }
}

/// Derive the deterministic runtime tag for a model.
///
/// The display name is lowercased with runs of non-alphanumerics
/// collapsed to single hyphens; the quantization tag from the filename
/// is appended as the tag part when recognizable.
pub(crate) fn runtime_model_name(display_name: &str, filename: &str) -> String {
    let mut base = String::new();
    let mut pending_hyphen = false;
    for c in display_name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !base.is_empty() {
                base.push('-');
            }
            pending_hyphen = false;
            base.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    if base.is_empty() {
        base.push_str("model");
    }

    let quant = QuantTag::from_filename(filename);
    if quant.is_unknown() {
        format!("{NAME_PREFIX}{base}")
    } else {
        format!("{NAME_PREFIX}{base}:{}", quant.as_str().to_lowercase())
    }
}

/// Build the manifest text submitted to the runtime.
pub(crate) fn build_modelfile(local_path: &Path) -> String {
    format!(
        "FROM {}\nPARAMETER temperature 0.7\nPARAMETER num_ctx 4096\n",
        local_path.display()
    )
}

/// Check one acknowledgement line for an embedded error.
///
/// Malformed lines are status noise, not failures.
fn check_ack_line(line: &str) -> Result<(), InstallError> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
        return Ok(());
    };
    match value.get("error").and_then(serde_json::Value::as_str) {
        Some(error) if !error.trim().is_empty() => {
            Err(InstallError::ollama_create_failed(error.to_string()))
        }
        _ => Ok(()),
    }
}

/// Consume the creation acknowledgement stream line by line.
pub(crate) async fn consume_create_stream<S, E>(mut stream: S) -> Result<(), InstallError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut decoder = NdjsonDecoder::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            InstallError::ollama_request_failed(format!("reading creation response: {e}"))
        })?;
        decoder.feed(&chunk);
        while let Some(line) = decoder.next_line() {
            check_ack_line(&line)?;
        }
    }
    if let Some(line) = decoder.finish() {
        check_ack_line(&line)?;
    }
    Ok(())
}

#[async_trait]
impl RegistrarPort for OllamaRegistrar {
    async fn register(
        &self,
        local_path: &Path,
        display_name: &str,
    ) -> Result<String, InstallError> {
        let filename = local_path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = runtime_model_name(display_name, &filename);
        let modelfile = build_modelfile(local_path);

        // Keep the manifest on disk so a rejected registration can be
        // inspected and replayed by hand.
        tokio::fs::create_dir_all(&self.config.modelfiles_dir)
            .await
            .map_err(|e| {
                InstallError::install_failed(format!(
                    "creating {}: {e}",
                    self.config.modelfiles_dir.display()
                ))
            })?;
        let manifest_path = self
            .config
            .modelfiles_dir
            .join(format!("{}.modelfile", name.replace(':', "-")));
        tokio::fs::write(&manifest_path, &modelfile)
            .await
            .map_err(|e| {
                InstallError::install_failed(format!(
                    "writing {}: {e}",
                    manifest_path.display()
                ))
            })?;
        debug!(manifest = %manifest_path.display(), name = %name, "wrote registration manifest");

        let url = format!("{}/api/create", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": name, "modelfile": modelfile }))
            .send()
            .await
            .map_err(|e| {
                InstallError::classify_runtime_transport(&e.to_string(), &self.config.base_url)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InstallError::ollama_create_failed(format!(
                "runtime returned HTTP {}: {}",
                status.as_u16(),
                body_snippet(&body)
            )));
        }

        consume_create_stream(response.bytes_stream().boxed()).await?;
        info!(name = %name, "model registered with runtime");
        Ok(name)
    }
}
