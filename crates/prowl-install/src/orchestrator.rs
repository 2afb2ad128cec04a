//! Install orchestrator: sequences the pipeline phases and reduces
//! every failure into a non-throwing [`InstallResult`].
//!
//! The orchestrator is the only component whose contract guarantees no
//! error escapes: collaborators return typed errors, and the terminal
//! reduction here turns them into an `error` progress event plus a
//! failed result. Callers can therefore drive an install from UI code
//! without their own catch-all.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use prowl_core::{
    BenchmarkPort, CatalogPort, DownloadPort, InstallError, InstallPhase, InstallResult,
    ProgressEvent, ProgressSink, RegistrarPort, model_file_path, modelfiles_dir,
    resolve_models_root,
};

use crate::download::Downloader;
use crate::ollama::{OllamaBenchmark, OllamaConfig, OllamaRegistrar};
use crate::selector::select_variant;

/// One install request.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Catalog repository id (`owner/name`).
    pub repo_id: String,
    /// Human-facing name the runtime tag is derived from.
    pub display_name: String,
    /// Memory budget for quantization selection.
    pub available_ram_gb: f64,
}

/// Sequences catalog lookup, selection, download, registration and the
/// benchmark probe.
pub struct Installer {
    catalog: Arc<dyn CatalogPort>,
    downloader: Arc<dyn DownloadPort>,
    registrar: Arc<dyn RegistrarPort>,
    benchmark: Arc<dyn BenchmarkPort>,
    models_root: PathBuf,
    sink: ProgressSink,
    cancel: CancellationToken,
}

impl Installer {
    /// Assemble an installer from explicit collaborators.
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        downloader: Arc<dyn DownloadPort>,
        registrar: Arc<dyn RegistrarPort>,
        benchmark: Arc<dyn BenchmarkPort>,
        models_root: PathBuf,
        sink: ProgressSink,
    ) -> Self {
        Self {
            catalog,
            downloader,
            registrar,
            benchmark,
            models_root,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Assemble an installer with the production adapters: the Hub
    /// catalog client, the reqwest downloader and a local Ollama
    /// runtime. The models root honors `PROWL_MODELS_DIR`.
    pub fn with_defaults(sink: ProgressSink) -> Result<Self, InstallError> {
        let models_root = resolve_models_root(None)
            .map_err(|e| InstallError::install_failed(e.to_string()))?;
        let catalog = prowl_hf::DefaultCatalogClient::new(prowl_hf::HfClientConfig::default())
            .map_err(|e| InstallError::network(e.to_string()))?;
        let downloader = Downloader::new()?;
        let ollama_config = OllamaConfig::new(modelfiles_dir(&models_root));
        let registrar = OllamaRegistrar::new(ollama_config.clone())?;
        let benchmark = OllamaBenchmark::new(ollama_config)?;

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(downloader),
            Arc::new(registrar),
            Arc::new(benchmark),
            models_root,
            sink,
        ))
    }

    /// Token that aborts an in-flight download when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one install end to end.
    ///
    /// Never returns an error: failures become a terminal `error`
    /// progress event and a failed [`InstallResult`].
    pub async fn install(&self, request: &InstallRequest) -> InstallResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(error) => {
                warn!(
                    repo_id = %request.repo_id,
                    code = error.code(),
                    %error,
                    "install failed"
                );
                (self.sink)(ProgressEvent::for_phase(
                    InstallPhase::Error,
                    error.display_with_code(),
                ));
                InstallResult::failed(&error)
            }
        }
    }

    async fn run(&self, request: &InstallRequest) -> Result<InstallResult, InstallError> {
        (self.sink)(ProgressEvent::for_phase(
            InstallPhase::FetchingMetadata,
            format!("looking up {}", request.repo_id),
        ));

        let entry = self.catalog.fetch_details(&request.repo_id).await?;
        let file = select_variant(&entry.files, request.available_ram_gb)?;
        info!(
            repo_id = %request.repo_id,
            filename = %file.filename,
            quant = %file.quant,
            "selected file for install"
        );

        let dest = model_file_path(&self.models_root, &request.repo_id, &file.filename);
        let local_path = self
            .downloader
            .download(&file, &dest, &self.sink, &self.cancel)
            .await?;

        (self.sink)(ProgressEvent::for_phase(
            InstallPhase::Registering,
            format!("registering {}", request.display_name),
        ));
        let runtime_model_name = self
            .registrar
            .register(&local_path, &request.display_name)
            .await?;

        (self.sink)(ProgressEvent::for_phase(
            InstallPhase::Benchmarking,
            format!("benchmarking {runtime_model_name}"),
        ));
        let benchmark = self.benchmark.benchmark(&runtime_model_name).await?;

        (self.sink)(ProgressEvent::for_phase(
            InstallPhase::Complete,
            format!("{runtime_model_name} installed"),
        ));
        info!(
            repo_id = %request.repo_id,
            runtime_model_name = %runtime_model_name,
            "install complete"
        );
        Ok(InstallResult::completed(
            runtime_model_name,
            local_path,
            benchmark,
        ))
    }
}
