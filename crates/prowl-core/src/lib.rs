//! Core domain layer for the Prowl model install pipeline.
//!
//! This crate holds the pure data types shared by every stage of the
//! pipeline (catalog lookup, quantization selection, download, runtime
//! registration, benchmark), the typed error taxonomy, and the port
//! traits the install orchestrator consumes. It performs no I/O.

pub mod install;
pub mod ndjson;
pub mod paths;
pub mod ports;
pub mod quant;

// Re-export commonly used types for convenience
pub use install::{
    BenchmarkResult, CatalogEntry, CatalogFile, InstallError, InstallPhase, InstallResult,
    ProgressEvent,
};
pub use ndjson::NdjsonDecoder;
pub use paths::{
    DEFAULT_MODELS_DIR_RELATIVE, PathError, default_models_root, model_dir, model_file_path,
    modelfiles_dir, resolve_models_root, sanitize_component,
};
pub use ports::{BenchmarkPort, CatalogPort, DownloadPort, ProgressSink, RegistrarPort, SearchOptions};
pub use quant::QuantTag;
