//! Install pipeline domain types: catalog records, progress events,
//! results, and the typed error taxonomy.

mod error;
mod types;

pub use error::InstallError;
pub use types::{
    BenchmarkResult, CatalogEntry, CatalogFile, InstallPhase, InstallResult, ProgressEvent,
};
