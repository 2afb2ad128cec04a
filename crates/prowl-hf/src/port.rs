//! `CatalogPort` implementation for the catalog client.

use async_trait::async_trait;
use prowl_core::{CatalogEntry, CatalogPort, InstallError, SearchOptions};

use crate::client::HfCatalogClient;
use crate::http::HttpBackend;

#[async_trait]
impl<B: HttpBackend> CatalogPort for HfCatalogClient<B> {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<CatalogEntry>, InstallError> {
        let entries = self
            .search_catalog(query, options.limit, options.filter_gguf)
            .await?;
        Ok(entries)
    }

    async fn fetch_details(&self, repo_id: &str) -> Result<CatalogEntry, InstallError> {
        let entry = self.fetch_entry(repo_id, true).await?;
        Ok(entry)
    }
}
