//! URL construction for the Hugging Face Hub API.

use url::Url;

use crate::error::HfResult;

/// Build the model-search URL.
///
/// Results are sorted by download count and optionally restricted to
/// repositories tagged with GGUF artifacts.
pub fn build_search_url(
    base_url: &str,
    query: &str,
    limit: u32,
    filter_gguf: bool,
) -> HfResult<Url> {
    let limit = limit.max(1);
    let mut raw = format!(
        "{}?search={}&sort=downloads&limit={}",
        base_url,
        urlencoding::encode(query),
        limit
    );
    if filter_gguf {
        raw.push_str("&filter=gguf");
    }
    Ok(Url::parse(&raw)?)
}

/// Build the model-detail URL for a repository id like `owner/name`.
pub fn build_model_url(base_url: &str, repo_id: &str) -> HfResult<Url> {
    Ok(Url::parse(&format!("{base_url}/{repo_id}"))?)
}

/// Build the direct download URL for a file in a repository.
pub fn build_download_url(repo_id: &str, filename: &str) -> String {
    format!("https://huggingface.co/{repo_id}/resolve/main/{filename}")
}
