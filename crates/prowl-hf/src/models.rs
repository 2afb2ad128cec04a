//! Raw response shapes from the Hugging Face Hub API.
//!
//! These types mirror the wire format; the client converts them into the
//! domain catalog types.

use serde::Deserialize;

/// One entry from the model-search listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawModelSummary {
    pub id: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
}

/// The model-detail response; only the file listing matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct RawModelDetail {
    pub id: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub siblings: Vec<RawSibling>,
}

/// One file in a repository.
///
/// The API reports sizes inconsistently: sometimes directly on the
/// sibling, sometimes only inside the LFS pointer metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSibling {
    pub rfilename: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub lfs: Option<RawLfs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLfs {
    #[serde(default)]
    pub size: Option<u64>,
}

impl RawSibling {
    /// Best available size for the file, preferring the direct field
    /// over the LFS metadata. Zero when the API reports neither.
    pub fn effective_size(&self) -> u64 {
        self.size
            .or_else(|| self.lfs.as_ref().and_then(|l| l.size))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sibling_prefers_direct_size() {
        let sibling: RawSibling = serde_json::from_value(json!({
            "rfilename": "model.Q4_K_M.gguf",
            "size": 100,
            "lfs": {"size": 200}
        }))
        .unwrap();
        assert_eq!(sibling.effective_size(), 100);
    }

    #[test]
    fn test_sibling_falls_back_to_lfs_size() {
        let sibling: RawSibling = serde_json::from_value(json!({
            "rfilename": "model.Q4_K_M.gguf",
            "lfs": {"size": 200}
        }))
        .unwrap();
        assert_eq!(sibling.effective_size(), 200);
    }

    #[test]
    fn test_sibling_without_any_size() {
        let sibling: RawSibling = serde_json::from_value(json!({
            "rfilename": "README.md"
        }))
        .unwrap();
        assert_eq!(sibling.effective_size(), 0);
    }

    #[test]
    fn test_detail_parses_missing_optional_fields() {
        let detail: RawModelDetail = serde_json::from_value(json!({
            "id": "owner/repo"
        }))
        .unwrap();
        assert_eq!(detail.id, "owner/repo");
        assert_eq!(detail.downloads, 0);
        assert!(detail.siblings.is_empty());
    }
}
