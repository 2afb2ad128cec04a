//! HTTP fetch backend for the download manager.
//!
//! The backend deals only in transport: issue the (possibly ranged) GET,
//! classify the status, expose the headers and the body stream. Resume
//! bookkeeping and file I/O live in the manager.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::TryStreamExt;
use futures_util::stream::BoxStream;

use prowl_core::InstallError;

/// Body chunk stream; transport errors are surfaced as `io::Error` so
/// test backends can fabricate them without a live HTTP client.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// How the server answered a (possibly ranged) GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    /// 200: full content from byte zero; any local partial is stale.
    Full,
    /// 206: partial content continuing from the requested offset.
    Partial,
    /// 416: the requested range starts at or past the end; the local
    /// file is already complete.
    NotSatisfiable,
}

/// Headers and body of a successful fetch.
pub struct FetchResponse {
    /// Status classification.
    pub status: RangeStatus,
    /// `Content-Length` header when present.
    pub content_length: Option<u64>,
    /// Total size parsed from the `Content-Range` header when present.
    pub content_range_total: Option<u64>,
    /// Chunked body.
    pub body: ByteStream,
}

/// Transport seam for the download manager.
#[async_trait]
pub trait FetchBackend: Send + Sync {
    /// Issue a GET for `url`, with a `Range: bytes=<start>-` header when
    /// `range_start` is set.
    async fn fetch(&self, url: &str, range_start: Option<u64>)
    -> Result<FetchResponse, InstallError>;
}

/// Parse the total size out of a `Content-Range` header value.
///
/// Handles both `bytes 100-199/4000` and the `bytes */4000` form a 416
/// carries. A literal `*` total (unknown) yields `None`.
pub(crate) fn parse_content_range_total(value: &str) -> Option<u64> {
    let total = value.rsplit('/').next()?.trim();
    total.parse().ok()
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production fetch backend over reqwest.
pub struct ReqwestFetchBackend {
    client: reqwest::Client,
}

impl ReqwestFetchBackend {
    /// Create a backend with a long-transfer-friendly client: no overall
    /// request timeout (multi-GB transfers), but a connect timeout so a
    /// dead host fails fast.
    pub fn new() -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| InstallError::network(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchBackend for ReqwestFetchBackend {
    async fn fetch(
        &self,
        url: &str,
        range_start: Option<u64>,
    ) -> Result<FetchResponse, InstallError> {
        let mut request = self.client.get(url);
        if let Some(start) = range_start {
            request = request.header(reqwest::header::RANGE, format!("bytes={start}-"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| InstallError::network(format!("request to {url} failed: {e}")))?;

        let status = match response.status().as_u16() {
            200 => RangeStatus::Full,
            206 => RangeStatus::Partial,
            416 => RangeStatus::NotSatisfiable,
            other => {
                return Err(InstallError::download_failed(format!(
                    "unexpected HTTP status {other} from {url}"
                )));
            }
        };

        let content_length = response.content_length();
        let content_range_total = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        let body: ByteStream = Box::pin(response.bytes_stream().map_err(io::Error::other));

        Ok(FetchResponse {
            status,
            content_length,
            content_range_total,
            body,
        })
    }
}
