//! Resumable, range-aware download manager.
//!
//! One transfer attempt owns the destination file exclusively. A
//! pre-existing partial file is resumed through an HTTP `Range` request;
//! the interrupted-transfer contract is strict: any write or stream
//! failure deletes the partial file rather than leaving bytes of unknown
//! integrity for a future resume.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use prowl_core::{
    CatalogFile, DownloadPort, InstallError, InstallPhase, ProgressEvent, ProgressSink,
};

mod backend;
mod disk;
mod speed;
mod throttle;

pub use backend::{ByteStream, FetchBackend, FetchResponse, RangeStatus, ReqwestFetchBackend};
pub use disk::{FreeSpaceProbe, check_free_space, system_free_space};
pub use speed::SpeedTracker;
pub use throttle::ProgressThrottle;

/// Download manager implementing [`DownloadPort`].
///
/// Generic over the transport so tests can script responses. Production
/// code uses [`Downloader::new`].
pub struct Downloader<B: FetchBackend> {
    backend: B,
    free_space: FreeSpaceProbe,
    throttle_interval: Duration,
}

impl Downloader<ReqwestFetchBackend> {
    /// Create a downloader over reqwest with OS disk probing.
    pub fn new() -> Result<Self, InstallError> {
        Ok(Self::with_backend(ReqwestFetchBackend::new()?))
    }
}

impl<B: FetchBackend> Downloader<B> {
    /// Create a downloader over a custom transport.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            free_space: Box::new(|path| system_free_space(path)),
            throttle_interval: Duration::from_millis(250),
        }
    }

    /// Replace the free-space probe.
    #[must_use]
    pub fn with_free_space_probe(mut self, probe: FreeSpaceProbe) -> Self {
        self.free_space = probe;
        self
    }

    /// Change the progress debounce interval (default 250ms).
    #[must_use]
    pub const fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    async fn run(
        &self,
        file: &CatalogFile,
        dest: &Path,
        sink: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, InstallError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                InstallError::download_failed(format!("creating {}: {e}", parent.display()))
            })?;
        }

        let existing = match fs::metadata(dest).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                return Err(InstallError::disk_check_failed(format!(
                    "stat {}: {e}",
                    dest.display()
                )));
            }
        };

        if existing > 0 && file.size_bytes > 0 && existing >= file.size_bytes {
            info!(dest = %dest.display(), existing, "file already fully downloaded");
            sink(ProgressEvent::transfer(
                InstallPhase::Downloading,
                existing,
                existing,
                0.0,
                0.0,
                format!("{} already downloaded", file.filename),
            ));
            return Ok(dest.to_path_buf());
        }

        let range_start = (existing > 0).then_some(existing);
        let response = self.backend.fetch(&file.download_url, range_start).await?;

        if response.status == RangeStatus::NotSatisfiable {
            // The server says our local bytes already cover the file.
            debug!(dest = %dest.display(), existing, "range not satisfiable, treating as complete");
            sink(ProgressEvent::transfer(
                InstallPhase::Downloading,
                existing,
                existing,
                0.0,
                0.0,
                format!("{} already downloaded", file.filename),
            ));
            return Ok(dest.to_path_buf());
        }

        let mut offset = existing;
        if response.status == RangeStatus::Full && existing > 0 {
            // Server ignored the range; the partial is stale.
            debug!(dest = %dest.display(), "server sent full content, discarding partial file");
            fs::remove_file(dest).await.map_err(|e| {
                InstallError::download_failed(format!(
                    "removing stale partial {}: {e}",
                    dest.display()
                ))
            })?;
            offset = 0;
        }

        let total = response
            .content_range_total
            .or_else(|| {
                response.content_length.map(|len| {
                    if response.status == RangeStatus::Partial {
                        len + offset
                    } else {
                        len
                    }
                })
            })
            .unwrap_or(file.size_bytes);

        let remaining = total.saturating_sub(offset);
        if remaining == 0 && total > 0 {
            sink(ProgressEvent::transfer(
                InstallPhase::Downloading,
                total,
                total,
                0.0,
                0.0,
                format!("{} already downloaded", file.filename),
            ));
            return Ok(dest.to_path_buf());
        }

        let dest_dir = dest.parent().map_or_else(|| Path::new("."), |p| p);
        check_free_space(&self.free_space, dest_dir, remaining)?;

        sink(ProgressEvent::transfer(
            InstallPhase::Downloading,
            offset,
            total,
            0.0,
            0.0,
            format!("downloading {}", file.filename),
        ));
        let mut throttle = ProgressThrottle::new(self.throttle_interval);
        throttle.mark_forced();

        let resumed = response.status == RangeStatus::Partial && offset > 0;
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dest)
            .await
            .map_err(|e| {
                InstallError::download_failed(format!("opening {}: {e}", dest.display()))
            })?;

        let mut speed = SpeedTracker::new();
        let mut downloaded = offset;
        let mut body = response.body;

        loop {
            let chunk = tokio::select! {
                // Cancellation is checked ahead of the next chunk read.
                biased;
                () = cancel.cancelled() => {
                    drop(out);
                    // A range-resumed transfer keeps its confirmed bytes
                    // for the next attempt; a full transfer has nothing
                    // worth keeping.
                    if !resumed {
                        let _ = fs::remove_file(dest).await;
                    }
                    return Err(InstallError::download_failed("download cancelled"));
                }
                chunk = body.next() => chunk,
            };

            match chunk {
                None => break,
                Some(Err(e)) => {
                    drop(out);
                    let _ = fs::remove_file(dest).await;
                    return Err(InstallError::download_failed(format!("stream error: {e}")));
                }
                Some(Ok(bytes)) => {
                    if let Err(e) = out.write_all(&bytes).await {
                        drop(out);
                        let _ = fs::remove_file(dest).await;
                        return Err(InstallError::download_failed(format!(
                            "writing {}: {e}",
                            dest.display()
                        )));
                    }
                    downloaded += bytes.len() as u64;
                    speed.record(bytes.len() as u64);

                    if throttle.should_emit() {
                        let bps = speed.bytes_per_second();
                        sink(ProgressEvent::transfer(
                            InstallPhase::Downloading,
                            downloaded,
                            total,
                            bps / 1_048_576.0,
                            SpeedTracker::eta_seconds(total.saturating_sub(downloaded), bps),
                            format!("downloading {}", file.filename),
                        ));
                    }
                }
            }
        }

        if let Err(e) = out.flush().await {
            drop(out);
            let _ = fs::remove_file(dest).await;
            return Err(InstallError::download_failed(format!(
                "flushing {}: {e}",
                dest.display()
            )));
        }

        info!(dest = %dest.display(), downloaded, "download complete");
        sink(ProgressEvent::transfer(
            InstallPhase::Downloading,
            downloaded,
            if total > 0 { total } else { downloaded },
            0.0,
            0.0,
            format!("{} download complete", file.filename),
        ));
        Ok(dest.to_path_buf())
    }
}

#[async_trait]
impl<B: FetchBackend> DownloadPort for Downloader<B> {
    async fn download(
        &self,
        file: &CatalogFile,
        dest: &Path,
        sink: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, InstallError> {
        self.run(file, dest, sink, cancel).await
    }
}
