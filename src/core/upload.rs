use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use crate::core::client::ApiClient;
use crate::domain::ports::{Notice, Notifier, Outcome, ProgressObserver};
use crate::utils::error::{FolioError, Result};

/// Multipart field the backend reads the file from.
pub const UPLOAD_FIELD: &str = "image";
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            mime: guess_mime(&file_name).to_string(),
            file_name,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::from_bytes(file_name, bytes))
    }
}

pub fn guess_mime(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// `floor(sent / total * 100)`, clamped to 100. An empty file is complete.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (sent.min(total) * 100 / total) as u8
}

/// Turns byte counts into percentage events that never go backwards while
/// the upload is alive.
struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last: AtomicU8,
    observer: Arc<dyn ProgressObserver>,
}

impl ProgressTracker {
    fn new(total: u64, observer: Arc<dyn ProgressObserver>) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            last: AtomicU8::new(0),
            observer,
        }
    }

    fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::AcqRel) + bytes;
        let pct = percent(sent, self.total);
        if self.last.fetch_max(pct, Ordering::AcqRel) < pct {
            self.observer.on_progress(pct);
        }
    }

    fn finish(&self) {
        if self.last.swap(100, Ordering::AcqRel) < 100 {
            self.observer.on_progress(100);
        }
    }

    fn reset(&self) {
        self.last.store(0, Ordering::Release);
        self.observer.on_progress(0);
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

/// Guard against a second upload starting while one is pending. One slot
/// per managing component; clones share the same slot.
#[derive(Debug, Default, Clone)]
pub struct UploadSlot {
    busy: Arc<AtomicBool>,
}

impl UploadSlot {
    pub fn try_acquire(&self) -> Result<UploadGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FolioError::UploadInProgress)?;
        Ok(UploadGuard {
            busy: self.busy.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Frees the slot when dropped, whatever way the upload ended.
#[derive(Debug)]
pub struct UploadGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct Uploader {
    client: ApiClient,
    chunk_size: usize,
}

impl Uploader {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// `POST /upload` with the file under [`UPLOAD_FIELD`] and return the
    /// hosted URL. The observer sees non-decreasing percentages ending in
    /// 100 on success, and a reset to 0 on failure.
    pub async fn upload(&self, file: UploadFile, observer: Arc<dyn ProgressObserver>) -> Result<String> {
        let total = file.bytes.len() as u64;
        let tracker = Arc::new(ProgressTracker::new(total, observer));
        tracing::debug!(
            "Uploading {} ({} bytes, {})",
            file.file_name,
            total,
            file.mime
        );

        let chunks: Vec<Vec<u8>> = file
            .bytes
            .chunks(self.chunk_size)
            .map(<[u8]>::to_vec)
            .collect();
        let counter = tracker.clone();
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            counter.advance(chunk.len() as u64);
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let outcome = self
            .client
            .post_multipart::<UploadResponse>("upload", form)
            .await
            .and_then(|response| {
                response
                    .and_then(|r| r.url)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| FolioError::MissingField {
                        field: "url".to_string(),
                    })
            });

        match outcome {
            Ok(url) => {
                tracker.finish();
                tracing::info!("Upload complete: {}", url);
                Ok(url)
            }
            Err(e) => {
                tracker.reset();
                Err(e)
            }
        }
    }

    /// Upload while holding `slot`, mirroring progress into `notifier` as a
    /// status line that ends in a success or failure notice.
    pub async fn upload_tracked(
        &self,
        slot: &UploadSlot,
        file: UploadFile,
        notifier: Arc<dyn Notifier>,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<String> {
        let _guard = slot.try_acquire()?;
        notifier.notify(Notice::new("Starting upload", Outcome::Pending));

        let status = notifier.clone();
        let forward: Arc<dyn ProgressObserver> = Arc::new(move |pct: u8| {
            status.notify(Notice::new("Uploading", Outcome::Progress(pct)));
            if let Some(observer) = &observer {
                observer.on_progress(pct);
            }
        });

        match self.upload(file, forward).await {
            Ok(url) => {
                notifier.notify(Notice::new("File uploaded", Outcome::Success));
                Ok(url)
            }
            Err(e) => {
                notifier.notify(Notice::new(
                    "Upload failed",
                    Outcome::Failure(e.user_friendly_message()),
                ));
                Err(e)
            }
        }
    }
}
