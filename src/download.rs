use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub const TEXT_PLAIN_UTF8: &str = "text/plain;charset=utf-8";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid download filename: {0}")]
    InvalidFilename(String),
}

/// In-memory payload handed to the user as a file.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

impl Blob {
    pub fn text(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            media_type: TEXT_PLAIN_UTF8,
        }
    }
}

/// Temporary reference to a staged blob. The staging file is removed when the
/// url is revoked or dropped, whichever comes first.
#[derive(Debug)]
pub struct ObjectUrl {
    href: String,
    staged: NamedTempFile,
}

impl ObjectUrl {
    pub fn create(blob: &Blob, dir: &Path) -> Result<Self, DownloadError> {
        let mut staged = tempfile::Builder::new()
            .prefix(".blob-")
            .suffix(".part")
            .tempfile_in(dir)?;
        staged.write_all(&blob.bytes)?;
        staged.flush()?;
        let href = format!("blob:{}", Uuid::new_v4());
        debug!("created object url {} ({}, {} bytes)", href, blob.media_type, blob.bytes.len());
        Ok(Self { href, staged })
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn path(&self) -> &Path {
        self.staged.path()
    }

    pub fn revoke(self) -> Result<(), DownloadError> {
        let href = self.href;
        self.staged.close()?;
        debug!("revoked object url {}", href);
        Ok(())
    }
}

pub trait Downloader: Send + Sync {
    /// Offers `blob` to the user under `filename` and returns where it landed.
    fn download(&self, blob: &Blob, filename: &str) -> Result<PathBuf, DownloadError>;
}

#[derive(Debug, Clone)]
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for FileDownloader {
    fn download(&self, blob: &Blob, filename: &str) -> Result<PathBuf, DownloadError> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(DownloadError::InvalidFilename(filename.to_string()));
        }

        let url = ObjectUrl::create(blob, &self.dir)?;
        let target = self.dir.join(filename);
        debug!("saving {} as {}", url.href(), target.display());
        // `url` drops on the error path too, which removes the staged blob.
        std::fs::copy(url.path(), &target)?;
        url.revoke()?;

        Ok(target)
    }
}
