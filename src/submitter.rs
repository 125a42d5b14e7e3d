use crate::download::{Blob, DownloadError, Downloader};
use crate::models::{ErrorBody, SaveResponse, non_empty};
use crate::page::Page;
use crate::status::{
    SAVE_OPERATION_FAILED, SAVED_AND_DOWNLOADED, SAVED_DOWNLOAD_FAILED, SAVING, StatusClass,
};
use reqwest::header::HeaderValue;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

pub const CORRECTED_SUFFIX: &str = "_corrected.txt";

#[derive(Error, Debug)]
pub enum SubmitError {
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx reply whose payload reported `success: false`.
    #[error("{0}")]
    Application(String),

    /// Saved upstream, but the local copy could not be produced.
    #[error("{0}")]
    Download(#[from] DownloadError),
}

impl SubmitError {
    pub fn status_text(&self) -> String {
        match self {
            SubmitError::Download(_) => SAVED_DOWNLOAD_FAILED.to_string(),
            other => format!("Error: {}", other),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            SubmitError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `page-007.png` -> `page-007_corrected.txt`; names without an extension
/// (or with nothing before the last dot) are kept whole.
pub fn derive_filename(image_name: &str) -> String {
    let base = match image_name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => image_name,
    };
    format!("{}{}", base, CORRECTED_SUFFIX)
}

pub struct ContributionSubmitter {
    http_client: Arc<reqwest::Client>,
    save_url: String,
    page: Page,
    downloader: Arc<dyn Downloader>,
}

impl ContributionSubmitter {
    pub fn new(
        http_client: Arc<reqwest::Client>,
        save_url: String,
        page: Page,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        Self {
            http_client,
            save_url,
            page,
            downloader,
        }
    }

    pub fn save_url(&self) -> &str {
        &self.save_url
    }

    /// Runs one submission and reflects the outcome on the status display.
    pub async fn trigger(&self) -> Result<PathBuf, SubmitError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("contribution", request_id = %request_id);
        let result = self.submit(&request_id).instrument(span).await;

        let status = &self.page.status;
        match &result {
            Ok(path) => {
                info!("contribution saved, downloaded to {}", path.display());
                status.set(SAVED_AND_DOWNLOADED, StatusClass::Success);
            }
            Err(e) => {
                error!("contribution failed (http status {:?}): {:?}", e.http_status(), e);
                status.set(e.status_text(), StatusClass::Error);
            }
        }
        result
    }

    async fn submit(&self, request_id: &str) -> Result<PathBuf, SubmitError> {
        self.page.status.set(SAVING, StatusClass::Neutral);

        let form = self.page.read_form();
        let filename = derive_filename(&form.image_name);
        debug!(
            "submitting image={} input_len={} corrected_len={}",
            form.image_name,
            form.input_text.len(),
            form.corrected_text.len()
        );

        let mut request = self.http_client.post(&self.save_url);
        if let Ok(val) = HeaderValue::from_str(request_id) {
            request = request.header("x-request-id", val);
        }

        info!("Posting contribution to: {}", self.save_url);
        let response = request
            .multipart(form.to_multipart())
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body counts the same as an unparseable one.
            let body = response.text().await.ok();
            debug!("save endpoint replied {}: {:?}", status, body);
            let message = body
                .and_then(|b| serde_json::from_str::<ErrorBody>(&b).ok())
                .and_then(|b| non_empty(b.message))
                .unwrap_or_else(|| format!("Save failed with status {}", status.as_u16()));
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        debug!("save endpoint replied {}: {}", status, body);

        let payload: SaveResponse =
            serde_json::from_str(&body).map_err(|e| SubmitError::Server {
                status: status.as_u16(),
                message: format!("Invalid response body: {}", e),
            })?;

        if !payload.success {
            return Err(SubmitError::Application(
                non_empty(payload.message).unwrap_or_else(|| SAVE_OPERATION_FAILED.to_string()),
            ));
        }

        let blob = Blob::text(&form.corrected_text);
        Ok(self.downloader.download(&blob, &filename)?)
    }
}
