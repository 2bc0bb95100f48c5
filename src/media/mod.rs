//! Media Module
//!
//! Post attachments are hosted by an external media service; this module
//! defines the contract the rest of the backend talks to and an HTTP
//! implementation of it.
//!
//! The media host's endpoint and API key are injected at construction.
//! When no media host is configured the server runs with
//! `DisabledMediaStore`, and uploads fail with a server error.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::error::ApiError;

/// Errors from the media host
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("media host not configured")]
    NotConfigured,

    /// Upload refused (used by test doubles to inject faults)
    #[error("upload rejected: {0}")]
    Rejected(String),
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

/// A hosted media asset
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Public URL of the hosted file
    pub url: String,
    /// Host-side identifier, needed to delete the asset later
    pub public_id: String,
    /// MIME type of the uploaded file
    pub content_type: String,
}

/// Contract for the external media host
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<MediaAsset, MediaError>;
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// HTTP media store talking to a cloud media host
pub struct HttpMediaStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMediaStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<MediaAsset, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("upload")
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response: UploadResponse = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(MediaAsset {
            url: response.secure_url,
            public_id: response.public_id,
            content_type: content_type.to_string(),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        self.client
            .delete(format!("{}/media/{}", self.base_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Placeholder store used when no media host is configured
pub struct DisabledMediaStore;

#[async_trait]
impl MediaStore for DisabledMediaStore {
    async fn upload(&self, _bytes: Vec<u8>, _content_type: &str) -> Result<MediaAsset, MediaError> {
        Err(MediaError::NotConfigured)
    }

    async fn delete(&self, _public_id: &str) -> Result<(), MediaError> {
        Err(MediaError::NotConfigured)
    }
}
