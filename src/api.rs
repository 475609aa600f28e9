//! HTTP client for the detection backend.

use crate::error::ApiError;
use crate::model::{ActionResponse, HistoryEntry, HistoryResponse, LogId, PredictResponse, Stats};
use crate::render::ImageFetcher;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Multipart field the backend reads the uploaded image from.
pub const IMAGE_FIELD: &str = "image";

/// Path of the annotated image for a logged detection, with a cache-busting timestamp.
pub fn image_url(id: &LogId, t: u128) -> String {
    format!("/image/{id}?t={t}")
}

/// Path of the PDF report for a logged detection.
pub fn pdf_url(id: &LogId) -> String {
    format!("/export-pdf/{id}")
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

pub struct ApiClient {
    base: Url,
    http: Client,
    jar: Arc<Jar>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|_| ApiError::Url(base_url.to_string()))?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .user_agent(concat!("durianleaf/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self { base, http, jar })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves a backend path (or absolute URL) against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|_| ApiError::Url(path.to_string()))
    }

    /// Cookies the backend set for this client, as a `Cookie` header value.
    pub fn session_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.base)
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }

    /// Re-installs cookies previously returned by [`ApiClient::session_cookies`].
    pub fn restore_session(&self, cookies: &str) {
        for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &self.base);
        }
    }

    /// Uploads an image file for inference.
    ///
    /// Backend rejections (`success: false`, usually with a 4xx/5xx status) are returned as a
    /// decoded response, not as an error.
    pub async fn predict(&self, path: &Path) -> Result<PredictResponse, ApiError> {
        let url = self.resolve("/predict")?;
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(path))
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        let form = Form::new().part(IMAGE_FIELD, part);

        tracing::debug!(%url, file = %path.display(), "uploading image");
        let resp = self
            .http
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        read_json(&url, resp).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/api/stats").await
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let res: HistoryResponse = self.get_json("/api/history").await?;
        Ok(res.history)
    }

    pub async fn clear_history(&self) -> Result<ActionResponse, ApiError> {
        let url = self.resolve("/api/clear-history")?;
        let resp = self
            .http
            .post(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        read_json(&url, resp).await
    }

    /// Downloads the PDF report of a logged detection.
    pub async fn export_pdf(&self, id: &LogId) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&pdf_url(id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.resolve(path)?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        read_json(&url, resp).await
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(path)?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

impl ImageFetcher for ApiClient {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(url).await
    }
}

async fn read_json<T: DeserializeOwned>(url: &Url, resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: format!("{e} (status {status})"),
    })
}
