//! Earth Engine REST client.
//!
//! A download is a two-step exchange:
//! 1. `POST v1/projects/{project}/thumbnails` registers the expression and
//!    export parameters and returns a resource name
//! 2. `GET v1/{name}:getPixels` streams the zipped per-band GeoTIFFs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::archive::BandArchive;
use crate::auth::{StaticToken, TokenProvider};
use crate::error::{EarthEngineError, Result};
use crate::expression::Image;

pub const DEFAULT_API_URL: &str = "https://earthengine.googleapis.com";

/// File format yielding one GeoTIFF per band inside a zip.
pub const PER_BAND_FORMAT: &str = "ZIPPED_GEO_TIFF_PER_BAND";

/// Configuration for the REST client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, without the version segment
    pub api_url: String,
    /// Cloud project the requests are billed to
    pub project: String,
    /// Fixed OAuth2 bearer token, used when no [`TokenProvider`] is given
    pub access_token: Option<String>,
    /// HTTP request timeout
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Parent directory for extracted downloads (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            project: "earthengine-legacy".to_string(),
            access_token: None,
            request_timeout: Duration::from_secs(600), // 10 minutes
            connect_timeout: Duration::from_secs(30),
            temp_dir: None,
        }
    }
}

/// Export parameters of one download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Bands to export; each becomes `<file_prefix>.<band>.tif`
    pub bands: Vec<String>,
    /// Ground resolution in meters per pixel
    pub scale: f64,
    pub crs: String,
    pub file_prefix: String,
}

impl ExportRequest {
    /// Web Mercator export named `image`.
    pub fn new(bands: Vec<String>, scale: f64) -> Self {
        Self {
            bands,
            scale,
            crs: "EPSG:3857".to_string(),
            file_prefix: "image".to_string(),
        }
    }
}

/// Source of downloaded per-band rasters.
#[async_trait]
pub trait ImageArchive: Send + Sync {
    /// Evaluate `image` remotely and extract the exported bands locally.
    async fn download_bands(&self, image: &Image, request: &ExportRequest) -> Result<BandArchive>;
}

#[derive(Debug, Deserialize)]
struct ThumbnailResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct EarthEngineClient {
    client: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl EarthEngineClient {
    /// Client authenticating with `config.access_token`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let tokens = Arc::new(StaticToken(config.access_token.clone()));
        Self::with_token_provider(config, tokens)
    }

    /// Client asking `tokens` for a bearer token before every request.
    pub fn with_token_provider(
        config: ClientConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        if config.project.trim().is_empty() {
            return Err(EarthEngineError::InvalidConfig(
                "project must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL registering a new download.
    pub fn thumbnails_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/thumbnails",
            self.config.api_url.trim_end_matches('/'),
            self.config.project
        )
    }

    /// URL fetching the pixels of a registered download.
    pub fn pixels_url(&self, name: &str) -> String {
        format!(
            "{}/v1/{}:getPixels",
            self.config.api_url.trim_end_matches('/'),
            name
        )
    }

    /// Request body registering `image` for download.
    pub fn download_body(image: &Image, request: &ExportRequest) -> Value {
        let exported = image.reproject(&request.crs, request.scale);
        json!({
            "expression": exported.0.to_expression(),
            "fileFormat": PER_BAND_FORMAT,
            "bandIds": request.bands,
            "filenamePrefix": request.file_prefix,
        })
    }

    /// Attach the current bearer token, if any.
    pub async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.tokens.access_token().await? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Register a download and return its resource name.
    pub async fn create_download(&self, image: &Image, request: &ExportRequest) -> Result<String> {
        let body = Self::download_body(image, request);
        let builder = self
            .authorize(self.client.post(self.thumbnails_url()).json(&body))
            .await?;

        let response = check_status(builder.send().await?).await?;
        let thumbnail: ThumbnailResponse = response
            .json()
            .await
            .map_err(|e| EarthEngineError::InvalidResponse(e.to_string()))?;

        debug!(name = %thumbnail.name, "Registered download");
        Ok(thumbnail.name)
    }

    /// Fetch the zipped rasters of a registered download.
    pub async fn fetch_pixels(&self, name: &str) -> Result<Bytes> {
        let builder = self.authorize(self.client.get(self.pixels_url(name))).await?;

        let response = check_status(builder.send().await?).await?;
        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl ImageArchive for EarthEngineClient {
    #[instrument(skip(self, image), fields(bands = ?request.bands, scale = request.scale))]
    async fn download_bands(&self, image: &Image, request: &ExportRequest) -> Result<BandArchive> {
        let name = self.create_download(image, request).await?;
        let data = self.fetch_pixels(&name).await?;

        info!(bytes = data.len(), "Downloaded band archive");

        BandArchive::extract(&data, &request.file_prefix, self.config.temp_dir.as_deref())
    }
}

/// Turn a non-success response into [`EarthEngineError::Api`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(text);

    Err(EarthEngineError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = EarthEngineClient::new(ClientConfig {
            api_url: "https://ee.example.com/".to_string(),
            project: "my-project".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.thumbnails_url(),
            "https://ee.example.com/v1/projects/my-project/thumbnails"
        );
        assert_eq!(
            client.pixels_url("projects/my-project/thumbnails/abc"),
            "https://ee.example.com/v1/projects/my-project/thumbnails/abc:getPixels"
        );
    }

    #[test]
    fn test_empty_project_rejected() {
        let result = EarthEngineClient::new(ClientConfig {
            project: " ".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(EarthEngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_error_envelope_parse() {
        let json = r#"{"error": {"code": 400, "message": "Collection not found", "status": "INVALID_ARGUMENT"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.message, "Collection not found");
    }
}
