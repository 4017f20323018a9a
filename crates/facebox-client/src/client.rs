//! Facebox similarity client.
//!
//! Every operation is a single request/response exchange:
//! - Build the request for an endpoint and an image encoding
//! - Send it through the injected `reqwest::Client`
//! - Reject non-2xx statuses without reading the body
//! - Decode the envelope and unwrap its result list

use std::time::Instant;

use facebox_models::{Envelope, EnvelopePayload, FacesPayload, Similar, SimilarFace, SimilarPayload};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Request};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::config::FaceboxConfig;
use crate::error::{FaceboxError, FaceboxResult};
use crate::metrics::record_request;

/// Results-per-face cap used when the caller passes a limit below 1.
pub const DEFAULT_LIMIT: i32 = 5;

const ACCEPT_JSON: &str = "application/json; charset=utf-8";
const FILE_FIELD: &str = "file";
const FILE_NAME: &str = "image.dat";

/// Limit actually sent to the server.
pub fn effective_limit(limit: i32) -> i32 {
    if limit < 1 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    /// Legacy endpoint, one flat list of matches.
    Similar,
    /// One match list per detected face.
    Similars,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Similar => "/facebox/similar",
            Endpoint::Similars => "/facebox/similars",
        }
    }
}

/// How the image travels to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ImageBody {
    /// Multipart upload of the raw bytes.
    File(Vec<u8>),
    /// Form field `url`; must be absolute.
    Url(String),
    /// Form field `base64`.
    Base64(String),
    /// `id` query parameter on a GET; must not be empty.
    Id(String),
}

// =============================================================================
// Client
// =============================================================================

/// Facebox REST client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FaceboxClient {
    http: Client,
    addr: String,
}

impl FaceboxClient {
    /// Create a client with its own tuned HTTP transport.
    pub fn new(config: FaceboxConfig) -> FaceboxResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("facebox-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(http, config.addr))
    }

    /// Create a client on top of a caller-owned HTTP transport.
    pub fn with_http(http: Client, addr: impl Into<String>) -> Self {
        Self {
            http,
            addr: addr.into(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> FaceboxResult<Self> {
        Self::new(FaceboxConfig::from_env())
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    // =========================================================================
    // Legacy single-list operations
    // =========================================================================

    /// Check the image read from `image` for similar faces.
    #[deprecated(note = "use `similars` to get matches per detected face")]
    pub async fn similar<R>(&self, image: R) -> FaceboxResult<Vec<Similar>>
    where
        R: AsyncRead + Unpin,
    {
        let bytes = read_image(image).await?;
        let request = self.build_request(Endpoint::Similar, ImageBody::File(bytes), None)?;
        self.execute::<SimilarPayload>("similar", request).await
    }

    /// Check the image at `image_url` for similar faces.
    #[deprecated(note = "use `similars_url` to get matches per detected face")]
    pub async fn similar_url(&self, image_url: &str) -> FaceboxResult<Vec<Similar>> {
        let request = self.build_request(
            Endpoint::Similar,
            ImageBody::Url(image_url.to_string()),
            None,
        )?;
        self.execute::<SimilarPayload>("similar_url", request).await
    }

    /// Find faces similar to the gallery entry `id`.
    pub async fn similar_id(&self, id: &str) -> FaceboxResult<Vec<Similar>> {
        let request = self.build_request(Endpoint::Similar, ImageBody::Id(id.to_string()), None)?;
        self.execute::<SimilarPayload>("similar_id", request).await
    }

    /// Check the Base64 encoded image for similar faces.
    #[deprecated(note = "use `similars_base64` to get matches per detected face")]
    pub async fn similar_base64(&self, data: &str) -> FaceboxResult<Vec<Similar>> {
        let request = self.build_request(
            Endpoint::Similar,
            ImageBody::Base64(data.to_string()),
            None,
        )?;
        self.execute::<SimilarPayload>("similar_base64", request).await
    }

    // =========================================================================
    // Per-face operations
    // =========================================================================

    /// Check every face in the image read from `image`, returning at most
    /// `limit` matches per face.
    pub async fn similars<R>(&self, image: R, limit: i32) -> FaceboxResult<Vec<SimilarFace>>
    where
        R: AsyncRead + Unpin,
    {
        let bytes = read_image(image).await?;
        let request =
            self.build_request(Endpoint::Similars, ImageBody::File(bytes), Some(limit))?;
        self.execute::<FacesPayload>("similars", request).await
    }

    /// Check every face in the image at `image_url`.
    pub async fn similars_url(
        &self,
        image_url: &str,
        limit: i32,
    ) -> FaceboxResult<Vec<SimilarFace>> {
        let request = self.build_request(
            Endpoint::Similars,
            ImageBody::Url(image_url.to_string()),
            Some(limit),
        )?;
        self.execute::<FacesPayload>("similars_url", request).await
    }

    /// Check every face in the Base64 encoded image.
    pub async fn similars_base64(&self, data: &str, limit: i32) -> FaceboxResult<Vec<SimilarFace>> {
        let request = self.build_request(
            Endpoint::Similars,
            ImageBody::Base64(data.to_string()),
            Some(limit),
        )?;
        self.execute::<FacesPayload>("similars_base64", request).await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn endpoint_url(&self, endpoint: Endpoint) -> FaceboxResult<Url> {
        let raw = format!("{}{}", self.addr, endpoint.path());
        match Url::parse(&raw) {
            Ok(url) if url.has_host() => Ok(url),
            _ => Err(FaceboxError::config(format!(
                "box address must be absolute: {:?}",
                self.addr
            ))),
        }
    }

    /// Build the request for `endpoint`. A `limit` is only sent to the
    /// per-face endpoint: in the query string for uploads, as a form field
    /// otherwise.
    pub(crate) fn build_request(
        &self,
        endpoint: Endpoint,
        body: ImageBody,
        limit: Option<i32>,
    ) -> FaceboxResult<Request> {
        let mut url = self.endpoint_url(endpoint)?;
        let limit = limit.map(effective_limit);

        let builder = match body {
            ImageBody::File(bytes) => {
                if let Some(limit) = limit {
                    url.query_pairs_mut()
                        .append_pair("limit", &limit.to_string());
                }
                let part = Part::bytes(bytes)
                    .file_name(FILE_NAME)
                    .mime_str("application/octet-stream")?;
                self.http
                    .post(url)
                    .multipart(Form::new().part(FILE_FIELD, part))
            }
            ImageBody::Url(image_url) => {
                let image_url = match Url::parse(&image_url) {
                    Ok(parsed) => parsed,
                    Err(_) => {
                        return Err(FaceboxError::config(format!(
                            "url must be absolute: {:?}",
                            image_url
                        )))
                    }
                };
                self.http
                    .post(url)
                    .form(&form_fields("url", image_url.to_string(), limit))
            }
            ImageBody::Base64(data) => self.http.post(url).form(&form_fields("base64", data, limit)),
            ImageBody::Id(id) => {
                if id.is_empty() {
                    return Err(FaceboxError::config("id can not be empty"));
                }
                url.query_pairs_mut().append_pair("id", &id);
                self.http.get(url)
            }
        };

        Ok(builder.header(ACCEPT, ACCEPT_JSON).build()?)
    }

    /// Send `request` and decode its envelope, with tracing and metrics.
    async fn execute<P>(&self, operation: &str, request: Request) -> FaceboxResult<Vec<P::Item>>
    where
        P: EnvelopePayload,
    {
        let span = info_span!(
            "facebox_request",
            operation = %operation,
            method = %request.method(),
            path = %request.url().path()
        );

        let start = Instant::now();
        let mut observed_status = 0u16;
        let result = async {
            debug!(url = %request.url(), "Sending facebox request");
            let response = self.http.execute(request).await?;
            let status = response.status();
            observed_status = status.as_u16();
            debug!(status = %status, "Received facebox response");

            if !status.is_success() {
                return Err(FaceboxError::UnexpectedStatus(status));
            }

            let body = response.bytes().await?;
            let envelope: Envelope<P> = serde_json::from_slice(&body)?;
            envelope.into_result().map_err(FaceboxError::server)
        }
        .instrument(span)
        .await;

        record_request(operation, observed_status, start.elapsed().as_millis() as f64);
        result
    }
}

/// Form body for the `url`/`base64` encodings.
fn form_fields(key: &'static str, value: String, limit: Option<i32>) -> Vec<(&'static str, String)> {
    let mut fields = vec![(key, value)];
    if let Some(limit) = limit {
        fields.push(("limit", limit.to_string()));
    }
    fields
}

/// Read the caller's image stream to the end, once.
async fn read_image<R>(mut image: R) -> FaceboxResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    image.read_to_end(&mut bytes).await?;
    Ok(bytes)
}
