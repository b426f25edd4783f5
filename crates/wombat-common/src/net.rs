//! Resource fetching for the layout engine.
//!
//! Layout loads images synchronously while walking the tree, so fetching is
//! deliberately blocking. The [`ResourceLoader`] trait is the seam between
//! layout and the network: the engine only ever sees bytes or a
//! [`FetchError`].

use base64::Engine;
use std::time::Duration;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while fetching a resource.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    /// The request failed at the transport level.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(String),
    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
    /// The URL uses a scheme the loader does not understand.
    #[error("unsupported URL scheme in '{0}'")]
    UnsupportedScheme(String),
    /// A `data:` URL payload could not be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
    /// A `file:` URL could not be read from disk.
    #[error("failed to read file '{0}': {1}")]
    File(String, String),
}

/// Byte source for layout resources (images, for now).
///
/// Implemented by the HTTP loader below and by in-memory fakes in tests.
pub trait ResourceLoader {
    /// Fetch the resource at `url` and return its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing what went wrong; the caller is
    /// expected to log and carry on without the resource.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// A parsed `data:` URL that can be decoded into raw bytes.
pub struct DataURL {
    /// The full raw `data:` URL string (e.g. `data:image/png;base64,...`).
    pub raw_data: String,
}

impl DataURL {
    /// Create a new `DataURL` from a raw data URL string.
    #[must_use]
    pub const fn new(raw_data: String) -> Self {
        Self { raw_data }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Currently supports base64-encoded data URLs only.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the URL is malformed, uses an
    /// encoding other than base64, or the base64 payload is invalid.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let data_url = self.raw_data.trim_start_matches("data:");
        let (metadata, data) = match data_url.find(',') {
            Some(i) => (&data_url[..i], &data_url[i + 1..]),
            None => return Err(FetchError::DataUrl("missing comma".to_string())),
        };

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Err(FetchError::DataUrl(format!(
                "unrecognized encoding: {metadata}"
            )))
        }
    }
}

/// Blocking loader handling `http:`, `https:`, `file:` and `data:` URLs.
#[derive(Default)]
pub struct HttpLoader;

impl HttpLoader {
    /// Create a new loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ResourceLoader for HttpLoader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.starts_with("data:") {
            return DataURL::new(url.to_string()).decode();
        }
        if let Some(path) = url.strip_prefix("file://") {
            return std::fs::read(path)
                .map_err(|e| FetchError::File(path.to_string(), e.to_string()));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return fetch_bytes(url);
        }
        Err(FetchError::UnsupportedScheme(url.to_string()))
    }
}

/// Fetch a URL over HTTP and return its body as raw bytes.
///
/// # Errors
///
/// Returns a [`FetchError`] if the client cannot be created, the request
/// fails, the response has a non-success status, or the body cannot be read.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().to_string()));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| FetchError::Body(e.to_string()))
}
