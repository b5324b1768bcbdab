//! Signed request handed to a [`Transport`](super::Transport).

use http::{HeaderMap, Method};
use url::Url;

/// A complete request to the SES API.
///
/// Everything here has already been signed: changing the body or any signed
/// header after construction invalidates the `Authorization` header.
#[derive(Debug, Clone)]
pub struct SesRequest {
    /// HTTP method.
    pub method: Method,

    /// Absolute request URL.
    pub url: Url,

    /// Request headers, including `Authorization`.
    pub headers: HeaderMap,

    /// Request body.
    pub body: Vec<u8>,
}

impl SesRequest {
    /// Create a request.
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// Get a header value as a string.
    ///
    /// Returns `None` when the header is absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the body as UTF-8 text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}
