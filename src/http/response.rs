//! Raw SES response.

use http::{HeaderMap, StatusCode};

use crate::error::{SesError, SesResult};

/// Header carrying the AWS request id.
pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// A response from the SES API, exactly as received.
///
/// The client returns this for every status code. A 4xx or 5xx reply is
/// not turned into an error; inspect [`status`](Self::status) and
/// [`body`](Self::body) to decide what to do.
#[derive(Debug, Clone)]
pub struct SesResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl SesResponse {
    /// Create a new response.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_ses_outbound::http::SesResponse;
    /// use http::{HeaderMap, StatusCode};
    ///
    /// let response = SesResponse::new(StatusCode::OK, HeaderMap::new(), b"{}".to_vec());
    /// assert!(response.is_success());
    /// ```
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a response from a reqwest Response, reading the full body.
    pub async fn from_reqwest(response: reqwest::Response) -> SesResult<Self> {
        let status = response.status();
        let headers = response.headers().clone();

        let body = response
            .bytes()
            .await
            .map_err(|e| SesError::Transport {
                message: format!("Failed to read response body: {}", e),
                source: Some(Box::new(e)),
            })?
            .to_vec();

        Ok(Self::new(status, headers, body))
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get all headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the response body as bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The AWS request id from `x-amzn-RequestId`, if present.
    pub fn request_id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    #[test]
    fn test_response_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-amzn-RequestId",
            HeaderValue::from_static("0b4f2c1e-6b5a-4d3e-9f1a-2c7d8e9f0a1b"),
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let response = SesResponse::new(
            StatusCode::OK,
            headers,
            br#"{"MessageId":"0100018c-abc"}"#.to_vec(),
        );

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.is_success());
        assert_eq!(
            response.request_id(),
            Some("0b4f2c1e-6b5a-4d3e-9f1a-2c7d8e9f0a1b")
        );
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.text(), r#"{"MessageId":"0100018c-abc"}"#);
    }

    #[test]
    fn test_error_status_is_not_success() {
        let response = SesResponse::new(
            StatusCode::BAD_REQUEST,
            HeaderMap::new(),
            br#"{"message":"Missing final '@domain'"}"#.to_vec(),
        );

        assert!(!response.is_success());
        assert!(response.request_id().is_none());
        assert!(response.text().contains("@domain"));
    }

    #[test]
    fn test_text_is_lossy() {
        let response = SesResponse::new(StatusCode::OK, HeaderMap::new(), vec![0x66, 0xff, 0x6f]);
        assert_eq!(response.text(), "f\u{fffd}o");
        assert_eq!(response.body(), &[0x66, 0xff, 0x6f]);
    }
}
