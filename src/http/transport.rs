//! Transport layer abstraction for HTTP communication.
//!
//! The default implementation uses reqwest. Tests substitute a mock.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{SesRequest, SesResponse};
use crate::error::{SesError, SesResult};

/// Trait for HTTP transport implementations.
///
/// A transport sends exactly one request and returns whatever came back.
/// It must not retry and must not treat an error status as a failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, times out, or the
    /// response body cannot be read.
    async fn send(&self, request: SesRequest) -> SesResult<SesResponse>;
}

/// Reqwest-based HTTP transport implementation.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport.
    ///
    /// Idle connections are not kept: every send opens a fresh connection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use integrations_ses_outbound::http::ReqwestTransport;
    ///
    /// let transport = ReqwestTransport::new(
    ///     Duration::from_secs(30),
    ///     Duration::from_secs(10),
    ///     None,
    /// )?;
    /// # Ok::<(), integrations_ses_outbound::error::SesError>(())
    /// ```
    pub fn new(
        timeout: Duration,
        connect_timeout: Duration,
        user_agent: Option<&str>,
    ) -> SesResult<Self> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(0);

        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder.build().map_err(|e| SesError::Transport {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: SesRequest) -> SesResult<SesResponse> {
        let SesRequest {
            method,
            url,
            headers,
            body,
        } = request;

        debug!(%method, %url, body_len = body.len(), "sending request");

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        SesResponse::from_reqwest(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method, StatusCode};
    use url::Url;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_reqwest_transport_creation() {
        let transport = ReqwestTransport::new(
            Duration::from_secs(30),
            Duration::from_secs(10),
            Some("integrations-ses-outbound-test"),
        );
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_transport_trait_object() {
        let transport =
            ReqwestTransport::new(Duration::from_secs(30), Duration::from_secs(10), None).unwrap();
        let _: &dyn Transport = &transport;
    }

    #[tokio::test]
    async fn test_send_returns_error_status_unmodified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/email/outbound-emails"))
            .and(body_string("{}"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-amzn-RequestId", "req-403")
                    .set_body_string(r#"{"message":"The security token included in the request is invalid."}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            ReqwestTransport::new(Duration::from_secs(5), Duration::from_secs(5), None).unwrap();
        let url = Url::parse(&format!("{}/v2/email/outbound-emails", server.uri())).unwrap();
        let request = SesRequest::new(Method::POST, url, HeaderMap::new(), b"{}".to_vec());

        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.request_id(), Some("req-403"));
        assert!(response.text().contains("security token"));
    }

    #[tokio::test]
    async fn test_send_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            ReqwestTransport::new(Duration::from_secs(5), Duration::from_secs(5), None).unwrap();
        let url = Url::parse(&format!("http://{}/v2/email/outbound-emails", addr)).unwrap();
        let request = SesRequest::new(Method::POST, url, HeaderMap::new(), b"{}".to_vec());

        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, SesError::Transport { .. }));
    }
}
