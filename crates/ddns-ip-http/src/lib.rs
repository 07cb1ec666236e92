// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS system.
//
// ## Architecture
//
// Fetches the current public IPv4 address from a plain-text "what is my IP"
// service (by default `http://checkip.amazonaws.com/`). One GET per call:
// no polling, no caching, no retries. The body is trimmed and must pass the
// dotted-quad check from `ddns_core::address`.
//
// ## Errors
//
// - Connection failures, non-2xx statuses and unreadable bodies are
//   `Error::Transport`
// - A readable body that is not an address is `Error::MalformedAddress`

use async_trait::async_trait;
use ddns_core::traits::IpSource;
use ddns_core::{Error, ResolvedIp, Result};

/// Default IP lookup service, returns the caller's address as plain text
pub const DEFAULT_IP_SERVICE: &str = "http://checkip.amazonaws.com/";

/// HTTP-based public IP lookup
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create an IP source backed by [`DEFAULT_IP_SERVICE`]
    pub fn new() -> Self {
        Self::with_url(DEFAULT_IP_SERVICE)
    }

    /// Create an IP source backed by a custom lookup service
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering GET with the caller's IP as the response body
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .user_agent(concat!("route53-ddns/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        }
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw response body
    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport("http", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(
                "http",
                format!("HTTP error: {}", response.status()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport("http", format!("Failed to read response: {}", e)))
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<ResolvedIp> {
        tracing::debug!("Looking up public IP via {}", self.url);

        let body = self.fetch_body().await?;
        ResolvedIp::parse(body.trim())
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(status: u16, body: &str) -> (MockServer, HttpIpSource) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpIpSource::with_url(format!("{}/", server.uri()));
        (server, source)
    }

    #[test]
    fn test_default_url() {
        assert_eq!(HttpIpSource::new().url(), DEFAULT_IP_SERVICE);
        assert_eq!(HttpIpSource::default().source_name(), "http");
    }

    #[tokio::test]
    async fn test_trims_whitespace() {
        let (_server, source) = serve(200, " 198.51.100.7 \n").await;

        let ip = source.current().await.unwrap();
        assert_eq!(ip.as_str(), "198.51.100.7");
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed_address() {
        let (_server, source) = serve(200, "not-an-ip").await;

        let err = source.current().await.unwrap_err();
        assert!(matches!(err, Error::MalformedAddress(ref raw) if raw == "not-an-ip"));
    }

    #[tokio::test]
    async fn test_ipv6_body_is_malformed_address() {
        let (_server, source) = serve(200, "2001:db8::1\n").await;

        assert!(matches!(
            source.current().await,
            Err(Error::MalformedAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        // Body is a valid address but the status wins
        let (_server, source) = serve(503, "198.51.100.7").await;

        let err = source.current().await.unwrap_err();
        assert!(matches!(err, Error::Transport { provider: "http", .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let server = MockServer::start().await;
        let url = format!("{}/", server.uri());
        drop(server);

        let err = HttpIpSource::with_url(url).current().await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }

    #[tokio::test]
    async fn test_every_call_hits_the_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.5"))
            .expect(2)
            .mount(&server)
            .await;

        let source = HttpIpSource::with_url(server.uri());
        source.current().await.unwrap();
        source.current().await.unwrap();
    }
}
