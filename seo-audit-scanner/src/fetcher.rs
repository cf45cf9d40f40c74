use crate::error::{Result, ScanError};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;
use url::{Url, form_urlencoded};

/// Public CORS relay the audit routes every request through unless told otherwise.
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://corsproxy.io/";

/// A response as seen through the relay (or directly, when no relay is configured).
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    /// URL the content was finally served from. Behind a relay this is the
    /// requested target, since the relay hides any redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: Client,
    relay_endpoint: Option<String>,
}

impl ProxyFetcher {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let timeout_secs = timeout_secs.max(1);
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            relay_endpoint: Some(DEFAULT_RELAY_ENDPOINT.to_string()),
        })
    }

    /// Route requests through `relay`, or fetch targets directly when `None`.
    pub fn with_relay(mut self, relay: Option<String>) -> Self {
        self.relay_endpoint = relay.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn relay_endpoint(&self) -> Option<&str> {
        self.relay_endpoint.as_deref()
    }

    /// The URL actually requested for `target`: `{relay}?{encoded target}`
    /// behind a relay, the target itself otherwise.
    pub fn request_url(&self, target: &str) -> String {
        match &self.relay_endpoint {
            Some(relay) => {
                let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
                let relay = relay.trim_end_matches('?');
                format!("{}?{}", relay, encoded)
            }
            None => target.to_string(),
        }
    }

    /// GET `target` and return the response whatever its status.
    pub async fn get(&self, target: &str) -> Result<FetchResponse> {
        self.send(Method::GET, target).await
    }

    /// GET `target`, treating any non-2xx status as a failure.
    pub async fn get_text(&self, target: &str) -> Result<FetchResponse> {
        let response = self.get(target).await?;
        if !response.is_success() {
            return Err(ScanError::StatusError {
                url: target.to_string(),
                status: response.status,
                status_text: response.status_text,
            });
        }
        Ok(response)
    }

    /// HEAD `target` for an existence probe. The body is always empty.
    pub async fn head(&self, target: &str) -> Result<FetchResponse> {
        self.send(Method::HEAD, target).await
    }

    async fn send(&self, method: Method, target: &str) -> Result<FetchResponse> {
        let parsed = validate_target(target)?;
        let request_url = self.request_url(parsed.as_str());
        debug!("{} {} via {}", method, target, request_url);

        let response = self
            .client
            .request(method.clone(), &request_url)
            .send()
            .await?;

        let status = response.status();
        let final_url = if self.relay_endpoint.is_some() {
            parsed.to_string()
        } else {
            response.url().to_string()
        };
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = if method == Method::HEAD {
            String::new()
        } else {
            response.text().await?
        };

        debug!("{} {} -> {}", method, target, status.as_u16());

        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            final_url,
            content_type,
            body,
        })
    }
}

fn validate_target(target: &str) -> Result<Url> {
    let parsed = Url::parse(target.trim())
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", target, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ScanError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            target, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn direct() -> ProxyFetcher {
        ProxyFetcher::new(5, "seo-audit-test").unwrap().with_relay(None)
    }

    #[test]
    fn test_request_url_encodes_target_behind_relay() {
        let fetcher = ProxyFetcher::new(5, "seo-audit-test").unwrap();
        assert_eq!(
            fetcher.request_url("https://example.com/a?b=c"),
            "https://corsproxy.io/?https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn test_request_url_does_not_double_question_mark() {
        let fetcher = ProxyFetcher::new(5, "seo-audit-test")
            .unwrap()
            .with_relay(Some("https://relay.test/?".to_string()));
        assert!(fetcher.request_url("https://example.com/").starts_with("https://relay.test/?https"));
    }

    #[test]
    fn test_request_url_direct_mode() {
        assert_eq!(direct().request_url("https://example.com/"), "https://example.com/");
        assert!(direct().relay_endpoint().is_none());
    }

    #[test]
    fn test_blank_relay_means_direct() {
        let fetcher = ProxyFetcher::new(5, "ua").unwrap().with_relay(Some("  ".to_string()));
        assert!(fetcher.relay_endpoint().is_none());
    }

    #[tokio::test]
    async fn test_get_returns_body_and_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><title>Hi</title></html>", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let response = direct()
            .get_text(&format!("{}/page", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert!(response.body.contains("<title>Hi</title>"));
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
        assert!(response.final_url.ends_with("/page"));
    }

    #[tokio::test]
    async fn test_get_text_fails_on_non_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = direct()
            .get_text(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, ScanError::StatusError { .. }));
    }

    #[tokio::test]
    async fn test_head_reports_status_without_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&mock_server)
            .await;

        let response = direct()
            .head(&format!("{}/gone", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 410);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_relay_receives_encoded_target() {
        let relay = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/relay"))
            .respond_with(ResponseTemplate::new(200).set_body_string("relayed"))
            .expect(1)
            .mount(&relay)
            .await;

        let fetcher = ProxyFetcher::new(5, "seo-audit-test")
            .unwrap()
            .with_relay(Some(format!("{}/relay", relay.uri())));

        let response = fetcher.get_text("https://example.com/page").await.unwrap();

        assert_eq!(response.body, "relayed");
        // The relay hides redirects, so the target is reported as final URL.
        assert_eq!(response.final_url, "https://example.com/page");

        let requests = relay.received_requests().await.unwrap();
        assert_eq!(
            requests[0].url.query(),
            Some("https%3A%2F%2Fexample.com%2Fpage")
        );
    }

    #[tokio::test]
    async fn test_invalid_target_is_rejected_before_sending() {
        let err = direct().get("not a url").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));

        let err = direct().get("ftp://example.com/file").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }
}
