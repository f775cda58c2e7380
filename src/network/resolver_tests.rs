//! Tests for `HttpAddressResolver`.

use super::{Address, AddressResolver, Endpoint, HttpAddressResolver, LookupError};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_test::traced_test;

/// Mock HTTP client with a scripted result per URL.
///
/// Records every requested URL in order. Unscripted URLs panic so a test
/// notices when the resolver queries more endpoints than expected.
#[derive(Debug, Default)]
struct MockClient {
    scripts: Mutex<HashMap<url::Url, VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new() -> Self {
        Self::default()
    }

    fn on(self, endpoint: &Endpoint, result: Result<HttpResponse, HttpError>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(endpoint.url().clone())
            .or_default()
            .push_back(result);
        self
    }

    fn body(self, endpoint: &Endpoint, body: &str) -> Self {
        self.on(endpoint, Ok(ok_response(body)))
    }

    fn requested(&self) -> Vec<url::Url> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = req.url.clone();
        self.requests.lock().unwrap().push(req);
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("unexpected request to {url}"))
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Builds a resolver sharing `client` with the test.
fn resolver_with(client: MockClient) -> (HttpAddressResolver<Arc<MockClient>>, Arc<MockClient>) {
    let client = Arc::new(client);
    (HttpAddressResolver::new(Arc::clone(&client)), client)
}

fn ok_response(body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::OK,
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

fn status_response(status: http::StatusCode) -> HttpResponse {
    HttpResponse::new(status, http::HeaderMap::new(), b"oops".to_vec())
}

fn refused() -> HttpError {
    HttpError::Connection(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

fn endpoint(n: usize) -> Endpoint {
    Endpoint::parse(&format!("https://lookup{n}.example.net/ip")).unwrap()
}

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

fn count_diagnostics(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter(|line| line.contains("WARN") || line.contains("ERROR"))
        .count()
}

mod fallback_order {
    use super::*;

    #[tokio::test]
    async fn first_valid_response_wins() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let client = MockClient::new()
            .body(&e1, "1.1.1.1")
            .body(&e2, "2.2.2.2");
        let (resolver, client) = resolver_with(client);

        let result = resolver.resolve(&[e1.clone(), e2]).await;

        assert_eq!(result, Some(addr("1.1.1.1")));
        assert_eq!(client.requested(), vec![e1.url().clone()]);
    }

    #[tokio::test]
    async fn failing_endpoints_fall_through_in_order() {
        let (e1, e2, e3) = (endpoint(1), endpoint(2), endpoint(3));
        let client = MockClient::new()
            .on(&e1, Err(HttpError::Timeout))
            .on(&e2, Err(refused()))
            .body(&e3, "203.0.113.42");
        let (resolver, client) = resolver_with(client);

        let result = resolver.resolve(&[e1.clone(), e2.clone(), e3.clone()]).await;

        assert_eq!(result, Some(addr("203.0.113.42")));
        assert_eq!(
            client.requested(),
            vec![e1.url().clone(), e2.url().clone(), e3.url().clone()]
        );
    }

    #[tokio::test]
    async fn stops_at_kth_endpoint() {
        let endpoints: Vec<Endpoint> = (1..=5).map(endpoint).collect();
        let client = MockClient::new()
            .on(&endpoints[0], Err(HttpError::Timeout))
            .on(&endpoints[1], Err(HttpError::Timeout))
            .body(&endpoints[2], "198.51.100.7");
        let (resolver, client) = resolver_with(client);

        let result = resolver.resolve(&endpoints).await;

        assert_eq!(result, Some(addr("198.51.100.7")));
        assert_eq!(client.requested().len(), 3);
    }

    #[tokio::test]
    async fn empty_endpoint_list_resolves_nothing() {
        let (resolver, client) = resolver_with(MockClient::new());

        assert_eq!(resolver.resolve(&[]).await, None);
        assert!(client.requested().is_empty());
    }

    #[tokio::test]
    async fn duplicate_endpoints_are_queried_again() {
        let e1 = endpoint(1);
        let client = MockClient::new()
            .on(&e1, Err(HttpError::Timeout))
            .body(&e1, "192.0.2.10");
        let (resolver, client) = resolver_with(client);

        let result = resolver.resolve(&[e1.clone(), e1]).await;

        assert_eq!(result, Some(addr("192.0.2.10")));
        assert_eq!(client.requested().len(), 2);
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    #[traced_test]
    async fn invalid_address_is_logged_and_skipped() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let client = MockClient::new()
            .body(&e1, "300.1.1.1")
            .body(&e2, "8.8.8.8");
        let (resolver, _) = resolver_with(client);

        let result = resolver.resolve(&[e1, e2]).await;

        assert_eq!(result, Some(addr("8.8.8.8")));
        assert!(logs_contain("returned invalid address '300.1.1.1'"));
        assert!(logs_contain("lookup1.example.net"));
    }

    #[tokio::test]
    #[traced_test]
    async fn long_invalid_body_is_logged_as_excerpt() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let page = format!("<html>{}<footer>tail-marker</footer></html>", "a".repeat(200));
        let client = MockClient::new().body(&e1, &page).body(&e2, "8.8.8.8");
        let (resolver, _) = resolver_with(client);

        let result = resolver.resolve(&[e1, e2]).await;

        assert_eq!(result, Some(addr("8.8.8.8")));
        assert!(logs_contain("returned invalid address '<html>aaaa"));
        assert!(logs_contain("..."));
        assert!(!logs_contain("tail-marker"));
    }

    #[tokio::test]
    async fn invalid_address_keeps_validation_source() {
        let e1 = endpoint(1);
        let (resolver, _) = resolver_with(MockClient::new().body(&e1, "300.1.1.1"));

        match resolver.lookup(&e1).await {
            Err(LookupError::InvalidAddress { source, .. }) => {
                assert!(matches!(source, crate::network::AddressError::OutOfRange { .. }));
            }
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_trimmed() {
        let e1 = endpoint(1);
        let (resolver, _) = resolver_with(MockClient::new().body(&e1, "  93.184.216.34\r\n"));

        assert_eq!(resolver.resolve(&[e1]).await, Some(addr("93.184.216.34")));
    }

    #[tokio::test]
    async fn ipv6_answer_falls_through() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let client = MockClient::new()
            .body(&e1, "2001:db8::1")
            .body(&e2, "192.0.2.1");
        let (resolver, _) = resolver_with(client);

        assert_eq!(resolver.resolve(&[e1, e2]).await, Some(addr("192.0.2.1")));
    }

    #[tokio::test]
    async fn empty_body_falls_through() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let client = MockClient::new().body(&e1, "\n").body(&e2, "192.0.2.2");
        let (resolver, _) = resolver_with(client);

        assert_eq!(resolver.resolve(&[e1, e2]).await, Some(addr("192.0.2.2")));
    }

    #[tokio::test]
    async fn non_success_status_falls_through() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let client = MockClient::new()
            .on(&e1, Ok(status_response(http::StatusCode::BAD_GATEWAY)))
            .body(&e2, "192.0.2.3");
        let (resolver, _) = resolver_with(client);

        assert_eq!(resolver.resolve(&[e1, e2]).await, Some(addr("192.0.2.3")));
    }
}

mod failure {
    use super::*;

    #[tokio::test]
    #[traced_test]
    async fn all_endpoints_failing_logs_once_per_endpoint() {
        let (e1, e2, e3) = (endpoint(1), endpoint(2), endpoint(3));
        let client = MockClient::new()
            .on(&e1, Err(HttpError::Timeout))
            .body(&e2, "not an address")
            .on(&e3, Ok(status_response(http::StatusCode::INTERNAL_SERVER_ERROR)));
        let (resolver, _) = resolver_with(client);

        let result = resolver.resolve(&[e1, e2, e3]).await;

        assert_eq!(result, None);
        logs_assert(|lines: &[&str]| match count_diagnostics(lines) {
            3 => Ok(()),
            n => Err(format!("expected 3 diagnostics, got {n}")),
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn unexpected_failure_aborts_resolution() {
        let (e1, e2) = (endpoint(1), endpoint(2));
        let client = MockClient::new()
            .on(&e1, Err(HttpError::Internal("decoder exploded".to_string())))
            .body(&e2, "192.0.2.4");
        let (resolver, client) = resolver_with(client);

        let result = resolver.resolve(&[e1.clone(), e2]).await;

        assert_eq!(result, None);
        assert_eq!(client.requested(), vec![e1.url().clone()]);
        assert!(logs_contain("Address resolution aborted"));
        assert!(logs_contain("decoder exploded"));
    }

    #[tokio::test]
    #[traced_test]
    async fn request_failure_log_names_endpoint() {
        let e1 = endpoint(1);
        let (resolver, _) = resolver_with(MockClient::new().on(&e1, Err(HttpError::Timeout)));

        assert_eq!(resolver.resolve(&[e1]).await, None);
        assert!(logs_contain(
            "Request to https://lookup1.example.net/ip failed: Request timed out"
        ));
    }
}

mod lookup {
    use super::*;

    #[tokio::test]
    async fn request_carries_configured_timeout() {
        let e1 = endpoint(1);
        let client = Arc::new(MockClient::new().body(&e1, "192.0.2.5"));
        let resolver =
            HttpAddressResolver::new(Arc::clone(&client)).with_timeout(Duration::from_secs(2));

        resolver.lookup(&e1).await.unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].method, http::Method::GET);
        assert_eq!(requests[0].timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        let (resolver, _) = resolver_with(MockClient::new());

        assert_eq!(resolver.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn classifies_failures() {
        let (e1, e2, e3, e4) = (endpoint(1), endpoint(2), endpoint(3), endpoint(4));
        let client = MockClient::new()
            .on(&e1, Err(HttpError::Timeout))
            .on(&e2, Ok(status_response(http::StatusCode::NOT_FOUND)))
            .body(&e3, "1.2.3")
            .on(&e4, Err(HttpError::Internal("boom".to_string())));
        let (resolver, _) = resolver_with(client);

        let request = resolver.lookup(&e1).await.unwrap_err();
        let status = resolver.lookup(&e2).await.unwrap_err();
        let invalid = resolver.lookup(&e3).await.unwrap_err();
        let unexpected = resolver.lookup(&e4).await.unwrap_err();

        assert!(matches!(request, LookupError::Request { .. }));
        assert!(request.is_request_class());
        assert!(matches!(status, LookupError::Status { .. }));
        assert!(status.is_request_class());
        assert!(matches!(invalid, LookupError::InvalidAddress { ref raw, .. } if raw == "1.2.3"));
        assert!(!invalid.is_request_class());
        assert!(matches!(unexpected, LookupError::Unexpected { .. }));
        assert!(!unexpected.is_request_class());
        assert_eq!(unexpected.endpoint(), &e4);
    }
}
