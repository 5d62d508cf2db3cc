//! Mock HTTP client for testing.
//!
//! Responses are scripted per method and URL. A route holding several
//! responses hands them out in order and keeps repeating the last one, which
//! is how tests express "401 first, then 200".

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{HttpClient, HttpError, HttpRequest, Method, Response};

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

/// Mock HTTP client for testing.
///
/// Routes match on the method plus either the full URL or the URL without
/// its query string; the full URL wins when both are scripted.
///
/// # Example
///
/// ```ignore
/// use portal::adapters::mock::MockHttpClient;
/// use portal::traits::Method;
///
/// let client = MockHttpClient::new();
/// client.push_json(Method::Get, "http://api/v1/users/me", 200, &user);
///
/// // ... exercise code ...
///
/// assert_eq!(client.request_count(Method::Get, "http://api/v1/users/me"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    routes: Arc<Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a method and URL.
    pub fn push(&self, method: Method, url: &str, response: MockResponse) {
        let mut routes = self.routes.lock().unwrap();
        routes
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Queue a JSON response.
    pub fn push_json<T: serde::Serialize>(&self, method: Method, url: &str, status: u16, body: &T) {
        self.push(method, url, MockResponse::Success(Response::json_body(status, body)));
    }

    /// Queue a bare status with an optional text body.
    pub fn push_status(&self, method: Method, url: &str, status: u16, body: &str) {
        self.push(
            method,
            url,
            MockResponse::Success(Response::new(status, Bytes::from(body.to_string()))),
        );
    }

    /// Queue a transport error.
    pub fn push_error(&self, method: Method, url: &str, error: HttpError) {
        self.push(method, url, MockResponse::Error(error));
    }

    /// Response for requests with no scripted route.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL, minus the query string, equals `url`.
    pub fn requests_to(&self, method: Method, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && strip_query(&r.url) == strip_query(url))
            .collect()
    }

    pub fn request_count(&self, method: Method, url: &str) -> usize {
        self.requests_to(method, url).len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn next_response(&self, method: Method, url: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock().unwrap();
        for key in [url, strip_query(url)] {
            if let Some(queue) = routes.get_mut(&(method, key.to_string())) {
                if queue.len() > 1 {
                    return queue.pop_front();
                }
                if let Some(last) = queue.front() {
                    return Some(last.clone());
                }
            }
        }
        self.default_response.lock().unwrap().clone()
    }
}

fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.next_response(request.method, &request.url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                request.method, request.url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_sequence_repeats_last() {
        let client = MockHttpClient::new();
        client.push_status(Method::Get, "http://api/v1/x", 401, "");
        client.push_status(Method::Get, "http://api/v1/x", 200, "ok");

        let request = HttpRequest::new(Method::Get, "http://api/v1/x");
        assert_eq!(client.send(&request).await.unwrap().status, 401);
        assert_eq!(client.send(&request).await.unwrap().status, 200);
        assert_eq!(client.send(&request).await.unwrap().status, 200);
        assert_eq!(client.request_count(Method::Get, "http://api/v1/x"), 3);
    }

    #[tokio::test]
    async fn test_query_string_falls_back_to_path_route() {
        let client = MockHttpClient::new();
        client.push_status(Method::Get, "http://api/v1/materials", 200, "list");
        client.push_status(Method::Get, "http://api/v1/materials?page=1", 200, "page1");

        let page1 = HttpRequest::new(Method::Get, "http://api/v1/materials?page=1");
        let page2 = HttpRequest::new(Method::Get, "http://api/v1/materials?page=2");
        assert_eq!(client.send(&page1).await.unwrap().text().unwrap(), "page1");
        assert_eq!(client.send(&page2).await.unwrap().text().unwrap(), "list");
    }

    #[tokio::test]
    async fn test_method_is_part_of_route() {
        let client = MockHttpClient::new();
        client.push_status(Method::Post, "http://api/v1/x", 200, "");

        let get = HttpRequest::new(Method::Get, "http://api/v1/x");
        assert!(client.send(&get).await.is_err());
    }

    #[tokio::test]
    async fn test_errors_and_default() {
        let client = MockHttpClient::new();
        client.push_error(
            Method::Get,
            "http://api/down",
            HttpError::ConnectionFailed("refused".to_string()),
        );
        client.set_default_response(MockResponse::Success(Response::new(204, Bytes::new())));

        let down = HttpRequest::new(Method::Get, "http://api/down");
        assert!(matches!(
            client.send(&down).await,
            Err(HttpError::ConnectionFailed(_))
        ));

        let other = HttpRequest::new(Method::Delete, "http://api/anything");
        assert_eq!(client.send(&other).await.unwrap().status, 204);
    }
}
