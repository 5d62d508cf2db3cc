//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of the [`HttpClient`] trait. Translates
//! [`HttpRequest`] values, multipart bodies included, into reqwest calls.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{
    Headers, HttpClient, HttpError, HttpRequest, Method, MultipartPart, RequestBody, Response,
};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use portal::adapters::ReqwestHttpClient;
/// use portal::traits::{HttpClient, HttpRequest, Method};
///
/// let client = ReqwestHttpClient::new();
/// let request = HttpRequest::new(Method::Get, "http://localhost:8080/v1/materials");
/// let response = client.send(&request).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// Build a multipart form from our part list.
    fn build_form(parts: &[MultipartPart]) -> Result<reqwest::multipart::Form, HttpError> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartPart::Json { name, value } => {
                    let json = reqwest::multipart::Part::text(value.clone())
                        .mime_str("application/json")
                        .map_err(Self::convert_error)?;
                    form.part(name.clone(), json)
                }
                MultipartPart::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    let file = reqwest::multipart::Part::bytes(data.to_vec())
                        .file_name(file_name.clone())
                        .mime_str(content_type)
                        .map_err(Self::convert_error)?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        let mut builder = self
            .client
            .request(Self::convert_method(request.method), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json.clone()),
            RequestBody::Multipart(parts) => builder.multipart(Self::build_form(parts)?),
        };

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_reqwest_http_client_with_timeout() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        let _ = client.inner();
    }

    #[test]
    fn test_build_form_accepts_all_part_kinds() {
        let parts = vec![
            MultipartPart::Text {
                name: "name".to_string(),
                value: "Ana".to_string(),
            },
            MultipartPart::Json {
                name: "materialRequestDTO".to_string(),
                value: r#"{"title":"Notas"}"#.to_string(),
            },
            MultipartPart::File {
                name: "file".to_string(),
                file_name: "notas.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                data: Bytes::from_static(b"%PDF-1.4"),
            },
        ];
        assert!(ReqwestHttpClient::build_form(&parts).is_ok());
    }

    #[test]
    fn test_build_form_rejects_bad_mime() {
        let parts = vec![MultipartPart::File {
            name: "file".to_string(),
            file_name: "x".to_string(),
            content_type: "not a mime".to_string(),
            data: Bytes::new(),
        }];
        assert!(ReqwestHttpClient::build_form(&parts).is_err());
    }

    #[tokio::test]
    async fn test_send_json_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/materials/3/rate"))
            .and(header("Authorization", "Bearer abc"))
            .and(header("content-type", "application/json"))
            .and(body_string_contains("\"value\":4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("4"))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let request = HttpRequest::new(
            Method::Post,
            format!("{}/v1/materials/3/rate", server.uri()),
        )
        .with_header("Authorization", "Bearer abc")
        .with_body(RequestBody::Json(r#"{"value":4}"#.to_string()));

        let response = client.send(&request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text().unwrap(), "4");
    }

    #[tokio::test]
    async fn test_send_returns_error_statuses_as_responses() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/materials/9"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let request = HttpRequest::new(Method::Delete, format!("{}/v1/materials/9", server.uri()));
        let response = client.send(&request).await.unwrap();
        assert_eq!(response.status, 403);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_send_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/materials"))
            .and(body_string_contains("materialRequestDTO"))
            .and(body_string_contains("filename=\"notas.pdf\""))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let request = HttpRequest::new(Method::Post, format!("{}/v1/materials", server.uri()))
            .with_body(RequestBody::Multipart(vec![
                MultipartPart::Json {
                    name: "materialRequestDTO".to_string(),
                    value: "{}".to_string(),
                },
                MultipartPart::File {
                    name: "file".to_string(),
                    file_name: "notas.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    data: Bytes::from_static(b"%PDF"),
                },
            ]));
        let response = client.send(&request).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_connection_failed() {
        let client = ReqwestHttpClient::new();
        let request = HttpRequest::new(Method::Get, "http://127.0.0.1:1/v1/materials");
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(err, HttpError::ConnectionFailed(_)));
    }
}
