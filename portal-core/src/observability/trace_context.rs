//! Request correlation for calls to the portal backend.
//!
//! Every outgoing request carries an `x-request-id` header so a client-side
//! log line can be matched with the backend's access log.

use reqwest::header::HeaderMap;
use uuid::Uuid;

/// Correlation header sent on every backend call.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate a fresh correlation ID.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Correlation id echoed back by the backend, if any.
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// `RequestBuilder` wrapper that adds the correlation header on send. Only
/// the builder methods the portal client uses are forwarded.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
        }
    }

    pub fn query<T: serde::Serialize + ?Sized>(self, query: &T) -> Self {
        Self {
            request: self.request.query(query),
        }
    }

    pub fn multipart(self, form: reqwest::multipart::Form) -> Self {
        Self {
            request: self.request.multipart(form),
        }
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        Self {
            request: self.request.bearer_auth(token),
        }
    }

    /// Send with a fresh UUID v4 correlation id.
    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let request_id = new_request_id();
        self.send_with_request_id(&request_id).await
    }

    pub async fn send_with_request_id(
        self,
        request_id: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        tracing::debug!(request_id = %request_id, "Sending request");
        self.request.header(REQUEST_ID_HEADER, request_id).send().await
    }
}

/// `reqwest::Client` constructors for [`TracedRequest`].
pub trait TracedClientExt {
    fn traced_get(&self, url: &str) -> TracedRequest;
    fn traced_post(&self, url: &str) -> TracedRequest;
    fn traced_patch(&self, url: &str) -> TracedRequest;
    fn traced_delete(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_get(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }

    fn traced_patch(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.patch(url))
    }

    fn traced_delete(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.delete(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_echoed_request_id() {
        let mut echoed = HeaderMap::new();
        assert_eq!(extract_request_id(&echoed), None);

        echoed.insert(REQUEST_ID_HEADER, "req-7".parse().unwrap());
        assert_eq!(extract_request_id(&echoed).as_deref(), Some("req-7"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(new_request_id(), new_request_id());
    }

    #[tokio::test]
    async fn test_send_stamps_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header_exists(REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = client
            .traced_get(&format!("{}/ping", server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_send_with_explicit_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(header(REQUEST_ID_HEADER, "req-42"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = client
            .traced_delete(&format!("{}/documents/1", server.uri()))
            .send_with_request_id("req-42")
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
    }
}
