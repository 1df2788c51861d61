//! HTTP client abstraction for requests against the inventory API

use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, Method, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Error body shape used by the backend: `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder> {
        let url = Url::parse(&self.url)?;

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let text = self.execute_text().await?;
        let result = serde_json::from_str::<T>(&text)?;
        Ok(result)
    }

    /// Execute the request and discard any response body
    pub async fn execute_empty(&self) -> Result<()> {
        self.execute_text().await?;
        Ok(())
    }

    async fn execute_text(&self) -> Result<String> {
        let req = self.build()?;
        let response = req.send().await.map_err(|e| {
            tracing::debug!(url = %self.url, error = %e, "request failed to reach the server");
            Error::Unreachable
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|_| Error::Unreachable)?;

        if status.is_success() {
            return Ok(text);
        }
        Err(error_for_status(status, &text))
    }
}

/// Map a non-success response onto the client error taxonomy. 401 is
/// always a session-level failure regardless of which call observed it.
fn error_for_status(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::SessionExpired,
        StatusCode::NOT_FOUND => Error::NotFound,
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.detail)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            Error::ServerRejected {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PUT request
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn unauthorized_maps_to_session_expired() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventory/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/inventory/", mock_server.uri());
        let result = Fetch::get(&client, &url).execute::<serde_json::Value>().await;

        assert!(matches!(result, Err(Error::SessionExpired)));
    }

    #[tokio::test]
    async fn missing_resource_maps_to_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/inventory/42"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "Item not found"
            })))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/inventory/42", mock_server.uri());
        let result = Fetch::delete(&client, &url).execute_empty().await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn server_detail_is_surfaced_in_rejections() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory/"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": "quantity must be non-negative"
            })))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let url = format!("{}/inventory/", mock_server.uri());
        let result = Fetch::post(&client, &url)
            .json(&json!({"name": "x"}))
            .unwrap()
            .execute::<serde_json::Value>()
            .await;

        match result {
            Err(Error::ServerRejected { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "quantity must be non-negative");
            }
            other => panic!("expected ServerRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_failure_maps_to_unreachable() {
        // Nothing listens on this port.
        let client = Client::new();
        let result = Fetch::get(&client, "http://127.0.0.1:1/inventory/")
            .execute::<serde_json::Value>()
            .await;

        assert!(matches!(result, Err(Error::Unreachable)));
    }
}
