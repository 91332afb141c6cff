//! HTTP client seam for the embedding, retrieval and generation backends

use async_trait::async_trait;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError>;

    async fn delete(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<(), DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DomainError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response.text().await.unwrap_or_default();

        Err(DomainError::provider(
            "http",
            format!("HTTP {}: {}", status, error_body),
        ))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }

    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }

    async fn delete(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<(), DomainError> {
        let mut request = self.client.delete(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        Self::check_status(response).await?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio_test::assert_ok;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_post_json_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/echo"))
            .and(body_json(json!({"input": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let response = client
            .post_json(
                &format!("{}/v1/echo", server.uri()),
                vec![("Content-Type", "application/json")],
                &json!({"input": "hello"}),
            )
            .await
            .unwrap();

        assert_eq!(response, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_post_json_maps_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/fail"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let result = client
            .post_json(&format!("{}/v1/fail", server.uri()), vec![], &json!({}))
            .await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_get_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let response = client
            .get_json(&format!("{}/health", server.uri()), vec![])
            .await
            .unwrap();

        assert_eq!(response["status"], "ok");
    }

    #[tokio::test]
    async fn test_delete() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/collections/col-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let result = client
            .delete(&format!("{}/collections/col-1", server.uri()), vec![])
            .await;

        tokio_test::assert_ok!(result);
    }
}
