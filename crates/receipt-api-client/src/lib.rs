//! HTTP client for the receipt upload endpoint.
//!
//! Provides a minimal client with configurable auth (Bearer token or X-API-Key) and
//! the receipt upload call. The client implements [`ReceiptUploader`] so it can be
//! handed straight to the pipeline.
//!
//! [`ReceiptUploader`]: receipt_processing::ReceiptUploader

pub mod api;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_API_VERSION: &str = "v0";

/// Authentication strategy for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// API version prefix (e.g. "/api/v0").
pub fn api_prefix(version: &str) -> String {
    format!("/api/{}", version.trim_matches('/'))
}

/// HTTP client for the receipt API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: api_prefix(DEFAULT_API_VERSION),
            auth,
        })
    }

    /// Target another API version. Must match the server.
    pub fn with_api_version(mut self, version: &str) -> Self {
        self.api_prefix = api_prefix(version);
        self
    }

    /// Create client from environment: RECEIPT_API_URL (or API_URL), RECEIPT_API_KEY
    /// (or API_KEY) and RECEIPT_API_VERSION. Uses X-API-Key auth by default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiClient::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("RECEIPT_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let auth = match lookup("RECEIPT_API_KEY").or_else(|| lookup("API_KEY")) {
            Some(key) => Auth::XApiKey(key),
            None => lookup("JWT_TOKEN")
                .map(Auth::Bearer)
                .context("Missing API key. Set RECEIPT_API_KEY, API_KEY, or JWT_TOKEN")?,
        };

        let version =
            lookup("RECEIPT_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Self::new(base_url, auth)?.with_api_version(&version))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Absolute URL of an endpoint below the API prefix.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }

    /// POST multipart form to an endpoint and deserialize the JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let url = self.endpoint_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        let response = request.send().await.context("Failed to send request")?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_api_prefix() {
        assert_eq!(api_prefix("v0"), "/api/v0");
        assert_eq!(api_prefix("/v2/"), "/api/v2");
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let client =
            ApiClient::new("https://erp.example.com/".to_string(), Auth::XApiKey("k".into()))
                .unwrap();
        assert_eq!(
            client.endpoint_url("/expenses/receipts"),
            "https://erp.example.com/api/v0/expenses/receipts"
        );
    }

    #[test]
    fn test_from_lookup_prefers_receipt_variables() {
        let client = ApiClient::from_lookup(lookup_from(&[
            ("RECEIPT_API_URL", "https://a.example.com"),
            ("API_URL", "https://b.example.com"),
            ("RECEIPT_API_KEY", "secret"),
            ("RECEIPT_API_VERSION", "v1"),
        ]))
        .unwrap();

        assert_eq!(client.base_url(), "https://a.example.com");
        assert_eq!(client.api_prefix(), "/api/v1");
        assert_eq!(client.auth(), &Auth::XApiKey("secret".to_string()));
    }

    #[test]
    fn test_from_lookup_falls_back_to_bearer_token() {
        let client = ApiClient::from_lookup(lookup_from(&[("JWT_TOKEN", "jwt")])).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.auth(), &Auth::Bearer("jwt".to_string()));
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let err = ApiClient::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("Missing API key"));
    }
}
