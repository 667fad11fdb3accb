//! HTTP client for the IUMS REST API

use super::traits::IumsApi;
use super::types::{parse_error_body, ApiError, CheckResponse, CreateUserPayload, UniqueField};
use crate::config::IumsConfig;
use crate::session::Session;
use crate::state::{CreatedUser, Directorate, OptionItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the IUMS REST API, authenticated with the session token
pub struct ApiClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the configured API using the given session
    pub fn new(config: &IumsConfig, session: &Session) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            token: session.token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path)).bearer_auth(&self.token);
        send(request).await
    }
}

/// Send a request and decode a JSON body, mapping failures onto [`ApiError`]
async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "IUMS API rejected request");
        return Err(parse_error_body(status.as_u16(), &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl IumsApi for ApiClient {
    async fn check_unique(
        &self,
        field: UniqueField,
        value: String,
    ) -> Result<CheckResponse, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/users/check-{}/", field.key())))
            .query(&[("value", value.as_str())])
            .bearer_auth(&self.token);
        send(request).await
    }

    async fn create_user(&self, payload: CreateUserPayload) -> Result<CreatedUser, ApiError> {
        let request = self
            .client
            .post(self.url("/users/"))
            .json(&payload)
            .bearer_auth(&self.token);
        send(request).await
    }

    async fn list_directorates(&self) -> Result<Vec<Directorate>, ApiError> {
        self.get("/directorates/").await
    }

    async fn list_employment_types(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get("/employment-types/").await
    }

    async fn list_device_types(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get("/device-types/").await
    }

    async fn list_groups(&self) -> Result<Vec<OptionItem>, ApiError> {
        self.get("/groups/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn session() -> Session {
        Session {
            token: "secret".into(),
            username: "admin".into(),
            role: Role::Admin,
            expires_at: None,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = IumsConfig {
            api_base_url: Some("http://iums.local/api/".into()),
            ..Default::default()
        };
        let client = ApiClient::new(&config, &session()).unwrap();
        assert_eq!(client.base_url(), "http://iums.local/api");
        assert_eq!(client.url("/groups/"), "http://iums.local/api/groups/");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = IumsConfig {
            api_base_url: Some("http://127.0.0.1:9".into()),
            request_timeout_secs: Some(1),
            ..Default::default()
        };
        let client = ApiClient::new(&config, &session()).unwrap();
        let err = client.list_groups().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "{err:?}");
    }
}
