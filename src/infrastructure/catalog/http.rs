//! HTTP client for the API Catalog REST API

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{CatalogClient, CatalogError};
use crate::domain::TileSummary;

/// Cookie carrying the API ML session token
pub const AUTH_COOKIE: &str = "apimlAuthenticationToken";

const API_ROOT: &str = "apicatalog/api/v1";

pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, timeout: Duration, accept_invalid_certs: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_ROOT, path.trim_start_matches('/'))
    }

    async fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.header(COOKIE, format!("{AUTH_COOKIE}={token}")),
            None => request,
        }
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, CatalogError> {
        let response = self
            .with_session(request)
            .await
            .send()
            .await
            .map_err(|err| CatalogError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(url, status = status.as_u16(), "catalog request failed");
        Err(CatalogError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json(&self, path: &str) -> Result<Value, CatalogError> {
        let url = self.url(path);
        let response = self.send(&url, self.http.get(&url)).await?;
        let body = response.text().await.map_err(|err| CatalogError::Transport {
            url: url.clone(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|err| CatalogError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn containers(&self) -> Result<Vec<TileSummary>, CatalogError> {
        let value = self.get_json("containers").await?;
        serde_json::from_value(value).map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn container(&self, id: &str) -> Result<TileSummary, CatalogError> {
        let id = id.trim_matches('/');
        let value = self.get_json(&format!("containers/{id}")).await?;
        // The catalog answers with a one-element list; accept a bare object too.
        let value = match value {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            Value::Array(_) => return Err(CatalogError::NotFound(id.to_string())),
            other => other,
        };
        serde_json::from_value(value).map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn refresh_static_apis(&self) -> Result<(), CatalogError> {
        let url = self.url("static-api/refresh");
        self.send(&url, self.http.post(&url)).await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<(), CatalogError> {
        let url = self.url("auth/login");
        let request = self
            .http
            .post(&url)
            .json(&json!({ "username": username, "password": password }));
        let response = self.send(&url, request).await?;
        let token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(token_from_set_cookie);
        if token.is_none() {
            tracing::warn!("login succeeded without a session cookie");
        }
        *self.token.write().await = token;
        Ok(())
    }

    async fn logout(&self) -> Result<(), CatalogError> {
        let url = self.url("auth/logout");
        let result = self.send(&url, self.http.post(&url)).await.map(|_| ());
        *self.token.write().await = None;
        result
    }

    fn endpoint_name(&self) -> String {
        self.base_url.clone()
    }
}

/// Extract the session token from one `Set-Cookie` header value
pub fn token_from_set_cookie(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim() != AUTH_COOKIE {
        return None;
    }
    let value = value.trim().trim_matches('"');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn normalize_base_url(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_set_cookie() {
        assert_eq!(
            token_from_set_cookie("apimlAuthenticationToken=abc.def; Path=/; HttpOnly"),
            Some("abc.def".to_string())
        );
        assert_eq!(token_from_set_cookie("JSESSIONID=1; Path=/"), None);
        assert_eq!(token_from_set_cookie("apimlAuthenticationToken=; Max-Age=0"), None);
        assert_eq!(token_from_set_cookie("garbage"), None);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("localhost:10010/"), "https://localhost:10010");
        assert_eq!(normalize_base_url("http://gw:80"), "http://gw:80");
    }

    #[test]
    fn test_url_building() {
        let client =
            HttpCatalogClient::new("https://gw:10010/", Duration::from_secs(1), false).unwrap();
        assert_eq!(
            client.url("/containers"),
            "https://gw:10010/apicatalog/api/v1/containers"
        );
    }
}
