//! HTTP gateway to the Loft backend.
//!
//! The backend exposes one endpoint per named route; every call is a POST
//! with a JSON body. The session core never builds URLs or inspects status
//! codes - it talks [`Gateway`], and this module maps the transport onto it.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::ApiError;
use crate::config::Config;

/// HTTP request timeout in seconds.
/// 30s allows for slow self-hosted instances while failing fast enough
/// for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Named backend routes the session core drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    CheckApiKey,
    Settings,
    DeleteAccount,
}

impl Route {
    /// The route name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Register => "register",
            Route::CheckApiKey => "checkApiKey",
            Route::Settings => "settings",
            Route::DeleteAccount => "deleteAccount",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport seam between the session core and the backend.
///
/// Implementations execute `route` with `body` and either return the
/// decoded success payload or fail with an [`ApiError`]. No retries, no
/// interpretation - the session core owns the semantics.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn fetch(&self, route: Route, body: Value) -> Result<Value, ApiError>;
}

/// Gateway backed by an HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build a gateway pointed at the configured server.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.server_url.clone())
    }

    fn route_url(&self, route: Route) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), route)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch(&self, route: Route, body: Value) -> Result<Value, ApiError> {
        let url = self.route_url(route);
        debug!(%route, "Dispatching backend call");

        let response = self.client.post(&url).json(&body).send().await?;
        let response = Self::check_response(response).await?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_wire_names() {
        assert_eq!(Route::Login.as_str(), "login");
        assert_eq!(Route::Register.as_str(), "register");
        assert_eq!(Route::CheckApiKey.as_str(), "checkApiKey");
        assert_eq!(Route::Settings.as_str(), "settings");
        assert_eq!(Route::DeleteAccount.as_str(), "deleteAccount");
    }

    #[test]
    fn test_route_urls_tolerate_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:8080/api/").expect("client build");
        assert_eq!(
            gateway.route_url(Route::CheckApiKey),
            "http://localhost:8080/api/checkApiKey"
        );

        let gateway = HttpGateway::new("http://localhost:8080/api").expect("client build");
        assert_eq!(gateway.route_url(Route::Login), "http://localhost:8080/api/login");
    }
}
