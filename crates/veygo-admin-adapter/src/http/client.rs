/*
[INPUT]:  HTTP configuration (base URL, timeouts, debug mode) and credentials
[OUTPUT]: Configured reqwest client ready for Veygo API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::auth::{AUTH_HEADER, Credential};
use crate::http::{ApiResponse, Reply, Result, VeygoError};

/// Base URL for the Veygo API
const BASE_URL: &str = "https://dev.veygo.rent";

const DEBUG_MODE_HEADER: &str = "Debug-Mode";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Ask the backend for its debug behaviour (`Debug-Mode: ios`).
    pub debug_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            debug_mode: false,
        }
    }
}

/// Main HTTP client for the Veygo admin API
#[derive(Debug, Clone)]
pub struct VeygoClient {
    http_client: Client,
    base_url: Url,
    debug_mode: bool,
}

impl VeygoClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, BASE_URL)
    }

    /// Create a new client against a different backend (staging, mock server)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            debug_mode: config.debug_mode,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build request builder for an unauthenticated endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        let debug_mode = if self.debug_mode { "ios" } else { "none" };
        Ok(self
            .http_client
            .request(method, url)
            .header(DEBUG_MODE_HEADER, debug_mode))
    }

    /// Build request builder carrying the `auth` header.
    ///
    /// Refuses to build one without a session so no request goes out with an
    /// empty credential.
    pub(crate) fn authed_request(
        &self,
        method: Method,
        endpoint: &str,
        credential: &Credential,
    ) -> Result<RequestBuilder> {
        if !credential.is_authenticated() {
            return Err(VeygoError::NotAuthenticated);
        }
        Ok(self
            .request(method, endpoint)?
            .header(AUTH_HEADER, credential.header_value()))
    }

    /// Send a request and capture status, rotated token and body.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse> {
        let response = builder.send().await?;
        let api_response = ApiResponse::read(response).await?;
        debug!(
            status = api_response.status().as_u16(),
            rotated = api_response.rotated_token().is_some(),
            "veygo response"
        );
        Ok(api_response)
    }

    /// GET an authenticated endpoint answering 200 with a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> Result<Reply<T>> {
        let builder = self.authed_request(Method::GET, endpoint, credential)?;
        let response = self.send(builder).await?;
        response.ensure_success()?;
        let data = response.json()?;
        Ok(Reply::new(data, response.outcome()))
    }
}
