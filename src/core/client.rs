//! HTTP client for the routing backend
//!
//! One request per submission, no retries: every failure is terminal for
//! the attempt that hit it.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use crate::core::error::{Error, Result};
use crate::core::route::{interpret_reply, RouteRequest, RouteResult};

/// Route lookup endpoint
pub const FIND_ROUTE_PATH: &str = "/api/find_route";

/// Liveness endpoint
pub const HEALTH_PATH: &str = "/health";

/// Development address of the routing backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Connection settings for the routing backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, without a trailing path
    pub base_url: String,

    /// Overall request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

fn user_agent() -> String {
    format!("nogo-router/{}", env!("NOGO_ROUTER_VERSION"))
}

fn build_http_client(config: &ClientConfig) -> std::result::Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(user_agent())
        .build()
}

/// Shared HTTP client for the default configuration
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    build_http_client(&ClientConfig::default()).expect("Failed to create HTTP client")
});

#[derive(Debug, Deserialize)]
struct HealthReply {
    #[serde(default)]
    ok: bool,
}

/// Client for the routing backend's HTTP API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: Client,
    base_url: String,
}

impl Default for RouteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteClient {
    /// Client for the default backend address, sharing the global pool
    pub fn new() -> Self {
        Self {
            http: GLOBAL_CLIENT.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Client with custom connection settings
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = build_http_client(&config)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask the backend for a route.
    ///
    /// Transport failures map to [`Error::Transport`]; anything the backend
    /// said goes through [`interpret_reply`].
    pub async fn find_route(&self, request: &RouteRequest) -> RouteResult {
        let url = self.endpoint(FIND_ROUTE_PATH);
        log::debug!(
            "POST {url}: {} -> {} avoiding {} street(s)",
            request.start_address(),
            request.destination_address(),
            request.avoid().len()
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        log::debug!("{url} answered {status} ({} bytes)", body.len());

        let result = interpret_reply(status, &body);
        match &result {
            Ok(found) => log::info!("Route found with {} point(s)", found.coordinates.len()),
            Err(e) => log::warn!("Route request failed: {e}"),
        }
        result
    }

    /// Probe the backend's liveness endpoint.
    pub async fn health(&self) -> Result<bool> {
        let url = self.endpoint(HEALTH_PATH);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            log::warn!("{url} answered {}", response.status());
            return Ok(false);
        }
        let reply: HealthReply = response.json().await?;
        Ok(reply.ok)
    }
}

/// Validate a base URL and strip any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("backend URL is empty".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidInput(format!(
            "backend URL must start with http:// or https://: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}
