//! Outbound HTTP transport.
//!
//! The Fetcher talks to a `Transport` only through short-lived sessions: one
//! session per resolve call, so cookies set by an early profile are visible
//! to later ones and are dropped when the call ends.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::core::config::ResolverConfig;
use crate::core::error::AppResult;
use crate::resolve::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
            timeout,
        }
    }

    #[must_use]
    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Factory for per-call HTTP sessions.
pub trait Transport: Send + Sync {
    fn open_session(&self) -> AppResult<Box<dyn HttpSession>>;
}

/// One cookie-carrying HTTP session.
#[async_trait]
pub trait HttpSession: Send + Sync {
    /// Sends a request. Any HTTP status is a successful send; only network
    /// failures and timeouts are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// reqwest-backed transport with a fresh cookie store per session.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    proxy: Option<String>,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            proxy: config.proxy.clone(),
            connect_timeout: config.connect_timeout,
        }
    }
}

impl Transport for ReqwestTransport {
    fn open_session(&self) -> AppResult<Box<dyn HttpSession>> {
        let mut client_builder = Client::builder()
            .cookie_store(true)
            .connect_timeout(self.connect_timeout);

        if let Some(ref proxy_url) = self.proxy {
            match reqwest::Proxy::all(proxy_url.as_str()) {
                Ok(proxy) => {
                    log::debug!("ReqwestTransport: using proxy {}", proxy_url);
                    client_builder = client_builder.proxy(proxy);
                }
                Err(e) => {
                    log::warn!("ReqwestTransport: failed to configure proxy: {}", e);
                }
            }
        }

        let client = client_builder.build()?;
        Ok(Box::new(ReqwestSession { client }))
    }
}

struct ReqwestSession {
    client: Client,
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}

#[async_trait]
impl HttpSession for ReqwestSession {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        }
        .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpResponse { status, body })
    }
}
