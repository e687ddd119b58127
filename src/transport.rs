use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};

use crate::config::RkvConfig;
use crate::error::{BoxError, RkvError, RkvResult};

/// An HTTP request that can be replayed: every send builds a fresh
/// request from these parts, so a failed attempt never leaves a half-read
/// body behind for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: Method::DELETE,
            url,
            body: None,
        }
    }

    /// POST with a JSON body.
    pub fn post_json(url: Url, body: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            url,
            body: Some(body),
        }
    }
}

/// A completed exchange. The response body is not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
}

/// Performs a single HTTP exchange.
///
/// `Err` means the exchange itself failed (DNS, connect, timeout, I/O). A
/// completed exchange is `Ok` whatever its status code.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: &PreparedRequest) -> Result<Reply, BoxError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &RkvConfig) -> RkvResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| RkvError::Config {
            message: format!("failed to create HTTP client: {e}"),
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<Reply, BoxError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder.send().await?;
        Ok(Reply {
            status: response.status(),
        })
    }
}
