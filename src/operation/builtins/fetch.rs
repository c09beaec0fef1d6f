use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client, Url};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::eval::{context::EvaluationContext, expression::Expression};
use crate::operation::types::Operation;

use super::Builtin;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("no URL given")]
    MissingUrl,
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Retrieves the body behind a URL as text.
#[mockall::automock]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetcher`] doing a plain GET with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    user_agent: String,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            client: Client::new(),
            timeout: config.fetch_timeout,
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_fetch_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url.is_empty() {
            return Err(FetchError::MissingUrl);
        }
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let mut response = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Fetched {} with status {}", url, response.status());
        }
        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// `{text:https://example.com/motd.txt}` → the response body.
///
/// Any failure is logged to the context and the occurrence expands to nothing.
#[derive(Clone)]
pub struct TextOperation {
    fetcher: Arc<dyn Fetcher>,
}

impl TextOperation {
    pub fn new<F: Fetcher + 'static>(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}

#[async_trait]
impl Operation for TextOperation {
    fn name(&self) -> &str {
        Builtin::Text.opcode()
    }

    async fn execute(&self, expression: &Expression, context: &mut EvaluationContext) -> String {
        let url = expression.operand(0);
        match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                context.push_error(self.name(), e);
                String::new()
            }
        }
    }
}
