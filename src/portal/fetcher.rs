use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{PortalConfig, RetryConfig, StatusPolicy};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("cgpa-leaderboard/", env!("CARGO_PKG_VERSION"));

/// Fetches a URL and yields its body, or `None` when no usable response
/// could be obtained. `Err` is reserved for failures that must stop the run.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub status_policy: StatusPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            delay: Duration::from_secs(config.delay_secs),
            status_policy: config.status_policy,
        }
    }
}

/// Runs `attempt` up to `policy.attempts` times, sleeping `policy.delay` after
/// every retryable failure.
pub async fn fetch_with_retry<F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut attempt: F,
) -> Result<Option<String>, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, FetchError>>,
{
    let attempts = policy.attempts.max(1);
    for attempt_no in 1..=attempts {
        match attempt().await {
            Ok(body) => {
                if attempt_no > 1 {
                    debug!(url, attempts = attempt_no, "fetch succeeded after retry");
                }
                return Ok(Some(body));
            }
            Err(error) if error.is_retryable(policy.status_policy) => {
                warn!(
                    url,
                    attempt = attempt_no,
                    max_attempts = attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    "attempt {attempt_no} failed: {error}"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(error) if error.is_fatal(policy.status_policy) => return Err(error),
            Err(error) => {
                warn!(url, "request failed, not retrying: {error}");
                return Ok(None);
            }
        }
    }
    warn!(url, attempts, "giving up after exhausting retries");
    Ok(None)
}

pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(portal: &PortalConfig, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(portal.timeout_secs))
            .connect_timeout(Duration::from_secs(portal.connect_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, policy })
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        fetch_with_retry(&self.policy, url, || self.get_once(url)).await
    }
}
