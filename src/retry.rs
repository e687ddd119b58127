use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::context::ThreadContext;
use crate::error::{RkvError, RkvResult};
use crate::transport::{PreparedRequest, Reply, Transport};

pub const RETRY_COUNT: u32 = 5;
pub const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Bounded exponential backoff: up to `retry_count` retries, waiting
/// `retry_interval * 2^i` before retry `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_count: u32,
    pub retry_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: RETRY_COUNT,
            retry_interval: RETRY_INTERVAL,
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_interval.saturating_mul(2u32.saturating_pow(attempt))
    }

    pub fn max_attempts(&self) -> u32 {
        self.retry_count + 1
    }
}

/// Executes prepared requests, retrying only transport-level failures.
#[derive(Clone)]
pub struct RetryingTransport {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingTransport {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub async fn execute(
        &self,
        ctx: &ThreadContext,
        request: &PreparedRequest,
    ) -> RkvResult<Reply> {
        let cancellation = ctx.cancellation();
        let mut attempt = 0;

        loop {
            if cancellation.is_cancelled() {
                return Err(RkvError::Cancelled { attempts: attempt });
            }

            debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let result = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    return Err(RkvError::Cancelled { attempts: attempt + 1 });
                }
                result = self.transport.send(request) => result,
            };

            let source = match result {
                Ok(reply) => return Ok(reply),
                Err(source) => source,
            };

            if attempt >= self.policy.retry_count {
                error!(
                    method = %request.method,
                    url = %request.url,
                    attempts = attempt + 1,
                    error = %source,
                    "request failed, giving up"
                );
                return Err(RkvError::Transport {
                    attempts: attempt + 1,
                    source,
                });
            }

            let backoff = self.policy.backoff(attempt);
            warn!(
                method = %request.method,
                url = %request.url,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %source,
                "request failed, retrying"
            );

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    return Err(RkvError::Cancelled { attempts: attempt + 1 });
                }
                _ = tokio::time::sleep(backoff) => {}
            }
            attempt += 1;
        }
    }
}
