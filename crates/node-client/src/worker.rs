//! Client for a single worker node.
//!
//! One call is one TCP exchange: connect (with bounded retries), write the
//! task, half-close, read the scores until the worker closes.

use std::io;
use std::time::Duration;

use protocol::{codec, SimilarityResult, Task};
use tokio::net::TcpStream;
use tracing::{debug, error, instrument, warn};

use crate::error::DispatchError;

/// Timeouts and retry budget for talking to workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Per-attempt connect timeout
    pub connect_timeout: Duration,
    /// Deadline for reading the full response after a successful connect
    pub read_timeout: Duration,
    /// Total connect attempts made by `dispatch` (at least one)
    pub max_attempts: u32,
    /// Fixed pause between two connect attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: protocol::READ_DEADLINE,
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkerClient {
    policy: RetryPolicy,
}

impl WorkerClient {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `task` to `node`, retrying the connect up to the attempt budget.
    ///
    /// Only the connect is retried. Once connected, a write or read failure
    /// is returned as `Transport` straight away.
    #[instrument(skip(self, task), fields(candidates = task.movies.len()))]
    pub async fn dispatch(
        &self,
        node: &str,
        task: &Task,
    ) -> Result<Vec<SimilarityResult>, DispatchError> {
        let stream = self.connect_with_retry(node).await?;
        self.exchange(node, stream, task).await
    }

    /// Send `task` to `node` with a single connect attempt.
    pub async fn send_once(
        &self,
        node: &str,
        task: &Task,
    ) -> Result<Vec<SimilarityResult>, DispatchError> {
        let stream = connect(node, self.policy.connect_timeout)
            .await
            .map_err(|source| DispatchError::Unreachable {
                node: node.to_string(),
                attempts: 1,
                source,
            })?;
        self.exchange(node, stream, task).await
    }

    async fn connect_with_retry(&self, node: &str) -> Result<TcpStream, DispatchError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match connect(node, self.policy.connect_timeout).await {
                Ok(stream) => return Ok(stream),
                Err(e) if attempt < attempts => {
                    warn!(
                        "Failed to connect to worker {}: {} (attempt {}/{}), retrying",
                        node, e, attempt, attempts
                    );
                    tokio::time::sleep(self.policy.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Worker {} unreachable after {} attempts: {}", node, attempts, e);
                    return Err(DispatchError::Unreachable {
                        node: node.to_string(),
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }

    async fn exchange(
        &self,
        node: &str,
        mut stream: TcpStream,
        task: &Task,
    ) -> Result<Vec<SimilarityResult>, DispatchError> {
        debug!("Sending {} candidates to worker {}", task.movies.len(), node);

        codec::write_message(&mut stream, task)
            .await
            .map_err(|e| DispatchError::from_codec(node, e))?;

        let results: Vec<SimilarityResult> =
            codec::read_message(&mut stream, self.policy.read_timeout)
                .await
                .map_err(|e| DispatchError::from_codec(node, e))?;

        debug!("Worker {} returned {} results", node, results.len());
        Ok(results)
    }
}

/// TCP connect bounded by `timeout`; an elapsed timeout becomes `TimedOut`.
pub(crate) async fn connect(addr: &str, timeout: Duration) -> io::Result<TcpStream> {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect timed out after {:?}", timeout),
        )),
    }
}
