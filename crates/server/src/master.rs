//! The master node: accepts recommendation requests and answers each one
//! with the coordinator's aggregated result.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use node_client::WorkerPool;
use protocol::{codec, AggregatedResponse, Task};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::config::{ClusterConfig, ConfigError};
use crate::coordinator::Coordinator;
use crate::listener::accept_loop;

/// Error text sent back when a request cannot be read
pub const DECODE_FAILURE: &str = "failed to decode request";

#[derive(Debug, Clone)]
pub struct MasterNode {
    coordinator: Arc<Coordinator>,
    read_timeout: Duration,
}

impl MasterNode {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            read_timeout: protocol::READ_DEADLINE,
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers.clone(), config.retry_policy());
        info!(
            "Master configured with {} workers: {}",
            pool.len(),
            pool.nodes().join(", ")
        );
        Ok(Self::new(Coordinator::new(pool, config.top_n)))
    }

    /// Deadline for reading an inbound request (default: 5s)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind master node to {}", addr))?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        accept_loop(listener, "master", move |stream, peer| {
            handle_request(self.coordinator.clone(), stream, peer, self.read_timeout)
        })
        .await
    }
}

async fn handle_request(
    coordinator: Arc<Coordinator>,
    mut stream: TcpStream,
    peer: SocketAddr,
    read_timeout: Duration,
) -> Result<()> {
    let request: Task = match codec::read_message(&mut stream, read_timeout).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to decode request from {}: {}", peer, e);
            codec::write_message(&mut stream, &AggregatedResponse::failure(DECODE_FAILURE))
                .await
                .context("Failed to send error response")?;
            return Ok(());
        }
    };

    info!(
        "Request from {} for '{}' (id {}) with {} candidates",
        peer,
        request.target_movie.title,
        request.target_movie.id,
        request.movies.len()
    );

    let response = coordinator
        .recommend(request.target_movie, request.movies)
        .await;

    codec::write_message(&mut stream, &response)
        .await
        .context("Failed to send response")?;
    Ok(())
}
