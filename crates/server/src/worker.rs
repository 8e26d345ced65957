//! The worker node: scores whatever range the master sends it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use protocol::{codec, Task};
use scorer::SimilarityScorer;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

use crate::listener::accept_loop;

#[derive(Clone)]
pub struct WorkerNode {
    scorer: Arc<dyn SimilarityScorer>,
    read_timeout: Duration,
}

impl WorkerNode {
    pub fn new(scorer: impl SimilarityScorer + 'static) -> Self {
        Self {
            scorer: Arc::new(scorer),
            read_timeout: protocol::READ_DEADLINE,
        }
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind worker node to {}", addr))?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        accept_loop(listener, "worker", move |stream, peer| {
            handle_task(self.scorer.clone(), stream, peer, self.read_timeout)
        })
        .await
    }
}

/// A task that cannot be read gets no answer; the master sees an empty reply.
async fn handle_task(
    scorer: Arc<dyn SimilarityScorer>,
    mut stream: TcpStream,
    peer: SocketAddr,
    read_timeout: Duration,
) -> Result<()> {
    let task: Task = match codec::read_message(&mut stream, read_timeout).await {
        Ok(task) => task,
        Err(e) => {
            warn!("Failed to decode task from {}: {}", peer, e);
            stream.shutdown().await.ok();
            return Ok(());
        }
    };

    debug!(
        "Scoring {} candidates against '{}' with {}",
        task.movies.len(),
        task.target_movie.title,
        scorer.name()
    );

    let results = tokio::task::spawn_blocking(move || scorer.score(&task.target_movie, &task.movies))
        .await
        .context("Scoring task panicked")?;

    codec::write_message(&mut stream, &results)
        .await
        .context("Failed to send scores")?;
    Ok(())
}
