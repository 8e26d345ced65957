//! The fixed, ordered set of worker nodes and the reassignment policy.

use std::sync::Arc;

use protocol::{SimilarityResult, Task};
use tracing::{info, warn};

use crate::error::DispatchError;
use crate::worker::{RetryPolicy, WorkerClient};

/// A range that was scored by a node other than the one it was assigned to
#[derive(Debug, Clone)]
pub struct Reassigned {
    pub node: String,
    pub results: Vec<SimilarityResult>,
}

/// The worker addresses known at startup plus the client used to reach them.
///
/// The address order is significant: ranges are assigned in this order and
/// reassignment walks it from the front. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    nodes: Arc<[String]>,
    client: WorkerClient,
}

impl WorkerPool {
    pub fn new(nodes: Vec<String>, policy: RetryPolicy) -> Self {
        Self {
            nodes: nodes.into(),
            client: WorkerClient::new(policy),
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn client(&self) -> &WorkerClient {
        &self.client
    }

    /// Offer `task` to every node except `failed`, in pool order.
    ///
    /// Each fallback node gets a single attempt (no connect retries). The
    /// first node that returns a usable answer wins. If none does, the error
    /// names the node that originally failed.
    pub async fn reassign(&self, task: &Task, failed: &str) -> Result<Reassigned, DispatchError> {
        for node in self.nodes.iter().filter(|n| n.as_str() != failed) {
            match self.client.send_once(node, task).await {
                Ok(results) => {
                    info!("Reassigned range of worker {} to worker {}", failed, node);
                    return Ok(Reassigned {
                        node: node.clone(),
                        results,
                    });
                }
                Err(e) => {
                    warn!(
                        "Failed to reassign range of worker {} to worker {}: {}",
                        failed, node, e
                    );
                }
            }
        }

        Err(DispatchError::Exhausted {
            failed: failed.to_string(),
        })
    }
}
