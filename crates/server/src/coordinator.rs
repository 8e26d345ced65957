//! # Fan-out / fan-in coordinator
//!
//! One request is processed as follows:
//! 1. Split the candidates into one contiguous range per worker
//! 2. Spawn one dispatch task per range (all ranges in flight at once)
//! 3. A failed range is reassigned to another worker when the failure allows it
//! 4. Every successful range is sent over a bounded channel
//! 5. Wait until every dispatch task has finished
//! 6. Rank the collected scores and join them back to the candidates
//!
//! A range that cannot be scored anywhere is dropped and the request still
//! completes with what the other ranges produced.

use std::time::Instant;

use data_loader::Movie;
use node_client::{DispatchError, Reassigned, WorkerPool};
use pipeline::{aggregate, split_ranges};
use protocol::{AggregatedResponse, SimilarityResult, Task};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Scores for one range, tagged with where they came from
#[derive(Debug)]
struct RangeOutcome {
    index: usize,
    node: String,
    results: Vec<SimilarityResult>,
}

#[derive(Debug, Clone)]
pub struct Coordinator {
    pool: WorkerPool,
    top_n: usize,
}

impl Coordinator {
    pub fn new(pool: WorkerPool, top_n: usize) -> Self {
        Self { pool, top_n }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Score `candidates` against `target` across the worker pool.
    ///
    /// Never fails: worker failures only shrink the result list.
    #[instrument(skip_all, fields(target = target.id, candidates = candidates.len()))]
    pub async fn recommend(&self, target: Movie, candidates: Vec<Movie>) -> AggregatedResponse {
        let start_time = Instant::now();
        let ranges = split_ranges(candidates.len(), self.pool.len());

        let (tx, mut rx) = mpsc::channel::<RangeOutcome>(self.pool.len().max(1));
        let mut dispatches = JoinSet::new();

        for (index, (range, node)) in ranges.into_iter().zip(self.pool.nodes()).enumerate() {
            debug!("Range {} ({:?}) assigned to worker {}", index, range, node);
            let task = Task::new(target.clone(), candidates[range].to_vec());
            let pool = self.pool.clone();
            let node = node.clone();
            let tx = tx.clone();

            dispatches.spawn(async move {
                let Some(outcome) = score_range(&pool, index, node, &task).await else {
                    return;
                };
                if tx.send(outcome).await.is_err() {
                    warn!("Result channel closed before range {} was delivered", index);
                }
            });
        }
        drop(tx);

        // Barrier: every range has either delivered or been given up on
        while let Some(joined) = dispatches.join_next().await {
            if let Err(e) = joined {
                error!("Dispatch task ended abnormally: {}", e);
            }
        }

        let mut partials = Vec::with_capacity(self.pool.len());
        while let Some(outcome) = rx.recv().await {
            debug!(
                "Range {} scored by {}: {} results",
                outcome.index,
                outcome.node,
                outcome.results.len()
            );
            partials.push(outcome.results);
        }

        let response = aggregate(&target, &candidates, partials, self.top_n);
        info!(
            "Request for '{}' answered with {} recommendations in {:.2?}",
            target.title,
            response.movie_response.len(),
            start_time.elapsed()
        );
        response
    }
}

/// Dispatch one range to its worker, falling back to reassignment.
async fn score_range(
    pool: &WorkerPool,
    index: usize,
    node: String,
    task: &Task,
) -> Option<RangeOutcome> {
    let failure = match pool.client().dispatch(&node, task).await {
        Ok(results) => {
            return Some(RangeOutcome {
                index,
                node,
                results,
            });
        }
        Err(e) => e,
    };

    if !failure.is_reassignable() {
        error!("Dropping range {} ({} candidates): {}", index, task.movies.len(), failure);
        return None;
    }

    warn!("Range {} failed on worker {}: {}, reassigning", index, node, failure);
    match pool.reassign(task, &node).await {
        Ok(Reassigned { node, results }) => Some(RangeOutcome {
            index,
            node,
            results,
        }),
        Err(e @ DispatchError::Exhausted { .. }) => {
            error!("Dropping range {} ({} candidates): {}", index, task.movies.len(), e);
            None
        }
        Err(e) => {
            error!("Dropping range {}: unexpected reassignment failure: {}", index, e);
            None
        }
    }
}
