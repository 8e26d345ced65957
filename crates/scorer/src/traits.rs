//! Core trait for worker-side scoring.
//!
//! A worker node knows nothing about how similarity is computed; it hands
//! each incoming task to a `SimilarityScorer` and ships back what it returns.

use data_loader::Movie;
use protocol::SimilarityResult;

/// Scores candidate movies against a target movie.
///
/// ## Contract
/// - One result per scored candidate, in candidate order
/// - Higher similarity means more similar
/// - The target itself may be skipped, nothing else may be reordered
///
/// `Send + Sync` so one scorer can serve every connection of a worker node.
pub trait SimilarityScorer: Send + Sync {
    /// Returns the name of this scorer (for logging)
    fn name(&self) -> &str;

    fn score(&self, target: &Movie, candidates: &[Movie]) -> Vec<SimilarityResult>;
}
