//! Fan-in: merge partial results, rank them, join them back to movies.

use std::collections::HashMap;

use data_loader::{Movie, MovieId};
use protocol::{AggregatedResponse, EnrichedMovie, SimilarityResult};
use tracing::{debug, warn};

/// Number of recommendations returned per request
pub const DEFAULT_TOP_N: usize = 10;

/// Flatten partial result lists and keep the `limit` best.
///
/// Input order is preserved for equal scores (stable sort), so the tie-break
/// is the order in which partials were collected. NaN scores carry no ranking
/// information and are dropped.
pub fn rank(partials: Vec<Vec<SimilarityResult>>, limit: usize) -> Vec<SimilarityResult> {
    let mut combined: Vec<SimilarityResult> = partials.into_iter().flatten().collect();

    let before = combined.len();
    combined.retain(|r| !r.similarity.is_nan());
    if combined.len() != before {
        warn!("Dropped {} results with NaN similarity", before - combined.len());
    }

    combined.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    combined.truncate(limit);
    combined
}

/// Build the final response for one request.
///
/// Ranked ids are looked up in `candidates` (the request's full candidate
/// set). An id the master does not know means the worker and master saw
/// different datasets; that entry is skipped.
pub fn aggregate(
    target: &Movie,
    candidates: &[Movie],
    partials: Vec<Vec<SimilarityResult>>,
    limit: usize,
) -> AggregatedResponse {
    let ranked = rank(partials, limit);

    let mut by_id: HashMap<MovieId, &Movie> = HashMap::with_capacity(candidates.len());
    for movie in candidates {
        by_id.entry(movie.id).or_insert(movie);
    }

    let enriched: Vec<EnrichedMovie> = ranked
        .into_iter()
        .filter_map(|result| match by_id.get(&result.id) {
            Some(movie) => Some(EnrichedMovie::from_movie(movie, result.similarity)),
            None => {
                warn!("Worker returned unknown movie id {}, skipping", result.id);
                None
            }
        })
        .collect();

    debug!(
        "Aggregated {} recommendations for '{}'",
        enriched.len(),
        target.title
    );
    AggregatedResponse::success(target.title.clone(), enriched)
}
