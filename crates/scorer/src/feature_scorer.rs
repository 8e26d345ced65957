//! Content-based scorer over token overlap.
//!
//! ## Algorithm
//! 1. Build the target's `TokenProfile` once
//! 2. For every candidate (in parallel), compute the Jaccard overlap of each
//!    field with the target's
//! 3. Combine the overlaps as a weighted mean
//! 4. Add a small quality bonus from `vote_average` (0..10 scaled to 0..1)
//!
//! The result lies in `[0, 1 + vote_weight]`.

use data_loader::Movie;
use protocol::SimilarityResult;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::features::{TokenProfile, jaccard};
use crate::traits::SimilarityScorer;

/// Relative weight of each field in the overlap score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub genres: f64,
    pub keywords: f64,
    pub cast: f64,
    pub director: f64,
    pub crew: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            genres: 0.3,
            keywords: 0.3,
            cast: 0.2,
            director: 0.15,
            crew: 0.05,
        }
    }
}

impl FieldWeights {
    fn total(&self) -> f64 {
        self.genres + self.keywords + self.cast + self.director + self.crew
    }
}

/// Default scorer run by worker nodes
#[derive(Debug, Clone)]
pub struct FeatureScorer {
    weights: FieldWeights,
    /// Weight of the normalised vote average
    vote_weight: f64,
}

impl FeatureScorer {
    pub fn new() -> Self {
        Self {
            weights: FieldWeights::default(),
            vote_weight: 0.05,
        }
    }

    /// Configure per-field weights (default: genres and keywords dominate)
    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Configure the vote-average bonus weight (default: 0.05)
    pub fn with_vote_weight(mut self, weight: f64) -> Self {
        self.vote_weight = weight;
        self
    }

    fn score_one(&self, target: &TokenProfile, candidate: &Movie) -> f64 {
        let profile = TokenProfile::from_movie(candidate);
        let w = &self.weights;

        let overlap = w.genres * jaccard(&target.genres, &profile.genres)
            + w.keywords * jaccard(&target.keywords, &profile.keywords)
            + w.cast * jaccard(&target.cast, &profile.cast)
            + w.director * jaccard(&target.director, &profile.director)
            + w.crew * jaccard(&target.crew, &profile.crew);

        let total = w.total();
        let overlap = if total > 0.0 { overlap / total } else { 0.0 };

        let quality = (candidate.vote_average / 10.0).clamp(0.0, 1.0);
        overlap + self.vote_weight * quality
    }
}

impl Default for FeatureScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer for FeatureScorer {
    fn name(&self) -> &str {
        "FeatureScorer"
    }

    #[instrument(skip(self, target, candidates), fields(target_id = target.id, candidates = candidates.len()))]
    fn score(&self, target: &Movie, candidates: &[Movie]) -> Vec<SimilarityResult> {
        let target_profile = TokenProfile::from_movie(target);

        let results: Vec<SimilarityResult> = candidates
            .par_iter()
            .filter(|m| m.id != target.id)
            .map(|m| SimilarityResult::new(m.id, self.score_one(&target_profile, m)))
            .collect();

        debug!("Scored {} candidates", results.len());
        results
    }
}
