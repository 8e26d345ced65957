//! # Scorer Crate
//!
//! Similarity scoring run inside worker nodes.
//!
//! ## Components
//!
//! ### SimilarityScorer
//! The contract a worker node depends on: target + candidate slice in,
//! one `SimilarityResult` per candidate out.
//!
//! ### FeatureScorer
//! Content-based default implementation:
//! - Token overlap per field (genres, keywords, cast, director, crew)
//! - Weighted mean of the overlaps
//! - Small bonus for well-rated movies
//!
//! ## Example Usage
//!
//! ```ignore
//! use scorer::{FeatureScorer, SimilarityScorer};
//!
//! let scorer = FeatureScorer::new();
//! let results = scorer.score(&task.target_movie, &task.movies);
//! ```

// Public modules
pub mod features;
pub mod feature_scorer;
pub mod traits;

// Re-export commonly used types
pub use feature_scorer::{FeatureScorer, FieldWeights};
pub use traits::SimilarityScorer;

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;
    use std::sync::Arc;

    #[test]
    fn test_scorer_is_shareable() {
        let scorer: Arc<dyn SimilarityScorer> = Arc::new(FeatureScorer::default());
        let target = Movie::new(1, "Target");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let scorer = scorer.clone();
                let target = target.clone();
                std::thread::spawn(move || scorer.score(&target, &[Movie::new(i + 2, "Other")]))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().len(), 1);
        }
        assert_eq!(scorer.name(), "FeatureScorer");
    }
}
