//! Data-parallel stages of a recommendation request.
//!
//! This crate provides the two pure steps around the network fan-out:
//! - `split_ranges` cuts the candidate set into one range per worker
//! - `aggregate` merges the workers' partial results into the final answer
//!
//! ## Architecture
//! A request flows through:
//! 1. The splitter assigns each worker a contiguous range of candidates
//! 2. Workers score their range (remote, see the `server` crate)
//! 3. The aggregator ranks all partial results and keeps the top N
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{split_ranges, aggregate, DEFAULT_TOP_N};
//!
//! let ranges = split_ranges(candidates.len(), workers.len());
//! // ... dispatch candidates[range] to each worker, collect partials ...
//! let response = aggregate(&target, &candidates, partials, DEFAULT_TOP_N);
//! ```

pub mod aggregator;
pub mod splitter;

// Re-export main types
pub use aggregator::{DEFAULT_TOP_N, aggregate, rank};
pub use splitter::split_ranges;
