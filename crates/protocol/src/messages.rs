//! Message shapes exchanged between gateway, master and workers.
//!
//! Field names are the JSON names on the wire; do not rename them without
//! updating every node in the cluster.

use data_loader::{Movie, MovieId};
use serde::{Deserialize, Serialize};

/// A recommendation request (gateway → master) or a sub-task (master → worker).
///
/// Both directions use the same shape; a sub-task simply carries one range of
/// the request's candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub target_movie: Movie,
    #[serde(default)]
    pub movies: Vec<Movie>,
}

impl Task {
    pub fn new(target_movie: Movie, movies: Vec<Movie>) -> Self {
        Self {
            target_movie,
            movies,
        }
    }
}

/// One candidate's score as produced by a worker (worker → master)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: MovieId,
    pub similarity: f64,
}

impl SimilarityResult {
    pub fn new(id: MovieId, similarity: f64) -> Self {
        Self { id, similarity }
    }
}

/// A ranked candidate joined back to its catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMovie {
    pub id: MovieId,
    pub title: String,
    pub characters: String,
    pub actors: String,
    pub director: String,
    pub genres: String,
    pub imdb_id: String,
    pub vote_average: f64,
    pub poster_path: String,
    pub overview: String,
    pub similarity: f64,
}

impl EnrichedMovie {
    pub fn from_movie(movie: &Movie, similarity: f64) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            characters: movie.characters.clone(),
            actors: movie.actors.clone(),
            director: movie.director.clone(),
            genres: movie.genres.clone(),
            imdb_id: movie.imdb_id.clone(),
            vote_average: movie.vote_average,
            poster_path: movie.poster_path.clone(),
            overview: movie.overview.clone(),
            similarity,
        }
    }
}

/// Final answer for one request (master → gateway)
///
/// An empty `error` means success. An empty `movie_response` with an empty
/// `error` is a valid answer; callers report it as "no recommendations".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub movie_response: Vec<EnrichedMovie>,
    #[serde(default)]
    pub target_movie: String,
}

impl AggregatedResponse {
    pub fn success(target_movie: impl Into<String>, movie_response: Vec<EnrichedMovie>) -> Self {
        Self {
            error: String::new(),
            movie_response,
            target_movie: target_movie.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}
