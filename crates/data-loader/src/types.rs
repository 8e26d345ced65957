//! Core domain types for the movie catalog.
//!
//! The `Movie` record doubles as the wire representation of a movie: the
//! master, the workers and the gateway all exchange it verbatim, so the serde
//! field names here are part of the cluster protocol.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the catalog's primary key)
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// One catalog record.
///
/// Text fields are kept as the dataset ships them (free text, comma or pipe
/// separated lists); tokenising them is the scorer's business. Missing fields
/// decode as empty strings so partially populated datasets still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub characters: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub crew: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub imdb_id: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: String,
}

impl Movie {
    /// Create a movie with only an id and a title; every other field empty.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// MovieCatalog - The In-Memory Dataset
// =============================================================================

/// The loaded dataset plus lookup indices.
///
/// `movies` keeps file order: it is the ordered candidate set the master
/// splits into ranges, so reordering it would change which worker scores
/// which movie.
#[derive(Debug, Default)]
pub struct MovieCatalog {
    pub(crate) movies: Vec<Movie>,
    /// Position in `movies` by id
    pub(crate) by_id: HashMap<MovieId, usize>,
    /// Position in `movies` by lower-cased title (first occurrence wins)
    pub(crate) by_title: HashMap<String, usize>,
}

impl MovieCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// All movies in dataset order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The first `n` movies in dataset order (fewer if the catalog is smaller)
    pub fn first_n(&self, n: usize) -> &[Movie] {
        &self.movies[..n.min(self.movies.len())]
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Case-insensitive exact title lookup
    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        self.by_title
            .get(&normalize_title(title))
            .map(|&pos| &self.movies[pos])
    }

    /// Append a movie and index it.
    ///
    /// Returns `false` (and leaves the catalog untouched) when the id is
    /// already present.
    pub fn insert_movie(&mut self, movie: Movie) -> bool {
        if self.by_id.contains_key(&movie.id) {
            return false;
        }
        let pos = self.movies.len();
        self.by_id.insert(movie.id, pos);
        self.by_title
            .entry(normalize_title(&movie.title))
            .or_insert(pos);
        self.movies.push(movie);
        true
    }
}

pub(crate) fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
