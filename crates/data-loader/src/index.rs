//! Catalog building and lookup logic.
//!
//! Builds the `MovieCatalog` from parsed records and provides the
//! substring search used by the CLI. Search runs over the whole catalog in
//! parallel with Rayon; lookups by id and title are O(1) through the indices
//! kept in `types.rs`.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

impl MovieCatalog {
    /// Load the catalog from a JSON file
    ///
    /// Fails on an empty catalog or on duplicate ids: the master joins
    /// worker results back to records by id, so ids must be unique.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {}", path.display());

        let movies = parser::parse_movies(path)?;
        let catalog = Self::build(movies, &path.display().to_string())?;

        info!("Loaded {} movies", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from in-memory records, preserving their order
    pub fn from_movies(movies: Vec<Movie>) -> Result<Self> {
        Self::build(movies, "<memory>")
    }

    fn build(movies: Vec<Movie>, source: &str) -> Result<Self> {
        if movies.is_empty() {
            return Err(DataLoadError::ValidationError(format!(
                "{} contains no movies",
                source
            )));
        }

        let mut catalog = MovieCatalog::new();
        catalog.movies.reserve(movies.len());
        for movie in movies {
            let id = movie.id;
            if !catalog.insert_movie(movie) {
                return Err(DataLoadError::DuplicateId {
                    file: source.to_string(),
                    id,
                });
            }
        }
        Ok(catalog)
    }

    /// Case-insensitive title search
    ///
    /// Exact title matches come first, then substring matches; within each
    /// group dataset order is kept. At most `limit` movies are returned.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Movie> {
        let needle = normalize_title(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, usize, &Movie)> = self
            .movies
            .par_iter()
            .enumerate()
            .filter_map(|(pos, movie)| {
                let title = normalize_title(&movie.title);
                if title == needle {
                    Some((0, pos, movie))
                } else if title.contains(&needle) {
                    Some((1, pos, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by_key(|&(rank, pos, _)| (rank, pos));
        matches.truncate(limit);
        matches.into_iter().map(|(_, _, movie)| movie).collect()
    }
}
