//! Parser for the movie catalog file.
//!
//! The catalog is a single JSON array of movie records:
//!
//! ```json
//! [{"id": 19995, "title": "Avatar", "genres": "Action Adventure", ...}, ...]
//! ```

use crate::error::{DataLoadError, Result};
use crate::types::Movie;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Parse a catalog file into movie records, in file order
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let bytes = read_bytes(path)?;
    parse_movies_from_slice(&bytes, &path.display().to_string())
}

/// Parse catalog bytes; `source` names the origin in error messages
pub fn parse_movies_from_slice(bytes: &[u8], source: &str) -> Result<Vec<Movie>> {
    serde_json::from_slice(bytes).map_err(|e| DataLoadError::ParseError {
        file: source.to_string(),
        line: e.line(),
        column: e.column(),
        reason: e.to_string(),
    })
}
