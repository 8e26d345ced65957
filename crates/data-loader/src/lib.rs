//! # Data Loader Crate
//!
//! This crate loads the movie catalog into memory and indexes it.
//!
//! ## Main Components
//!
//! - **types**: `Movie` (also the wire representation) and `MovieCatalog`
//! - **parser**: Parse the JSON catalog file into `Movie` records
//! - **index**: Build the catalog, validate it, search it
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::MovieCatalog;
//! use std::path::Path;
//!
//! let catalog = MovieCatalog::load_from_file(Path::new("data/movies.json"))?;
//!
//! let target = catalog.find_by_title("the dark knight").unwrap();
//! println!("{} has id {}", target.title, target.id);
//! ```
//!
//! The catalog is read-only once built; share it behind an `Arc`.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Movie, MovieCatalog, MovieId};
