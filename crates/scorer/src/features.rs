//! Token features extracted from a movie's text fields.
//!
//! Catalog text fields are loosely formatted lists ("Action|Adventure",
//! "SamWorthington, ZoeSaldana", free-form keywords). Each field is turned into
//! a set of lower-cased tokens so that two movies can be compared field by
//! field with Jaccard overlap.

use std::collections::HashSet;

use data_loader::Movie;

/// Per-field token sets for one movie
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenProfile {
    pub genres: HashSet<String>,
    pub keywords: HashSet<String>,
    /// Actors and the characters they play
    pub cast: HashSet<String>,
    pub director: HashSet<String>,
    pub crew: HashSet<String>,
}

impl TokenProfile {
    pub fn from_movie(movie: &Movie) -> Self {
        let mut cast = tokenize(&movie.actors);
        cast.extend(tokenize(&movie.characters));

        Self {
            genres: tokenize(&movie.genres),
            keywords: tokenize(&movie.keywords),
            cast,
            director: tokenize(&movie.director),
            crew: tokenize(&movie.crew),
        }
    }
}

/// Split on whitespace, commas and pipes; lower-case; drop empties.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '|')
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// |a ∩ b| / |a ∪ b|, zero when both sets are empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed_separators() {
        let tokens = tokenize("Action|Science Fiction, Adventure");
        assert_eq!(tokens.len(), 4);
        assert!(tokens.contains("science"));
        assert!(tokens.contains("adventure"));
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        let tokens = tokenize("\"dream\", (heist)");
        assert!(tokens.contains("dream"));
        assert!(tokens.contains("heist"));
        assert!(tokenize("  , | ").is_empty());
    }

    #[test]
    fn test_jaccard() {
        let a = tokenize("a b c");
        let b = tokenize("b c d");
        assert_eq!(jaccard(&a, &b), 0.5);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
        assert_eq!(jaccard(&a, &HashSet::new()), 0.0);
    }

    #[test]
    fn test_profile_merges_cast_fields() {
        let movie = Movie {
            actors: "LeonardoDiCaprio".to_string(),
            characters: "Cobb".to_string(),
            ..Movie::new(1, "Inception")
        };
        let profile = TokenProfile::from_movie(&movie);
        assert_eq!(profile.cast.len(), 2);
        assert!(profile.cast.contains("cobb"));
    }
}
