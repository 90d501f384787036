//! Taxonomy normalization
//!
//! Maps provider taxonomies (Aladin category paths, TMDB genre ids and
//! country codes) onto the fixed destination vocabulary. Tables are
//! allow-lists: a provider label either maps to a known tag, is explicitly
//! ignored, or is unknown, and only the first case ever produces a tag.

mod category_path;
mod genre_ids;
pub mod tables;

pub use category_path::normalize_category_path;
pub use genre_ids::normalize_genre_ids;

use serde::{Deserialize, Serialize};

/// Maximum number of genre tags written per entry
pub const MAX_GENRES: usize = 3;

/// Result of looking up a provider label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// Maps onto a destination tag
    Genre(&'static str),
    /// Known label that must never become a tag
    Ignore,
    /// Not in the table
    Unknown,
}

impl Mapping {
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Mapping::Genre(tag) => Some(tag),
            Mapping::Ignore | Mapping::Unknown => None,
        }
    }
}

/// Destination tags inferred for one catalog item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// At most [`MAX_GENRES`] tags, no duplicates, most specific first
    pub genres: Vec<String>,
    pub country: Option<String>,
}

/// Insertion-ordered, duplicate-free tag accumulator
#[derive(Debug, Default)]
pub(crate) struct GenreSet(Vec<&'static str>);

impl GenreSet {
    /// Append `tag` unless already present
    pub(crate) fn insert(&mut self, tag: &'static str) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub(crate) fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| *t == tag)
    }

    pub(crate) fn any_of(&self, tags: &[&str]) -> bool {
        self.0.iter().any(|t| tags.contains(t))
    }

    /// Cap at [`MAX_GENRES`], keeping the earliest entries
    pub(crate) fn into_capped(mut self) -> Vec<String> {
        self.0.truncate(MAX_GENRES);
        self.0.into_iter().map(String::from).collect()
    }
}
