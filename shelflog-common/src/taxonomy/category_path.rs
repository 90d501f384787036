//! Aladin category paths
//!
//! A path looks like `국내도서>소설/시/희곡>독일소설`: `>` separates
//! segments from general to specific, and `/` joins alternatives inside a
//! segment unless the whole segment is a known group category.

use super::tables::{
    self, COUNTRY_KEYWORDS, DOMESTIC_TOP, FICTION, FICTION_SUBGENRES, HOME_COUNTRY,
    REGION_PREFIXES,
};
use super::{GenreSet, Mapping, Taxonomy};

const SEGMENT_DELIMITER: char = '>';
const PART_DELIMITER: char = '/';

/// Infer destination genres and country from a category path
pub fn normalize_category_path(path: &str) -> Taxonomy {
    let path = path.trim();
    if path.is_empty() {
        return Taxonomy::default();
    }

    let segments: Vec<&str> = path.split(SEGMENT_DELIMITER).map(str::trim).collect();
    let (top, below) = match segments.split_first() {
        Some((top, below)) => (*top, below),
        None => return Taxonomy::default(),
    };

    Taxonomy {
        genres: infer_genres(below),
        country: infer_country(top, below).map(String::from),
    }
}

fn infer_country(top: &str, below: &[&str]) -> Option<&'static str> {
    let haystack = below.join(" ");

    let foreign = COUNTRY_KEYWORDS
        .iter()
        .filter(|(name, _)| *name != HOME_COUNTRY)
        .find(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(name, _)| *name);

    match foreign {
        Some(name) => Some(name),
        None if top == DOMESTIC_TOP => Some(HOME_COUNTRY),
        None => None,
    }
}

fn infer_genres(below: &[&str]) -> Vec<String> {
    let mut genres = GenreSet::default();

    // Most specific segment first so it claims its slot before broader ones
    for segment in below.iter().rev().filter(|s| !s.is_empty()) {
        match tables::group_category(segment) {
            Mapping::Genre(tag) => {
                genres.insert(tag);
                continue;
            }
            Mapping::Ignore => continue,
            Mapping::Unknown => {}
        }

        for part in segment.split(PART_DELIMITER) {
            let token = strip_region_prefix(part.trim());
            if token.is_empty() {
                continue;
            }
            if let Some(tag) = tables::category_token(token).tag() {
                genres.insert(tag);
            }
        }
    }

    if genres.any_of(FICTION_SUBGENRES) && !genres.contains(FICTION) {
        genres.insert(FICTION);
    }

    genres.into_capped()
}

/// Remove the first matching regional prefix, e.g. `독일소설` → `소설`
fn strip_region_prefix(token: &str) -> &str {
    REGION_PREFIXES
        .iter()
        .find_map(|prefix| token.strip_prefix(prefix))
        .map(str::trim)
        .unwrap_or(token)
}
