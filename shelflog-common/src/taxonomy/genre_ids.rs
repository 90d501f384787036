//! TMDB genre id lists and origin country codes

use super::tables;
use super::{GenreSet, Taxonomy};

/// Map TMDB genre ids and country codes onto destination tags.
///
/// Country is the first code with a known mapping.
pub fn normalize_genre_ids<S: AsRef<str>>(genre_ids: &[u32], country_codes: &[S]) -> Taxonomy {
    let mut genres = GenreSet::default();
    for tag in genre_ids.iter().filter_map(|id| tables::tmdb_genre(*id).tag()) {
        genres.insert(tag);
    }

    Taxonomy {
        genres: genres.into_capped(),
        country: country_codes
            .iter()
            .find_map(|code| tables::country_code(code.as_ref()))
            .map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_CODES: &[&str] = &[];

    #[test]
    fn test_ids_map_and_dedupe() {
        // Horror and Thriller both land on 스릴러
        let t = normalize_genre_ids(&[27, 53, 9648], &["US"]);
        assert_eq!(t.genres, vec!["스릴러", "미스터리"]);
        assert_eq!(t.country.as_deref(), Some("미국"));
    }

    #[test]
    fn test_ignored_and_unknown_ids_dropped() {
        let t = normalize_genre_ids(&[10770, 37, 424242, 18], NO_CODES);
        assert_eq!(t.genres, vec!["드라마"]);
        assert_eq!(t.country, None);
    }

    #[test]
    fn test_genre_cap() {
        let t = normalize_genre_ids(&[28, 12, 16, 35, 80], NO_CODES);
        assert_eq!(t.genres.len(), 3);
        assert_eq!(t.genres, vec!["액션", "모험", "애니메이션"]);
    }

    #[test]
    fn test_country_skips_unmapped_codes() {
        let t = normalize_genre_ids(&[], &["XX", "KR", "US"]);
        assert_eq!(t.country.as_deref(), Some("한국"));

        let t = normalize_genre_ids(&[], &["XX", "ZZ"]);
        assert_eq!(t.country, None);
    }

    #[test]
    fn test_tv_ids() {
        let t = normalize_genre_ids(&[10765, 10759, 10766], &["KR".to_string()]);
        assert_eq!(t.genres, vec!["SF", "액션"]);
    }
}
