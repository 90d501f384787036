//! Search query reformulation
//!
//! Korean catalog search is sensitive to spacing: `달리기를 말할때` and
//! `달리기를말할때` can return different result sets. When a search comes
//! back empty the caller may retry once with the spacing variant.

/// Hangul syllables block
fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// True if `text` contains at least one Hangul syllable
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(is_hangul_syllable)
}

fn has_hangul_run(text: &str, len: usize) -> bool {
    let mut run = 0;
    for c in text.chars() {
        if is_hangul_syllable(c) {
            run += 1;
            if run >= len {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Alternate spelling to try when `query` found nothing.
///
/// Spaced queries collapse their whitespace; unspaced queries with two or
/// more consecutive Hangul syllables get one space between characters.
pub fn reformulate(query: &str) -> Option<String> {
    let query = query.trim();
    if query.chars().any(char::is_whitespace) {
        let collapsed: String = query.chars().filter(|c| !c.is_whitespace()).collect();
        return Some(collapsed);
    }
    if has_hangul_run(query, 2) {
        let spaced = query
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ");
        return Some(spaced);
    }
    None
}
