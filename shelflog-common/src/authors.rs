//! Creator string parsing
//!
//! Book providers return creators as one comma-joined string with role
//! markers, e.g. `한강 (지은이), 데보라 스미스 (옮긴이)`. Only authors are
//! kept.

/// Role markers that exclude a name from the author list
pub const EXCLUDED_ROLES: &[&str] = &[
    "옮긴이", "역자", "번역", "그림", "일러스트", "편집", "감수", "엮은이", "사진",
];

/// Split a raw creator string into author names.
///
/// A part is dropped when any of its parenthetical markers is an excluded
/// role. Remaining parts lose every parenthetical group.
pub fn parse_authors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !parentheticals(part).any(|role| EXCLUDED_ROLES.contains(&role)))
        .map(strip_parentheticals)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Contents of every closed `( … )` group in `text`
fn parentheticals(text: &str) -> impl Iterator<Item = &str> {
    text.split('(')
        .skip(1)
        .filter_map(|rest| rest.split_once(')').map(|(inner, _)| inner))
}

fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(rest[..open].trim_end());
                out.push(' ');
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translator_excluded() {
        assert_eq!(
            parse_authors("한강 (지은이), 데보라 스미스 (옮긴이)"),
            vec!["한강"]
        );
    }

    #[test]
    fn test_unmarked_names_kept() {
        assert_eq!(
            parse_authors("무라카미 하루키, 안자이 미즈마루"),
            vec!["무라카미 하루키", "안자이 미즈마루"]
        );
    }

    #[test]
    fn test_every_excluded_role() {
        for role in EXCLUDED_ROLES {
            let raw = format!("작가 (지은이), 누군가 ({role})");
            assert_eq!(parse_authors(&raw), vec!["작가"], "role {role}");
        }
    }

    #[test]
    fn test_other_markers_stripped() {
        assert_eq!(parse_authors("Haruki Murakami (원작)"), vec!["Haruki Murakami"]);
        assert_eq!(parse_authors("김영하(지은이)"), vec!["김영하"]);
    }

    #[test]
    fn test_marker_must_match_whole_role() {
        // "사진가" is not the photographer marker "사진"
        assert_eq!(parse_authors("홍길동 (사진가)"), vec!["홍길동"]);
    }

    #[test]
    fn test_empty_parts_skipped() {
        assert!(parse_authors("").is_empty());
        assert!(parse_authors(" , (지은이)").is_empty());
    }

    #[test]
    fn test_unclosed_parenthesis_kept_verbatim() {
        assert_eq!(parse_authors("이름 (지은이"), vec!["이름 (지은이"]);
    }
}
