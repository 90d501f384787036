//! Fixed mapping tables onto the destination vocabulary
//!
//! `None` entries are known provider categories that must never become a
//! destination tag. Anything absent from a table is `Mapping::Unknown`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::Mapping;

/// Country assumed for domestic titles
pub const HOME_COUNTRY: &str = "한국";

/// Top-level Aladin segment for domestic titles
pub const DOMESTIC_TOP: &str = "국내도서";

/// Generic fiction tag
pub const FICTION: &str = "소설";

/// Subgenres shelved under general fiction
pub const FICTION_SUBGENRES: &[&str] = &[
    "미스터리", "스릴러", "SF", "판타지", "로맨스", "액션", "모험", "범죄",
];

/// Country precedence list with keyword variants.
///
/// Order is precedence: the first country with any keyword hit wins.
pub const COUNTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("한국", &["한국"]),
    ("독일", &["독일", "독문"]),
    ("영국", &["영국"]),
    ("미국", &["미국"]),
    ("프랑스", &["프랑스", "불문"]),
    ("일본", &["일본", "일문"]),
    ("중국", &["중국", "중문"]),
    ("스페인", &["스페인"]),
    ("러시아", &["러시아"]),
    ("이탈리아", &["이탈리아"]),
];

/// Prefixes in addition to the country keywords that mark a regional shelf
const EXTRA_REGION_PREFIXES: &[&str] = &["영미", "세계의"];

/// Prefixes stripped from a category token before lookup ("독일소설" → "소설")
pub static REGION_PREFIXES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    COUNTRY_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .chain(EXTRA_REGION_PREFIXES.iter().copied())
        .collect()
});

const CATEGORY_TOKENS: &[(&str, Option<&str>)] = &[
    // Literature
    ("소설", Some("소설")),
    ("장편소설", Some("소설")),
    ("단편소설", Some("소설")),
    ("연작소설", Some("소설")),
    ("시", Some("시")),
    ("시집", Some("시")),
    ("에세이", Some("에세이")),
    ("산문", Some("에세이")),
    ("희곡", Some("드라마")),
    ("수필", Some("에세이")),
    // Genre fiction; the umbrella shelf relies on its children
    ("장르소설", None),
    ("추리", Some("미스터리")),
    ("미스터리", Some("미스터리")),
    ("추리소설", Some("미스터리")),
    ("스릴러", Some("스릴러")),
    ("공포", Some("스릴러")),
    ("호러", Some("스릴러")),
    ("SF", Some("SF")),
    ("SF소설", Some("SF")),
    ("과학소설", Some("SF")),
    ("판타지", Some("판타지")),
    ("판타지소설", Some("판타지")),
    ("로맨스", Some("로맨스")),
    ("로맨스소설", Some("로맨스")),
    ("역사소설", Some("역사")),
    ("대체역사소설", Some("역사")),
    ("모험소설", Some("모험")),
    ("모험", Some("모험")),
    ("무협", Some("액션")),
    ("무협소설", Some("액션")),
    ("액션", Some("액션")),
    ("코미디", Some("코미디")),
    ("유머", Some("코미디")),
    ("가족", Some("가족")),
    ("범죄", Some("범죄")),
    ("전쟁", Some("전쟁")),
    ("BL", Some("로맨스")),
    ("BL소설", Some("로맨스")),
    // Non-fiction
    ("경제경영", Some("경제/경영")),
    ("경제", Some("경제/경영")),
    ("경영", Some("경제/경영")),
    ("재테크", Some("경제/경영")),
    ("투자", Some("경제/경영")),
    ("마케팅", Some("경제/경영")),
    ("창업", Some("경제/경영")),
    ("부동산", Some("경제/경영")),
    ("인문학", Some("인문학")),
    ("인문", Some("인문학")),
    ("철학", Some("인문학")),
    ("문학비평", Some("인문학")),
    ("언어학", Some("인문학")),
    ("교양", Some("인문학")),
    ("자기계발", Some("자기계발")),
    ("처세술", Some("자기계발")),
    ("성공학", Some("자기계발")),
    ("리더십", Some("자기계발")),
    ("시간관리", Some("자기계발")),
    ("사회과학", Some("사회과학")),
    ("사회", Some("사회과학")),
    ("정치", Some("사회과학")),
    ("법", Some("사회과학")),
    ("외교", Some("사회과학")),
    ("행정", Some("사회과학")),
    ("르포", Some("사회과학")),
    ("논픽션", Some("사회과학")),
    ("다큐멘터리", Some("사회과학")),
    ("심리학", Some("심리학")),
    ("심리", Some("심리학")),
    ("정신분석", Some("심리학")),
    ("상담", Some("심리학")),
    ("정신건강", Some("심리학")),
    ("역사", Some("역사")),
    ("세계사", Some("역사")),
    ("동양사", Some("역사")),
    ("서양사", Some("역사")),
    ("한국사", Some("역사")),
    ("문화사", Some("역사")),
    ("과학", Some("과학")),
    ("수학", Some("과학")),
    ("물리학", Some("과학")),
    ("생물학", Some("과학")),
    ("천문학", Some("과학")),
    ("공학", Some("과학")),
    ("기술공학", Some("과학")),
    ("자연", Some("과학")),
    ("환경", Some("과학")),
    ("IT", Some("IT")),
    ("컴퓨터", Some("IT")),
    ("모바일", Some("IT")),
    ("프로그래밍", Some("IT")),
    // Other
    ("만화", Some("애니메이션")),
    ("코믹스", Some("애니메이션")),
    ("그래픽노블", Some("애니메이션")),
    ("라이트노벨", Some("소설")),
    ("웹소설", Some("소설")),
    ("예술", Some("예술")),
    ("대중문화", Some("예술")),
    ("음악", Some("예술")),
    ("영화", Some("예술")),
    ("사진", Some("예술")),
    ("건축", Some("예술")),
    ("디자인", Some("예술")),
    ("미술", Some("예술")),
    ("종교", Some("종교")),
    ("역학", Some("종교")),
    ("신화", Some("종교")),
    ("명상", Some("종교")),
    ("점술", Some("종교")),
    ("여행", Some("여행")),
    ("여행에세이", Some("여행")),
    ("건강", Some("건강")),
    ("스포츠", Some("건강")),
    ("취미", Some("건강")),
    ("레저", Some("건강")),
    ("원예", Some("건강")),
    ("요리", Some("요리")),
    ("살림", Some("요리")),
    ("문화", Some("인문학")),
    ("문학", Some("소설")),
    // Shelves that never become tags
    ("뷰티", None),
    ("가정", None),
    ("인테리어", None),
    ("육아", None),
    ("어린이", None),
    ("유아", None),
    ("청소년", None),
    ("수험서", None),
    ("자격증", None),
    ("외국어", None),
    ("국어", None),
    ("사전", None),
    ("대학교재", None),
    ("잡지", None),
    ("교육", None),
    ("좋은부모", None),
    ("공무원", None),
    ("기타", None),
    ("달력", None),
    ("전집", None),
    ("중고전집", None),
    ("초등학교참고서", None),
    ("중학교참고서", None),
    ("고등학교참고서", None),
    ("ELT", None),
    ("어학", None),
    ("영어학습", None),
    ("동화책", None),
    ("그림책", None),
    ("챕터북", None),
    ("코스북", None),
    ("리더스", None),
    ("공예", None),
    ("수집", None),
    ("해외잡지", None),
];

/// Slash-joined shelves that name one concept and must not be split
const GROUP_CATEGORIES: &[(&str, Option<&str>)] = &[
    // Poetry vs. fiction is decided by the child shelf
    ("소설/시/희곡", None),
    ("건강/취미", Some("건강")),
    ("건강/스포츠", Some("건강")),
    ("요리/살림", Some("요리")),
    ("경제/경영", Some("경제/경영")),
    ("종교/역학", Some("종교")),
    ("종교/명상/점술", Some("종교")),
    ("예술/대중문화", Some("예술")),
    ("인문/사회", Some("인문학")),
    ("수험서/자격증", None),
    ("만화/라이트노벨", Some("애니메이션")),
    ("판타지/무협", Some("판타지")),
    ("컴퓨터/모바일", Some("IT")),
    ("공예/취미/수집", None),
    ("가정/원예/인테리어", None),
    ("ELT/어학/사전", None),
];

/// TMDB movie and TV genre ids
const TMDB_GENRES: &[(u32, Option<&str>)] = &[
    (28, Some("액션")),
    (12, Some("모험")),
    (16, Some("애니메이션")),
    (35, Some("코미디")),
    (80, Some("범죄")),
    (99, Some("사회과학")),
    (18, Some("드라마")),
    (10751, Some("가족")),
    (14, Some("판타지")),
    (36, Some("역사")),
    (27, Some("스릴러")),
    (10402, Some("예술")),
    (9648, Some("미스터리")),
    (10749, Some("로맨스")),
    (878, Some("SF")),
    (10770, None),
    (53, Some("스릴러")),
    (10752, Some("전쟁")),
    (37, None),
    // TV-only ids
    (10759, Some("액션")),
    (10762, None),
    (10763, None),
    (10764, None),
    (10765, Some("SF")),
    (10766, None),
    (10767, None),
    (10768, Some("전쟁")),
];

/// ISO 3166-1 alpha-2 codes to destination country names
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("KR", "한국"),
    ("US", "미국"),
    ("GB", "영국"),
    ("JP", "일본"),
    ("CN", "중국"),
    ("FR", "프랑스"),
    ("DE", "독일"),
    ("ES", "스페인"),
    ("IT", "이탈리아"),
    ("RU", "러시아"),
    ("TW", "대만"),
    ("HK", "홍콩"),
    ("CA", "캐나다"),
    ("AU", "호주"),
    ("IN", "인도"),
];

static CATEGORY_TOKEN_MAP: Lazy<HashMap<&'static str, Option<&'static str>>> =
    Lazy::new(|| CATEGORY_TOKENS.iter().copied().collect());

static GROUP_CATEGORY_MAP: Lazy<HashMap<&'static str, Option<&'static str>>> =
    Lazy::new(|| GROUP_CATEGORIES.iter().copied().collect());

static TMDB_GENRE_MAP: Lazy<HashMap<u32, Option<&'static str>>> =
    Lazy::new(|| TMDB_GENRES.iter().copied().collect());

static COUNTRY_CODE_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COUNTRY_CODES.iter().copied().collect());

fn to_mapping(entry: Option<&Option<&'static str>>) -> Mapping {
    match entry {
        Some(Some(tag)) => Mapping::Genre(tag),
        Some(None) => Mapping::Ignore,
        None => Mapping::Unknown,
    }
}

/// Look up a single category token
pub fn category_token(token: &str) -> Mapping {
    to_mapping(CATEGORY_TOKEN_MAP.get(token))
}

/// Look up a whole group category segment
pub fn group_category(segment: &str) -> Mapping {
    to_mapping(GROUP_CATEGORY_MAP.get(segment))
}

/// Look up a TMDB genre id
pub fn tmdb_genre(id: u32) -> Mapping {
    to_mapping(TMDB_GENRE_MAP.get(&id))
}

/// Map an ISO country code (case-insensitive)
pub fn country_code(code: &str) -> Option<&'static str> {
    COUNTRY_CODE_MAP
        .get(code.trim().to_ascii_uppercase().as_str())
        .copied()
}
