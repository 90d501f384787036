//! Catalog item types shared by every provider
//!
//! `CatalogItem` is both the search response row and the body of a save
//! request, so the serialized form uses the camelCase names the browser UI
//! sends back unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Book,
    Movie,
    Drama,
}

impl MediaType {
    /// Category label written to the destination select property
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Book => "책",
            MediaType::Movie => "영화",
            MediaType::Drama => "드라마",
        }
    }

    /// Parse the `type` query parameter used by the suggest endpoint.
    ///
    /// `ebook` is a book search against another storefront section.
    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "book" | "ebook" => Some(MediaType::Book),
            "movie" => Some(MediaType::Movie),
            "drama" | "tv" => Some(MediaType::Drama),
            _ => None,
        }
    }
}

/// Normalized search result from any catalog provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Empty only when a request body omitted it; handlers reject that case
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Destination genre tags, most specific first
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: MediaType,
    /// Page count (books)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_page: Option<u32>,
    /// Running time in minutes (movies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    /// Episode count (dramas)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
}

impl CatalogItem {
    pub fn new(title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            title: title.into(),
            media_type,
            ..Default::default()
        }
    }

    /// Four-digit publication year, when the date starts with one
    pub fn year(&self) -> Option<&str> {
        self.published_date.as_deref().and_then(leading_year)
    }

    /// The type-dependent numeric fact, only when known (> 0)
    pub fn numeric_fact(&self) -> Option<u32> {
        let value = match self.media_type {
            MediaType::Book => self.item_page,
            MediaType::Movie => self.runtime,
            MediaType::Drama => self.total_episodes,
        };
        value.filter(|v| *v > 0)
    }
}

/// Extract the leading `YYYY` of a date-like string
pub fn leading_year(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}

/// Lightweight autocomplete row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Star rating, 1 to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const STAR: char = '⭐';

    pub fn new(stars: u8) -> Option<Self> {
        (1..=5).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    /// Select option name written to the destination, e.g. `⭐⭐⭐`
    pub fn label(self) -> String {
        Self::STAR.to_string().repeat(usize::from(self.0))
    }

    /// Parse either a run of star characters or a decimal number
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        // U+FE0F variation selectors often trail emoji input
        let stars: Vec<char> = raw.chars().filter(|c| *c != '\u{fe0f}').collect();
        if stars.iter().all(|c| *c == Self::STAR) {
            return u8::try_from(stars.len()).ok().and_then(Self::new);
        }
        raw.parse::<u8>().ok().and_then(Self::new)
    }
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(Rating::new),
        Some(Value::String(s)) => Rating::parse(&s),
        _ => None,
    })
}

/// User-supplied annotations attached at save time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default, deserialize_with = "deserialize_rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Workflow status tag chosen by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<String>,
}

impl Annotations {
    /// Tense with blank values treated as absent
    pub fn tense(&self) -> Option<&str> {
        self.tense.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
