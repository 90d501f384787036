//! Fixed-schema page builder
//!
//! Writes the configured property names with fixed types. Optional facts
//! are omitted rather than written empty, so an unknown page count never
//! overwrites the column with zero.

use super::property;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use shelflog_common::config::PropertyNames;
use shelflog_common::taxonomy::MAX_GENRES;
use shelflog_common::{Annotations, CatalogItem};

/// Name given to the cover file inside the files property
const COVER_FILE_NAME: &str = "표지";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parent {
    pub database_id: String,
}

/// Body of a Notion page-create request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPage {
    pub parent: Parent,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,
}

impl NewPage {
    pub fn new(database_id: impl Into<String>) -> Self {
        Self {
            parent: Parent {
                database_id: database_id.into(),
            },
            properties: Map::new(),
            children: Vec::new(),
            cover: None,
            icon: None,
        }
    }

    pub(crate) fn set(&mut self, name: &str, value: Value) {
        self.properties.insert(name.to_string(), value);
    }
}

/// Title with a ` (YYYY)` suffix when the publication year is known
pub fn display_title(item: &CatalogItem) -> String {
    match item.year() {
        Some(year) => format!("{} ({})", item.title, year),
        None => item.title.clone(),
    }
}

/// Build a page for `item` using the configured property names
pub fn build_entry(
    item: &CatalogItem,
    annotations: &Annotations,
    names: &PropertyNames,
    database_id: &str,
    today: NaiveDate,
) -> NewPage {
    let mut page = NewPage::new(database_id);

    page.set(&names.title, property::title(&display_title(item)));
    page.set(&names.category, property::select(item.media_type.label()));
    page.set(&names.date, property::date(&today.format("%Y-%m-%d").to_string()));

    if !item.authors.is_empty() {
        page.set(&names.authors, property::multi_select(&item.authors));
    }
    if let Some(country) = item.country.as_deref().filter(|c| !c.is_empty()) {
        page.set(&names.country, property::multi_select(&[country]));
    }
    if !item.genres.is_empty() {
        let genres = &item.genres[..item.genres.len().min(MAX_GENRES)];
        page.set(&names.genres, property::multi_select(genres));
    }
    if let Some(value) = item.numeric_fact() {
        page.set(&names.numeric, property::number(value));
    }
    if let Some(rating) = annotations.rating {
        page.set(&names.rating, property::select(&rating.label()));
    }
    if let Some(tense) = annotations.tense() {
        page.set(&names.tense, property::select(tense));
    }
    if let Some(thumbnail) = item.thumbnail.as_deref().filter(|t| !t.is_empty()) {
        page.set(&names.cover, property::external_files(COVER_FILE_NAME, thumbnail));
        page.children.push(property::image_block(thumbnail));
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelflog_common::{MediaType, Rating};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn gatsby() -> CatalogItem {
        CatalogItem {
            authors: vec!["F. Scott Fitzgerald".to_string()],
            published_date: Some("1925-04-10".to_string()),
            genres: vec!["소설".to_string()],
            country: Some("미국".to_string()),
            item_page: Some(0),
            ..CatalogItem::new("The Great Gatsby", MediaType::Book)
        }
    }

    #[test]
    fn test_display_title_year_suffix() {
        assert_eq!(display_title(&gatsby()), "The Great Gatsby (1925)");

        let mut item = gatsby();
        item.published_date = Some("n.d.".to_string());
        assert_eq!(display_title(&item), "The Great Gatsby");
    }

    #[test]
    fn test_fixed_properties() {
        let names = PropertyNames::default();
        let page = build_entry(&gatsby(), &Annotations::default(), &names, "db", today());

        assert_eq!(page.parent.database_id, "db");
        assert_eq!(
            page.properties["이름"]["title"][0]["text"]["content"],
            "The Great Gatsby (1925)"
        );
        assert_eq!(page.properties["분류"]["select"]["name"], "책");
        assert_eq!(page.properties["날짜"]["date"]["start"], "2024-03-01");
        assert_eq!(page.properties["국가"]["multi_select"][0]["name"], "미국");
        assert_eq!(page.properties["작가/감독"]["multi_select"][0]["name"], "F. Scott Fitzgerald");
    }

    #[test]
    fn test_zero_numeric_fact_omitted() {
        let page = build_entry(
            &gatsby(),
            &Annotations::default(),
            &PropertyNames::default(),
            "db",
            today(),
        );
        assert!(!page.properties.contains_key("러닝타임"));

        let mut movie = CatalogItem::new("기생충", MediaType::Movie);
        movie.runtime = Some(132);
        let page = build_entry(&movie, &Annotations::default(), &PropertyNames::default(), "db", today());
        assert_eq!(page.properties["러닝타임"]["number"], 132);
        assert_eq!(page.properties["분류"]["select"]["name"], "영화");
    }

    #[test]
    fn test_empty_lists_omitted_and_genres_capped() {
        let mut item = CatalogItem::new("무제", MediaType::Drama);
        item.genres = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let page = build_entry(&item, &Annotations::default(), &PropertyNames::default(), "db", today());

        assert!(!page.properties.contains_key("작가/감독"));
        assert!(!page.properties.contains_key("국가"));
        assert_eq!(page.properties["장르"]["multi_select"].as_array().unwrap().len(), 3);
        assert!(page.children.is_empty());
    }

    #[test]
    fn test_annotations_and_cover() {
        let mut item = gatsby();
        item.thumbnail = Some("https://img/cover.jpg".to_string());
        let annotations = Annotations {
            rating: Rating::new(4),
            tense: Some("읽는 중".to_string()),
        };
        let page = build_entry(&item, &annotations, &PropertyNames::default(), "db", today());

        assert_eq!(page.properties["별점"]["select"]["name"], "⭐⭐⭐⭐");
        assert_eq!(page.properties["시제"]["select"]["name"], "읽는 중");
        let files = &page.properties["Files & media"]["files"][0];
        assert_eq!(files["name"], "표지");
        assert_eq!(files["external"]["url"], "https://img/cover.jpg");
        assert_eq!(page.children.len(), 1);
        assert_eq!(page.children[0]["type"], "image");
    }

    #[test]
    fn test_custom_property_names() {
        let names = PropertyNames {
            title: "Name".to_string(),
            ..PropertyNames::default()
        };
        let page = build_entry(&gatsby(), &Annotations::default(), &names, "db", today());
        assert!(page.properties.contains_key("Name"));
        assert!(!page.properties.contains_key("이름"));
    }
}
