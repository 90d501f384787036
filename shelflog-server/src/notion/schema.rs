//! Database schema discovery
//!
//! In discover mode the page is shaped from the database's own schema:
//! the title property is found by type and the other fields by a list of
//! accepted names. A property that is missing or has an unexpected type is
//! skipped.

use super::entry::NewPage;
use super::property;
use serde::Deserialize;
use serde_json::{Map, Value};
use shelflog_common::config::PropertyNames;
use shelflog_common::{Annotations, CatalogItem};
use std::collections::BTreeMap;
use tracing::debug;

pub const AUTHOR_ALIASES: &[&str] = &["저자", "작가", "Author", "author"];
pub const PUBLISHER_ALIASES: &[&str] = &["출판사", "Publisher", "publisher"];
pub const ISBN_ALIASES: &[&str] = &["ISBN", "isbn"];
pub const URL_ALIASES: &[&str] = &["URL", "url", "링크", "Link"];
pub const DATE_ALIASES: &[&str] = &["출간일", "출판일", "Date", "date", "날짜"];
pub const TYPE_ALIASES: &[&str] = &["유형", "타입", "Type", "type", "카테고리", "Category"];

/// Option names that mean "nothing chosen"
const PLACEHOLDER_OPTIONS: &[&str] = &["", "-", "없음", "선택", "미정"];

/// One property definition from `GET /databases/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific configuration, keyed by the type name
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl PropertySchema {
    /// Option names of a select, multi_select or status property, in schema order
    pub fn option_names(&self) -> Vec<String> {
        self.config
            .get(&self.kind)
            .and_then(|c| c.get("options"))
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|o| o.get("name").and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

impl DatabaseSchema {
    pub fn title_property(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, p)| p.kind == "title")
            .map(|(name, _)| name.as_str())
    }

    /// First alias present in the schema, with its type
    pub fn find(&self, aliases: &[&str]) -> Option<(&str, &str)> {
        aliases.iter().find_map(|alias| {
            self.properties
                .get_key_value(*alias)
                .map(|(name, p)| (name.as_str(), p.kind.as_str()))
        })
    }

    fn kind_of(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.kind.as_str())
    }
}

/// Selectable tense values, placeholders removed
pub fn tense_options(schema: &DatabaseSchema, tense_property: &str) -> Vec<String> {
    schema
        .properties
        .get(tense_property)
        .map(PropertySchema::option_names)
        .unwrap_or_default()
        .into_iter()
        .filter(|name| !PLACEHOLDER_OPTIONS.contains(&name.trim()))
        .collect()
}

/// Build a page whose properties match the discovered schema
pub fn build_adaptive_entry(
    schema: &DatabaseSchema,
    item: &CatalogItem,
    annotations: &Annotations,
    names: &PropertyNames,
    database_id: &str,
) -> NewPage {
    let mut page = NewPage::new(database_id);

    if let Some(name) = schema.title_property() {
        page.set(name, property::title(&item.title));
    }

    if !item.authors.is_empty() {
        match schema.find(AUTHOR_ALIASES) {
            Some((name, "rich_text")) => page.set(name, property::rich_text(&item.authors.join(", "))),
            Some((name, "multi_select")) => page.set(name, property::multi_select(&item.authors)),
            other => skipped("authors", other),
        }
    }

    if let Some(publisher) = item.publisher.as_deref() {
        match schema.find(PUBLISHER_ALIASES) {
            Some((name, "rich_text")) => page.set(name, property::rich_text(publisher)),
            Some((name, "select")) => page.set(name, property::select(publisher)),
            other => skipped("publisher", other),
        }
    }

    if let Some(isbn) = item.isbn.as_deref() {
        match schema.find(ISBN_ALIASES) {
            Some((name, "rich_text")) => page.set(name, property::rich_text(isbn)),
            other => skipped("isbn", other),
        }
    }

    if let Some(link) = item.url.as_deref() {
        match schema.find(URL_ALIASES) {
            Some((name, "url")) => page.set(name, property::url(link)),
            other => skipped("url", other),
        }
    }

    if let Some(date) = item.published_date.as_deref() {
        match schema.find(DATE_ALIASES) {
            Some((name, "date")) => page.set(name, property::date(date)),
            other => skipped("date", other),
        }
    }

    let label = item.media_type.label();
    match schema.find(TYPE_ALIASES) {
        Some((name, "select")) => page.set(name, property::select(label)),
        Some((name, "multi_select")) => page.set(name, property::multi_select(&[label])),
        other => skipped("type", other),
    }

    if let Some(rating) = annotations.rating {
        if let Some("select") = schema.kind_of(&names.rating) {
            page.set(&names.rating, property::select(&rating.label()));
        }
    }

    if let Some(tense) = annotations.tense() {
        match schema.kind_of(&names.tense) {
            Some("select") => page.set(&names.tense, property::select(tense)),
            Some("status") => page.set(&names.tense, property::status(tense)),
            _ => {}
        }
    }

    if let Some(thumbnail) = item.thumbnail.as_deref().filter(|t| !t.is_empty()) {
        page.cover = Some(property::external(thumbnail));
        page.icon = Some(property::external(thumbnail));
    }

    page
}

fn skipped(field: &str, found: Option<(&str, &str)>) {
    if let Some((name, kind)) = found {
        debug!(field, property = name, kind, "Property type not supported, skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shelflog_common::MediaType;

    fn schema(value: Value) -> DatabaseSchema {
        serde_json::from_value(value).unwrap()
    }

    fn book() -> CatalogItem {
        CatalogItem {
            authors: vec!["한강".to_string(), "데보라 스미스".to_string()],
            publisher: Some("창비".to_string()),
            isbn: Some("9788936434120".to_string()),
            url: Some("https://www.aladin.co.kr/1".to_string()),
            published_date: Some("2014-05-19".to_string()),
            thumbnail: Some("https://img/cover.jpg".to_string()),
            ..CatalogItem::new("소년이 온다", MediaType::Book)
        }
    }

    fn build(schema: &DatabaseSchema) -> NewPage {
        build_adaptive_entry(schema, &book(), &Annotations::default(), &PropertyNames::default(), "db")
    }

    #[test]
    fn test_rich_text_authors() {
        let s = schema(json!({"properties": {
            "Name": {"type": "title", "title": {}},
            "저자": {"type": "rich_text", "rich_text": {}}
        }}));
        let page = build(&s);
        assert_eq!(page.properties["Name"]["title"][0]["text"]["content"], "소년이 온다");
        assert_eq!(page.properties["저자"]["rich_text"][0]["text"]["content"], "한강, 데보라 스미스");
    }

    #[test]
    fn test_multi_select_authors() {
        let s = schema(json!({"properties": {
            "Name": {"type": "title", "title": {}},
            "Author": {"type": "multi_select", "multi_select": {"options": []}}
        }}));
        let page = build(&s);
        let options = page.properties["Author"]["multi_select"].as_array().unwrap();
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_unknown_and_mistyped_properties_skipped() {
        let s = schema(json!({"properties": {
            "Name": {"type": "title", "title": {}},
            "ISBN": {"type": "number", "number": {}},
            "Link": {"type": "url", "url": {}},
            "출간일": {"type": "date", "date": {}},
            "유형": {"type": "select", "select": {"options": []}}
        }}));
        let page = build(&s);
        assert!(!page.properties.contains_key("ISBN"));
        assert_eq!(page.properties["Link"]["url"], "https://www.aladin.co.kr/1");
        assert_eq!(page.properties["출간일"]["date"]["start"], "2014-05-19");
        assert_eq!(page.properties["유형"]["select"]["name"], "책");
        assert_eq!(page.properties.len(), 4);
        assert!(page.children.is_empty());
        assert_eq!(page.cover.as_ref().unwrap()["external"]["url"], "https://img/cover.jpg");
        assert!(page.icon.is_some());
    }

    #[test]
    fn test_tense_written_by_schema_type() {
        let s = schema(json!({"properties": {
            "Name": {"type": "title", "title": {}},
            "시제": {"type": "status", "status": {"options": [{"name": "읽는 중"}]}}
        }}));
        let annotations = Annotations {
            rating: None,
            tense: Some("읽는 중".to_string()),
        };
        let page = build_adaptive_entry(&s, &book(), &annotations, &PropertyNames::default(), "db");
        assert_eq!(page.properties["시제"]["status"]["name"], "읽는 중");
    }

    #[test]
    fn test_tense_options_drop_placeholders() {
        let s = schema(json!({"properties": {
            "시제": {"type": "select", "select": {"options": [
                {"name": "-"}, {"name": "읽는 중"}, {"name": "없음"},
                {"name": "완료"}, {"name": "미정"}, {"name": "선택"}, {"name": ""}
            ]}}
        }}));
        assert_eq!(tense_options(&s, "시제"), vec!["읽는 중", "완료"]);
        assert!(tense_options(&s, "Status").is_empty());
    }
}
