//! Duplicate detection before save
//!
//! Identity is textual: a page whose title contains the candidate title is
//! a duplicate. The check fails open; an unreachable store never blocks a
//! save.

use super::property::plain_text;
use super::{NotionClient, PageObject};
use serde::Serialize;
use serde_json::{json, Value};
use shelflog_common::config::PropertyNames;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheck {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

/// Summarize the first matching page
pub fn from_results(results: &[PageObject], names: &PropertyNames) -> DuplicateCheck {
    let Some(existing) = results.first() else {
        return DuplicateCheck::default();
    };

    let date = existing
        .properties
        .get(&names.date)
        .and_then(|p| p.get("date"))
        .and_then(|d| d.get("start"))
        .and_then(Value::as_str)
        .map(String::from);

    DuplicateCheck {
        exists: true,
        date,
        existing_title: existing.properties.get(&names.title).and_then(plain_text),
        page_url: existing.url.clone(),
    }
}

/// Look for an existing page whose title contains `title`.
///
/// `published_date` is accepted for API compatibility; matching is by
/// title only.
pub async fn check_duplicate(
    client: &NotionClient,
    names: &PropertyNames,
    title: &str,
    _published_date: Option<&str>,
) -> DuplicateCheck {
    let filter = json!({
        "property": names.title,
        "title": { "contains": title },
    });

    match client.query_database(filter).await {
        Ok(response) => {
            let check = from_results(&response.results, names);
            debug!(title, exists = check.exists, "Duplicate check complete");
            check
        }
        Err(e) => {
            warn!(title, error = %e, "Duplicate check failed, assuming no duplicate");
            DuplicateCheck::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(value: Value) -> PageObject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_result_wins() {
        let results = vec![
            page(json!({
                "id": "p1",
                "url": "https://www.notion.so/p1",
                "properties": {
                    "이름": {"title": [{"plain_text": "The Great Gatsby (1925)"}]},
                    "날짜": {"date": {"start": "2024-01-02"}}
                }
            })),
            page(json!({"id": "p2", "url": "https://www.notion.so/p2", "properties": {}})),
        ];

        let check = from_results(&results, &PropertyNames::default());
        assert!(check.exists);
        assert_eq!(check.date.as_deref(), Some("2024-01-02"));
        assert_eq!(check.existing_title.as_deref(), Some("The Great Gatsby (1925)"));
        assert_eq!(check.page_url.as_deref(), Some("https://www.notion.so/p1"));
    }

    #[test]
    fn test_no_results() {
        let check = from_results(&[], &PropertyNames::default());
        assert_eq!(check, DuplicateCheck::default());
        assert_eq!(serde_json::to_value(&check).unwrap(), json!({"exists": false}));
    }

    #[test]
    fn test_missing_properties_still_exist() {
        let results = vec![page(json!({"id": "p1", "properties": {}}))];
        let check = from_results(&results, &PropertyNames::default());
        assert!(check.exists);
        assert_eq!(check.date, None);
        assert_eq!(check.existing_title, None);
    }
}
