//! Notion property value and block constructors

use serde_json::{json, Value};

fn text_content(text: &str) -> Value {
    json!([{ "type": "text", "text": { "content": text } }])
}

pub fn title(text: &str) -> Value {
    json!({ "title": text_content(text) })
}

pub fn rich_text(text: &str) -> Value {
    json!({ "rich_text": text_content(text) })
}

pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

pub fn status(name: &str) -> Value {
    json!({ "status": { "name": name } })
}

pub fn multi_select<S: AsRef<str>>(names: &[S]) -> Value {
    let options: Vec<Value> = names
        .iter()
        .map(|n| json!({ "name": n.as_ref() }))
        .collect();
    json!({ "multi_select": options })
}

pub fn date(start: &str) -> Value {
    json!({ "date": { "start": start } })
}

pub fn number(value: u32) -> Value {
    json!({ "number": value })
}

pub fn url(link: &str) -> Value {
    json!({ "url": link })
}

/// `files` property holding one external file
pub fn external_files(name: &str, link: &str) -> Value {
    json!({
        "files": [{ "type": "external", "name": name, "external": { "url": link } }]
    })
}

/// External file object for page cover and icon
pub fn external(link: &str) -> Value {
    json!({ "type": "external", "external": { "url": link } })
}

pub fn image_block(link: &str) -> Value {
    json!({
        "object": "block",
        "type": "image",
        "image": { "type": "external", "external": { "url": link } }
    })
}

/// Plain text of a title or rich_text property value
pub fn plain_text(value: &Value) -> Option<String> {
    let fragments = value
        .get("title")
        .or_else(|| value.get("rich_text"))?
        .as_array()?;
    let text: String = fragments
        .iter()
        .filter_map(|f| f.get("plain_text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}
