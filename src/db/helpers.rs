use anyhow::{Context, Result};
use serde_json::Value;

#[cfg(test)]
pub fn parse_datetime(value: &str, field: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_document(raw: &str, collection: &str, id: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .with_context(|| format!("document {collection}/{id} is not valid JSON"))
}

pub fn encode_document(data: &Value) -> Result<String> {
    serde_json::to_string(data).context("failed to serialize document")
}
