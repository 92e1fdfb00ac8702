//! Query string encoding for listings

use super::model::Meta;
use crate::api::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Pagination and filter options for list calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Items per page; server default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Opaque cursor taken from [`Meta::links`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Options for the page after the one `meta` describes, keeping filters
    pub fn next_page(&self, meta: &Meta) -> Option<Self> {
        meta.next_cursor().map(|cursor| Self {
            cursor: Some(cursor.to_string()),
            ..self.clone()
        })
    }
}

/// Encode options as a query string, without the leading `?`
///
/// Keys are emitted in sorted order so identical options always produce the
/// same URL. Unset fields (`null`) are skipped; arrays repeat their key.
/// Anything that is not a flat object of scalars is a
/// [`Error::RequestBuild`].
pub fn encode_query<T: Serialize + ?Sized>(options: &T) -> Result<String> {
    let value = serde_json::to_value(options)
        .map_err(|e| Error::RequestBuild(format!("failed to encode query options: {}", e)))?;

    let map = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(Error::RequestBuild(format!(
                "query options must be key/value pairs, got {}",
                json_kind(&other)
            )))
        },
    };

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in map {
        let values = match value {
            Value::Null => continue,
            Value::Array(items) => items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(|item| scalar(&key, item))
                .collect::<Result<Vec<_>>>()?,
            other => vec![scalar(&key, other)?],
        };
        params.entry(key).or_default().extend(values);
    }

    let query_parts: Vec<String> = params
        .iter()
        .flat_map(|(key, values)| {
            values
                .iter()
                .map(move |v| format!("{}={}", urlencoding::encode(key), urlencoding::encode(v)))
        })
        .collect();

    Ok(query_parts.join("&"))
}

fn scalar(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::RequestBuild(format!(
            "query parameter '{}' must be a scalar, got {}",
            key,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
