//! Wire envelopes
//!
//! The API wraps a single entity under its singular key and a listing under
//! its plural key next to a `meta` object:
//!
//! ```text
//! { "load_balancer": { ... } }
//! { "load_balancers": [ ... ], "meta": { "total": 2, "links": { ... } } }
//! ```
//!
//! A missing key decodes to an absent value instead of an error, since update
//! and delete responses usually carry no entity at all.

use super::model::Meta;
use crate::api::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key under which listings carry pagination metadata
pub const META_KEY: &str = "meta";

/// Entities with a named wire envelope
pub trait Enveloped {
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
}

impl<T: Enveloped + ?Sized> Enveloped for &T {
    const SINGULAR: &'static str = T::SINGULAR;
    const PLURAL: &'static str = T::PLURAL;
}

/// How request bodies are put on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStyle {
    /// `{ "<singular>": { ... } }`
    #[default]
    Enveloped,
    /// The write model as a plain object
    Bare,
}

/// Single entity envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T>(pub Option<T>);

impl<T> Envelope<T> {
    pub fn new(value: T) -> Self {
        Envelope(Some(value))
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T: Enveloped + Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(T::SINGULAR, value)?;
                map.end()
            },
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl<'de, T: Enveloped + DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        take::<T, D::Error>(&mut map, T::SINGULAR).map(Envelope)
    }
}

/// Listing envelope: entities in server order plus optional metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    pub meta: Option<Meta>,
}

impl<T: Enveloped + Serialize> Serialize for ListEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.meta.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(T::PLURAL, &self.items)?;
        if let Some(meta) = &self.meta {
            map.serialize_entry(META_KEY, meta)?;
        }
        map.end()
    }
}

impl<'de, T: Enveloped + DeserializeOwned> Deserialize<'de> for ListEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let items = take::<Vec<T>, D::Error>(&mut map, T::PLURAL)?.unwrap_or_default();
        let meta = take::<Meta, D::Error>(&mut map, META_KEY)?;
        Ok(ListEnvelope { items, meta })
    }
}

/// Remove `key` from an envelope object; missing and `null` are both absent
fn take<T: DeserializeOwned, E: serde::de::Error>(
    map: &mut Map<String, Value>,
    key: &str,
) -> std::result::Result<Option<T>, E> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| E::custom(format!("invalid `{}`: {}", key, e))),
    }
}

/// Serialize a write model as a request body
pub fn encode_body<T: Enveloped + Serialize>(value: &T, style: BodyStyle) -> Result<String> {
    let encoded = match style {
        BodyStyle::Enveloped => serde_json::to_string(&Envelope::new(value)),
        BodyStyle::Bare => serde_json::to_string(value),
    };
    encoded.map_err(|e| Error::RequestBuild(format!("failed to encode {}: {}", T::SINGULAR, e)))
}

/// Decode a single entity response; an empty body is absent
pub fn decode_single<T: Enveloped + DeserializeOwned>(body: &str) -> Result<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    Ok(envelope.into_inner())
}

/// Decode a listing response; an empty body is an empty page without metadata
pub fn decode_list<T: Enveloped + DeserializeOwned>(body: &str) -> Result<ListEnvelope<T>> {
    if body.trim().is_empty() {
        return Ok(ListEnvelope {
            items: Vec::new(),
            meta: None,
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// Turn an absent entity into a decode error for operations that must return one
pub fn require<T: Enveloped>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::Decode(format!("response has no `{}` object", T::SINGULAR)))
}
