//! Typed response schemas for structured (JSON mode) generation
//!
//! Schemas are declared in code next to the types they describe and serialized
//! in the OpenAPI subset Gemini accepts as `responseSchema`. Property order is
//! preserved on the wire.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Primitive schema types understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Object,
    Array,
}

/// A node in a response schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaType,
    pub description: Option<&'static str>,
    pub properties: Vec<(&'static str, Schema)>,
    pub items: Option<Box<Schema>>,
    pub required: Vec<&'static str>,
}

impl Schema {
    /// A string field with a description for the model
    pub fn string(description: &'static str) -> Self {
        Self {
            kind: SchemaType::String,
            description: Some(description),
            properties: Vec::new(),
            items: None,
            required: Vec::new(),
        }
    }

    /// An object whose listed properties are all required
    pub fn object(properties: Vec<(&'static str, Schema)>) -> Self {
        let required = properties.iter().map(|(name, _)| *name).collect();
        Self {
            kind: SchemaType::Object,
            description: None,
            properties,
            items: None,
            required,
        }
    }

    /// An array of `items`
    pub fn array(items: Schema) -> Self {
        Self {
            kind: SchemaType::Array,
            description: None,
            properties: Vec::new(),
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    /// Look up a direct property by name
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.iter().find(|(n, _)| *n == name).map(|(_, s)| s)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.kind)?;
        if let Some(description) = self.description {
            map.serialize_entry("description", description)?;
        }
        if self.kind == SchemaType::Object {
            map.serialize_entry("properties", &OrderedProperties(&self.properties))?;
        }
        if let Some(items) = &self.items {
            map.serialize_entry("items", items)?;
        }
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        map.end()
    }
}

struct OrderedProperties<'a>(&'a [(&'static str, Schema)]);

impl Serialize for OrderedProperties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

/// Types that can be requested from the service as structured JSON
pub trait ResponseSchema {
    fn response_schema() -> Schema;
}
