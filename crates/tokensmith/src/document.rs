//! Token document model.
//!
//! A document is either a list of [`CollectionDefinition`]s or a flat
//! `{ name: value }` map applied to a single existing collection. Both
//! shapes deserialize into [`TokenDocument`]:
//!
//! ```json
//! [
//!   {
//!     "name": "Theme",
//!     "modes": ["Light", "Dark"],
//!     "variables": {
//!       "bg": { "type": "color", "Light": "#ffffff", "Dark": "{Palette.gray.900}" }
//!     }
//!   }
//! ]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{RawValue, VariableKind};

/// A variable's declared kind, metadata and per-mode raw values.
///
/// The keys `type`, `description` and `unit` are metadata. Every other key
/// names a mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    #[serde(rename = "type")]
    pub kind: VariableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub values: IndexMap<String, RawValue>,
}

impl VariableDefinition {
    pub fn new(kind: impl Into<VariableKind>) -> Self {
        Self {
            kind: kind.into(),
            description: None,
            unit: None,
            values: IndexMap::new(),
        }
    }

    /// Adds a value for a mode, returning the definition for chaining.
    pub fn value(mut self, mode: &str, value: impl Into<RawValue>) -> Self {
        self.values.insert(mode.to_string(), value.into());
        self
    }

    /// Returns the raw value defined for `mode`, if any.
    pub fn value_for(&self, mode: &str) -> Option<&RawValue> {
        self.values.get(mode)
    }
}

/// A named collection: ordered modes plus variable definitions.
///
/// The first mode is the collection's default mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub modes: Vec<String>,
    #[serde(default)]
    pub variables: IndexMap<String, VariableDefinition>,
}

impl CollectionDefinition {
    pub fn new<I, S>(name: &str, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            description: None,
            modes: modes.into_iter().map(Into::into).collect(),
            variables: IndexMap::new(),
        }
    }

    /// Adds a variable definition, returning the collection for chaining.
    pub fn variable(mut self, name: &str, definition: VariableDefinition) -> Self {
        self.variables.insert(name.to_string(), definition);
        self
    }
}

/// A complete input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenDocument {
    /// A bare list of collections.
    Collections(Vec<CollectionDefinition>),
    /// `{ "collections": [...] }`.
    Wrapped {
        collections: Vec<CollectionDefinition>,
    },
    /// A flat `{ name: value }` map for a single collection and new mode.
    Flat(IndexMap<String, RawValue>),
}

impl TokenDocument {
    /// Returns the collection definitions, or `None` for a flat document.
    pub fn collections(&self) -> Option<&[CollectionDefinition]> {
        match self {
            TokenDocument::Collections(c) | TokenDocument::Wrapped { collections: c } => Some(c),
            TokenDocument::Flat(_) => None,
        }
    }

    pub fn into_collections(self) -> Option<Vec<CollectionDefinition>> {
        match self {
            TokenDocument::Collections(c) | TokenDocument::Wrapped { collections: c } => Some(c),
            TokenDocument::Flat(_) => None,
        }
    }

    pub fn into_flat(self) -> Option<IndexMap<String, RawValue>> {
        match self {
            TokenDocument::Flat(values) => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = r##"[
        {
            "name": "Theme",
            "description": "Semantic colors",
            "modes": ["Light", "Dark"],
            "variables": {
                "bg": {
                    "type": "color",
                    "description": "Page background",
                    "Light": "#ffffff",
                    "Dark": "{Palette.gray.900}"
                },
                "gap": { "type": "number", "unit": "px", "Light": 8 }
            }
        }
    ]"##;

    #[test]
    fn test_parse_collection_list() {
        let doc: TokenDocument = serde_json::from_str(THEME).unwrap();
        let collections = doc.collections().unwrap();
        assert_eq!(collections.len(), 1);

        let theme = &collections[0];
        assert_eq!(theme.modes, vec!["Light", "Dark"]);
        assert_eq!(theme.description.as_deref(), Some("Semantic colors"));

        let bg = &theme.variables["bg"];
        assert_eq!(bg.kind, VariableKind::Color);
        assert_eq!(bg.description.as_deref(), Some("Page background"));
        assert_eq!(bg.values.len(), 2);
        assert_eq!(bg.value_for("Dark"), Some(&RawValue::from("{Palette.gray.900}")));
        assert_eq!(bg.value_for("type"), None);

        let gap = &theme.variables["gap"];
        assert_eq!(gap.unit.as_deref(), Some("px"));
        assert_eq!(gap.value_for("unit"), None);
        assert_eq!(gap.value_for("Light"), Some(&RawValue::Number(8.0)));
    }

    #[test]
    fn test_variable_order_is_preserved() {
        let doc: TokenDocument = serde_json::from_str(
            r#"[{"name": "A", "modes": ["m"], "variables": {
                "z": {"type": "string", "m": "1"},
                "a": {"type": "string", "m": "2"},
                "k": {"type": "string", "m": "3"}
            }}]"#,
        )
        .unwrap();
        let names: Vec<_> = doc.collections().unwrap()[0]
            .variables
            .keys()
            .cloned()
            .collect();
        assert_eq!(names, vec!["z", "a", "k"]);
    }

    #[test]
    fn test_parse_wrapped_collections() {
        let doc: TokenDocument =
            serde_json::from_str(r#"{"collections": [{"name": "A", "modes": ["Default"]}]}"#)
                .unwrap();
        assert!(matches!(doc, TokenDocument::Wrapped { .. }));
        assert_eq!(doc.collections().unwrap()[0].name, "A");
    }

    #[test]
    fn test_parse_flat_map() {
        let doc: TokenDocument = serde_json::from_str(
            r##"{"Gray/90": "#1a1a1a", "radius": 4, "enabled": true, "link": "{Gray.90}"}"##,
        )
        .unwrap();
        assert!(doc.collections().is_none());
        let flat = doc.into_flat().unwrap();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat["radius"], RawValue::Number(4.0));
    }

    #[test]
    fn test_builders() {
        let collection = CollectionDefinition::new("Brand", ["Light", "Dark"]).variable(
            "primary",
            VariableDefinition::new("color")
                .value("Light", "#ff0000")
                .value("Dark", "#880000"),
        );
        assert_eq!(collection.modes.len(), 2);
        assert_eq!(
            collection.variables["primary"].value_for("Dark"),
            Some(&RawValue::from("#880000"))
        );
    }
}
