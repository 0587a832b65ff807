//! Declared token kinds and the store's native data types.

use serde::{Deserialize, Serialize};

/// The resolved type of a variable in the target store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Color,
    Float,
    String,
    Boolean,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Color => "COLOR",
            DataType::Float => "FLOAT",
            DataType::String => "STRING",
            DataType::Boolean => "BOOLEAN",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` declared for a variable in a token document.
///
/// Unrecognized kinds are kept verbatim in [`VariableKind::Other`] and are
/// stored as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableKind {
    Color,
    Number,
    String,
    Boolean,
    BoxShadow,
    Other(String),
}

impl VariableKind {
    /// Maps the declared kind to the store-native type.
    ///
    /// | Kind | Data type |
    /// |------|-----------|
    /// | `color` | `COLOR` |
    /// | `number` | `FLOAT` |
    /// | `string` | `STRING` |
    /// | `boolean` | `BOOLEAN` |
    /// | `boxShadow` | `STRING` |
    /// | anything else | `STRING` |
    pub fn data_type(&self) -> DataType {
        match self {
            VariableKind::Color => DataType::Color,
            VariableKind::Number => DataType::Float,
            VariableKind::Boolean => DataType::Boolean,
            VariableKind::String | VariableKind::BoxShadow | VariableKind::Other(_) => {
                DataType::String
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VariableKind::Color => "color",
            VariableKind::Number => "number",
            VariableKind::String => "string",
            VariableKind::Boolean => "boolean",
            VariableKind::BoxShadow => "boxShadow",
            VariableKind::Other(s) => s,
        }
    }
}

impl From<String> for VariableKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "color" => VariableKind::Color,
            "number" => VariableKind::Number,
            "string" => VariableKind::String,
            "boolean" => VariableKind::Boolean,
            "boxShadow" => VariableKind::BoxShadow,
            _ => VariableKind::Other(s),
        }
    }
}

impl From<&str> for VariableKind {
    fn from(s: &str) -> Self {
        VariableKind::from(s.to_string())
    }
}

impl From<VariableKind> for String {
    fn from(kind: VariableKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
