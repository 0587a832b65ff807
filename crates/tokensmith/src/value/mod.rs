//! Token values: raw input, type classification and resolution.
//!
//! - [`RawValue`]: a value exactly as it appears in a token document
//! - [`VariableKind`] / [`DataType`]: declared token kinds and store-native types
//! - [`LiteralValue`]: a canonical value ready to be stored
//! - [`AliasRef`]: a `{Collection.variable}` reference awaiting the link pass
//!
//! Resolution comes in two flavours. [`resolve_declared`] is used by the
//! collection pipeline, where each variable declares its kind and aliases are
//! deferred. [`resolve_flat`] serves the flat-map entry point, where the type
//! is inferred from the value itself and aliases are looked up immediately.

mod alias;
mod kind;
mod resolve;

use serde::{Deserialize, Serialize};

pub use alias::{alias_body, referenced_collection, AliasRef};
pub use kind::{DataType, VariableKind};
pub use resolve::{resolve_declared, resolve_flat, FlatValue, ResolveError, ValueShape};

use crate::color::Rgba;

/// A value as written in a token document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl RawValue {
    /// Returns the string contents, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this is a brace-delimited alias string.
    pub fn is_alias(&self) -> bool {
        self.as_str().and_then(alias_body).is_some()
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

/// A concrete value in canonical form.
///
/// The variant determines the [`DataType`], so a literal can never disagree
/// with its own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiteralValue {
    Color(Rgba),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl LiteralValue {
    pub fn data_type(&self) -> DataType {
        match self {
            LiteralValue::Color(_) => DataType::Color,
            LiteralValue::Float(_) => DataType::Float,
            LiteralValue::String(_) => DataType::String,
            LiteralValue::Boolean(_) => DataType::Boolean,
        }
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Color(c) => write!(f, "{}", c),
            LiteralValue::Float(n) => write!(f, "{}", n),
            LiteralValue::String(s) => write!(f, "{:?}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}
