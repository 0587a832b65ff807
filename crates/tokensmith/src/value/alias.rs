//! Alias string grammar.
//!
//! An alias is a value of the form `{<ref>}`. In collection documents the
//! reference is `<collection>.<variable>`, where only the first `.` separates
//! the two parts, so variable names may themselves contain dots.

use serde::{Deserialize, Serialize};

/// Returns the text between the braces if `raw` is a brace-delimited alias.
///
/// Surrounding whitespace is ignored.
pub fn alias_body(raw: &str) -> Option<&str> {
    raw.trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::trim)
}

/// Returns the collection name a value points into, if it looks like a reference.
///
/// This is the purely syntactic scan used to build the dependency graph: any
/// string starting with `{` is read up to its first `.`. Whether the
/// reference will resolve is not checked here.
pub fn referenced_collection(raw: &str) -> Option<&str> {
    let rest = raw.trim_start().strip_prefix('{')?;
    let (collection, _) = rest.split_once('.')?;
    let collection = collection.trim();
    (!collection.is_empty()).then_some(collection)
}

/// A `{Collection.variable}` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasRef {
    pub collection: String,
    pub variable: String,
}

impl AliasRef {
    pub fn new(collection: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            variable: variable.into(),
        }
    }

    /// Parses an alias string, splitting the reference at its first `.`.
    ///
    /// Returns `None` when the value is not brace-delimited or when either
    /// side of the split is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tokensmith::value::AliasRef;
    ///
    /// let alias = AliasRef::parse("{Brand.text.primary}").unwrap();
    /// assert_eq!(alias.collection, "Brand");
    /// assert_eq!(alias.variable, "text.primary");
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let body = alias_body(raw)?;
        let (collection, variable) = body.split_once('.')?;
        if collection.is_empty() || variable.is_empty() {
            return None;
        }
        Some(Self::new(collection, variable))
    }
}

impl std::fmt::Display for AliasRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}.{}}}", self.collection, self.variable)
    }
}
