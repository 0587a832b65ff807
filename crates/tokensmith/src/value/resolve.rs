//! Raw value classification and resolution.

use thiserror::Error;

use super::{alias_body, DataType, LiteralValue, RawValue, VariableKind};
use crate::color::{hex_to_rgba, parse_color};
use crate::index::VariableIndex;
use crate::store::VariableId;

/// A per-value resolution failure. These are recorded and skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("'{value}' is not a recognized color")]
    NotAColor { value: String },
    #[error("'{value}' is not a number")]
    NotANumber { value: String },
    #[error("alias target not found: {reference}")]
    AliasNotFound { reference: String },
}

/// The shape of an untyped raw value, in classification precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueShape<'a> {
    /// `{...}`, carrying the text between the braces.
    Alias(&'a str),
    /// A `#`-prefixed string.
    Hex(&'a str),
    Number(f64),
    Boolean(bool),
    Text(&'a str),
}

impl<'a> ValueShape<'a> {
    /// Classifies a raw value: alias > color > number > boolean > string.
    pub fn classify(raw: &'a RawValue) -> Self {
        match raw {
            RawValue::String(s) => {
                if let Some(body) = alias_body(s) {
                    ValueShape::Alias(body)
                } else if s.trim_start().starts_with('#') {
                    ValueShape::Hex(s)
                } else {
                    ValueShape::Text(s)
                }
            }
            RawValue::Number(n) => ValueShape::Number(*n),
            RawValue::Bool(b) => ValueShape::Boolean(*b),
        }
    }
}

/// Resolves a value against its declared kind for the first (creation) pass.
///
/// Returns `Ok(None)` for alias strings, which are linked in the second pass.
/// A color that does not parse or a number that does not coerce is an error.
/// Booleans pass through only for `boolean`; everything not handled above is
/// stringified.
///
/// # Example
///
/// ```rust
/// use tokensmith::color::Rgba;
/// use tokensmith::value::{resolve_declared, LiteralValue, RawValue, VariableKind};
///
/// let value = resolve_declared(&RawValue::from("#FF0000"), &VariableKind::Color).unwrap();
/// assert_eq!(value, Some(LiteralValue::Color(Rgba::new(1.0, 0.0, 0.0, 1.0))));
///
/// let deferred = resolve_declared(&RawValue::from("{Brand.Primary}"), &VariableKind::Color);
/// assert_eq!(deferred, Ok(None));
/// ```
pub fn resolve_declared(
    raw: &RawValue,
    kind: &VariableKind,
) -> Result<Option<LiteralValue>, ResolveError> {
    if raw.is_alias() {
        return Ok(None);
    }

    let literal = match (kind, raw) {
        (VariableKind::Color, RawValue::String(s)) => parse_color(s)
            .map(LiteralValue::Color)
            .ok_or_else(|| ResolveError::NotAColor { value: s.clone() })?,
        (VariableKind::Color, other) => {
            return Err(ResolveError::NotAColor {
                value: other.to_string(),
            })
        }
        (VariableKind::Number, RawValue::Number(n)) => LiteralValue::Float(*n),
        (VariableKind::Number, other) => LiteralValue::Float(coerce_number(other)?),
        (VariableKind::Boolean, RawValue::Bool(b)) => LiteralValue::Boolean(*b),
        (_, other) => LiteralValue::String(other.to_string()),
    };

    Ok(Some(literal))
}

fn coerce_number(raw: &RawValue) -> Result<f64, ResolveError> {
    raw.as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .ok_or_else(|| ResolveError::NotANumber {
            value: raw.to_string(),
        })
}

/// A value resolved by the flat-map entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Literal(LiteralValue),
    /// A link to an existing variable, carrying that variable's type.
    Alias { target: VariableId, data_type: DataType },
}

impl FlatValue {
    pub fn data_type(&self) -> DataType {
        match self {
            FlatValue::Literal(literal) => literal.data_type(),
            FlatValue::Alias { data_type, .. } => *data_type,
        }
    }
}

/// Resolves an untyped value for the flat-map entry point.
///
/// The type is inferred from the value's shape (see [`ValueShape::classify`]).
/// Aliases resolve to the first variable in `index` whose name matches
/// either the reference or the reference with every `.` replaced by `/`.
pub fn resolve_flat(raw: &RawValue, index: &VariableIndex) -> Result<FlatValue, ResolveError> {
    let value = match ValueShape::classify(raw) {
        ValueShape::Alias(name) => {
            let target = index
                .find_flat(name)
                .ok_or_else(|| ResolveError::AliasNotFound {
                    reference: name.to_string(),
                })?;
            FlatValue::Alias {
                target: target.id.clone(),
                data_type: target.data_type,
            }
        }
        ValueShape::Hex(s) => FlatValue::Literal(LiteralValue::Color(hex_to_rgba(s))),
        ValueShape::Number(n) => FlatValue::Literal(LiteralValue::Float(n)),
        ValueShape::Boolean(b) => FlatValue::Literal(LiteralValue::Boolean(b)),
        ValueShape::Text(s) => FlatValue::Literal(LiteralValue::String(s.to_string())),
    };
    Ok(value)
}
