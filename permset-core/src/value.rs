//! # Attribute Values
//!
//! Permission metadata mixes grant flags (`allowRead`, `enabled`, ...) with
//! passthrough scalars. Values are kept as a small tagged enum so unknown
//! attributes flow through untouched while grant flags stay checkable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered attribute bag of a permission record.
///
/// Insertion order is preserved so output columns follow source order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// A single attribute value on a permission record.
///
/// # Example
///
/// ```
/// use permset_core::AttributeValue;
///
/// assert!(AttributeValue::from("true").is_truthy());
/// assert!(AttributeValue::Bool(true).is_truthy());
/// assert!(!AttributeValue::from("Account").is_truthy());
/// assert!(AttributeValue::from("FALSE").is_boolean());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A grant flag.
    Bool(bool),
    /// Any other scalar, copied as-is.
    Text(String),
}

impl AttributeValue {
    /// Interpret this value as a boolean, if it is one.
    ///
    /// `Bool` values map directly. Text is accepted when it reads `true` or
    /// `false` (ASCII case-insensitive, surrounding whitespace ignored).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }

    /// Whether this value carries boolean semantics.
    pub fn is_boolean(&self) -> bool {
        self.as_bool().is_some()
    }

    /// The single truthiness predicate shared by merge and muting.
    ///
    /// Only `true` and its textual forms are truthy; every other value,
    /// including arbitrary text, is falsy.
    pub fn is_truthy(&self) -> bool {
        self.as_bool().unwrap_or(false)
    }

    /// Canonical form: boolean-like text becomes `Bool`, other values are
    /// returned unchanged.
    pub fn canonical(self) -> Self {
        match self.as_bool() {
            Some(b) => AttributeValue::Bool(b),
            None => self,
        }
    }

    /// Borrow the text of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}
