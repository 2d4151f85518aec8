//! Type-aware presence checks
//!
//! Configuration values arrive from the command line and from JSON documents.
//! Both are lowered into [`ConfigValue`] so "is this value missing" has one
//! answer everywhere.

use serde_json::Value;

/// A configuration value reduced to the shapes presence checking cares about
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// No value at all
    Absent,
    /// A string
    Text(String),
    /// Any number, including zero
    Numeric(f64),
    /// A boolean, including `false`
    Boolean(bool),
    /// An array or the property values of an object
    Sequence(Vec<ConfigValue>),
    /// Anything else, carried as its string rendering
    Other(String),
}

impl ConfigValue {
    /// Whether this value counts as missing
    ///
    /// Numbers and booleans are always present; strings are empty when blank;
    /// sequences are empty when they have no elements.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        match *self {
            Self::Absent => true,
            Self::Text(ref s) | Self::Other(ref s) => s.trim().is_empty(),
            Self::Numeric(_) | Self::Boolean(_) => false,
            Self::Sequence(ref items) => items.is_empty(),
        }
    }
}

impl From<Option<&str>> for ConfigValue {
    #[inline]
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |s| Self::Text(s.to_owned()))
    }
}

impl From<Option<&Value>> for ConfigValue {
    #[inline]
    fn from(value: Option<&Value>) -> Self {
        value.map_or(Self::Absent, Self::from)
    }
}

impl From<&Value> for ConfigValue {
    #[inline]
    fn from(value: &Value) -> Self {
        match *value {
            Value::Null => Self::Absent,
            Value::String(ref s) => Self::Text(s.clone()),
            Value::Number(ref n) => n
                .as_f64()
                .map_or_else(|| Self::Other(n.to_string()), Self::Numeric),
            Value::Bool(b) => Self::Boolean(b),
            Value::Array(ref items) => Self::Sequence(items.iter().map(Self::from).collect()),
            Value::Object(ref map) => Self::Sequence(map.values().map(Self::from).collect()),
        }
    }
}

/// Whether a value is missing
#[must_use]
#[inline]
pub fn is_empty(value: &ConfigValue) -> bool {
    value.is_empty()
}

/// Whether every value in the collection is missing
///
/// Nested sequences are checked element by element, so a list holding only
/// blank strings counts as empty. An empty collection is all-empty.
#[must_use]
#[inline]
pub fn all_empty(values: &[ConfigValue]) -> bool {
    values.iter().all(|value| match *value {
        ConfigValue::Sequence(ref items) => all_empty(items),
        _ => value.is_empty(),
    })
}

/// Shorthand for optional strings: `None`, empty and whitespace-only are blank
#[must_use]
#[inline]
pub fn is_blank<S: AsRef<str>>(value: Option<S>) -> bool {
    let text: Option<&str> = value.as_ref().map(|s| s.as_ref());
    ConfigValue::from(text).is_empty()
}
