//! Tri-state property slots and their display formatting.
//!
//! A [`Property`] starts unset ("loading..."), and is later either nulled
//! ("N/A") or given a value. Once set it never goes back to unset; setting
//! again overwrites. How a value renders depends on the slot's
//! [`PropertyKind`], which is fixed when the slot is created.

use serde::Serialize;

use crate::units::{TimeUnit, fit_string};
use crate::utils::format_float;

/// Display placeholder for a slot that has not been computed yet.
pub const LOADING: &str = "loading...";

/// Display text for a slot that does not apply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display text for an empty value.
pub const EMPTY: &str = "None";

/// Display text of not-implemented slots.
pub const NOT_IMPLEMENTED: &str = "Not Implemented";

/// How a slot renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    /// Strings and numbers as-is, booleans as Yes/No
    Plain,
    /// Timecode text, passed through
    Timecode,
    /// Seconds, rendered in the best-fit time unit
    Duration,
    /// Compliance summary text, passed through
    Condition,
    /// Items joined with ", "
    List,
    /// Always "Not Implemented"
    NotImplemented,
}

/// A raw property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl PropertyValue {
    /// Empty strings and lists render as "None"; zero and `false` do not.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Text(s) => s.is_empty(),
            PropertyValue::List(items) => items.is_empty(),
            PropertyValue::Integer(_) | PropertyValue::Float(_) | PropertyValue::Bool(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(v) => Some(*v as f64),
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn plain(&self) -> String {
        match self {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Integer(v) => v.to_string(),
            PropertyValue::Float(v) => format_float(*v),
            PropertyValue::Bool(true) => "Yes".to_string(),
            PropertyValue::Bool(false) => "No".to_string(),
            PropertyValue::List(items) => items.join(", "),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Integer(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

/// Lifecycle of a slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum PropertyState {
    #[default]
    Unset,
    Null,
    Value(PropertyValue),
}

/// One typed slot of an inspection record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    kind: PropertyKind,
    state: PropertyState,
}

impl Property {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            state: PropertyState::Unset,
        }
    }

    pub fn with_value(kind: PropertyKind, value: impl Into<PropertyValue>) -> Self {
        Self {
            kind,
            state: PropertyState::Value(value.into()),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn state(&self) -> &PropertyState {
        &self.state
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        match &self.state {
            PropertyState::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.state == PropertyState::Unset
    }

    pub fn is_null(&self) -> bool {
        self.state == PropertyState::Null
    }

    pub fn set(&mut self, value: impl Into<PropertyValue>) {
        self.state = PropertyState::Value(value.into());
    }

    pub fn set_null(&mut self) {
        self.state = PropertyState::Null;
    }

    /// Sets `value`, or nulls the slot for `None`.
    pub fn set_option<V: Into<PropertyValue>>(&mut self, value: Option<V>) {
        match value {
            Some(v) => self.set(v),
            None => self.set_null(),
        }
    }

    /// Renders the slot for display.
    pub fn display(&self) -> String {
        if self.kind == PropertyKind::NotImplemented {
            return NOT_IMPLEMENTED.to_string();
        }
        let value = match &self.state {
            PropertyState::Unset => return LOADING.to_string(),
            PropertyState::Null => return NOT_AVAILABLE.to_string(),
            PropertyState::Value(v) if v.is_empty() => return EMPTY.to_string(),
            PropertyState::Value(v) => v,
        };

        match (self.kind, value) {
            (PropertyKind::Duration, v) => match v.as_f64() {
                Some(seconds) => fit_string(seconds, TimeUnit::Seconds),
                None => v.plain(),
            },
            _ => value.plain(),
        }
    }
}
