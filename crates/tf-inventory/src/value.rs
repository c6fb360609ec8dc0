//! value representation
//!
//! Decoded terraform attributes are one of
//! - scalar (utf-8 string, terraform flattens every primitive to a string)
//! - mapping (order-preserving "map"/"dictionary", where the key is of type string)
//! - sequence (ordered "list" of values, where a slot may be empty)
//!
//! Empty sequence slots come from sparse flattened lists and serialize as `null`.
//! There is no other way to express `null`.
//!
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

/// Mapping of names to decoded values
pub type Mapping = indexmap::IndexMap<String, Value>;

/// All possible value types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Mapping(Mapping),
    Sequence(Vec<Option<Value>>),
}

impl Value {
    /// Returns the string if this is a [Value::Scalar]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Sequence(value.into_iter().map(|v| Some(v.into())).collect())
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Scalar(value) => serializer.serialize_str(value),
            Value::Sequence(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    // `None` becomes `null`
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Mapping(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}
