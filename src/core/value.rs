// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic value type carried by field bags.
//!
//! Every field bag entry holds a [`Value`]. The nested value relay encodes and
//! decodes these without knowing the field's static type, which is what lets
//! one bag mix numbers, strings, binary blobs, nested objects and nulls.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::field_bag::FieldBag;

/// Dynamically typed value stored in a field bag.
///
/// Integer normalization: non-negative integers that fit in `i64` are always
/// held as [`Value::Int`]; [`Value::UInt`] only carries values above
/// `i64::MAX`. The `From` conversions and the decoder both apply this rule,
/// so a value survives an encode/decode cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    // Absent value
    Nil,

    Bool(bool),

    // Integers
    Int(i64),
    UInt(u64),

    // Floating point
    Float32(f32),
    Float64(f64),

    // String (UTF-8)
    String(String),

    // Raw bytes
    Binary(Vec<u8>),

    // Sequence of values
    Array(Vec<Value>),

    /// Key/value pairs in wire order.
    Map(Vec<(Value, Value)>),

    /// Application-defined extension payload.
    Ext(i8, Vec<u8>),

    /// Nested field-bag object (e.g., an inner error).
    Object(FieldBag),
}

impl Value {
    /// Check if this value is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check if this value is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_))
    }

    /// Check if this value is a container (array, map or object).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_) | Value::Object(_))
    }

    /// Try to get the value as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get the value as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(v) => u64::try_from(*v).ok(),
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the value as f64 (floats and integers).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get the inner string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get the inner array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get the nested object bag.
    pub fn as_object(&self) -> Option<&FieldBag> {
        match self {
            Value::Object(bag) => Some(bag),
            _ => None,
        }
    }

    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Ext(..) => "ext",
            Value::Object(_) => "object",
        }
    }

    /// Apply the integer normalization rule, recursing into arrays and maps.
    ///
    /// A [`Value::UInt`] that fits in `i64` becomes [`Value::Int`]. Nested
    /// objects are left alone: their entries were normalized when added.
    pub fn normalized(self) -> Self {
        match self {
            Value::UInt(v) => Value::from(v),
            Value::Array(arr) => Value::Array(arr.into_iter().map(Value::normalized).collect()),
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.normalized(), v.normalized()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Convert to a JSON value for display.
    ///
    /// Binary and extension payloads become hex strings; nested objects
    /// carry their type under `"$type"`. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Nil => Json::Null,
            Value::Bool(v) => Json::Bool(*v),
            Value::Int(v) => Json::from(*v),
            Value::UInt(v) => Json::from(*v),
            Value::Float32(v) => serde_json::Number::from_f64(*v as f64)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Binary(b) => Json::String(hex::encode(b)),
            Value::Array(arr) => Json::Array(arr.iter().map(Value::to_json).collect()),
            Value::Map(entries) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in entries {
                    let key = match k {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    obj.insert(key, v.to_json());
                }
                Json::Object(obj)
            }
            Value::Ext(code, data) => serde_json::json!({
                "$ext": code,
                "data": hex::encode(data),
            }),
            Value::Object(bag) => bag.to_json(),
        }
    }

    /// Build a value from JSON.
    ///
    /// Objects become [`Value::Map`] with string keys, in document order.
    pub fn from_json(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Nil,
            Json::Bool(v) => Value::Bool(*v),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(arr) => Value::Array(arr.iter().map(Value::from_json).collect()),
            Json::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (Value::String(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Binary(v) => write!(f, "<{} bytes>", v.len()),
            Value::Array(v) => write!(f, "[{} elements]", v.len()),
            Value::Map(v) => write!(f, "{{{} entries}}", v.len()),
            Value::Ext(code, data) => write!(f, "ext({code}, {} bytes)", data.len()),
            Value::Object(bag) => write!(f, "{}{{{} fields}}", bag.type_name(), bag.len()),
        }
    }
}

// =============================================================================
// Conversions into Value
// =============================================================================

macro_rules! impl_from_small_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

impl_from_small_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::UInt(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<FieldBag> for Value {
    fn from(bag: FieldBag) -> Self {
        Value::Object(bag)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Nil)
    }
}

// =============================================================================
// Conversions out of Value
// =============================================================================

/// Conversion from a [`Value`] into a concrete Rust type.
///
/// On mismatch the original value is handed back so callers can report
/// what was actually found.
pub trait FromValue: Sized {
    /// Name of the expected value kind, used in mismatch errors.
    const EXPECTED: &'static str;

    /// Convert the value, or return it unchanged if the type does not match.
    fn from_value(value: Value) -> std::result::Result<Self, Value>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(other),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($t:ty),*) => {
        $(impl FromValue for $t {
            const EXPECTED: &'static str = stringify!($t);

            fn from_value(value: Value) -> std::result::Result<Self, Value> {
                let converted = match &value {
                    Value::Int(v) => <$t>::try_from(*v).ok(),
                    Value::UInt(v) => <$t>::try_from(*v).ok(),
                    _ => None,
                };
                converted.ok_or(value)
            }
        })*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Float64(v) => Ok(v),
            Value::Float32(v) => Ok(v as f64),
            other => Err(other),
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "f32";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Float32(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "binary";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Binary(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromValue for FieldBag {
    const EXPECTED: &'static str = "object";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Object(bag) => Ok(bag),
            other => Err(other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_normalization() {
        assert_eq!(Value::from(7u8), Value::Int(7));
        assert_eq!(Value::from(7u64), Value::Int(7));
        assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
        assert_eq!(Value::from(-3i32), Value::Int(-3));
    }

    #[test]
    fn test_normalized_recurses_into_containers() {
        let value = Value::Array(vec![
            Value::UInt(5),
            Value::Map(vec![(Value::UInt(1), Value::UInt(u64::MAX))]),
        ]);
        assert_eq!(
            value.normalized(),
            Value::Array(vec![
                Value::Int(5),
                Value::Map(vec![(Value::Int(1), Value::UInt(u64::MAX))]),
            ])
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(42).as_i64(), Some(42));
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("boom").as_str(), Some("boom"));
        assert_eq!(Value::Binary(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert!(Value::Nil.is_nil());
        assert!(Value::Array(vec![]).is_container());
        assert!(!Value::Int(1).is_container());
    }

    #[test]
    fn test_from_value_int_ranges() {
        assert_eq!(i32::from_value(Value::Int(7)), Ok(7));
        assert_eq!(u8::from_value(Value::Int(300)), Err(Value::Int(300)));
        assert_eq!(u64::from_value(Value::UInt(u64::MAX)), Ok(u64::MAX));
        assert_eq!(
            i64::from_value(Value::String("7".into())),
            Err(Value::String("7".into()))
        );
    }

    #[test]
    fn test_from_value_option() {
        assert_eq!(Option::<String>::from_value(Value::Nil), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::from("a")),
            Ok(Some("a".to_string()))
        );
        assert!(Option::<String>::from_value(Value::Int(1)).is_err());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Int(0).type_name(), "int");
        assert_eq!(Value::UInt(0).type_name(), "uint");
        assert_eq!(Value::Map(vec![]).type_name(), "map");
        assert_eq!(Value::Ext(1, vec![]).type_name(), "ext");
        assert_eq!(Value::Object(FieldBag::new("T")).type_name(), "object");
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::Map(vec![
            (Value::from("b"), Value::Int(2)),
            (Value::from("a"), Value::Binary(vec![0xde, 0xad])),
        ]);
        let json = value.to_json();
        assert_eq!(json["b"], serde_json::json!(2));
        assert_eq!(json["a"], serde_json::json!("dead"));

        let back = Value::from_json(&serde_json::json!({"x": [1, null, 2.5]}));
        assert_eq!(
            back,
            Value::Map(vec![(
                Value::from("x"),
                Value::Array(vec![Value::Int(1), Value::Nil, Value::Float64(2.5)])
            )])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::from("test")), "\"test\"");
        assert_eq!(format!("{}", Value::Binary(vec![1, 2, 3])), "<3 bytes>");
        assert_eq!(format!("{}", Value::Nil), "nil");
    }

    #[test]
    fn test_serde_serialization() {
        let value = Value::Int(42);
        let json = serde_json::to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, value);
    }
}
