// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Tagged property values
//!
//! A `Variant` is what a single property read produces before it is converted
//! into a Rust type. The set of tags is closed: anything the provider cannot
//! express with one of these variants never reaches the converter.

use crate::error::{Error, Result};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::fmt;

/// Dynamically-tagged property value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value was ever assigned
    #[default]
    Empty,
    /// Explicit null
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Text value; `None` is a string-typed value whose buffer is null
    String(Option<String>),
    /// Array of text values; individual entries may be null
    StringArray(Vec<Option<String>>),
    /// Array of any non-text values
    Array(Vec<Variant>),
}

/// Tag of a `Variant`, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantType {
    Empty,
    Null,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    StringArray,
    Array,
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariantType::Empty => "empty",
            VariantType::Null => "null",
            VariantType::Bool => "boolean",
            VariantType::I8 => "sint8",
            VariantType::I16 => "sint16",
            VariantType::I32 => "sint32",
            VariantType::I64 => "sint64",
            VariantType::U8 => "uint8",
            VariantType::U16 => "uint16",
            VariantType::U32 => "uint32",
            VariantType::U64 => "uint64",
            VariantType::F32 => "real32",
            VariantType::F64 => "real64",
            VariantType::String => "string",
            VariantType::StringArray => "string[]",
            VariantType::Array => "array",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for VariantType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" => Ok(VariantType::Empty),
            "null" => Ok(VariantType::Null),
            "bool" | "boolean" => Ok(VariantType::Bool),
            "i8" | "sint8" => Ok(VariantType::I8),
            "i16" | "sint16" => Ok(VariantType::I16),
            "i32" | "sint32" => Ok(VariantType::I32),
            "i64" | "sint64" => Ok(VariantType::I64),
            "u8" | "uint8" => Ok(VariantType::U8),
            "u16" | "uint16" => Ok(VariantType::U16),
            "u32" | "uint32" => Ok(VariantType::U32),
            "u64" | "uint64" => Ok(VariantType::U64),
            "f32" | "real32" => Ok(VariantType::F32),
            "f64" | "real64" => Ok(VariantType::F64),
            "string" | "datetime" => Ok(VariantType::String),
            "string[]" => Ok(VariantType::StringArray),
            "array" => Ok(VariantType::Array),
            _ => Err(format!("Unknown variant type: {}", s)),
        }
    }
}

impl Variant {
    /// Tag of this value
    pub fn variant_type(&self) -> VariantType {
        match self {
            Variant::Empty => VariantType::Empty,
            Variant::Null => VariantType::Null,
            Variant::Bool(_) => VariantType::Bool,
            Variant::I8(_) => VariantType::I8,
            Variant::I16(_) => VariantType::I16,
            Variant::I32(_) => VariantType::I32,
            Variant::I64(_) => VariantType::I64,
            Variant::U8(_) => VariantType::U8,
            Variant::U16(_) => VariantType::U16,
            Variant::U32(_) => VariantType::U32,
            Variant::U64(_) => VariantType::U64,
            Variant::F32(_) => VariantType::F32,
            Variant::F64(_) => VariantType::F64,
            Variant::String(_) => VariantType::String,
            Variant::StringArray(_) => VariantType::StringArray,
            Variant::Array(_) => VariantType::Array,
        }
    }

    /// Empty, null, or a string-typed value with a null buffer
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Empty | Variant::Null | Variant::String(None))
    }

    /// Borrow the text of a non-null string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(Some(text)) => Some(text),
            _ => None,
        }
    }

    /// Widen any integer tag
    pub(crate) fn as_i128(&self) -> Option<i128> {
        let wide = match *self {
            Variant::I8(v) => v as i128,
            Variant::I16(v) => v as i128,
            Variant::I32(v) => v as i128,
            Variant::I64(v) => v as i128,
            Variant::U8(v) => v as i128,
            Variant::U16(v) => v as i128,
            Variant::U32(v) => v as i128,
            Variant::U64(v) => v as i128,
            _ => return None,
        };
        Some(wide)
    }

    /// Build a variant from a fixture JSON value
    ///
    /// Plain JSON maps naturally: `null`, booleans, numbers (signed 64-bit
    /// when they fit, then unsigned, then real), strings, and arrays (an
    /// array of strings and nulls becomes a string array). An explicit tag can
    /// be forced with `{"type": "uint32", "value": 3}`.
    pub fn from_json(value: &serde_json::Value) -> Result<Variant> {
        use serde_json::Value as Json;

        match value {
            Json::Null => Ok(Variant::Null),
            Json::Bool(b) => Ok(Variant::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Variant::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Variant::U64(u))
                } else {
                    Ok(Variant::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(s) => Ok(Variant::String(Some(s.clone()))),
            Json::Array(items) => {
                if items.iter().all(|item| item.is_string() || item.is_null()) {
                    Ok(Variant::StringArray(
                        items
                            .iter()
                            .map(|item| item.as_str().map(str::to_string))
                            .collect(),
                    ))
                } else {
                    items
                        .iter()
                        .map(Variant::from_json)
                        .collect::<Result<Vec<_>>>()
                        .map(Variant::Array)
                }
            }
            Json::Object(map) => {
                let tag = map
                    .get("type")
                    .and_then(Json::as_str)
                    .ok_or_else(|| Error::Fixture(format!("untyped object value: {}", value)))?;
                let tag: VariantType = tag.parse().map_err(Error::Fixture)?;
                let inner = map.get("value").unwrap_or(&Json::Null);
                Variant::typed_from_json(tag, inner)
            }
        }
    }

    fn typed_from_json(tag: VariantType, value: &serde_json::Value) -> Result<Variant> {
        use serde_json::Value as Json;

        let bad = || Error::Fixture(format!("value {} is not a valid {}", value, tag));

        macro_rules! integer {
            ($variant:ident, $t:ty) => {{
                let wide: i128 = if let Some(i) = value.as_i64() {
                    i as i128
                } else if let Some(u) = value.as_u64() {
                    u as i128
                } else {
                    return Err(bad());
                };
                <$t>::try_from(wide).map(Variant::$variant).map_err(|_| bad())
            }};
        }

        match tag {
            VariantType::Empty => Ok(Variant::Empty),
            VariantType::Null => Ok(Variant::Null),
            VariantType::Bool => value.as_bool().map(Variant::Bool).ok_or_else(bad),
            VariantType::I8 => integer!(I8, i8),
            VariantType::I16 => integer!(I16, i16),
            VariantType::I32 => integer!(I32, i32),
            VariantType::I64 => integer!(I64, i64),
            VariantType::U8 => integer!(U8, u8),
            VariantType::U16 => integer!(U16, u16),
            VariantType::U32 => integer!(U32, u32),
            VariantType::U64 => integer!(U64, u64),
            VariantType::F32 => value.as_f64().map(|f| Variant::F32(f as f32)).ok_or_else(bad),
            VariantType::F64 => value.as_f64().map(Variant::F64).ok_or_else(bad),
            VariantType::String => match value {
                Json::Null => Ok(Variant::String(None)),
                Json::String(s) => Ok(Variant::String(Some(s.clone()))),
                _ => Err(bad()),
            },
            VariantType::StringArray => match value {
                Json::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Json::Null => Ok(None),
                        Json::String(s) => Ok(Some(s.clone())),
                        _ => Err(bad()),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Variant::StringArray),
                _ => Err(bad()),
            },
            VariantType::Array => match value {
                Json::Array(items) => items
                    .iter()
                    .map(Variant::from_json)
                    .collect::<Result<Vec<_>>>()
                    .map(Variant::Array),
                _ => Err(bad()),
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Empty | Variant::Null | Variant::String(None) => Ok(()),
            Variant::Bool(v) => write!(f, "{}", v),
            Variant::I8(v) => write!(f, "{}", v),
            Variant::I16(v) => write!(f, "{}", v),
            Variant::I32(v) => write!(f, "{}", v),
            Variant::I64(v) => write!(f, "{}", v),
            Variant::U8(v) => write!(f, "{}", v),
            Variant::U16(v) => write!(f, "{}", v),
            Variant::U32(v) => write!(f, "{}", v),
            Variant::U64(v) => write!(f, "{}", v),
            Variant::F32(v) => write!(f, "{}", v),
            Variant::F64(v) => write!(f, "{}", v),
            Variant::String(Some(text)) => write!(f, "{}", text),
            Variant::StringArray(items) => {
                let texts: Vec<&str> = items.iter().flatten().map(String::as_str).collect();
                write!(f, "{{{}}}", texts.join(", "))
            }
            Variant::Array(items) => {
                let texts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "{{{}}}", texts.join(", "))
            }
        }
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Variant::Empty | Variant::Null | Variant::String(None) => serializer.serialize_none(),
            Variant::Bool(v) => serializer.serialize_bool(*v),
            Variant::I8(v) => serializer.serialize_i8(*v),
            Variant::I16(v) => serializer.serialize_i16(*v),
            Variant::I32(v) => serializer.serialize_i32(*v),
            Variant::I64(v) => serializer.serialize_i64(*v),
            Variant::U8(v) => serializer.serialize_u8(*v),
            Variant::U16(v) => serializer.serialize_u16(*v),
            Variant::U32(v) => serializer.serialize_u32(*v),
            Variant::U64(v) => serializer.serialize_u64(*v),
            Variant::F32(v) => serializer.serialize_f32(*v),
            Variant::F64(v) => serializer.serialize_f64(*v),
            Variant::String(Some(text)) => serializer.serialize_str(text),
            Variant::StringArray(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Variant::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Variant {
    fn from(text: &str) -> Self {
        Variant::String(Some(text.to_string()))
    }
}

impl From<String> for Variant {
    fn from(text: String) -> Self {
        Variant::String(Some(text))
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<u32> for Variant {
    fn from(value: u32) -> Self {
        Variant::U32(value)
    }
}

impl From<u64> for Variant {
    fn from(value: u64) -> Self {
        Variant::U64(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::I32(value)
    }
}

impl From<Vec<Option<String>>> for Variant {
    fn from(items: Vec<Option<String>>) -> Self {
        Variant::StringArray(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json_mapping() {
        assert_eq!(Variant::from_json(&json!(null)).unwrap(), Variant::Null);
        assert_eq!(Variant::from_json(&json!(true)).unwrap(), Variant::Bool(true));
        assert_eq!(Variant::from_json(&json!(3)).unwrap(), Variant::I64(3));
        assert_eq!(
            Variant::from_json(&json!(u64::MAX)).unwrap(),
            Variant::U64(u64::MAX)
        );
        assert_eq!(Variant::from_json(&json!("C:")).unwrap(), Variant::from("C:"));
        assert_eq!(
            Variant::from_json(&json!(["a", null, "b"])).unwrap(),
            Variant::StringArray(vec![Some("a".into()), None, Some("b".into())])
        );
        assert_eq!(
            Variant::from_json(&json!([1, 2])).unwrap(),
            Variant::Array(vec![Variant::I64(1), Variant::I64(2)])
        );
    }

    #[test]
    fn test_typed_json_mapping() {
        assert_eq!(
            Variant::from_json(&json!({"type": "uint16", "value": 3})).unwrap(),
            Variant::U16(3)
        );
        assert_eq!(
            Variant::from_json(&json!({"type": "string", "value": null})).unwrap(),
            Variant::String(None)
        );
        assert!(Variant::from_json(&json!({"type": "uint8", "value": 300})).is_err());
        assert!(Variant::from_json(&json!({"value": 1})).is_err());
    }

    #[test]
    fn test_null_like_values() {
        assert!(Variant::Empty.is_null());
        assert!(Variant::Null.is_null());
        assert!(Variant::String(None).is_null());
        assert!(!Variant::from("").is_null());
    }

    #[test]
    fn test_display_and_serialize() {
        let array = Variant::StringArray(vec![Some("a".into()), None, Some("b".into())]);
        assert_eq!(array.to_string(), "{a, b}");
        assert_eq!(serde_json::to_value(&array).unwrap(), json!(["a", null, "b"]));
        assert_eq!(serde_json::to_value(Variant::U32(7)).unwrap(), json!(7));
        assert_eq!(serde_json::to_value(Variant::Empty).unwrap(), json!(null));
    }
}
