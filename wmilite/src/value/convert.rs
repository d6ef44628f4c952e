// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Conversion from tagged values into Rust types
//!
//! Each `FromVariant` impl is one row of the supported-conversion table. A
//! target type without an impl cannot be requested at all; a supported target
//! that does not match the value at runtime yields a `ConversionError`, which
//! `convert` logs and turns into `None`.

use super::datetime::{parse_cim_datetime, parse_cim_interval};
use super::variant::{Variant, VariantType};
use chrono::{DateTime, Duration, FixedOffset};
use thiserror::Error;

/// Why a value could not be produced as the requested type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The value is null or empty
    #[error("value is null")]
    Null,

    /// The tag cannot be converted into the target type
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: VariantType,
    },

    /// Numeric value does not fit into the target type
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// Text value does not parse as the target type
    #[error("cannot parse '{text}' as {target}")]
    Parse { text: String, target: &'static str },
}

fn mismatch(expected: &'static str, found: &Variant) -> ConversionError {
    if found.is_null() {
        ConversionError::Null
    } else {
        ConversionError::TypeMismatch {
            expected,
            found: found.variant_type(),
        }
    }
}

/// Types that can be produced from a property value
pub trait FromVariant: Sized {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError>;
}

/// Convert a value, downgrading every failure to `None`
pub fn convert<T: FromVariant>(variant: &Variant) -> Option<T> {
    match T::from_variant(variant) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!(
                "ConvertVariant to {} failed: {}",
                std::any::type_name::<T>(),
                e
            );
            None
        }
    }
}

impl FromVariant for Variant {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        Ok(variant.clone())
    }
}

impl FromVariant for String {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::String(Some(text)) => Ok(text.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FromVariant for Vec<String> {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::StringArray(items) => Ok(items.iter().flatten().cloned().collect()),
            other => Err(mismatch("string[]", other)),
        }
    }
}

impl FromVariant for bool {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Bool(value) => Ok(*value),
            other => Err(mismatch("boolean", other)),
        }
    }
}

macro_rules! impl_integer_conversion {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromVariant for $t {
                fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
                    // 64-bit integers are transported as decimal text
                    let wide: i128 = match variant {
                        Variant::String(Some(text)) => text.trim().parse::<i128>().map_err(|_| {
                            ConversionError::Parse {
                                text: text.clone(),
                                target: stringify!($t),
                            }
                        })?,
                        other => other
                            .as_i128()
                            .ok_or_else(|| mismatch(stringify!($t), other))?,
                    };
                    <$t>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
                        value: wide.to_string(),
                        target: stringify!($t),
                    })
                }
            }
        )*
    };
}

impl_integer_conversion!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromVariant for f64 {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::F64(value) => Ok(*value),
            Variant::F32(value) => Ok(*value as f64),
            Variant::String(Some(text)) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| ConversionError::Parse {
                        text: text.clone(),
                        target: "f64",
                    })
            }
            other => other
                .as_i128()
                .map(|wide| wide as f64)
                .ok_or_else(|| mismatch("f64", other)),
        }
    }
}

impl FromVariant for f32 {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::F32(value) => Ok(*value),
            other => f64::from_variant(other)
                .map(|value| value as f32)
                .map_err(|e| match e {
                    ConversionError::TypeMismatch { found, .. } => ConversionError::TypeMismatch {
                        expected: "f32",
                        found,
                    },
                    ConversionError::Parse { text, .. } => ConversionError::Parse {
                        text,
                        target: "f32",
                    },
                    other => other,
                }),
        }
    }
}

impl FromVariant for DateTime<FixedOffset> {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::String(Some(text)) => parse_cim_datetime(text),
            other => Err(mismatch("datetime", other)),
        }
    }
}

impl FromVariant for Duration {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::String(Some(text)) => parse_cim_interval(text),
            other => Err(mismatch("interval", other)),
        }
    }
}

/// Null and empty values become `Some(None)` instead of a failure
impl<T: FromVariant> FromVariant for Option<T> {
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        if variant.is_null() {
            Ok(None)
        } else {
            T::from_variant(variant).map(Some)
        }
    }
}
