// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Property value model and conversion
//!
//! This module provides:
//! - `Variant`, the closed tagged union a property read produces
//! - `FromVariant`, the table of supported value-to-type conversions
//! - CIM DATETIME/interval text parsing

pub mod convert;
pub mod datetime;
pub mod variant;

pub use convert::{convert, ConversionError, FromVariant};
pub use datetime::{format_cim_datetime, parse_cim_datetime, parse_cim_interval};
pub use variant::{Variant, VariantType};
