// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! WQL subset understood by the in-memory provider
//!
//! `SELECT <*|p1, p2, ...> FROM <Class> [WHERE <prop> <=|<>|!=> <literal>]`
//! where the literal is quoted text, a number, or TRUE/FALSE. Keywords are
//! case-insensitive and so are text comparisons.

use crate::hresult::{HResult, ProviderResult};
use crate::value::{FromVariant, Variant};
use once_cell::sync::Lazy;
use regex::Regex;

static SELECT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^\s*SELECT\s+(?P<props>\*|[A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s+FROM\s+(?P<class>[A-Za-z_]\w*)(?:\s+WHERE\s+(?P<prop>[A-Za-z_]\w*)\s*(?P<op>=|<>|!=)\s*(?P<lit>'[^']*'|"[^"]*"|-?\d+(?:\.\d+)?|TRUE|FALSE))?\s*;?\s*$"#,
    )
    .expect("WQL pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Text(String),
    Number(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Filter {
    pub property: String,
    pub negated: bool,
    pub literal: Literal,
}

impl Filter {
    /// Null values never satisfy a comparison
    pub fn matches(&self, value: &Variant) -> bool {
        if value.is_null() {
            return false;
        }
        let equal = match &self.literal {
            Literal::Text(text) => value
                .as_str()
                .map(|candidate| candidate.eq_ignore_ascii_case(text))
                .unwrap_or(false),
            Literal::Number(number) => f64::from_variant(value)
                .map(|candidate| candidate == *number)
                .unwrap_or(false),
            Literal::Bool(flag) => matches!(value, Variant::Bool(b) if b == flag),
        };
        equal != self.negated
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectQuery {
    /// `None` selects every property
    pub properties: Option<Vec<String>>,
    pub class: String,
    pub filter: Option<Filter>,
}

pub(crate) fn parse(query: &str) -> ProviderResult<SelectQuery> {
    let captures = SELECT_PATTERN
        .captures(query)
        .ok_or(HResult::WBEM_E_INVALID_QUERY)?;

    let properties = match &captures["props"] {
        "*" => None,
        list => Some(list.split(',').map(|p| p.trim().to_string()).collect()),
    };

    let filter = match (captures.name("prop"), captures.name("op"), captures.name("lit")) {
        (Some(prop), Some(op), Some(lit)) => Some(Filter {
            property: prop.as_str().to_string(),
            negated: op.as_str() != "=",
            literal: parse_literal(lit.as_str())?,
        }),
        _ => None,
    };

    Ok(SelectQuery {
        properties,
        class: captures["class"].to_string(),
        filter,
    })
}

fn parse_literal(text: &str) -> ProviderResult<Literal> {
    if text.len() >= 2 && (text.starts_with('\'') || text.starts_with('"')) {
        return Ok(Literal::Text(text[1..text.len() - 1].to_string()));
    }
    match text.to_uppercase().as_str() {
        "TRUE" => Ok(Literal::Bool(true)),
        "FALSE" => Ok(Literal::Bool(false)),
        _ => text
            .parse::<f64>()
            .map(Literal::Number)
            .map_err(|_| HResult::WBEM_E_INVALID_QUERY),
    }
}
