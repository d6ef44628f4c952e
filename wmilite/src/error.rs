// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for WmiLite
//!
//! Only connection-level and query-level failures surface here. Per-record
//! and per-property problems are absorbed where they happen: a property that
//! cannot be read becomes `None`, a failed batch fetch ends the iteration.

use crate::hresult::HResult;
use std::fmt;
use thiserror::Error;

/// Result type alias for WmiLite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Connection negotiation step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStage {
    /// Creating the locator object
    Locator,
    /// Binding the locator to the namespace
    Namespace,
    /// Setting the access-control blanket on the service proxy
    ProxyBlanket,
}

impl fmt::Display for ConnectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hint = match self {
            ConnectStage::Locator => "create locator (check that the management service is available)",
            ConnectStage::Namespace => "connect to namespace (verify namespace exists and access permissions)",
            ConnectStage::ProxyBlanket => "set proxy blanket (authentication may have failed)",
        };
        write!(f, "{}", hint)
    }
}

/// Main error type for WmiLite operations
#[derive(Error, Debug)]
pub enum Error {
    /// Process-wide subsystem initialization failed or is missing
    #[error("Subsystem error: {message} (HRESULT: {code})")]
    Subsystem { message: String, code: HResult },

    /// Session could not be established
    #[error("Could not connect to namespace '{namespace}': failed to {stage} (HRESULT: {code})")]
    Connection {
        namespace: String,
        stage: ConnectStage,
        code: HResult,
    },

    /// Query submission was rejected
    #[error("Query execution failed for query: '{query}' (HRESULT: {code})")]
    Query { query: String, code: HResult },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed provider fixture
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Provider status code carried by this error, if any
    pub fn code(&self) -> Option<HResult> {
        match self {
            Error::Subsystem { code, .. }
            | Error::Connection { code, .. }
            | Error::Query { code, .. } => Some(*code),
            _ => None,
        }
    }
}
