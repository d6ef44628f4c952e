// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session configuration
//!
//! `SessionConfig` describes where to connect and how to enumerate. It can be
//! built in code with the `with_*` methods or deserialized from JSON; every
//! field has a default so partial documents are accepted.

use crate::error::{Error, Result};
use crate::provider::{FetchTimeout, ProxyBlanket};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default namespace below `root`
pub const DEFAULT_NAMESPACE: &str = "cimv2";

/// Default number of records requested per fetch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Connection and enumeration settings for one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Target machine; `.` is the local machine
    pub host: String,
    /// Namespace, either relative to `root` (`cimv2`), rooted (`root\wmi`) or a
    /// full `\\host\root\...` path
    pub namespace: String,
    /// Records requested per fetch
    pub batch_size: usize,
    /// Wait policy for each fetch
    pub fetch_timeout: FetchTimeout,
    /// Query language passed with every submission
    pub query_language: String,
    /// Access-control settings for the service proxy
    pub blanket: ProxyBlanket,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: ".".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            fetch_timeout: FetchTimeout::Infinite,
            query_language: "WQL".to_string(),
            blanket: ProxyBlanket::default(),
        }
    }
}

impl SessionConfig {
    /// Default settings for the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: FetchTimeout) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_blanket(mut self, blanket: ProxyBlanket) -> Self {
        self.blanket = blanket;
        self
    }

    /// Full object path of the namespace, e.g. `\\.\root\cimv2`
    pub fn namespace_path(&self) -> String {
        let namespace = self.namespace.replace('/', "\\");
        if namespace.starts_with("\\\\") {
            return namespace;
        }
        let lower = namespace.to_lowercase();
        if lower == "root" || lower.starts_with("root\\") {
            format!("\\\\{}\\{}", self.host, namespace)
        } else {
            format!("\\\\{}\\root\\{}", self.host, namespace)
        }
    }

    /// Check the settings before connecting
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(Error::Config("namespace must not be empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.query_language.trim().is_empty() {
            return Err(Error::Config("query_language must not be empty".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::AuthenticationLevel;

    #[test]
    fn test_namespace_path_forms() {
        assert_eq!(SessionConfig::default().namespace_path(), "\\\\.\\root\\cimv2");
        assert_eq!(
            SessionConfig::new("root/wmi").namespace_path(),
            "\\\\.\\root\\wmi"
        );
        assert_eq!(
            SessionConfig::new("StandardCimv2")
                .with_host("server01")
                .namespace_path(),
            "\\\\server01\\root\\StandardCimv2"
        );
        assert_eq!(
            SessionConfig::new("\\\\other\\root\\default").namespace_path(),
            "\\\\other\\root\\default"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{ "namespace": "root\\wmi", "fetch_timeout": { "millis": 500 },
                 "blanket": { "authentication": "packet_privacy" } }"#,
        )
        .unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.fetch_timeout, FetchTimeout::Millis(500));
        assert_eq!(config.blanket.authentication, AuthenticationLevel::PacketPrivacy);
        assert_eq!(config.query_language, "WQL");
    }

    #[test]
    fn test_validation() {
        assert!(SessionConfig::default().validate().is_ok());
        assert!(matches!(
            SessionConfig::default().with_batch_size(0).validate(),
            Err(Error::Config(_))
        ));
        assert!(SessionConfig::from_json_str(r#"{ "batch_size": 0 }"#).is_err());
        assert!(matches!(
            SessionConfig::from_json_str("not json"),
            Err(Error::Serialization(_))
        ));
    }
}
