// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! JSON fixtures for the in-memory provider
//!
//! ```json
//! {
//!   "namespaces": {
//!     "root\\cimv2": {
//!       "Win32_LogicalDisk": [
//!         { "DeviceID": "C:", "DriveType": { "type": "uint32", "value": 3 } }
//!       ]
//!     }
//!   }
//! }
//! ```

use super::MemoryPlatform;
use crate::error::{Error, Result};
use crate::value::Variant;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FixtureFile {
    namespaces: BTreeMap<String, BTreeMap<String, Vec<serde_json::Map<String, serde_json::Value>>>>,
}

impl MemoryPlatform {
    /// Build a store from fixture JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let fixture: FixtureFile = serde_json::from_str(text)?;
        let platform = MemoryPlatform::new();

        for (namespace, classes) in &fixture.namespaces {
            platform.add_namespace(namespace);
            for (class, instances) in classes {
                platform.add_class(namespace, class);
                for (index, instance) in instances.iter().enumerate() {
                    let properties = instance
                        .iter()
                        .map(|(key, value)| {
                            Variant::from_json(value)
                                .map(|variant| (key.clone(), variant))
                                .map_err(|e| {
                                    Error::Fixture(format!(
                                        "{}:{}[{}].{}: {}",
                                        namespace, class, index, key, e
                                    ))
                                })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    platform.add_instance(namespace, class, properties);
                }
            }
        }

        log::debug!(
            "Loaded fixture with {} namespace(s)",
            fixture.namespaces.len()
        );
        Ok(platform)
    }

    /// Build a store from a fixture file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FetchTimeout, Platform, QueryFlags, ThreadingModel};

    const FIXTURE: &str = r#"{
        "namespaces": {
            "root\\cimv2": {
                "Win32_LogicalDisk": [
                    { "DeviceID": "C:", "DriveType": { "type": "uint32", "value": 3 } },
                    { "DeviceID": "D:", "DriveType": { "type": "uint32", "value": 5 } }
                ],
                "Win32_Empty": []
            }
        }
    }"#;

    #[test]
    fn test_load_fixture() {
        let platform = MemoryPlatform::from_json_str(FIXTURE).unwrap();
        platform.initialize(ThreadingModel::MultiThreaded).unwrap();
        let services = platform
            .create_locator()
            .unwrap()
            .connect_server("root\\cimv2")
            .unwrap();

        let mut cursor = services
            .exec_query("WQL", "SELECT * FROM Win32_LogicalDisk WHERE DriveType = 5", QueryFlags::NONE)
            .unwrap();
        let batch = cursor.next_batch(FetchTimeout::Infinite, 10).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].get("DriveType").unwrap(), Variant::U32(5));

        let mut empty = services
            .exec_query("WQL", "SELECT * FROM Win32_Empty", QueryFlags::NONE)
            .unwrap();
        assert!(empty.next_batch(FetchTimeout::Infinite, 10).unwrap().is_empty());
    }

    #[test]
    fn test_bad_fixture_value_is_reported() {
        let text = r#"{ "namespaces": { "root\\cimv2": { "C": [ { "X": { "type": "uint8", "value": -1 } } ] } } }"#;
        let err = MemoryPlatform::from_json_str(text).unwrap_err();
        assert!(matches!(err, Error::Fixture(_)));
        assert!(err.to_string().contains("C[0].X"));
    }

    #[test]
    fn test_load_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, FIXTURE).unwrap();
        assert!(MemoryPlatform::from_json_file(&path).is_ok());
        assert!(matches!(
            MemoryPlatform::from_json_file(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
