// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use wmilite::provider::memory::MemoryPlatform;
use wmilite::{InitOptions, Runtime, Session, SessionConfig, Variant};

pub const CIMV2: &str = "root\\cimv2";
pub const RECORD_CLASS: &str = "Test_Record";

/// In-memory store plus an initialized runtime
pub struct TestHost {
    pub platform: MemoryPlatform,
    pub runtime: Runtime,
}

impl TestHost {
    pub fn new(platform: MemoryPlatform) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let runtime = Runtime::initialize(Arc::new(platform.clone()), InitOptions::default())
            .expect("runtime initializes");
        Self { platform, runtime }
    }

    /// `count` records of `Test_Record` with `Index` 0..count and `Name` "record-<i>"
    pub fn with_records(count: usize) -> Self {
        let platform = MemoryPlatform::new();
        platform.add_class(CIMV2, RECORD_CLASS);
        for i in 0..count {
            platform.add_instance(
                CIMV2,
                RECORD_CLASS,
                vec![
                    ("Index", Variant::U32(i as u32)),
                    ("Name", Variant::from(format!("record-{}", i))),
                ],
            );
        }
        Self::new(platform)
    }

    /// A couple of logical disks resembling a typical workstation
    pub fn with_disks() -> Self {
        let platform = MemoryPlatform::new();
        platform.add_instance(
            CIMV2,
            "Win32_LogicalDisk",
            vec![
                ("DeviceID", Variant::from("C:")),
                ("Size", Variant::from("1024")),
                ("FreeSpace", Variant::from("256")),
                ("DriveType", Variant::U32(3)),
                ("FileSystem", Variant::from("NTFS")),
                ("VolumeName", Variant::String(None)),
                (
                    "Aliases",
                    Variant::StringArray(vec![Some("a".into()), None, Some("b".into())]),
                ),
            ],
        );
        platform.add_instance(
            CIMV2,
            "Win32_LogicalDisk",
            vec![
                ("DeviceID", Variant::from("D:")),
                ("Size", Variant::Null),
                ("FreeSpace", Variant::Null),
                ("DriveType", Variant::U32(5)),
                ("FileSystem", Variant::Null),
                ("VolumeName", Variant::from("DVD")),
                ("Aliases", Variant::StringArray(Vec::new())),
            ],
        );
        Self::new(platform)
    }

    pub fn session(&self) -> Arc<Session> {
        Session::create(&self.runtime, "cimv2").expect("session connects")
    }

    pub fn session_with_batch(&self, batch_size: usize) -> Arc<Session> {
        Session::connect(
            &self.runtime,
            SessionConfig::default().with_batch_size(batch_size),
        )
        .expect("session connects")
    }
}

/// `Index` values of every record in one pass
pub fn indexes(session: &Arc<Session>, query: &str) -> Vec<u32> {
    session
        .execute_query(query)
        .expect("query submits")
        .begin()
        .map(|object| object.get_property::<u32>("Index").expect("Index present"))
        .collect()
}
