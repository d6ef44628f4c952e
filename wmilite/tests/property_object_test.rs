// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Integration tests for typed property access on returned records

#[path = "testutils/mod.rs"]
mod testutils;

use std::sync::Arc;
use testutils::TestHost;
use wmilite::{Object, Variant};

fn disks(host: &TestHost) -> Vec<Object> {
    host.session()
        .execute_query("SELECT * FROM Win32_LogicalDisk")
        .unwrap()
        .collect_objects()
}

#[test]
fn test_string_property_as_string_and_variant() {
    let host = TestHost::with_disks();
    let objects = disks(&host);
    let c = &objects[0];

    assert_eq!(c.get_property::<String>("DeviceID").as_deref(), Some("C:"));
    assert_eq!(c.get_property::<Variant>("DeviceID"), Some(Variant::from("C:")));
    // property names are case-insensitive
    assert_eq!(c.get_property::<String>("deviceid").as_deref(), Some("C:"));
}

#[test]
fn test_missing_property_is_none_for_every_type() {
    let host = TestHost::with_disks();
    let objects = disks(&host);
    let c = &objects[0];

    assert_eq!(c.get_property::<String>("NoSuchField"), None);
    assert_eq!(c.get_property::<u32>("NoSuchField"), None);
    assert_eq!(c.get_property::<bool>("NoSuchField"), None);
    assert_eq!(c.get_property::<Variant>("NoSuchField"), None);
    assert_eq!(c.get_property::<Vec<String>>("NoSuchField"), None);
    assert_eq!(c.get("NoSuchField"), None);
}

#[test]
fn test_numeric_text_conversions() {
    let host = TestHost::with_disks();
    let objects = disks(&host);
    let c = &objects[0];

    assert_eq!(c.get_property::<String>("Size").as_deref(), Some("1024"));
    assert_eq!(c.get_property::<u64>("Size"), Some(1024));
    assert_eq!(c.get_property::<f64>("Size"), Some(1024.0));
    assert_eq!(c.get_property::<u8>("Size"), None);
    assert_eq!(c.get_property::<bool>("Size"), None);

    assert_eq!(c.get_property::<u32>("DriveType"), Some(3));
    assert_eq!(c.get_property::<i64>("DriveType"), Some(3));
    assert_eq!(c.get_property::<String>("DriveType"), None);
}

#[test]
fn test_string_array_skips_null_elements() {
    let host = TestHost::with_disks();
    let objects = disks(&host);

    assert_eq!(
        objects[0].get_property::<Vec<String>>("Aliases"),
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(
        objects[1].get_property::<Vec<String>>("Aliases"),
        Some(Vec::new())
    );
    assert_eq!(objects[0].get_property::<String>("Aliases"), None);
}

#[test]
fn test_null_values() {
    let host = TestHost::with_disks();
    let objects = disks(&host);
    let c = &objects[0];
    let d = &objects[1];

    assert_eq!(c.get_property::<String>("VolumeName"), None);
    assert_eq!(c.get_property::<Option<String>>("VolumeName"), Some(None));
    assert_eq!(
        d.get_property::<Option<String>>("VolumeName"),
        Some(Some("DVD".to_string()))
    );
    assert_eq!(d.get_property::<u64>("Size"), None);
    assert_eq!(d.get_property::<Variant>("Size"), Some(Variant::Null));
}

#[test]
fn test_class_name_and_property_listing() {
    let host = TestHost::with_disks();
    let objects = disks(&host);
    let c = &objects[0];

    assert_eq!(c.class_name().as_deref(), Some("Win32_LogicalDisk"));
    assert_eq!(
        c.property_names(),
        vec![
            "DeviceID",
            "Size",
            "FreeSpace",
            "DriveType",
            "FileSystem",
            "VolumeName",
            "Aliases"
        ]
    );

    let properties = c.properties();
    assert_eq!(properties.len(), 7);
    assert_eq!(properties.get("FileSystem"), Some(&Variant::from("NTFS")));
}

#[test]
fn test_projection_limits_properties() {
    let host = TestHost::with_disks();
    let session = host.session();
    let objects = session
        .execute_query("SELECT DeviceID FROM Win32_LogicalDisk")
        .unwrap()
        .collect_objects();

    assert_eq!(objects.len(), 2);
    assert_eq!(objects[1].get_property::<String>("DeviceID").as_deref(), Some("D:"));
    assert_eq!(objects[1].get_property::<String>("FileSystem"), None);
}

#[test]
fn test_objects_keep_session_alive() {
    let host = TestHost::with_disks();
    let session = host.session();
    let objects = session
        .execute_query("SELECT * FROM Win32_LogicalDisk")
        .unwrap()
        .collect_objects();

    let weak = Arc::downgrade(&session);
    drop(session);
    assert!(weak.upgrade().is_some());
    assert_eq!(objects[0].get_property::<String>("DeviceID").as_deref(), Some("C:"));

    drop(objects);
    assert!(weak.upgrade().is_none());
    assert_eq!(host.platform.stats().live_objects, 0);
    assert_eq!(host.platform.stats().live_enumerators, 0);
}

#[test]
fn test_cloned_object_shares_record() {
    let host = TestHost::with_disks();
    let objects = disks(&host);
    let copy = objects[0].clone();

    assert!(Arc::ptr_eq(copy.session(), objects[0].session()));
    assert_eq!(copy.properties(), objects[0].properties());
    assert_eq!(host.platform.stats().live_objects, 2);
}
