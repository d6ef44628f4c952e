// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Memory and storage reports
//!
//! Each report runs its queries through a shared session and renders plain
//! text. A record that lacks a value is rendered without that line.

use std::fmt::Write;
use std::sync::Arc;
use wmilite::{Result, Session};

const KIB_PER_MIB: f64 = 1024.0;
const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Human name of a `Win32_LogicalDisk.DriveType` code
pub fn drive_type_name(code: u32) -> &'static str {
    match code {
        0 => "Unknown",
        1 => "No Root Directory",
        2 => "Removable Disk",
        3 => "Local Disk",
        4 => "Network Drive",
        5 => "Compact Disc",
        6 => "RAM Disk",
        _ => "Unknown Type",
    }
}

/// Total, free and used amounts with the usage percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub total: f64,
    pub free: f64,
    pub used: f64,
    pub percent: f64,
}

impl Usage {
    pub fn new(total: f64, free: f64) -> Self {
        let used = total - free;
        let percent = if total > 0.0 { used / total * 100.0 } else { 0.0 };
        Self {
            total,
            free,
            used,
            percent,
        }
    }
}

/// Operating system memory totals followed by one block per memory module
pub fn memory_report(session: &Arc<Session>) -> Result<String> {
    let mut out = String::new();

    out.push_str("Querying operating system memory information...\n");
    let os = session.execute_query(
        "SELECT TotalVisibleMemorySize, FreePhysicalMemory FROM Win32_OperatingSystem",
    )?;
    for record in &os {
        // Both values are reported in KiB
        let total = record.get_property::<u64>("TotalVisibleMemorySize");
        let free = record.get_property::<u64>("FreePhysicalMemory");
        if let (Some(total), Some(free)) = (total, free) {
            let usage = Usage::new(total as f64 / KIB_PER_MIB, free as f64 / KIB_PER_MIB);
            let _ = writeln!(out, "  Total Physical Memory: {:.2} MB", usage.total);
            let _ = writeln!(out, "  Free Physical Memory:  {:.2} MB", usage.free);
            let _ = writeln!(out, "  Used Physical Memory:  {:.2} MB", usage.used);
            let _ = writeln!(out, "  Memory Usage:          {:.2}%", usage.percent);
        }
    }
    out.push('\n');

    out.push_str("Querying physical memory modules...\n");
    let modules = session
        .execute_query("SELECT Capacity, Speed, Manufacturer, PartNumber FROM Win32_PhysicalMemory")?;

    let mut count = 0;
    for module in &modules {
        count += 1;
        let _ = writeln!(out, "  Module {}:", count);
        if let Some(capacity) = module.get_property::<u64>("Capacity") {
            let _ = writeln!(out, "    Capacity: {:.1} GB", capacity as f64 / BYTES_PER_GIB);
        }
        if let Some(speed) = module.get_property::<u32>("Speed") {
            let _ = writeln!(out, "    Speed: {} MHz", speed);
        }
        if let Some(manufacturer) = module.get_property::<String>("Manufacturer") {
            let _ = writeln!(out, "    Manufacturer: {}", manufacturer);
        }
        if let Some(part) = module.get_property::<String>("PartNumber") {
            let _ = writeln!(out, "    Part Number: {}", part.trim());
        }
        out.push('\n');
    }

    if count == 0 {
        out.push_str("  No physical memory modules found.\n");
    }

    Ok(out)
}

/// Logical disks with usage and drive type, then physical disks
pub fn storage_report(session: &Arc<Session>) -> Result<String> {
    let mut out = String::new();

    out.push_str("Querying logical disk information...\n");
    let disks = session.execute_query(
        "SELECT DeviceID, Size, FreeSpace, FileSystem, DriveType FROM Win32_LogicalDisk",
    )?;
    for disk in &disks {
        let Some(device_id) = disk.get_property::<String>("DeviceID") else {
            continue;
        };
        let _ = writeln!(out, "  Drive {}", device_id);

        let size = disk.get_property::<u64>("Size");
        let free = disk.get_property::<u64>("FreeSpace");
        if let (Some(size), Some(free)) = (size, free) {
            let usage = Usage::new(size as f64 / BYTES_PER_GIB, free as f64 / BYTES_PER_GIB);
            let _ = writeln!(out, "    Total Size: {:.2} GB", usage.total);
            let _ = writeln!(out, "    Free Space: {:.2} GB", usage.free);
            let _ = writeln!(out, "    Used Space: {:.2} GB", usage.used);
            let _ = writeln!(out, "    Usage:      {:.2}%", usage.percent);
        }
        if let Some(file_system) = disk.get_property::<String>("FileSystem") {
            let _ = writeln!(out, "    File System: {}", file_system);
        }
        if let Some(drive_type) = disk.get_property::<u32>("DriveType") {
            let _ = writeln!(out, "    Drive Type: {}", drive_type_name(drive_type));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str("Querying physical disk information...\n");
    let drives = session
        .execute_query("SELECT Model, Size, MediaType, InterfaceType FROM Win32_DiskDrive")?;

    let mut count = 0;
    for drive in &drives {
        count += 1;
        let _ = writeln!(out, "  Physical Disk {}:", count);
        if let Some(model) = drive.get_property::<String>("Model") {
            let _ = writeln!(out, "    Model: {}", model);
        }
        if let Some(size) = drive.get_property::<u64>("Size") {
            let _ = writeln!(out, "    Size: {:.2} GB", size as f64 / BYTES_PER_GIB);
        }
        if let Some(media_type) = drive.get_property::<String>("MediaType") {
            let _ = writeln!(out, "    Media Type: {}", media_type);
        }
        if let Some(interface) = drive.get_property::<String>("InterfaceType") {
            let _ = writeln!(out, "    Interface: {}", interface);
        }
        out.push('\n');
    }

    if count == 0 {
        out.push_str("  No physical disks found.\n");
    }

    Ok(out)
}
