// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! WmiLite - lazy, type-safe management queries
//!
//! WmiLite submits WQL queries to a management provider and hands back the
//! results as a lazily fetched sequence of records with typed property access.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wmilite::provider::memory::MemoryPlatform;
//! use wmilite::{InitOptions, Runtime, Session};
//!
//! # fn main() -> wmilite::Result<()> {
//! let platform = MemoryPlatform::from_json_file("fixtures/sample_host.json")?;
//! let runtime = Runtime::initialize(Arc::new(platform), InitOptions::default())?;
//!
//! let session = Session::create(&runtime, "cimv2")?;
//! let disks = session.execute_query("SELECT DeviceID, Size FROM Win32_LogicalDisk")?;
//!
//! for disk in &disks {
//!     let id: Option<String> = disk.get_property("DeviceID");
//!     let size: Option<u64> = disk.get_property("Size");
//!     println!("{:?} {:?}", id, size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Runtime ──▶ Session ──execute_query──▶ QueryResult ──begin──▶ BatchIterator
//!               ▲                                                   │
//!               └──────────── shared by every ─────────── Object ◀──┘
//! ```
//!
//! - [`runtime`] - process-wide subsystem guard
//! - [`session`] - namespace connection and query submission
//! - [`query`] - restartable results and the batch iterator
//! - [`object`] - typed property access on one record
//! - [`value`] - tagged values and conversions
//! - [`provider`] - the provider traits and the in-memory provider
//!
//! Connection and query submission failures are returned as [`Error`].
//! Everything after that is absorbed: a property that cannot be read is
//! `None`, a failed fetch ends the iteration.

pub mod config;
pub mod error;
pub mod hresult;
pub mod object;
pub mod provider;
pub mod query;
pub mod runtime;
pub mod session;
pub mod value;

pub use config::SessionConfig;
pub use error::{ConnectStage, Error, Result};
pub use hresult::HResult;
pub use object::Object;
pub use query::{BatchIterator, CancelToken, ExhaustReason, IteratorState, QueryResult};
pub use runtime::{InitOptions, Runtime};
pub use session::Session;
pub use value::{FromVariant, Variant, VariantType};
