// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Provider seam
//!
//! The management store is reached through four objects, each behind a
//! trait so that the session/query machinery never depends on a particular
//! transport:
//!
//! ```text
//! Platform ──create_locator──▶ Locator ──connect_server──▶ Services
//!                                                            │
//!                                              exec_query    ▼
//!                           ClassObject ◀──next_batch── Enumerator
//! ```
//!
//! Every call reports failure as an `HResult`. Handles are released when the
//! boxed trait object is dropped.

pub mod memory;
mod types;

pub use types::{
    AuthenticationLevel, FetchTimeout, ImpersonationLevel, ProxyBlanket, QueryFlags,
    ThreadingModel,
};

use crate::hresult::ProviderResult;
use crate::value::Variant;

/// Process-wide communication subsystem
pub trait Platform: Send + Sync {
    /// Initialize the subsystem for the calling thread
    ///
    /// `RPC_E_CHANGED_MODE` means the thread is already initialized with a
    /// different model; the caller must not balance it with `uninitialize`.
    fn initialize(&self, threading: ThreadingModel) -> ProviderResult<()>;

    /// Set process-wide security defaults
    fn initialize_security(
        &self,
        authentication: AuthenticationLevel,
        impersonation: ImpersonationLevel,
    ) -> ProviderResult<()>;

    /// Undo one successful `initialize`
    fn uninitialize(&self);

    /// Create a locator; fails when the subsystem is not initialized
    fn create_locator(&self) -> ProviderResult<Box<dyn Locator>>;
}

/// Entry point used to bind to a namespace
pub trait Locator: Send + Sync {
    fn connect_server(&self, namespace_path: &str) -> ProviderResult<Box<dyn Services>>;
}

/// A namespace binding
pub trait Services: Send + Sync {
    fn set_proxy_blanket(&self, blanket: &ProxyBlanket) -> ProviderResult<()>;

    fn exec_query(
        &self,
        language: &str,
        query: &str,
        flags: QueryFlags,
    ) -> ProviderResult<Box<dyn Enumerator>>;
}

/// Stateful cursor over a query's result set
pub trait Enumerator: Send {
    /// Return up to `count` records; an empty batch means the cursor is done
    fn next_batch(
        &mut self,
        timeout: FetchTimeout,
        count: usize,
    ) -> ProviderResult<Vec<Box<dyn ClassObject>>>;

    /// Rewind to the first record; `E_NOTIMPL` when unsupported
    fn reset(&mut self) -> ProviderResult<()>;
}

/// One record returned by an enumerator
pub trait ClassObject: Send + Sync {
    /// Read a property; names are matched case-insensitively
    fn get(&self, name: &str) -> ProviderResult<Variant>;

    /// Names of the non-system properties on this record
    fn property_names(&self) -> ProviderResult<Vec<String>>;

    /// Name of the record's class
    fn class_name(&self) -> Option<String> {
        self.get("__CLASS")
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
    }
}
