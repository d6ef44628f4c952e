// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory provider
//!
//! A complete implementation of the provider seam over namespaces held in
//! memory. Used for tests, for the CLI's fixture mode, and anywhere a
//! deterministic management store is needed. Failure injection is driven by
//! a `FaultPlan`; call counters and live-handle counts are exposed through
//! `MemoryStats`.

mod fixture;
mod wql;

use super::{
    AuthenticationLevel, ClassObject, Enumerator, FetchTimeout, ImpersonationLevel, Locator,
    Platform, ProxyBlanket, QueryFlags, Services, ThreadingModel,
};
use crate::hresult::{HResult, ProviderResult};
use crate::value::Variant;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Failure injection for the in-memory provider
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    /// Fail subsystem initialization
    pub init_error: Option<HResult>,
    /// Pretend the process was already initialized with this model
    pub existing_threading: Option<ThreadingModel>,
    /// Fail security initialization
    pub security_error: Option<HResult>,
    /// Fail locator creation
    pub locator_error: Option<HResult>,
    /// Fail namespace connection
    pub connect_error: Option<HResult>,
    /// Fail setting the proxy blanket
    pub blanket_error: Option<HResult>,
    /// Reject every query submission
    pub query_error: Option<HResult>,
    /// Let each enumerator serve this many batches, then fail with `fetch_error`
    pub fail_fetch_after: Option<usize>,
    /// Code used for injected fetch failures (defaults to transport failure)
    pub fetch_error: Option<HResult>,
    /// Report `E_NOTIMPL` from `Enumerator::reset`
    pub reset_unsupported: bool,
}

/// Snapshot of the provider's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub queries: usize,
    pub fetches: usize,
    pub resets: usize,
    pub live_enumerators: usize,
    pub live_objects: usize,
}

#[derive(Debug, Default)]
struct Counters {
    queries: AtomicUsize,
    fetches: AtomicUsize,
    resets: AtomicUsize,
    live_enumerators: AtomicUsize,
    live_objects: AtomicUsize,
}

/// One class: its name as first registered and its instances in order
#[derive(Debug, Clone, Default)]
struct MemoryClass {
    name: String,
    instances: Vec<Vec<(String, Variant)>>,
}

impl MemoryClass {
    /// The schema is inferred from instances; an empty class accepts any name
    fn has_property(&self, name: &str) -> bool {
        self.instances.is_empty()
            || self
                .instances
                .iter()
                .flatten()
                .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Default)]
struct Shared {
    /// namespace key -> lowercase class name -> class
    namespaces: RwLock<HashMap<String, HashMap<String, MemoryClass>>>,
    faults: RwLock<FaultPlan>,
    counters: Counters,
    init_depth: AtomicUsize,
    security_initialized: AtomicBool,
    last_blanket: Mutex<Option<ProxyBlanket>>,
    last_flags: Mutex<Option<QueryFlags>>,
}

impl Shared {
    fn faults(&self) -> FaultPlan {
        self.faults.read().clone()
    }
}

/// Normalize `\\host\root\cimv2`, `root/cimv2` and friends to `root\cimv2`
pub(crate) fn namespace_key(path: &str) -> String {
    let path = path.replace('/', "\\");
    let trimmed = match path.strip_prefix("\\\\") {
        Some(rest) => rest.split_once('\\').map(|(_, ns)| ns).unwrap_or(""),
        None => path.as_str(),
    };
    trimmed.trim_matches('\\').to_lowercase()
}

/// In-memory management store
#[derive(Debug, Clone, Default)]
pub struct MemoryPlatform {
    shared: Arc<Shared>,
}

impl MemoryPlatform {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an (empty) namespace
    pub fn add_namespace(&self, namespace: &str) {
        self.shared
            .namespaces
            .write()
            .entry(namespace_key(namespace))
            .or_default();
    }

    /// Register an empty class; queries against it return no records
    pub fn add_class(&self, namespace: &str, class: &str) {
        let mut namespaces = self.shared.namespaces.write();
        namespaces
            .entry(namespace_key(namespace))
            .or_default()
            .entry(class.to_lowercase())
            .or_insert_with(|| MemoryClass {
                name: class.to_string(),
                instances: Vec::new(),
            });
    }

    /// Append one instance to a class, creating namespace and class as needed
    pub fn add_instance<I, K>(&self, namespace: &str, class: &str, properties: I)
    where
        I: IntoIterator<Item = (K, Variant)>,
        K: Into<String>,
    {
        self.add_class(namespace, class);
        let mut namespaces = self.shared.namespaces.write();
        if let Some(entry) = namespaces
            .get_mut(&namespace_key(namespace))
            .and_then(|classes| classes.get_mut(&class.to_lowercase()))
        {
            entry.instances.push(
                properties
                    .into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect(),
            );
        }
    }

    /// Replace the failure injection plan
    pub fn set_faults(&self, faults: FaultPlan) {
        *self.shared.faults.write() = faults;
    }

    /// Adjust the failure injection plan in place
    pub fn update_faults(&self, update: impl FnOnce(&mut FaultPlan)) {
        update(&mut self.shared.faults.write());
    }

    /// Current counters
    pub fn stats(&self) -> MemoryStats {
        let c = &self.shared.counters;
        MemoryStats {
            queries: c.queries.load(Ordering::SeqCst),
            fetches: c.fetches.load(Ordering::SeqCst),
            resets: c.resets.load(Ordering::SeqCst),
            live_enumerators: c.live_enumerators.load(Ordering::SeqCst),
            live_objects: c.live_objects.load(Ordering::SeqCst),
        }
    }

    /// Whether the subsystem is currently initialized by at least one owner
    pub fn is_initialized(&self) -> bool {
        self.shared.init_depth.load(Ordering::SeqCst) > 0
    }

    /// Blanket applied by the most recent `set_proxy_blanket`
    pub fn last_blanket(&self) -> Option<ProxyBlanket> {
        self.shared.last_blanket.lock().clone()
    }

    /// Flags passed with the most recent query
    pub fn last_query_flags(&self) -> Option<QueryFlags> {
        *self.shared.last_flags.lock()
    }
}

impl Platform for MemoryPlatform {
    fn initialize(&self, threading: ThreadingModel) -> ProviderResult<()> {
        let faults = self.shared.faults();
        if let Some(code) = faults.init_error {
            return Err(code);
        }
        if let Some(existing) = faults.existing_threading {
            if existing != threading {
                return Err(HResult::RPC_E_CHANGED_MODE);
            }
        }
        self.shared.init_depth.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn initialize_security(
        &self,
        _authentication: AuthenticationLevel,
        _impersonation: ImpersonationLevel,
    ) -> ProviderResult<()> {
        if let Some(code) = self.shared.faults().security_error {
            return Err(code);
        }
        if self.shared.security_initialized.swap(true, Ordering::SeqCst) {
            return Err(HResult::RPC_E_TOO_LATE);
        }
        Ok(())
    }

    fn uninitialize(&self) {
        let _ = self
            .shared
            .init_depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| depth.checked_sub(1));
    }

    fn create_locator(&self) -> ProviderResult<Box<dyn Locator>> {
        let faults = self.shared.faults();
        if !self.is_initialized() && faults.existing_threading.is_none() {
            return Err(HResult::CO_E_NOTINITIALIZED);
        }
        if let Some(code) = faults.locator_error {
            return Err(code);
        }
        Ok(Box::new(MemoryLocator {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct MemoryLocator {
    shared: Arc<Shared>,
}

impl Locator for MemoryLocator {
    fn connect_server(&self, namespace_path: &str) -> ProviderResult<Box<dyn Services>> {
        if let Some(code) = self.shared.faults().connect_error {
            return Err(code);
        }
        let key = namespace_key(namespace_path);
        if !self.shared.namespaces.read().contains_key(&key) {
            return Err(HResult::WBEM_E_INVALID_NAMESPACE);
        }
        Ok(Box::new(MemoryServices {
            shared: Arc::clone(&self.shared),
            namespace: key,
        }))
    }
}

struct MemoryServices {
    shared: Arc<Shared>,
    namespace: String,
}

impl Services for MemoryServices {
    fn set_proxy_blanket(&self, blanket: &ProxyBlanket) -> ProviderResult<()> {
        if let Some(code) = self.shared.faults().blanket_error {
            return Err(code);
        }
        *self.shared.last_blanket.lock() = Some(blanket.clone());
        Ok(())
    }

    fn exec_query(
        &self,
        language: &str,
        query: &str,
        flags: QueryFlags,
    ) -> ProviderResult<Box<dyn Enumerator>> {
        self.shared.counters.queries.fetch_add(1, Ordering::SeqCst);
        *self.shared.last_flags.lock() = Some(flags);

        if let Some(code) = self.shared.faults().query_error {
            return Err(code);
        }
        if !language.eq_ignore_ascii_case("WQL") {
            return Err(HResult::WBEM_E_INVALID_QUERY_TYPE);
        }

        let select = wql::parse(query)?;
        let rows = self.evaluate(&select)?;

        Ok(Box::new(MemoryEnumerator::new(Arc::clone(&self.shared), rows)))
    }
}

impl MemoryServices {
    fn evaluate(&self, select: &wql::SelectQuery) -> ProviderResult<Vec<Arc<Row>>> {
        let namespaces = self.shared.namespaces.read();
        let class = namespaces
            .get(&self.namespace)
            .and_then(|classes| classes.get(&select.class.to_lowercase()))
            .ok_or(HResult::WBEM_E_INVALID_CLASS)?;

        if let Some(properties) = &select.properties {
            if let Some(unknown) = properties.iter().find(|p| !class.has_property(p)) {
                log::debug!("Unknown property '{}' on class {}", unknown, class.name);
                return Err(HResult::WBEM_E_INVALID_QUERY);
            }
        }
        if let Some(filter) = &select.filter {
            if !class.has_property(&filter.property) {
                return Err(HResult::WBEM_E_INVALID_QUERY);
            }
        }

        let rows = class
            .instances
            .iter()
            .filter(|instance| match &select.filter {
                Some(filter) => lookup(instance, &filter.property)
                    .map(|value| filter.matches(value))
                    .unwrap_or(false),
                None => true,
            })
            .map(|instance| {
                let properties = match &select.properties {
                    None => instance.clone(),
                    Some(names) => names
                        .iter()
                        .map(|name| {
                            let value = lookup(instance, name).cloned().unwrap_or(Variant::Null);
                            (name.clone(), value)
                        })
                        .collect(),
                };
                Arc::new(Row {
                    class: class.name.clone(),
                    namespace: self.namespace.clone(),
                    properties,
                })
            })
            .collect();

        Ok(rows)
    }
}

fn lookup<'a>(properties: &'a [(String, Variant)], name: &str) -> Option<&'a Variant> {
    properties
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// A projected record held by an enumerator snapshot
#[derive(Debug)]
struct Row {
    class: String,
    namespace: String,
    properties: Vec<(String, Variant)>,
}

struct MemoryEnumerator {
    shared: Arc<Shared>,
    rows: Vec<Arc<Row>>,
    position: usize,
    batches_served: usize,
}

impl MemoryEnumerator {
    fn new(shared: Arc<Shared>, rows: Vec<Arc<Row>>) -> Self {
        shared
            .counters
            .live_enumerators
            .fetch_add(1, Ordering::SeqCst);
        Self {
            shared,
            rows,
            position: 0,
            batches_served: 0,
        }
    }
}

impl Enumerator for MemoryEnumerator {
    fn next_batch(
        &mut self,
        _timeout: FetchTimeout,
        count: usize,
    ) -> ProviderResult<Vec<Box<dyn ClassObject>>> {
        self.shared.counters.fetches.fetch_add(1, Ordering::SeqCst);

        if count == 0 {
            return Err(HResult::E_INVALIDARG);
        }

        let faults = self.shared.faults();
        if let Some(limit) = faults.fail_fetch_after {
            if self.batches_served >= limit {
                return Err(faults.fetch_error.unwrap_or(HResult::WBEM_E_TRANSPORT_FAILURE));
            }
        }

        let end = (self.position + count).min(self.rows.len());
        let batch: Vec<Box<dyn ClassObject>> = self.rows[self.position..end]
            .iter()
            .map(|row| Box::new(MemoryObject::new(Arc::clone(&self.shared), Arc::clone(row))) as Box<dyn ClassObject>)
            .collect();
        self.position = end;
        self.batches_served += 1;

        Ok(batch)
    }

    fn reset(&mut self) -> ProviderResult<()> {
        if self.shared.faults().reset_unsupported {
            return Err(HResult::E_NOTIMPL);
        }
        self.shared.counters.resets.fetch_add(1, Ordering::SeqCst);
        self.position = 0;
        self.batches_served = 0;
        Ok(())
    }
}

impl Drop for MemoryEnumerator {
    fn drop(&mut self) {
        self.shared
            .counters
            .live_enumerators
            .fetch_sub(1, Ordering::SeqCst);
    }
}

struct MemoryObject {
    shared: Arc<Shared>,
    row: Arc<Row>,
}

impl MemoryObject {
    fn new(shared: Arc<Shared>, row: Arc<Row>) -> Self {
        shared.counters.live_objects.fetch_add(1, Ordering::SeqCst);
        Self { shared, row }
    }
}

impl ClassObject for MemoryObject {
    fn get(&self, name: &str) -> ProviderResult<Variant> {
        if name.eq_ignore_ascii_case("__CLASS") {
            return Ok(Variant::from(self.row.class.as_str()));
        }
        if name.eq_ignore_ascii_case("__NAMESPACE") {
            return Ok(Variant::from(self.row.namespace.as_str()));
        }
        lookup(&self.row.properties, name)
            .cloned()
            .ok_or(HResult::WBEM_E_NOT_FOUND)
    }

    fn property_names(&self) -> ProviderResult<Vec<String>> {
        Ok(self.row.properties.iter().map(|(key, _)| key.clone()).collect())
    }

    fn class_name(&self) -> Option<String> {
        Some(self.row.class.clone())
    }
}

impl Drop for MemoryObject {
    fn drop(&mut self) {
        self.shared
            .counters
            .live_objects
            .fetch_sub(1, Ordering::SeqCst);
    }
}
