// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Read-only wrapper over one returned record

use crate::hresult::HResult;
use crate::provider::ClassObject;
use crate::session::Session;
use crate::value::{convert, FromVariant, Variant};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One record produced by a query
///
/// Holds a shared reference to the session that produced it, so the
/// connection stays open for as long as any object is alive. Cloning is
/// cheap: both handles are reference counted.
#[derive(Clone)]
pub struct Object {
    session: Arc<Session>,
    inner: Arc<dyn ClassObject>,
}

impl Object {
    pub(crate) fn new(session: Arc<Session>, inner: Arc<dyn ClassObject>) -> Self {
        Self { session, inner }
    }

    /// Read a property as `T`
    ///
    /// Returns `None` when the property does not exist on this record and
    /// when it exists but cannot be produced as `T`; the two cases are not
    /// distinguished. Requesting `Variant` succeeds whenever the lookup does.
    pub fn get_property<T: FromVariant>(&self, name: &str) -> Option<T> {
        let variant = self.lookup(name).ok()?;
        convert::<T>(&variant)
    }

    /// Read a property without conversion
    pub fn get(&self, name: &str) -> Option<Variant> {
        self.lookup(name).ok()
    }

    fn lookup(&self, name: &str) -> Result<Variant, HResult> {
        self.inner.get(name).map_err(|code| {
            log::trace!("Property '{}' lookup failed: {}", name, code);
            code
        })
    }

    /// Name of the record's class
    pub fn class_name(&self) -> Option<String> {
        self.inner.class_name()
    }

    /// Names of the record's properties, in provider order
    pub fn property_names(&self) -> Vec<String> {
        self.inner.property_names().unwrap_or_default()
    }

    /// Every readable property keyed by name
    pub fn properties(&self) -> BTreeMap<String, Variant> {
        self.property_names()
            .into_iter()
            .filter_map(|name| self.get(&name).map(|value| (name, value)))
            .collect()
    }

    /// Session that produced this record
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class_name())
            .field("properties", &self.properties())
            .finish()
    }
}
