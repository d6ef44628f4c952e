// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection to a management namespace
//!
//! A `Session` is created once, never mutated, and shared through an `Arc`
//! by every query result, iterator and object it produces, so the connection
//! lives as long as its longest-lived consumer. It also keeps the runtime's
//! initialization alive, so dropping the `Runtime` first is safe. It is
//! `Send + Sync` and may be used from any number of threads.

use crate::config::SessionConfig;
use crate::error::{ConnectStage, Error, Result};
use crate::hresult::HResult;
use crate::provider::{Enumerator, Locator, QueryFlags, Services};
use crate::query::QueryResult;
use crate::runtime::{Runtime, Subsystem};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Live connection to one namespace
pub struct Session {
    config: SessionConfig,
    namespace_path: String,
    // Kept alive for the lifetime of the service binding
    _locator: Box<dyn Locator>,
    services: Box<dyn Services>,
    // Dropped last: uninitializes once no guard or session remains
    _subsystem: Arc<Subsystem>,
}

impl Session {
    /// Connect to `namespace` with default settings
    pub fn create(runtime: &Runtime, namespace: &str) -> Result<Arc<Session>> {
        Self::connect(runtime, SessionConfig::new(namespace))
    }

    /// Connect using explicit settings
    ///
    /// Negotiates a locator, a namespace binding and the proxy blanket, in
    /// that order; the first failing step is reported in the error.
    pub fn connect(runtime: &Runtime, config: SessionConfig) -> Result<Arc<Session>> {
        config.validate()?;
        let namespace_path = config.namespace_path();

        let connection_error = |stage: ConnectStage, code: HResult| Error::Connection {
            namespace: config.namespace.clone(),
            stage,
            code,
        };

        let subsystem = Arc::clone(runtime.subsystem());
        let locator = subsystem.platform().create_locator().map_err(|code| {
            if code == HResult::CO_E_NOTINITIALIZED {
                Error::Subsystem {
                    message: "Communication subsystem is not initialized".to_string(),
                    code,
                }
            } else {
                connection_error(ConnectStage::Locator, code)
            }
        })?;

        let services = locator
            .connect_server(&namespace_path)
            .map_err(|code| connection_error(ConnectStage::Namespace, code))?;

        services
            .set_proxy_blanket(&config.blanket)
            .map_err(|code| connection_error(ConnectStage::ProxyBlanket, code))?;

        log::info!("Connected to namespace {}", namespace_path);

        Ok(Arc::new(Session {
            config,
            namespace_path,
            _locator: locator,
            services,
            _subsystem: subsystem,
        }))
    }

    /// Submit a query and wrap its cursor
    ///
    /// The text is passed through untouched; syntax errors come back from the
    /// provider as `Error::Query`.
    pub fn execute_query(self: &Arc<Self>, query: &str) -> Result<QueryResult> {
        let cursor = self.submit(query)?;
        Ok(QueryResult::new(
            Arc::clone(self),
            query.to_string(),
            Arc::new(Mutex::new(cursor)),
        ))
    }

    pub(crate) fn submit(&self, query: &str) -> Result<Box<dyn Enumerator>> {
        log::debug!("Executing {} query: {}", self.config.query_language, query);
        self.services
            .exec_query(
                &self.config.query_language,
                query,
                QueryFlags::FORWARD_ONLY | QueryFlags::RETURN_IMMEDIATELY,
            )
            .map_err(|code| Error::Query {
                query: query.to_string(),
                code,
            })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Full path of the connected namespace
    pub fn namespace_path(&self) -> &str {
        &self.namespace_path
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("namespace_path", &self.namespace_path)
            .field("config", &self.config)
            .finish()
    }
}
