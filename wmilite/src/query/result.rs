// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Restartable query result

use super::cancel::CancelToken;
use super::iterator::{BatchIterator, ExhaustReason, FetchOptions, SharedCursor};
use crate::object::Object;
use crate::session::Session;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Deferred outcome of one query
///
/// Nothing is fetched until `begin` is called. Every `begin` starts a fresh
/// pass from the first record: the cursor is rewound, or, when the provider
/// cannot rewind it, the query is submitted again. Iterators from earlier
/// passes share the rewound cursor and must not be interleaved with the new
/// pass.
pub struct QueryResult {
    session: Arc<Session>,
    query: String,
    cursor: Mutex<SharedCursor>,
    cancel: Option<CancelToken>,
}

impl QueryResult {
    pub(crate) fn new(session: Arc<Session>, query: String, cursor: SharedCursor) -> Self {
        Self {
            session,
            query,
            cursor: Mutex::new(cursor),
            cancel: None,
        }
    }

    /// Stop every iterator of this result at its next fetch once `token` is cancelled
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Start a pass from the first record
    pub fn begin(&self) -> BatchIterator {
        let mut slot = self.cursor.lock();

        let reset = slot.lock().reset();
        if let Err(code) = reset {
            log::debug!(
                "Cursor reset failed ({}); re-submitting query '{}'",
                code,
                self.query
            );
            match self.session.submit(&self.query) {
                Ok(fresh) => *slot = Arc::new(Mutex::new(fresh)),
                Err(e) => {
                    log::warn!("Could not restart query '{}': {}", self.query, e);
                    return BatchIterator::exhausted(
                        Arc::clone(&self.session),
                        ExhaustReason::FetchFailed(e.code().unwrap_or(code)),
                    );
                }
            }
        }

        let config = self.session.config();
        let options = FetchOptions {
            batch_size: config.batch_size,
            timeout: config.fetch_timeout,
            cancel: self.cancel.clone(),
        };
        BatchIterator::new(Arc::clone(&self.session), Arc::clone(&slot), options)
    }

    /// The end sentinel
    pub fn end(&self) -> BatchIterator {
        BatchIterator::end()
    }

    /// Query text this result was produced from
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Run one full pass and keep every record
    pub fn collect_objects(&self) -> Vec<Object> {
        self.begin().collect()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = Object;
    type IntoIter = BatchIterator;

    fn into_iter(self) -> BatchIterator {
        self.begin()
    }
}

impl fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("query", &self.query)
            .field("namespace", &self.session.namespace_path())
            .finish()
    }
}
