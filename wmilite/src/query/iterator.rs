// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Batch iterator over a provider cursor
//!
//! State machine: `Fetching -> Active -> Exhausted`. A fetch happens on
//! construction and whenever `advance` steps past the end of the current
//! batch. An empty batch, a failed fetch or a cancelled token all lead to
//! `Exhausted`, which is terminal.
//!
//! Equality is not positional: two iterators are equal exactly when both are
//! exhausted. That is all a forward-only consumer needs to detect the end by
//! comparing against `BatchIterator::end()`; two live iterators never compare
//! equal, not even to themselves.

use super::cancel::CancelToken;
use crate::config::DEFAULT_BATCH_SIZE;
use crate::hresult::HResult;
use crate::object::Object;
use crate::provider::{Enumerator, FetchTimeout};
use crate::session::Session;
use parking_lot::Mutex;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Provider cursor shared between a query result and its iterators
pub(crate) type SharedCursor = Arc<Mutex<Box<dyn Enumerator>>>;

/// Per-iteration fetch settings
#[derive(Debug, Clone)]
pub(crate) struct FetchOptions {
    pub batch_size: usize,
    pub timeout: FetchTimeout,
    pub cancel: Option<CancelToken>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: FetchTimeout::Infinite,
            cancel: None,
        }
    }
}

/// Why an iterator reached the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustReason {
    /// The provider reported no more records
    EndOfData,
    /// A fetch failed; the sequence may be incomplete
    FetchFailed(HResult),
    /// The cancel token was triggered
    Cancelled,
    /// Constructed as the end sentinel
    Sentinel,
}

/// Position of an iterator in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    Fetching,
    Active,
    Exhausted(ExhaustReason),
}

/// Forward-only iterator that pulls records from the provider in batches
pub struct BatchIterator {
    session: Option<Arc<Session>>,
    cursor: Option<SharedCursor>,
    batch: Vec<Object>,
    index: usize,
    state: IteratorState,
    options: FetchOptions,
}

impl BatchIterator {
    /// Records requested per fetch unless the session says otherwise
    pub const DEFAULT_BATCH_SIZE: usize = DEFAULT_BATCH_SIZE;

    /// Start a pass over `cursor`, fetching the first batch immediately
    pub(crate) fn new(session: Arc<Session>, cursor: SharedCursor, options: FetchOptions) -> Self {
        let mut iterator = Self {
            session: Some(session),
            cursor: Some(cursor),
            batch: Vec::new(),
            index: 0,
            state: IteratorState::Fetching,
            options,
        };
        iterator.fetch_next_batch();
        iterator
    }

    /// An iterator that is exhausted from the start
    pub(crate) fn exhausted(session: Arc<Session>, reason: ExhaustReason) -> Self {
        Self {
            session: Some(session),
            cursor: None,
            batch: Vec::new(),
            index: 0,
            state: IteratorState::Exhausted(reason),
            options: FetchOptions::default(),
        }
    }

    /// The end sentinel; bound to no cursor
    pub fn end() -> Self {
        Self {
            session: None,
            cursor: None,
            batch: Vec::new(),
            index: 0,
            state: IteratorState::Exhausted(ExhaustReason::Sentinel),
            options: FetchOptions::default(),
        }
    }

    /// Record at the current position; `None` once exhausted
    pub fn current(&self) -> Option<&Object> {
        match self.state {
            IteratorState::Active => self.batch.get(self.index),
            _ => None,
        }
    }

    /// Step to the next record, fetching a new batch when the current one
    /// is used up. No-op once exhausted.
    pub fn advance(&mut self) {
        if self.is_exhausted() {
            return;
        }

        self.index += 1;
        if self.index >= self.batch.len() {
            self.fetch_next_batch();
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, IteratorState::Exhausted(_))
    }

    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Why the iterator ended, if it has
    pub fn exhaust_reason(&self) -> Option<ExhaustReason> {
        match self.state {
            IteratorState::Exhausted(reason) => Some(reason),
            _ => None,
        }
    }

    /// Status code of the fetch that ended the sequence, if one failed
    pub fn fetch_error(&self) -> Option<HResult> {
        match self.state {
            IteratorState::Exhausted(ExhaustReason::FetchFailed(code)) => Some(code),
            _ => None,
        }
    }

    /// Records held in memory for the current batch
    pub fn batch_len(&self) -> usize {
        self.batch.len()
    }

    fn exhaust(&mut self, reason: ExhaustReason) {
        self.batch.clear();
        self.index = 0;
        self.cursor = None;
        self.state = IteratorState::Exhausted(reason);
    }

    fn fetch_next_batch(&mut self) {
        self.batch.clear();
        self.index = 0;
        self.state = IteratorState::Fetching;

        if self
            .options
            .cancel
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
        {
            log::debug!("Enumeration cancelled");
            self.exhaust(ExhaustReason::Cancelled);
            return;
        }

        let (Some(session), Some(cursor)) = (self.session.as_ref(), self.cursor.as_ref()) else {
            self.exhaust(ExhaustReason::EndOfData);
            return;
        };

        let result = cursor
            .lock()
            .next_batch(self.options.timeout, self.options.batch_size);

        match result {
            Ok(records) if records.is_empty() => {
                log::trace!("Enumerator returned no records; end of sequence");
                self.exhaust(ExhaustReason::EndOfData);
            }
            Ok(records) => {
                log::trace!("Fetched batch of {} record(s)", records.len());
                let session = Arc::clone(session);
                self.batch = records
                    .into_iter()
                    .map(|record| Object::new(Arc::clone(&session), Arc::from(record)))
                    .collect();
                self.state = IteratorState::Active;
            }
            Err(code) => {
                log::warn!("Batch fetch failed: {}; ending enumeration", code);
                self.exhaust(ExhaustReason::FetchFailed(code));
            }
        }
    }
}

impl Iterator for BatchIterator {
    type Item = Object;

    fn next(&mut self) -> Option<Object> {
        let object = self.current()?.clone();
        self.advance();
        Some(object)
    }
}

impl FusedIterator for BatchIterator {}

/// True iff both iterators are exhausted
impl PartialEq for BatchIterator {
    fn eq(&self, other: &Self) -> bool {
        self.is_exhausted() && other.is_exhausted()
    }
}

impl fmt::Debug for BatchIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchIterator")
            .field("state", &self.state)
            .field("index", &self.index)
            .field("batch_len", &self.batch.len())
            .field("batch_size", &self.options.batch_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_compare_equal() {
        let a = BatchIterator::end();
        let b = BatchIterator::end();
        assert!(a == b);
        assert_eq!(a.exhaust_reason(), Some(ExhaustReason::Sentinel));
        assert!(a.current().is_none());
    }

    #[test]
    fn test_advance_on_sentinel_is_noop() {
        let mut end = BatchIterator::end();
        end.advance();
        end.advance();
        assert!(end.is_exhausted());
        assert_eq!(end.next().map(|_| ()), None);
    }
}
