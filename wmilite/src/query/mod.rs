// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query results and batched iteration

pub mod cancel;
pub mod iterator;
pub mod result;

pub use cancel::CancelToken;
pub use iterator::{BatchIterator, ExhaustReason, IteratorState};
pub use result::QueryResult;
