// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Status codes returned by the management provider
//!
//! Every provider call reports success or failure through a 32-bit status
//! code. The high bit is the severity: set means failure. The constants below
//! are the codes this crate produces, inspects, or documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-bit provider status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HResult(pub u32);

impl HResult {
    pub const S_OK: HResult = HResult(0x0000_0000);
    pub const S_FALSE: HResult = HResult(0x0000_0001);

    pub const E_NOTIMPL: HResult = HResult(0x8000_4001);
    pub const E_FAIL: HResult = HResult(0x8000_4005);
    pub const E_INVALIDARG: HResult = HResult(0x8007_0057);

    pub const RPC_E_CHANGED_MODE: HResult = HResult(0x8001_0106);
    pub const RPC_E_TOO_LATE: HResult = HResult(0x8001_0119);
    pub const CO_E_NOTINITIALIZED: HResult = HResult(0x8004_01F0);

    pub const WBEM_E_FAILED: HResult = HResult(0x8004_1001);
    pub const WBEM_E_NOT_FOUND: HResult = HResult(0x8004_1002);
    pub const WBEM_E_ACCESS_DENIED: HResult = HResult(0x8004_1003);
    pub const WBEM_E_TYPE_MISMATCH: HResult = HResult(0x8004_1005);
    pub const WBEM_E_INVALID_NAMESPACE: HResult = HResult(0x8004_100E);
    pub const WBEM_E_INVALID_CLASS: HResult = HResult(0x8004_1010);
    pub const WBEM_E_TRANSPORT_FAILURE: HResult = HResult(0x8004_1015);
    pub const WBEM_E_INVALID_QUERY: HResult = HResult(0x8004_1017);
    pub const WBEM_E_INVALID_QUERY_TYPE: HResult = HResult(0x8004_1018);
    pub const WBEM_E_CALL_CANCELLED: HResult = HResult(0x8004_1032);

    /// Raw code value
    pub fn code(self) -> u32 {
        self.0
    }

    /// True when the severity bit is clear
    pub fn is_success(self) -> bool {
        self.0 & 0x8000_0000 == 0
    }

    /// True when the severity bit is set
    pub fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// Short description for codes this crate knows about
    pub fn describe(self) -> Option<&'static str> {
        let text = match self {
            HResult::S_OK => "success",
            HResult::S_FALSE => "success (no more data)",
            HResult::E_NOTIMPL => "not implemented",
            HResult::E_FAIL => "unspecified failure",
            HResult::E_INVALIDARG => "invalid argument",
            HResult::RPC_E_CHANGED_MODE => "thread already initialized with another threading model",
            HResult::RPC_E_TOO_LATE => "security already initialized",
            HResult::CO_E_NOTINITIALIZED => "communication subsystem not initialized",
            HResult::WBEM_E_FAILED => "call failed",
            HResult::WBEM_E_NOT_FOUND => "object or property not found",
            HResult::WBEM_E_ACCESS_DENIED => "access denied",
            HResult::WBEM_E_TYPE_MISMATCH => "type mismatch",
            HResult::WBEM_E_INVALID_NAMESPACE => "invalid namespace",
            HResult::WBEM_E_INVALID_CLASS => "invalid class",
            HResult::WBEM_E_TRANSPORT_FAILURE => "transport failure",
            HResult::WBEM_E_INVALID_QUERY => "invalid query",
            HResult::WBEM_E_INVALID_QUERY_TYPE => "unsupported query language",
            HResult::WBEM_E_CALL_CANCELLED => "call cancelled",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Some(text) => write!(f, "0x{:08X} ({})", self.0, text),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

impl std::error::Error for HResult {}

impl From<u32> for HResult {
    fn from(code: u32) -> Self {
        HResult(code)
    }
}

/// Result type for raw provider calls
pub type ProviderResult<T> = std::result::Result<T, HResult>;
