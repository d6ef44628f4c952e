// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Provider option types
//!
//! This module defines the enums and small structs passed across the
//! provider seam: threading and security options for the process-wide
//! subsystem, the proxy blanket of a connection, query flags and fetch
//! timeouts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Threading model requested when initializing the subsystem on a thread
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThreadingModel {
    /// Single-threaded apartment
    Apartment,

    /// Free-threaded
    #[default]
    MultiThreaded,
}

impl std::str::FromStr for ThreadingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apartment" | "sta" => Ok(ThreadingModel::Apartment),
            "multithreaded" | "multi_threaded" | "mta" => Ok(ThreadingModel::MultiThreaded),
            _ => Err(format!(
                "Unknown threading model: {}. Valid options: apartment, multithreaded",
                s
            )),
        }
    }
}

impl fmt::Display for ThreadingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThreadingModel::Apartment => "apartment",
            ThreadingModel::MultiThreaded => "multithreaded",
        };
        write!(f, "{}", name)
    }
}

/// Authentication level for calls to the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationLevel {
    /// Let the security layer negotiate
    #[default]
    Default,
    None,
    Connect,
    Call,
    Packet,
    PacketIntegrity,
    PacketPrivacy,
}

impl std::str::FromStr for AuthenticationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "default" => Ok(AuthenticationLevel::Default),
            "none" => Ok(AuthenticationLevel::None),
            "connect" => Ok(AuthenticationLevel::Connect),
            "call" => Ok(AuthenticationLevel::Call),
            "packet" => Ok(AuthenticationLevel::Packet),
            "packet_integrity" => Ok(AuthenticationLevel::PacketIntegrity),
            "packet_privacy" => Ok(AuthenticationLevel::PacketPrivacy),
            _ => Err(format!("Unknown authentication level: {}", s)),
        }
    }
}

impl fmt::Display for AuthenticationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthenticationLevel::Default => "default",
            AuthenticationLevel::None => "none",
            AuthenticationLevel::Connect => "connect",
            AuthenticationLevel::Call => "call",
            AuthenticationLevel::Packet => "packet",
            AuthenticationLevel::PacketIntegrity => "packet_integrity",
            AuthenticationLevel::PacketPrivacy => "packet_privacy",
        };
        write!(f, "{}", name)
    }
}

/// How much of the caller's identity the provider may use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImpersonationLevel {
    Anonymous,
    Identify,
    #[default]
    Impersonate,
    Delegate,
}

impl std::str::FromStr for ImpersonationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anonymous" => Ok(ImpersonationLevel::Anonymous),
            "identify" => Ok(ImpersonationLevel::Identify),
            "impersonate" => Ok(ImpersonationLevel::Impersonate),
            "delegate" => Ok(ImpersonationLevel::Delegate),
            _ => Err(format!("Unknown impersonation level: {}", s)),
        }
    }
}

impl fmt::Display for ImpersonationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImpersonationLevel::Anonymous => "anonymous",
            ImpersonationLevel::Identify => "identify",
            ImpersonationLevel::Impersonate => "impersonate",
            ImpersonationLevel::Delegate => "delegate",
        };
        write!(f, "{}", name)
    }
}

/// Access-control settings applied to a service proxy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ProxyBlanket {
    pub authentication: AuthenticationLevel,
    pub impersonation: ImpersonationLevel,
    /// Server principal name; `None` uses the default principal
    pub principal: Option<String>,
}

/// Flags passed with a query submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryFlags(u32);

impl QueryFlags {
    pub const NONE: QueryFlags = QueryFlags(0);
    /// Return the call before the result set is complete
    pub const RETURN_IMMEDIATELY: QueryFlags = QueryFlags(0x10);
    /// Forward-only enumerator; objects are released once returned
    pub const FORWARD_ONLY: QueryFlags = QueryFlags(0x20);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: QueryFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for QueryFlags {
    type Output = QueryFlags;

    fn bitor(self, rhs: QueryFlags) -> QueryFlags {
        QueryFlags(self.0 | rhs.0)
    }
}

/// Per-fetch wait policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchTimeout {
    /// Block until the provider answers
    #[default]
    Infinite,
    /// Give up after the given number of milliseconds
    Millis(u32),
}

impl std::str::FromStr for FetchTimeout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "infinite" | "none" => Ok(FetchTimeout::Infinite),
            other => other
                .trim_end_matches("ms")
                .parse::<u32>()
                .map(FetchTimeout::Millis)
                .map_err(|_| format!("Invalid fetch timeout: {}", s)),
        }
    }
}

impl fmt::Display for FetchTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTimeout::Infinite => write!(f, "infinite"),
            FetchTimeout::Millis(ms) => write!(f, "{}ms", ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_flags_combine() {
        let flags = QueryFlags::FORWARD_ONLY | QueryFlags::RETURN_IMMEDIATELY;
        assert_eq!(flags.bits(), 0x30);
        assert!(flags.contains(QueryFlags::FORWARD_ONLY));
        assert!(!QueryFlags::NONE.contains(QueryFlags::FORWARD_ONLY));
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("STA".parse::<ThreadingModel>().unwrap(), ThreadingModel::Apartment);
        assert_eq!(
            "packet-privacy".parse::<AuthenticationLevel>().unwrap(),
            AuthenticationLevel::PacketPrivacy
        );
        assert_eq!("250ms".parse::<FetchTimeout>().unwrap(), FetchTimeout::Millis(250));
        assert_eq!("infinite".parse::<FetchTimeout>().unwrap(), FetchTimeout::Infinite);
        assert!("forever".parse::<FetchTimeout>().is_err());
        assert!("shared".parse::<ImpersonationLevel>().is_err());
    }
}
