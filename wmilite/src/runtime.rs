// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Process-wide subsystem guard
//!
//! The communication subsystem and its security defaults must be set up once
//! before any session is created. `Runtime` performs that setup on
//! construction and undoes it once the guard and every session opened under
//! it are gone, but only if it was the one that did it: a thread that was
//! already initialized with another threading model is accepted and left
//! alone.

use crate::error::{Error, Result};
use crate::hresult::HResult;
use crate::provider::{AuthenticationLevel, ImpersonationLevel, Platform, ThreadingModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Options for subsystem initialization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct InitOptions {
    pub threading: ThreadingModel,
    pub authentication: AuthenticationLevel,
    pub impersonation: ImpersonationLevel,
}

impl InitOptions {
    pub fn with_threading(mut self, threading: ThreadingModel) -> Self {
        self.threading = threading;
        self
    }
}

/// Initialization shared by a guard and its sessions
pub(crate) struct Subsystem {
    platform: Arc<dyn Platform>,
    initialized: bool,
}

impl Subsystem {
    pub(crate) fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }
}

impl Drop for Subsystem {
    fn drop(&mut self) {
        if self.initialized {
            self.platform.uninitialize();
            log::debug!("Subsystem uninitialized");
        }
    }
}

/// Scoped ownership of the process-wide subsystem
pub struct Runtime {
    subsystem: Arc<Subsystem>,
    options: InitOptions,
}

impl Runtime {
    /// Initialize the subsystem and its security defaults
    pub fn initialize(platform: Arc<dyn Platform>, options: InitOptions) -> Result<Self> {
        let initialized = match platform.initialize(options.threading) {
            Ok(()) => true,
            Err(HResult::RPC_E_CHANGED_MODE) => {
                log::debug!(
                    "Subsystem already initialized with a different threading model; reusing it"
                );
                false
            }
            Err(code) => {
                return Err(Error::Subsystem {
                    message: "Failed to initialize communication subsystem".to_string(),
                    code,
                });
            }
        };

        match platform.initialize_security(options.authentication, options.impersonation) {
            Ok(()) => {}
            Err(HResult::RPC_E_TOO_LATE) => {
                log::debug!("Security defaults already set for this process");
            }
            Err(code) => {
                if initialized {
                    platform.uninitialize();
                }
                return Err(Error::Subsystem {
                    message: "Failed to initialize subsystem security".to_string(),
                    code,
                });
            }
        }

        log::info!(
            "Subsystem ready (threading: {}, authentication: {}, impersonation: {}, owned: {})",
            options.threading,
            options.authentication,
            options.impersonation,
            initialized
        );

        Ok(Self {
            subsystem: Arc::new(Subsystem {
                platform,
                initialized,
            }),
            options,
        })
    }

    /// Whether this guard performed the initialization (and will undo it)
    pub fn is_initialized(&self) -> bool {
        self.subsystem.initialized
    }

    pub fn options(&self) -> &InitOptions {
        &self.options
    }

    pub(crate) fn subsystem(&self) -> &Arc<Subsystem> {
        &self.subsystem
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("options", &self.options)
            .field("initialized", &self.subsystem.initialized)
            .finish()
    }
}
