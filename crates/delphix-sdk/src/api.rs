// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Environment API capability.
//!
//! Defines the abstract interface the resource controller consumes. The
//! HTTP client and the in-memory mock both implement it.

use crate::error::Result;
use crate::types::{EnvironmentObject, HostEnvironmentCreateParameters, UnixHostEnvironment};

/// Environment operations offered by an engine.
///
/// Calls are blocking and issued one at a time; implementations own any
/// timeouts.
pub trait EnvironmentApi {
    /// Reference of the environment with the given name, if one exists.
    fn find_environment_by_name(&self, name: &str) -> Result<Option<String>>;

    /// Environment addressed by `reference`, or `None` when it does not exist.
    fn find_environment_by_reference(&self, reference: &str) -> Result<Option<EnvironmentObject>>;

    /// Create an environment and return its reference.
    ///
    /// `Ok(None)` means the engine accepted the call without reporting an identity.
    fn create_environment(
        &self,
        params: &HostEnvironmentCreateParameters,
    ) -> Result<Option<String>>;

    /// Update name and description of an existing environment.
    fn update_environment(&self, reference: &str, params: &UnixHostEnvironment) -> Result<()>;

    /// Delete an environment.
    fn delete_environment(&self, reference: &str) -> Result<()>;
}

impl<T: EnvironmentApi + ?Sized> EnvironmentApi for &T {
    fn find_environment_by_name(&self, name: &str) -> Result<Option<String>> {
        (**self).find_environment_by_name(name)
    }

    fn find_environment_by_reference(&self, reference: &str) -> Result<Option<EnvironmentObject>> {
        (**self).find_environment_by_reference(reference)
    }

    fn create_environment(
        &self,
        params: &HostEnvironmentCreateParameters,
    ) -> Result<Option<String>> {
        (**self).create_environment(params)
    }

    fn update_environment(&self, reference: &str, params: &UnixHostEnvironment) -> Result<()> {
        (**self).update_environment(reference, params)
    }

    fn delete_environment(&self, reference: &str) -> Result<()> {
        (**self).delete_environment(reference)
    }
}
