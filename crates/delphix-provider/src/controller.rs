// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Environment resource controller.
//!
//! Translates declared configuration into engine calls and reconciles the
//! results into [`ResourceState`]. Each operation issues at most one lookup
//! and one mutating call, in that order, and never retries.

use delphix_sdk::EnvironmentApi;
use tracing::{debug, info, instrument, warn};

use crate::environment::EnvironmentConfig;
use crate::error::{ResourceError, Result};
use crate::plan::Plan;
use crate::state::{AppliedConfig, ResourceState};

/// CRUD controller for one environment resource.
pub struct EnvironmentController<'a, C: EnvironmentApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: EnvironmentApi + ?Sized> EnvironmentController<'a, C> {
    /// Create a controller issuing calls through `client`.
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Whether the stored reference still resolves on the engine.
    #[instrument(skip(self, state), fields(reference = state.id().unwrap_or_default()))]
    pub fn exists(&self, state: &ResourceState) -> Result<bool> {
        let Some(reference) = state.id() else {
            return Ok(false);
        };
        let found = self
            .client
            .find_environment_by_reference(reference)
            .map_err(ResourceError::Lookup)?;
        Ok(found.is_some())
    }

    /// Create the environment and record its reference.
    #[instrument(skip(self, config, state), fields(name = %config.name))]
    pub fn create(&self, config: &EnvironmentConfig, state: &mut ResourceState) -> Result<()> {
        config.validate()?;

        let params = config.create_parameters();
        debug!(
            payload = %serde_json::to_string(&params.redacted()).unwrap_or_default(),
            "Built create payload"
        );

        let existing = self
            .client
            .find_environment_by_name(&config.name)
            .map_err(ResourceError::Lookup)?;
        if existing.is_some() {
            return Err(ResourceError::Duplicate {
                name: config.name.clone(),
            });
        }

        let reference = self
            .client
            .create_environment(&params)
            .map_err(ResourceError::Create)?
            .filter(|reference| !reference.is_empty())
            .ok_or_else(|| ResourceError::MissingIdentity {
                name: config.name.clone(),
            })?;

        info!(reference = %reference, "Environment created");
        state.set_id(reference);
        Ok(())
    }

    /// Refresh name and description from the engine.
    #[instrument(skip(self, state), fields(reference = state.id().unwrap_or_default()))]
    pub fn read(&self, state: &mut ResourceState) -> Result<()> {
        let reference = stored_reference(state)?;
        let env = self
            .client
            .find_environment_by_reference(&reference)
            .map_err(ResourceError::Lookup)?
            .ok_or_else(|| ResourceError::NotFound {
                reference: reference.clone(),
            })?;

        state.name = env.name;
        state.description = env.description;
        debug!(name = %state.name, "Environment read");
        Ok(())
    }

    /// Send the new name and description, then read back what the engine kept.
    #[instrument(skip(self, config, state), fields(reference = state.id().unwrap_or_default()))]
    pub fn update(&self, config: &EnvironmentConfig, state: &mut ResourceState) -> Result<()> {
        let reference = stored_reference(state)?;
        let params = config.update_parameters();
        debug!(
            payload = %serde_json::to_string(&params).unwrap_or_default(),
            "Built update payload"
        );

        self.client
            .update_environment(&reference, &params)
            .map_err(ResourceError::Update)?;

        self.read(state)
    }

    /// Delete the environment and forget its reference.
    #[instrument(skip(self, state), fields(reference = state.id().unwrap_or_default()))]
    pub fn delete(&self, state: &mut ResourceState) -> Result<()> {
        let reference = stored_reference(state)?;
        let found = self
            .client
            .find_environment_by_reference(&reference)
            .map_err(ResourceError::Lookup)?;
        if found.is_none() {
            return Err(ResourceError::NotFound { reference });
        }

        self.client
            .delete_environment(&reference)
            .map_err(ResourceError::Delete)?;

        info!("Environment deleted");
        state.clear();
        Ok(())
    }

    /// Bring the state up to date with the engine before planning.
    ///
    /// An environment deleted out-of-band is dropped from state so that the
    /// next plan recreates it. Returns whether the environment exists.
    pub fn refresh(&self, state: &mut ResourceState) -> Result<bool> {
        if !self.exists(state)? {
            if let Some(reference) = state.id() {
                warn!(reference = %reference, "Environment no longer exists, removing from state");
            }
            state.clear();
            return Ok(false);
        }
        self.read(state)?;
        Ok(true)
    }

    /// Execute a plan. `desired` must be set for every plan but `Delete` and `NoOp`.
    #[instrument(skip_all, fields(plan = %plan))]
    pub fn apply(
        &self,
        plan: &Plan,
        desired: Option<&EnvironmentConfig>,
        state: &mut ResourceState,
    ) -> Result<()> {
        match plan {
            Plan::NoOp => Ok(()),
            Plan::Delete => self.delete(state),
            Plan::Create => {
                let config = required_config(desired)?;
                self.create(config, state)?;
                self.record_applied(config, state)
            }
            Plan::Update { .. } => {
                let config = required_config(desired)?;
                self.update(config, state)?;
                state.applied = Some(AppliedConfig::from(config));
                Ok(())
            }
            Plan::Replace { fields } => {
                let config = required_config(desired)?;
                info!(fields = ?fields, "Replacing environment");
                self.delete(state)?;
                self.create(config, state)?;
                self.record_applied(config, state)
            }
        }
    }

    fn record_applied(&self, config: &EnvironmentConfig, state: &mut ResourceState) -> Result<()> {
        state.applied = Some(AppliedConfig::from(config));
        self.read(state)
    }
}

fn stored_reference(state: &ResourceState) -> Result<String> {
    state
        .id()
        .map(str::to_string)
        .ok_or_else(|| ResourceError::NotFound {
            reference: String::new(),
        })
}

fn required_config(desired: Option<&EnvironmentConfig>) -> Result<&EnvironmentConfig> {
    desired.ok_or_else(|| {
        ResourceError::Validation("plan requires a declared configuration".to_string())
    })
}
