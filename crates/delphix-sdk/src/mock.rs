// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock engine for testing.
//!
//! An in-memory `EnvironmentApi` that records every call and can be told to
//! fail specific operations, so controller behaviour can be checked without
//! a running engine.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::api::EnvironmentApi;
use crate::error::{Result, SdkError};
use crate::types::{EnvironmentObject, HostEnvironmentCreateParameters, UnixHostEnvironment};

/// Operation kinds of the environment API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    FindByName,
    FindByReference,
    Create,
    Update,
    Delete,
}

/// A call recorded by the mock, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    FindByName(String),
    FindByReference(String),
    Create(HostEnvironmentCreateParameters),
    Update(String, UnixHostEnvironment),
    Delete(String),
}

impl MockCall {
    pub fn operation(&self) -> MockOperation {
        match self {
            MockCall::FindByName(_) => MockOperation::FindByName,
            MockCall::FindByReference(_) => MockOperation::FindByReference,
            MockCall::Create(_) => MockOperation::Create,
            MockCall::Update(..) => MockOperation::Update,
            MockCall::Delete(_) => MockOperation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    environments: BTreeMap<String, EnvironmentObject>,
    calls: Vec<MockCall>,
    failing: HashSet<MockOperation>,
    next_id: u64,
    omit_reference: bool,
    ignore_updates: bool,
}

/// Mock engine for testing.
#[derive(Debug, Default)]
pub struct MockEnvironmentApi {
    state: Mutex<MockState>,
}

impl MockEnvironmentApi {
    /// Create an empty mock engine.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed an existing environment and return its reference.
    pub fn insert(&self, name: &str, description: &str) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let reference = format!("UNIX_HOST_ENVIRONMENT-{}", state.next_id);
        state.environments.insert(
            reference.clone(),
            EnvironmentObject {
                object_type: "UnixHostEnvironment".to_string(),
                reference: reference.clone(),
                name: name.to_string(),
                description: description.to_string(),
                enabled: Some(true),
                host: None,
            },
        );
        reference
    }

    /// Remove an environment behind the controller's back.
    pub fn remove(&self, reference: &str) -> Option<EnvironmentObject> {
        self.lock().environments.remove(reference)
    }

    /// Current engine-side view of an environment.
    pub fn get(&self, reference: &str) -> Option<EnvironmentObject> {
        self.lock().environments.get(reference).cloned()
    }

    /// Make every subsequent call of `operation` fail with a server error.
    pub fn fail(&self, operation: MockOperation) {
        self.lock().failing.insert(operation);
    }

    /// Let create calls succeed without returning a reference.
    pub fn omit_reference_on_create(&self) {
        self.lock().omit_reference = true;
    }

    /// Accept update calls without applying them.
    pub fn ignore_updates(&self) {
        self.lock().ignore_updates = true;
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of calls of the given operation.
    pub fn call_count(&self, operation: MockOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Payloads of every create call.
    pub fn created_payloads(&self) -> Vec<HostEnvironmentCreateParameters> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Create(params) => Some(params.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        let operation = call.operation();
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(SdkError::Server {
                code: "exception.mock.failure".to_string(),
                message: format!("injected {:?} failure", operation),
            });
        }
        Ok(state)
    }
}

impl EnvironmentApi for MockEnvironmentApi {
    fn find_environment_by_name(&self, name: &str) -> Result<Option<String>> {
        let state = self.record(MockCall::FindByName(name.to_string()))?;
        Ok(state
            .environments
            .values()
            .find(|env| env.name == name)
            .map(|env| env.reference.clone()))
    }

    fn find_environment_by_reference(&self, reference: &str) -> Result<Option<EnvironmentObject>> {
        let state = self.record(MockCall::FindByReference(reference.to_string()))?;
        Ok(state.environments.get(reference).cloned())
    }

    fn create_environment(
        &self,
        params: &HostEnvironmentCreateParameters,
    ) -> Result<Option<String>> {
        let mut state = self.record(MockCall::Create(params.clone()))?;
        state.next_id += 1;
        let id = state.next_id;
        let reference = format!("UNIX_HOST_ENVIRONMENT-{}", id);
        state.environments.insert(
            reference.clone(),
            EnvironmentObject {
                object_type: "UnixHostEnvironment".to_string(),
                reference: reference.clone(),
                name: params.host_environment.name.clone(),
                description: params.host_environment.description.clone(),
                enabled: Some(true),
                host: Some(format!("UNIX_HOST-{}", id)),
            },
        );
        if state.omit_reference {
            return Ok(None);
        }
        Ok(Some(reference))
    }

    fn update_environment(&self, reference: &str, params: &UnixHostEnvironment) -> Result<()> {
        let mut state =
            self.record(MockCall::Update(reference.to_string(), params.clone()))?;
        if state.ignore_updates {
            return Ok(());
        }
        match state.environments.get_mut(reference) {
            Some(env) => {
                env.name = params.name.clone();
                env.description = params.description.clone();
                Ok(())
            }
            None => Err(missing(reference)),
        }
    }

    fn delete_environment(&self, reference: &str) -> Result<()> {
        let mut state = self.record(MockCall::Delete(reference.to_string()))?;
        state
            .environments
            .remove(reference)
            .map(|_| ())
            .ok_or_else(|| missing(reference))
    }
}

fn missing(reference: &str) -> SdkError {
    SdkError::Server {
        code: crate::types::OBJECT_MISSING_ERROR.to_string(),
        message: format!("object {} does not exist", reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let mock = MockEnvironmentApi::new();
        let reference = mock.insert("env1", "first");

        assert_eq!(
            mock.find_environment_by_name("env1").unwrap(),
            Some(reference.clone())
        );
        let env = mock.find_environment_by_reference(&reference).unwrap().unwrap();
        assert_eq!(env.description, "first");
        assert_eq!(mock.call_count(MockOperation::FindByName), 1);
        assert_eq!(mock.call_count(MockOperation::FindByReference), 1);
    }

    #[test]
    fn test_injected_failure_is_recorded() {
        let mock = MockEnvironmentApi::new();
        mock.fail(MockOperation::Delete);

        let err = mock.delete_environment("ENV-1").unwrap_err();
        assert!(err.to_string().contains("injected"));
        assert_eq!(mock.calls(), vec![MockCall::Delete("ENV-1".to_string())]);
    }

    #[test]
    fn test_delete_missing_reports_object_missing() {
        let mock = MockEnvironmentApi::new();
        assert!(mock.delete_environment("ENV-404").unwrap_err().is_object_missing());
    }
}
