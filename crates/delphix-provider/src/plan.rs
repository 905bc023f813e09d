// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plan computation: what an apply has to do to move the recorded state to
//! the declared configuration.

use std::fmt;

use crate::environment::EnvironmentConfig;
use crate::schema;
use crate::state::{AppliedConfig, ResourceState};

/// Action an apply will take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// State already matches the declaration.
    NoOp,
    /// Nothing exists yet.
    Create,
    /// Updatable fields changed.
    Update { fields: Vec<&'static str> },
    /// A field that cannot be updated changed: delete, then create.
    Replace { fields: Vec<&'static str> },
    /// The declaration was removed.
    Delete,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        matches!(self, Plan::NoOp)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::NoOp => write!(f, "no changes"),
            Plan::Create => write!(f, "create"),
            Plan::Update { fields } => write!(f, "update in place ({})", fields.join(", ")),
            Plan::Replace { fields } => {
                write!(f, "replace, forced by ({})", fields.join(", "))
            }
            Plan::Delete => write!(f, "delete"),
        }
    }
}

/// Compute the plan for `state` given the desired configuration, or `None`
/// when the environment should no longer exist.
pub fn plan(state: &ResourceState, desired: Option<&EnvironmentConfig>) -> Plan {
    let desired = match (state.is_present(), desired) {
        (false, None) => return Plan::NoOp,
        (false, Some(_)) => return Plan::Create,
        (true, None) => return Plan::Delete,
        (true, Some(desired)) => desired,
    };

    let mut changed = match &state.applied {
        Some(applied) => applied.changed_fields(&AppliedConfig::from(desired)),
        None => Vec::new(),
    };

    let forced: Vec<&'static str> = changed
        .iter()
        .copied()
        .filter(|name| schema::forces_replacement(name))
        .collect();
    if !forced.is_empty() {
        return Plan::Replace { fields: forced };
    }

    // Read-back drift on the engine side.
    if state.name != desired.name && !changed.contains(&"name") {
        changed.push("name");
    }
    if state.description != desired.description && !changed.contains(&"description") {
        changed.push("description");
    }

    if changed.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update { fields: changed }
    }
}
