// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Persisted resource state.
//!
//! Only the engine reference and the read-back fields (name, description)
//! are confirmed remote state. The applied configuration is what was last
//! declared, kept so the next plan can tell what changed.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::environment::EnvironmentConfig;
use crate::error::Result;
use crate::schema::SCHEMA_VERSION;

/// Where a resource is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No remote counterpart (never created, or deleted).
    Absent,
    /// Has a reference on the engine.
    Present,
}

/// State of one environment resource between operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(default)]
    pub schema_version: u32,
    /// Engine reference. Never `Some("")`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    /// Name as last read from the engine.
    #[serde(default)]
    pub name: String,
    /// Description as last read from the engine.
    #[serde(default)]
    pub description: String,
    /// Configuration of the last successful apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<AppliedConfig>,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceState {
    /// Empty state: nothing created yet.
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            id: None,
            name: String::new(),
            description: String::new(),
            applied: None,
        }
    }

    /// State for an environment known only by its reference.
    pub fn with_id(reference: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.set_id(reference);
        state
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Record the engine reference. An empty reference clears the identity.
    pub fn set_id(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        self.id = if reference.is_empty() {
            None
        } else {
            Some(reference)
        };
    }

    /// Forget the remote counterpart and everything read from it.
    pub fn clear(&mut self) {
        self.id = None;
        self.name.clear();
        self.description.clear();
        self.applied = None;
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.id.is_some() {
            Lifecycle::Present
        } else {
            Lifecycle::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        self.lifecycle() == Lifecycle::Present
    }

    /// Load state from a JSON file. A missing file yields an empty state.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => {
                let mut state: Self = serde_json::from_str(&contents)?;
                if state.id.as_deref() == Some("") {
                    state.id = None;
                }
                Ok(state)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write state to a JSON file, replacing it atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Declared configuration as recorded in state. The password is kept only as
/// a SHA-256 fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedConfig {
    pub user_name: String,
    #[serde(default)]
    pub user_password_sha256: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub toolkit_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(default)]
    pub public_key: bool,
}

impl From<&EnvironmentConfig> for AppliedConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            user_name: config.user_name.clone(),
            user_password_sha256: password_fingerprint(&config.user_password),
            name: config.name.clone(),
            address: config.address.clone(),
            description: config.description.clone(),
            toolkit_path: config.toolkit_path.clone(),
            server_id: config.server_id.clone(),
            public_key: config.public_key,
        }
    }
}

impl AppliedConfig {
    /// Schema names of the fields that differ from `desired`.
    pub fn changed_fields(&self, desired: &AppliedConfig) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.user_name != desired.user_name {
            changed.push("user_name");
        }
        if self.user_password_sha256 != desired.user_password_sha256 {
            changed.push("user_password");
        }
        if self.name != desired.name {
            changed.push("name");
        }
        if self.address != desired.address {
            changed.push("address");
        }
        if self.description != desired.description {
            changed.push("description");
        }
        if self.toolkit_path != desired.toolkit_path {
            changed.push("toolkit_path");
        }
        if self.server_id != desired.server_id {
            changed.push("server_id");
        }
        if self.public_key != desired.public_key {
            changed.push("public_key");
        }
        changed
    }
}

/// Hex SHA-256 of a password; empty for an empty password.
fn password_fingerprint(password: &str) -> String {
    if password.is_empty() {
        return String::new();
    }
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
