// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Declared environment configuration and the payloads built from it.

use std::fmt;
use std::path::Path;

use delphix_sdk::{
    Credential, EnvironmentUser, HostEnvironmentCreateParameters, UnixHost,
    UnixHostCreateParameters, UnixHostEnvironment,
};
use serde::Deserialize;

use crate::error::{ResourceError, Result};
use crate::schema;

/// Desired state of one environment, as declared by the user.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub name: String,
    pub description: String,
    pub user_name: String,
    pub user_password: String,
    pub address: String,
    pub toolkit_path: String,
    pub server_id: Option<String>,
    /// Authenticate with the engine's system key instead of `user_password`.
    pub public_key: bool,
}

impl fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("user_name", &self.user_name)
            .field("user_password", &"<redacted>")
            .field("address", &self.address)
            .field("toolkit_path", &self.toolkit_path)
            .field("server_id", &self.server_id)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl EnvironmentConfig {
    /// Create a configuration with the required fields set.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        toolkit_path: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            toolkit_path: toolkit_path.into(),
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the user password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.user_password = password.into();
        self
    }

    /// Select system-key authentication.
    pub fn with_public_key(mut self, public_key: bool) -> Self {
        self.public_key = public_key;
        self
    }

    /// Set the server identifier.
    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is set.
    pub fn validate(&self) -> Result<()> {
        for name in schema::required_fields() {
            let value = match name {
                "user_name" => &self.user_name,
                "name" => &self.name,
                "address" => &self.address,
                "toolkit_path" => &self.toolkit_path,
                _ => continue,
            };
            if value.trim().is_empty() {
                return Err(ResourceError::Validation(format!(
                    "\"{}\" is required",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Credential for the primary user.
    pub fn credential(&self) -> Credential {
        Credential::select(self.public_key, &self.user_password)
    }

    /// Payload of the create call.
    pub fn create_parameters(&self) -> HostEnvironmentCreateParameters {
        HostEnvironmentCreateParameters {
            primary_user: EnvironmentUser {
                name: self.user_name.clone(),
                credential: self.credential(),
            },
            host_environment: self.update_parameters(),
            host_parameters: UnixHostCreateParameters {
                host: UnixHost {
                    address: self.address.clone(),
                    toolkit_path: self.toolkit_path.clone(),
                },
            },
        }
    }

    /// Payload of the update call. Only name and description are sent.
    pub fn update_parameters(&self) -> UnixHostEnvironment {
        UnixHostEnvironment {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EnvironmentConfig {
        EnvironmentConfig::new("env1", "10.0.0.1", "/tk", "delphix")
    }

    #[test]
    fn test_validate_accepts_required_fields() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_field() {
        let mut missing = config();
        missing.address = "  ".to_string();
        let err = missing.validate().unwrap_err();
        assert!(matches!(err, ResourceError::Validation(_)));
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn test_password_credential_by_default() {
        let params = config().with_password("pw").create_parameters();
        assert_eq!(
            params.primary_user.credential,
            Credential::Password {
                password: "pw".to_string()
            }
        );
    }

    #[test]
    fn test_system_key_ignores_password() {
        let params = config()
            .with_password("pw")
            .with_public_key(true)
            .create_parameters();
        assert_eq!(params.primary_user.credential, Credential::SystemKey);
    }

    #[test]
    fn test_create_parameters_carry_host_fields() {
        let params = config().with_description("db host").create_parameters();
        assert_eq!(params.primary_user.name, "delphix");
        assert_eq!(params.host_environment.name, "env1");
        assert_eq!(params.host_environment.description, "db host");
        assert_eq!(params.host_parameters.host.address, "10.0.0.1");
        assert_eq!(params.host_parameters.host.toolkit_path, "/tk");
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let err = serde_json::from_str::<EnvironmentConfig>(r#"{"name":"env1","bogus":1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", config().with_password("hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
