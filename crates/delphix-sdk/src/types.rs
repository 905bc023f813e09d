// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Wire types for the engine's JSON web API.
//!
//! Every engine object carries a `"type"` discriminant. Request payloads are
//! plain structs tagged with their engine type name so each operation has a
//! single statically typed body.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SdkError;

/// Error id the engine reports when an object reference does not resolve.
pub const OBJECT_MISSING_ERROR: &str = "exception.executor.object.missing";

/// Credential attached to an environment user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Credential {
    /// Password authentication.
    #[serde(rename = "PasswordCredential")]
    Password { password: String },
    /// Authentication with the engine's system SSH key.
    #[serde(rename = "SystemKeyCredential")]
    SystemKey,
}

impl Credential {
    /// Select the credential variant: the system key when `public_key` is set
    /// (the password is ignored), otherwise a password credential.
    pub fn select(public_key: bool, password: &str) -> Self {
        if public_key {
            Credential::SystemKey
        } else {
            Credential::Password {
                password: password.to_string(),
            }
        }
    }

    /// Engine type name of this credential.
    pub fn type_name(&self) -> &'static str {
        match self {
            Credential::Password { .. } => "PasswordCredential",
            Credential::SystemKey => "SystemKeyCredential",
        }
    }

    /// Copy of this credential safe to log.
    pub fn redacted(&self) -> Self {
        match self {
            Credential::Password { .. } => Credential::Password {
                password: "<redacted>".to_string(),
            },
            Credential::SystemKey => Credential::SystemKey,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password { .. } => f
                .debug_struct("Password")
                .field("password", &"<redacted>")
                .finish(),
            Credential::SystemKey => f.write_str("SystemKey"),
        }
    }
}

/// Primary user of a host environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "EnvironmentUser")]
pub struct EnvironmentUser {
    pub name: String,
    pub credential: Credential,
}

/// Unix host environment; also the body of an environment update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "UnixHostEnvironment")]
pub struct UnixHostEnvironment {
    pub name: String,
    pub description: String,
}

/// Unix host address and toolkit location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "UnixHost", rename_all = "camelCase")]
pub struct UnixHost {
    pub address: String,
    pub toolkit_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "UnixHostCreateParameters")]
pub struct UnixHostCreateParameters {
    pub host: UnixHost,
}

/// Body of an environment create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename = "HostEnvironmentCreateParameters",
    rename_all = "camelCase"
)]
pub struct HostEnvironmentCreateParameters {
    pub primary_user: EnvironmentUser,
    pub host_environment: UnixHostEnvironment,
    pub host_parameters: UnixHostCreateParameters,
}

impl HostEnvironmentCreateParameters {
    /// Copy of the payload with the password replaced, for logging.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.primary_user.credential = self.primary_user.credential.redacted();
        copy
    }
}

/// Environment object as returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentObject {
    /// Engine type name, e.g. `UnixHostEnvironment`.
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// Opaque object reference.
    pub reference: String,
    pub name: String,
    /// Empty when the engine omits the field or sends `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Reference of the host backing the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// API version announced when a session is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "APIVersion")]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::new(1, 10, 0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl FromStr for ApiVersion {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(SdkError::Config(format!(
                "invalid API version {:?}: expected major.minor.micro",
                s
            )));
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|e| {
                SdkError::Config(format!("invalid API version {:?}: {}", s, e))
            })?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// Body of the session bootstrap call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename = "APISession")]
pub struct ApiSession {
    pub version: ApiVersion,
}

/// Body of the login call.
#[derive(Clone, Serialize)]
#[serde(tag = "type", rename = "LoginRequest")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Error detail carried by an `ErrorResult`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl ApiError {
    /// Human readable message built from `details` and `action`.
    pub fn message(&self) -> String {
        let details = match &self.details {
            Value::String(s) => s.clone(),
            Value::Null => "no details".to_string(),
            other => other.to_string(),
        };
        match &self.action {
            Some(action) if !action.is_empty() => format!("{} ({})", details, action),
            _ => details,
        }
    }
}

impl From<ApiError> for SdkError {
    fn from(err: ApiError) -> Self {
        SdkError::Server {
            message: err.message(),
            code: err.id,
        }
    }
}

/// Response envelope of every engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApiResponse {
    #[serde(rename = "OKResult")]
    Ok {
        #[serde(default)]
        result: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
    },
    #[serde(rename = "ListResult")]
    List {
        #[serde(default)]
        result: Vec<Value>,
    },
    #[serde(rename = "ErrorResult")]
    Error { error: ApiError },
}

impl ApiResponse {
    /// Convert the envelope into its payload, turning `ErrorResult` into an error.
    pub fn into_result(self) -> crate::Result<Value> {
        match self {
            ApiResponse::Ok { result, .. } => Ok(result),
            ApiResponse::List { result } => Ok(Value::Array(result)),
            ApiResponse::Error { error } => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_select() {
        assert_eq!(Credential::select(true, "ignored"), Credential::SystemKey);
        assert_eq!(
            Credential::select(false, "pw"),
            Credential::Password {
                password: "pw".to_string()
            }
        );
    }

    #[test]
    fn test_credential_debug_hides_password() {
        let credential = Credential::select(false, "hunter2");
        assert!(!format!("{:?}", credential).contains("hunter2"));
    }

    #[test]
    fn test_api_error_message() {
        let err = ApiError {
            id: "exception.validation".to_string(),
            details: Value::String("bad address".to_string()),
            action: Some("Fix the address".to_string()),
        };
        assert_eq!(err.message(), "bad address (Fix the address)");

        let err = ApiError::default();
        assert_eq!(err.message(), "no details");
    }

    #[test]
    fn test_api_version_round_trip_text() {
        let version: ApiVersion = "1.9.3".parse().unwrap();
        assert_eq!(version, ApiVersion::new(1, 9, 3));
        assert_eq!(version.to_string(), "1.9.3");
        assert!("1.9".parse::<ApiVersion>().is_err());
        assert!("1.x.0".parse::<ApiVersion>().is_err());
    }
}
