// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! DelphixClient for interacting with a Delphix engine over its JSON web API.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use urlencoding::encode;

use crate::api::EnvironmentApi;
use crate::config::SdkConfig;
use crate::error::{Result, SdkError};
use crate::types::{
    ApiResponse, ApiSession, EnvironmentObject, HostEnvironmentCreateParameters, LoginRequest,
    UnixHostEnvironment,
};

/// Path prefix of every engine resource.
const API_ROOT: &str = "/resources/json/delphix";

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
}

/// Blocking client for a Delphix engine.
///
/// The engine authenticates through a session cookie, which the underlying
/// `ureq` agent keeps between calls. `connect()` must succeed before any
/// environment operation is issued.
pub struct DelphixClient {
    agent: ureq::Agent,
    config: SdkConfig,
    authenticated: AtomicBool,
}

impl DelphixClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SdkConfig) -> Result<Self> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout(config.request_timeout)
            .build();

        Ok(Self {
            agent,
            config,
            authenticated: AtomicBool::new(false),
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SdkConfig::from_env()?)
    }

    /// Open a session and log in.
    #[instrument(skip(self), fields(url = %self.config.url, username = %self.config.username))]
    pub fn connect(&self) -> Result<()> {
        let session = ApiSession {
            version: self.config.api_version,
        };
        self.send(Method::Post, "session", Some(serde_json::to_value(&session)?))?;

        let login = LoginRequest {
            username: self.config.username.clone(),
            password: self.config.password.clone(),
        };
        self.send(Method::Post, "login", Some(serde_json::to_value(&login)?))?;

        self.authenticated.store(true, Ordering::SeqCst);
        info!(api_version = %self.config.api_version, "Logged in to Delphix engine");
        Ok(())
    }

    /// Log out. Safe to call when no session is open.
    pub fn close(&self) {
        if !self.authenticated.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.send(Method::Post, "logout", Some(Value::Object(Default::default())))
        {
            warn!(error = %e, "Logout failed");
        }
    }

    /// Check if a session is open.
    pub fn is_connected(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Send a request on an open session.
    fn send_authenticated(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        if !self.is_connected() {
            return Err(SdkError::NotAuthenticated);
        }
        self.send(method, path, body)
    }

    /// Send a request and unwrap the engine's response envelope.
    fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = endpoint_url(&self.config.url, path);
        debug!(?method, url = %url, "Sending engine request");

        let request = match method {
            Method::Get => self.agent.get(&url),
            Method::Post => self.agent.post(&url),
        };
        let outcome = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(decode_error(status, &body));
            }
            Err(ureq::Error::Transport(transport)) => return Err(transport.into()),
        };

        let body = response.into_string()?;
        decode_response(&body)
    }
}

// Fallback for early returns and panics. Callers close explicitly so the
// blocking logout happens at a known point.
impl Drop for DelphixClient {
    fn drop(&mut self) {
        self.close();
    }
}

impl EnvironmentApi for DelphixClient {
    #[instrument(skip(self))]
    fn find_environment_by_name(&self, name: &str) -> Result<Option<String>> {
        let listing = self.send_authenticated(Method::Get, "environment", None)?;
        let reference = reference_for_name(&listing, name)?;
        debug!(found = reference.is_some(), "Looked up environment by name");
        Ok(reference)
    }

    #[instrument(skip(self))]
    fn find_environment_by_reference(&self, reference: &str) -> Result<Option<EnvironmentObject>> {
        let path = environment_path(reference, None)?;
        match self.send_authenticated(Method::Get, &path, None) {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.is_object_missing() => {
                debug!("Environment does not exist");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, params), fields(name = %params.host_environment.name))]
    fn create_environment(
        &self,
        params: &HostEnvironmentCreateParameters,
    ) -> Result<Option<String>> {
        let result =
            self.send_authenticated(Method::Post, "environment", Some(serde_json::to_value(params)?))?;

        match result {
            Value::String(reference) if !reference.is_empty() => {
                info!(reference = %reference, "Environment created");
                Ok(Some(reference))
            }
            Value::String(_) | Value::Null => Ok(None),
            other => Err(SdkError::UnexpectedResponse(format!(
                "expected environment reference, got {}",
                other
            ))),
        }
    }

    #[instrument(skip(self, params))]
    fn update_environment(&self, reference: &str, params: &UnixHostEnvironment) -> Result<()> {
        let path = environment_path(reference, None)?;
        self.send_authenticated(Method::Post, &path, Some(serde_json::to_value(params)?))?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_environment(&self, reference: &str) -> Result<()> {
        let path = environment_path(reference, Some("delete"))?;
        self.send_authenticated(Method::Post, &path, Some(Value::Object(Default::default())))?;
        info!("Environment deleted");
        Ok(())
    }
}

fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}/{}", base.trim_end_matches('/'), API_ROOT, path)
}

fn environment_path(reference: &str, action: Option<&str>) -> Result<String> {
    if reference.is_empty() {
        return Err(SdkError::InvalidInput(
            "environment reference must not be empty".to_string(),
        ));
    }
    Ok(match action {
        Some(action) => format!("environment/{}/{}", encode(reference), action),
        None => format!("environment/{}", encode(reference)),
    })
}

/// Decode a successful HTTP body into the envelope's payload.
fn decode_response(body: &str) -> Result<Value> {
    let envelope: ApiResponse = serde_json::from_str(body)
        .map_err(|e| SdkError::UnexpectedResponse(format!("invalid engine response: {}", e)))?;
    envelope.into_result()
}

/// Decode an HTTP error status, preferring the engine's `ErrorResult` when present.
fn decode_error(status: u16, body: &str) -> SdkError {
    match serde_json::from_str::<ApiResponse>(body) {
        Ok(ApiResponse::Error { error }) => error.into(),
        _ => SdkError::Server {
            code: status.to_string(),
            message: if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.to_string()
            },
        },
    }
}

/// Find the reference of a named environment in a `ListResult` payload.
fn reference_for_name(listing: &Value, name: &str) -> Result<Option<String>> {
    let items = listing.as_array().ok_or_else(|| {
        SdkError::UnexpectedResponse("expected a list of environments".to_string())
    })?;

    Ok(items
        .iter()
        .find(|item| item.get("name").and_then(Value::as_str) == Some(name))
        .and_then(|item| item.get("reference").and_then(Value::as_str))
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://engine/", "environment"),
            "http://engine/resources/json/delphix/environment"
        );
        assert_eq!(
            endpoint_url("https://engine", "session"),
            "https://engine/resources/json/delphix/session"
        );
    }

    #[test]
    fn test_environment_path_encodes_reference() {
        assert_eq!(
            environment_path("UNIX_HOST_ENVIRONMENT-1", None).unwrap(),
            "environment/UNIX_HOST_ENVIRONMENT-1"
        );
        assert_eq!(
            environment_path("a/b c", Some("delete")).unwrap(),
            "environment/a%2Fb%20c/delete"
        );
        assert!(matches!(
            environment_path("", None),
            Err(SdkError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_decode_response_ok() {
        let value = decode_response(r#"{"type":"OKResult","result":"ENV-1","job":null}"#).unwrap();
        assert_eq!(value, json!("ENV-1"));
    }

    #[test]
    fn test_decode_response_error_result() {
        let body = r#"{"type":"ErrorResult","error":{"type":"APIError","id":"exception.executor.object.missing","details":"The object does not exist."}}"#;
        let err = decode_response(body).unwrap_err();
        assert!(err.is_object_missing());
    }

    #[test]
    fn test_decode_response_garbage() {
        assert!(matches!(
            decode_response("<html>"),
            Err(SdkError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_decode_error_prefers_engine_error() {
        let body = r#"{"type":"ErrorResult","error":{"id":"exception.validation.failed","details":"bad"}}"#;
        match decode_error(400, body) {
            SdkError::Server { code, message } => {
                assert_eq!(code, "exception.validation.failed");
                assert_eq!(message, "bad");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_plain_status() {
        let err = decode_error(404, "");
        assert!(!err.is_object_missing());
        assert!(matches!(&err, SdkError::Server { code, .. } if code == "404"));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_decode_error_html_not_found_is_not_missing() {
        let err = decode_error(404, "<html>Not Found</html>");
        assert!(!err.is_object_missing());
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_reference_for_name() {
        let listing = json!([
            {"type": "UnixHostEnvironment", "reference": "ENV-1", "name": "env0"},
            {"type": "UnixHostEnvironment", "reference": "ENV-2", "name": "env1"}
        ]);
        assert_eq!(
            reference_for_name(&listing, "env1").unwrap(),
            Some("ENV-2".to_string())
        );
        assert_eq!(reference_for_name(&listing, "missing").unwrap(), None);
        assert!(reference_for_name(&json!({}), "env1").is_err());
    }

    #[test]
    fn test_operations_require_session() {
        let client = DelphixClient::new(SdkConfig::new("http://127.0.0.1:9", "admin", "x")).unwrap();
        assert!(!client.is_connected());
        assert!(matches!(
            client.find_environment_by_name("env1"),
            Err(SdkError::NotAuthenticated)
        ));
        assert!(matches!(
            client.delete_environment("ENV-1"),
            Err(SdkError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_close_without_session_is_noop() {
        let client = DelphixClient::new(SdkConfig::new("http://127.0.0.1:9", "admin", "x")).unwrap();
        client.close();
        client.close();
        assert!(!client.is_connected());
        assert!(matches!(
            client.find_environment_by_reference("ENV-1"),
            Err(SdkError::NotAuthenticated)
        ));
    }
}
