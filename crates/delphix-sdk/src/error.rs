// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for delphix-sdk.

use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when talking to a Delphix engine.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure reaching the engine.
    #[error("connection error: {0}")]
    Connection(String),

    /// A call was made before `connect()` established a session.
    #[error("not authenticated: call connect() first")]
    NotAuthenticated,

    /// Engine returned an `ErrorResult` (or a non-JSON HTTP error).
    #[error("server error [{code}]: {message}")]
    Server { code: String, message: String },

    /// Unexpected response from the engine.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SdkError {
    /// Whether the engine reported that the addressed object does not exist.
    ///
    /// Only the engine's own error id counts. A bare HTTP 404 from a proxy or
    /// a wrong base URL is a plain server error.
    pub fn is_object_missing(&self) -> bool {
        matches!(
            self,
            SdkError::Server { code, .. } if code == crate::types::OBJECT_MISSING_ERROR
        )
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Connection(err.to_string())
    }
}

impl From<ureq::Transport> for SdkError {
    fn from(err: ureq::Transport) -> Self {
        SdkError::Connection(err.to_string())
    }
}
