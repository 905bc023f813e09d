// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for delphix-provider.

use delphix_sdk::SdkError;
use thiserror::Error;

/// Resource controller errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResourceError {
    /// A lookup against the engine failed.
    #[error(transparent)]
    Lookup(SdkError),

    /// An environment with the same name already exists.
    #[error("Environment \"{name}\" already exists")]
    Duplicate { name: String },

    /// The engine accepted the create call but reported no reference.
    #[error("Environment \"{name}\" was not created")]
    MissingIdentity { name: String },

    /// The stored reference no longer resolves on the engine.
    #[error("Unable to find environment \"{reference}\"")]
    NotFound { reference: String },

    /// The create call failed.
    #[error("error creating environment: {0}")]
    Create(SdkError),

    /// The update call failed.
    #[error("error updating environment: {0}")]
    Update(SdkError),

    /// The delete call failed.
    #[error("error deleting environment: {0}")]
    Delete(SdkError),

    /// Declared configuration is incomplete or malformed.
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// State file I/O failed.
    #[error("State file error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResourceError {
    /// Whether the error signals that the remote object is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }
}

/// Result type using ResourceError.
pub type Result<T> = std::result::Result<T, ResourceError>;
