// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type tests for delphix-provider.

use delphix_provider::ResourceError;
use delphix_sdk::SdkError;

fn server_error() -> SdkError {
    SdkError::Server {
        code: "exception.validation.failed".to_string(),
        message: "toolkit path is not writable".to_string(),
    }
}

#[test]
fn test_duplicate_display() {
    let err = ResourceError::Duplicate {
        name: "env1".to_string(),
    };
    assert_eq!(err.to_string(), "Environment \"env1\" already exists");
}

#[test]
fn test_missing_identity_display() {
    let err = ResourceError::MissingIdentity {
        name: "env1".to_string(),
    };
    assert_eq!(err.to_string(), "Environment \"env1\" was not created");
}

#[test]
fn test_not_found_display() {
    let err = ResourceError::NotFound {
        reference: "UNIX_HOST_ENVIRONMENT-9".to_string(),
    };
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "Unable to find environment \"UNIX_HOST_ENVIRONMENT-9\""
    );
}

#[test]
fn test_lookup_error_is_transparent() {
    let err = ResourceError::Lookup(server_error());
    assert_eq!(err.to_string(), server_error().to_string());
    assert!(!err.is_not_found());
}

#[test]
fn test_mutation_errors_are_described() {
    let create = ResourceError::Create(server_error()).to_string();
    assert!(create.starts_with("error creating environment"));
    assert!(create.contains("toolkit path is not writable"));

    let update = ResourceError::Update(server_error()).to_string();
    assert!(update.starts_with("error updating environment"));

    let delete = ResourceError::Delete(server_error()).to_string();
    assert!(delete.starts_with("error deleting environment"));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
}
