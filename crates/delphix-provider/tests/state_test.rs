// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! State and configuration file tests.

use std::fs;

use delphix_provider::{AppliedConfig, EnvironmentConfig, ResourceError, ResourceState};
use tempfile::TempDir;

#[test]
fn test_load_missing_file_is_empty_state() {
    let dir = TempDir::new().unwrap();
    let state = ResourceState::load(dir.path().join("absent.json")).unwrap();
    assert_eq!(state, ResourceState::new());
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("environment.state.json");

    let config = EnvironmentConfig::new("env1", "10.0.0.1", "/tk", "delphix").with_password("pw");
    let mut state = ResourceState::with_id("UNIX_HOST_ENVIRONMENT-1");
    state.name = "env1".to_string();
    state.applied = Some(AppliedConfig::from(&config));
    state.save(&path).unwrap();

    let loaded = ResourceState::load(&path).unwrap();
    assert_eq!(loaded, state);
    assert!(!dir.path().join("environment.state.tmp").exists());
}

#[test]
fn test_saved_state_never_contains_password() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let config = EnvironmentConfig::new("env1", "10.0.0.1", "/tk", "delphix")
        .with_password("hunter2-plaintext");
    let mut state = ResourceState::with_id("UNIX_HOST_ENVIRONMENT-1");
    state.applied = Some(AppliedConfig::from(&config));
    state.save(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("hunter2-plaintext"));
    assert!(contents.contains("user_password_sha256"));
}

#[test]
fn test_load_treats_empty_id_as_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"schema_version":1,"id":"","name":"env1"}"#).unwrap();

    let state = ResourceState::load(&path).unwrap();
    assert!(!state.is_present());
    assert_eq!(state.name, "env1");
}

#[test]
fn test_load_corrupt_state_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(
        ResourceState::load(&path),
        Err(ResourceError::Json(_))
    ));
}

#[test]
fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("environment.json");
    fs::write(
        &path,
        r#"{
            "name": "env1",
            "description": "source database host",
            "user_name": "delphix",
            "user_password": "pw",
            "address": "10.0.0.1",
            "toolkit_path": "/tk",
            "public_key": false
        }"#,
    )
    .unwrap();

    let config = EnvironmentConfig::from_file(&path).unwrap();
    assert_eq!(config.name, "env1");
    assert_eq!(config.description, "source database host");
    assert_eq!(config.server_id, None);
    assert!(!config.public_key);
}

#[test]
fn test_config_from_file_requires_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("environment.json");
    fs::write(&path, r#"{"name": "env1", "address": "10.0.0.1"}"#).unwrap();

    let err = EnvironmentConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ResourceError::Validation(_)));
    assert!(err.to_string().contains("user_name"));
}
