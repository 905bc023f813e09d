// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Delphix SDK
//!
//! Blocking client for the environment endpoints of a Delphix engine's JSON
//! web API.
//!
//! # Architecture
//!
//! - [`EnvironmentApi`] is the capability consumed by resource controllers:
//!   find by name, find by reference, create, update, delete.
//! - [`DelphixClient`] implements it over HTTP with a cookie-backed session.
//! - [`MockEnvironmentApi`] implements it in memory for tests.
//!
//! # Example
//!
//! ```no_run
//! use delphix_sdk::{DelphixClient, EnvironmentApi, SdkConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DelphixClient::new(SdkConfig::new(
//!     "http://engine.example.com",
//!     "delphix_admin",
//!     "secret",
//! ))?;
//! client.connect()?;
//!
//! if let Some(reference) = client.find_environment_by_name("env1")? {
//!     println!("env1 is {}", reference);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod error;
pub mod mock;
mod types;

pub use api::EnvironmentApi;
pub use client::DelphixClient;
pub use config::SdkConfig;
pub use error::{Result, SdkError};
pub use mock::{MockCall, MockEnvironmentApi, MockOperation};
pub use types::{
    ApiError, ApiResponse, ApiSession, ApiVersion, Credential, EnvironmentObject,
    EnvironmentUser, HostEnvironmentCreateParameters, LoginRequest, OBJECT_MISSING_ERROR,
    UnixHost, UnixHostCreateParameters, UnixHostEnvironment,
};
