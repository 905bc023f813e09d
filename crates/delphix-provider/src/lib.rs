// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Delphix environment resource controller.
//!
//! Manages the lifecycle of a single environment (a host registered with a
//! Delphix engine) for an infrastructure-as-code host:
//! - Create, Read, Update, Delete and Exists callbacks ([`EnvironmentController`])
//! - Declared configuration and its schema ([`EnvironmentConfig`], [`schema`])
//! - Persisted state ([`ResourceState`]) and plans ([`Plan`])
//!
//! The engine client is injected as any [`delphix_sdk::EnvironmentApi`].

pub mod controller;
pub mod environment;
pub mod error;
pub mod plan;
pub mod schema;
pub mod state;

pub use controller::EnvironmentController;
pub use environment::EnvironmentConfig;
pub use error::{ResourceError, Result};
pub use plan::{Plan, plan};
pub use state::{AppliedConfig, Lifecycle, ResourceState};
