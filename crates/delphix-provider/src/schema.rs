// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration surface of the environment resource.

/// Version of the resource schema, recorded in the state file.
pub const SCHEMA_VERSION: u32 = 1;

/// Value type of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
}

/// Declaration of one configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-empty.
    pub required: bool,
    /// A change forces the environment to be destroyed and recreated.
    pub force_new: bool,
    /// Never printed or logged.
    pub sensitive: bool,
}

const fn string(name: &'static str, required: bool, force_new: bool) -> FieldSchema {
    FieldSchema {
        name,
        kind: FieldKind::String,
        required,
        force_new,
        sensitive: false,
    }
}

/// Fields of the environment resource.
pub const ENVIRONMENT_SCHEMA: &[FieldSchema] = &[
    string("user_name", true, true),
    FieldSchema {
        name: "user_password",
        kind: FieldKind::String,
        required: false,
        force_new: true,
        sensitive: true,
    },
    string("name", true, false),
    string("address", true, true),
    string("description", false, false),
    string("toolkit_path", true, false),
    string("server_id", false, true),
    FieldSchema {
        name: "public_key",
        kind: FieldKind::Bool,
        required: false,
        force_new: true,
        sensitive: false,
    },
];

/// Look up a field by name.
pub fn field(name: &str) -> Option<&'static FieldSchema> {
    ENVIRONMENT_SCHEMA.iter().find(|f| f.name == name)
}

/// Whether changing `name` requires replacement. Unknown fields never do.
pub fn forces_replacement(name: &str) -> bool {
    field(name).is_some_and(|f| f.force_new)
}

/// Names of the required fields, in schema order.
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    ENVIRONMENT_SCHEMA
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
}
