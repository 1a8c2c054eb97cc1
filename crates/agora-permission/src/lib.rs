// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission decisions for Agora meeting actions.
//!
//! Given a user, an action such as `topic.update`, and the fields the caller
//! wants to write, the engine decides whether the write is allowed. It never
//! mutates state: every decision is a pure function over a data snapshot
//! supplied through a [`DataProvider`].
//!
//! # Decision model
//!
//! A [`Decision`] is `Result<Verdict, PermissionError>`:
//!
//! - **Allowed**: optionally with an [`Addition`] the caller merges into its write
//! - **Denied**: a well-formed request the policy rejects; not an error
//! - **Error**: the request is malformed or references something that does
//!   not exist (unknown fields, missing `id`, unknown user or target)
//!
//! # Authorization layers
//!
//! Handlers combine, in order: field allow-lists ([`FieldSpec`]), the global
//! superadmin role, the caller's [`Standing`] in the target's meeting
//! (admin group, group permissions, anonymous access), and the permission
//! the action requires ([`PermissionRules`]).

pub mod decision;
pub mod error;
pub mod fields;
pub mod fqfield;
pub mod handler;
pub mod memory;
pub mod permission;
pub mod policies;
pub mod provider;
pub mod registry;
pub mod rules;
pub mod standing;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;

pub use decision::{into_parts, Addition, Decision, Verdict};
pub use error::{ErrorKind, PermissionError, ProviderError};
pub use fields::{require_id, FieldSpec};
pub use fqfield::{Fqfield, FqfieldData, Fqid};
pub use handler::{ActionHandler, IsAllowedParams, MeetingScopedAction, MeetingSource};
pub use memory::MemoryDataProvider;
pub use permission::{InvalidPermission, Permission, PermissionSet};
pub use provider::{DataAccess, DataProvider};
pub use registry::{ActionRegistry, BatchVerdict};
pub use rules::PermissionRules;
pub use standing::{RoleResolver, Standing};
pub use types::{GlobalRole, GroupId, MeetingId, RoleId, UserId};
