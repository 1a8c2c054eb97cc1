// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group permission names and the sets a standing carries.
//!
//! Permissions are dotted names such as `agenda.can_manage`. Some permissions
//! imply weaker ones (`agenda.can_manage` implies `agenda.can_see`), so a
//! [`PermissionSet`] is stored with its implications already expanded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Permission name that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid permission '{0}': expected <area>.<capability>")]
pub struct InvalidPermission(pub String);

/// A validated permission name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(String);

impl Permission {
	pub const AGENDA_CAN_SEE: &'static str = "agenda.can_see";
	pub const AGENDA_CAN_SEE_INTERNAL: &'static str = "agenda.can_see_internal";
	pub const AGENDA_CAN_MANAGE: &'static str = "agenda.can_manage";

	pub fn parse(name: &str) -> Result<Self, InvalidPermission> {
		let valid_part = |part: &str| {
			!part.is_empty()
				&& part
					.chars()
					.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		};

		match name.split_once('.') {
			Some((area, capability)) if valid_part(area) && valid_part(capability) => {
				Ok(Self(name.to_string()))
			}
			_ => Err(InvalidPermission(name.to_string())),
		}
	}

	/// Wraps a compile-time name known to be valid.
	pub(crate) fn from_static(name: &'static str) -> Self {
		debug_assert!(Self::parse(name).is_ok(), "invalid static permission {name}");
		Self(name.to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Permissions directly implied by this one.
	fn implied(&self) -> impl Iterator<Item = &'static str> + '_ {
		IMPLICATIONS
			.iter()
			.filter(move |(stronger, _)| *stronger == self.0)
			.map(|(_, weaker)| *weaker)
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for Permission {
	type Err = InvalidPermission;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for Permission {
	type Error = InvalidPermission;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<Permission> for String {
	fn from(permission: Permission) -> Self {
		permission.0
	}
}

/// Direct implications `(stronger, weaker)`; the set closure is transitive.
const IMPLICATIONS: &[(&str, &str)] = &[
	("agenda.can_manage", "agenda.can_see_internal"),
	("agenda.can_see_internal", "agenda.can_see"),
	("motion.can_manage", "motion.can_see_internal"),
	("motion.can_see_internal", "motion.can_see"),
	("assignment.can_manage", "assignment.can_see"),
	("user.can_manage", "user.can_see_extra_data"),
	("user.can_see_extra_data", "user.can_see"),
	("list_of_speakers.can_manage", "list_of_speakers.can_see"),
	("mediafile.can_manage", "mediafile.can_see"),
];

/// Set of permissions held by a group or standing, closed under implication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Grants `permission` and everything it implies.
	pub fn grant(&mut self, permission: Permission) {
		let mut pending = vec![permission];
		while let Some(next) = pending.pop() {
			for weaker in next.implied() {
				if let Ok(weaker) = Permission::parse(weaker) {
					if !self.0.contains(&weaker) {
						pending.push(weaker);
					}
				}
			}
			self.0.insert(next);
		}
	}

	/// Adds every permission of `other`.
	pub fn extend(&mut self, other: PermissionSet) {
		self.0.extend(other.0);
	}

	/// True if `permission` was granted or is implied by a granted permission.
	pub fn contains(&self, permission: &Permission) -> bool {
		self.0.contains(permission)
	}

	pub fn contains_name(&self, name: &str) -> bool {
		self.0.iter().any(|p| p.as_str() == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Permission> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<Permission> for PermissionSet {
	fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
		let mut set = PermissionSet::new();
		for permission in iter {
			set.grant(permission);
		}
		set
	}
}
