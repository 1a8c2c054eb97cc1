// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core identifier types for the permission engine.
//!
//! Every object in the data graph is addressed by a collection name and a
//! positive integer id. The newtypes here keep user, meeting, and group ids
//! from being mixed up while evaluating a decision.
//!
//! [`UserId::ANONYMOUS`] (id `0`) stands for an unauthenticated caller.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(u64);

		impl $name {
			/// Create a new ID from its numeric value.
			pub const fn new(id: u64) -> Self {
				Self(id)
			}

			/// Get the inner numeric value.
			pub const fn get(self) -> u64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<u64> for $name {
			fn from(id: u64) -> Self {
				Self(id)
			}
		}

		impl From<$name> for u64 {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Identifier of a user. Id `0` is the anonymous caller.");
define_id_type!(MeetingId, "Identifier of a meeting.");
define_id_type!(GroupId, "Identifier of a group inside a meeting.");
define_id_type!(RoleId, "Identifier of a global (organisation-wide) role.");

impl UserId {
	/// The unauthenticated caller.
	pub const ANONYMOUS: UserId = UserId(0);

	/// Returns true if this id denotes the anonymous caller.
	pub fn is_anonymous(self) -> bool {
		self == Self::ANONYMOUS
	}
}

// =============================================================================
// Global Roles
// =============================================================================

/// Organisation-wide role of a user, independent of any meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
	/// No global privileges; standing is decided per meeting.
	Ordinary,
	/// Bypasses every meeting-scoped check.
	Superadmin,
}

impl fmt::Display for GlobalRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GlobalRole::Ordinary => write!(f, "ordinary"),
			GlobalRole::Superadmin => write!(f, "superadmin"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn anonymous_user_is_zero() {
		assert!(UserId::ANONYMOUS.is_anonymous());
		assert!(UserId::new(0).is_anonymous());
		assert!(!UserId::new(1).is_anonymous());
	}

	#[test]
	fn ids_display_as_numbers() {
		assert_eq!(MeetingId::new(42).to_string(), "42");
		assert_eq!(u64::from(GroupId::new(7)), 7);
	}

	#[test]
	fn ids_serialize_transparently() {
		let json = serde_json::to_string(&UserId::new(5)).unwrap();
		assert_eq!(json, "5");
		let id: MeetingId = serde_json::from_str("3").unwrap();
		assert_eq!(id, MeetingId::new(3));
	}

	#[test]
	fn global_role_display() {
		assert_eq!(GlobalRole::Superadmin.to_string(), "superadmin");
		assert_eq!(GlobalRole::Ordinary.to_string(), "ordinary");
	}
}
