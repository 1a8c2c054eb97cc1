// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role resolution.
//!
//! Resolves what a caller is with respect to one meeting, most privileged
//! first:
//!
//! 1. **Superadmin**: global role, no meeting data needed
//! 2. **Meeting admin**: member of the meeting's admin group
//! 3. **Member**: member of other groups, carrying their union of permissions
//! 4. **Anonymous**: user id `0`, evaluated against the meeting's default group
//!    when anonymous access is enabled
//!
//! Anyone else has [`Standing::NoStanding`]. An unknown user id is an error,
//! never folded into `NoStanding`.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::permission::{Permission, PermissionSet};
use crate::provider::{DataAccess, DataProvider};
use crate::types::{GlobalRole, MeetingId, UserId};

/// Authorization level of a caller with respect to one meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Standing {
	Superadmin,
	MeetingAdmin,
	Member(PermissionSet),
	Anonymous {
		enabled: bool,
		permissions: PermissionSet,
	},
	NoStanding,
}

impl Standing {
	/// True if this standing satisfies `permission`.
	///
	/// Anonymous callers only count when anonymous access is enabled.
	pub fn has_permission(&self, permission: &Permission) -> bool {
		match self {
			Standing::Superadmin | Standing::MeetingAdmin => true,
			Standing::Member(permissions) => permissions.contains(permission),
			Standing::Anonymous {
				enabled,
				permissions,
			} => *enabled && permissions.contains(permission),
			Standing::NoStanding => false,
		}
	}

	/// Short name for logging.
	pub fn label(&self) -> &'static str {
		match self {
			Standing::Superadmin => "superadmin",
			Standing::MeetingAdmin => "meeting_admin",
			Standing::Member(_) => "member",
			Standing::Anonymous { .. } => "anonymous",
			Standing::NoStanding => "no_standing",
		}
	}
}

/// Resolves [`Standing`]s from a data provider.
#[derive(Clone, Copy)]
pub struct RoleResolver<'a> {
	access: DataAccess<'a>,
}

impl<'a> RoleResolver<'a> {
	pub fn new(provider: &'a dyn DataProvider) -> Self {
		Self {
			access: DataAccess::new(provider),
		}
	}

	pub fn access(&self) -> DataAccess<'a> {
		self.access
	}

	/// Global role of the caller. Fails if the user does not exist.
	pub async fn global_role(&self, user_id: UserId) -> Result<GlobalRole> {
		self.access.global_role(user_id).await
	}

	/// Standing of the caller in `meeting_id`.
	#[instrument(level = "debug", skip(self), fields(user_id = %user_id, meeting_id = %meeting_id))]
	pub async fn resolve(&self, user_id: UserId, meeting_id: MeetingId) -> Result<Standing> {
		let role = self.access.global_role(user_id).await?;
		self.resolve_with_role(user_id, role, meeting_id).await
	}

	/// Like [`RoleResolver::resolve`] for a caller whose global role is known.
	pub async fn resolve_with_role(
		&self,
		user_id: UserId,
		role: GlobalRole,
		meeting_id: MeetingId,
	) -> Result<Standing> {
		if role == GlobalRole::Superadmin {
			return Ok(Standing::Superadmin);
		}

		let standing = if user_id.is_anonymous() {
			self.resolve_anonymous(meeting_id).await?
		} else {
			self.resolve_member(user_id, meeting_id).await?
		};

		debug!(standing = standing.label(), "resolved standing");
		Ok(standing)
	}

	async fn resolve_member(&self, user_id: UserId, meeting_id: MeetingId) -> Result<Standing> {
		let groups = self.access.user_groups(user_id, meeting_id).await?;
		if groups.is_empty() {
			return Ok(Standing::NoStanding);
		}

		if let Some(admin_group) = self.access.admin_group(meeting_id).await? {
			if groups.contains(&admin_group) {
				return Ok(Standing::MeetingAdmin);
			}
		}

		let permissions = self.access.group_permissions(&groups).await?;
		Ok(Standing::Member(permissions))
	}

	async fn resolve_anonymous(&self, meeting_id: MeetingId) -> Result<Standing> {
		if !self.access.anonymous_enabled(meeting_id).await? {
			return Ok(Standing::Anonymous {
				enabled: false,
				permissions: PermissionSet::new(),
			});
		}

		let permissions = match self.access.default_group(meeting_id).await? {
			Some(group) => self.access.group_permissions(&[group]).await?,
			None => PermissionSet::new(),
		};

		Ok(Standing::Anonymous {
			enabled: true,
			permissions,
		})
	}
}
