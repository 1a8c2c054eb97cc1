// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The uniform action handler capability.
//!
//! Every action is an [`ActionHandler`]: given a request, produce a
//! [`Decision`]. Meeting-scoped actions share one evaluation order:
//!
//! 1. **Field validation**: unknown fields are a hard error
//! 2. **Superadmin short-circuit**: no meeting context required
//! 3. **Required fields**: the field identifying the target must be present
//! 4. **Meeting resolution**: the target (or referenced meeting) must exist
//! 5. **Standing**: the caller's standing must satisfy the required permission

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::decision::{Decision, Verdict};
use crate::error::{PermissionError, Result};
use crate::fields::{require_id, FieldSpec};
use crate::fqfield::{FqfieldData, Fqid};
use crate::permission::Permission;
use crate::provider::{DataAccess, DataProvider};
use crate::standing::RoleResolver;
use crate::types::{GlobalRole, MeetingId, UserId};

/// One decision request.
#[derive(Clone, Copy)]
pub struct IsAllowedParams<'a> {
	/// Acting user; [`UserId::ANONYMOUS`] for unauthenticated callers.
	pub user_id: UserId,
	/// Proposed write for one target object.
	pub data: &'a FqfieldData,
	/// Snapshot the decision is evaluated against.
	pub provider: &'a dyn DataProvider,
}

impl<'a> IsAllowedParams<'a> {
	pub fn new(user_id: UserId, data: &'a FqfieldData, provider: &'a dyn DataProvider) -> Self {
		Self {
			user_id,
			data,
			provider,
		}
	}
}

/// Policy for one collection and verb, e.g. `topic.update`.
#[async_trait]
pub trait ActionHandler: Send + Sync {
	/// Action name in `collection.verb` form.
	fn name(&self) -> &str;

	/// Fields this action may write.
	fn fields(&self) -> FieldSpec;

	/// Permission a non-admin standing needs, if the action has one.
	fn required_permission(&self) -> Option<&Permission> {
		None
	}

	async fn is_allowed(&self, params: &IsAllowedParams<'_>) -> Decision;
}

/// Where a meeting-scoped action finds its meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingSource {
	/// The meeting of the existing object `collection/<id_field>`.
	Target {
		collection: &'static str,
		id_field: &'static str,
	},
	/// A meeting referenced directly by a payload field.
	Field(&'static str),
}

/// Action allowed for superadmins, meeting admins, and standings holding one
/// permission in the action's meeting.
#[derive(Debug, Clone)]
pub struct MeetingScopedAction {
	name: &'static str,
	fields: FieldSpec,
	source: MeetingSource,
	permission: Permission,
}

impl MeetingScopedAction {
	pub fn new(
		name: &'static str,
		fields: FieldSpec,
		source: MeetingSource,
		permission: Permission,
	) -> Self {
		Self {
			name,
			fields,
			source,
			permission,
		}
	}

	pub fn source(&self) -> MeetingSource {
		self.source
	}

	async fn evaluate(&self, params: &IsAllowedParams<'_>) -> Decision {
		self.fields.validate(self.name, params.data)?;

		let resolver = RoleResolver::new(params.provider);
		let role = resolver.global_role(params.user_id).await?;
		if role == GlobalRole::Superadmin {
			debug!("superadmin bypasses meeting checks");
			return Ok(Verdict::allowed());
		}

		self.fields.check_required(self.name, params.data)?;
		let meeting_id = self.meeting_id(resolver.access(), params.data).await?;
		let standing = resolver
			.resolve_with_role(params.user_id, role, meeting_id)
			.await?;

		debug!(
			meeting_id = %meeting_id,
			standing = standing.label(),
			permission = %self.permission,
			"evaluated standing"
		);
		Ok(Verdict::from(standing.has_permission(&self.permission)))
	}

	async fn meeting_id(&self, access: DataAccess<'_>, data: &FqfieldData) -> Result<MeetingId> {
		match self.source {
			MeetingSource::Target {
				collection,
				id_field,
			} => {
				let id = require_id(self.name, data, id_field)?;
				access.meeting_of(&Fqid::new(collection, id)).await
			}
			MeetingSource::Field(field) => {
				let id = require_id(self.name, data, field)?;
				let meeting = Fqid::new("meeting", id);
				if access.exists(&meeting).await? {
					Ok(MeetingId::new(id))
				} else {
					Err(PermissionError::UnknownTarget(meeting))
				}
			}
		}
	}
}

#[async_trait]
impl ActionHandler for MeetingScopedAction {
	fn name(&self) -> &str {
		self.name
	}

	fn fields(&self) -> FieldSpec {
		self.fields
	}

	fn required_permission(&self) -> Option<&Permission> {
		Some(&self.permission)
	}

	#[instrument(
		level = "debug",
		skip(self, params),
		fields(action = self.name, user_id = %params.user_id)
	)]
	async fn is_allowed(&self, params: &IsAllowedParams<'_>) -> Decision {
		let decision = self.evaluate(params).await;
		match &decision {
			Ok(verdict) => debug!(allowed = verdict.is_allowed(), "decision"),
			Err(err) => warn!(error = %err, kind = ?err.kind(), "decision failed"),
		}
		decision
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::TestDataProvider;

	const FIELDS: FieldSpec = FieldSpec::new(&["meeting_id", "title"], &["meeting_id"]);

	fn create_like() -> MeetingScopedAction {
		MeetingScopedAction::new(
			"note.create",
			FIELDS,
			MeetingSource::Field("meeting_id"),
			Permission::parse("agenda.can_manage").unwrap(),
		)
	}

	#[tokio::test]
	async fn field_source_requires_existing_meeting() {
		let mut dp = TestDataProvider::new();
		dp.add_user(1);
		let data = FqfieldData::new().with("meeting_id", "5");
		let decision = create_like()
			.is_allowed(&IsAllowedParams::new(UserId::new(1), &data, &dp))
			.await;
		assert!(matches!(decision, Err(PermissionError::UnknownTarget(fqid)) if fqid == Fqid::new("meeting", 5)));
	}

	#[tokio::test]
	async fn field_source_uses_referenced_meeting() {
		let mut dp = TestDataProvider::new();
		dp.add_user_to_meeting(1, 2);
		dp.add_permission_to_group(TestDataProvider::default_group_of(2), "agenda.can_manage");
		let data = FqfieldData::new().with("meeting_id", "2").with("title", "x");
		let decision = create_like()
			.is_allowed(&IsAllowedParams::new(UserId::new(1), &data, &dp))
			.await;
		assert_eq!(decision.unwrap(), Verdict::allowed());
	}

	#[tokio::test]
	async fn permission_in_another_meeting_does_not_count() {
		let mut dp = TestDataProvider::new();
		dp.add_user_to_meeting(1, 1);
		dp.add_permission_to_group(1, "agenda.can_manage");
		dp.add_basic_meeting(2);
		let data = FqfieldData::new().with("meeting_id", "2");
		let decision = create_like()
			.is_allowed(&IsAllowedParams::new(UserId::new(1), &data, &dp))
			.await;
		assert_eq!(decision.unwrap(), Verdict::Denied);
	}

	#[test]
	fn exposes_required_permission() {
		let handler = create_like();
		assert_eq!(handler.name(), "note.create");
		assert_eq!(
			handler.required_permission().map(Permission::as_str),
			Some("agenda.can_manage")
		);
		assert!(handler.fields().is_writable("title"));
	}
}
